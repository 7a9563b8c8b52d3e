//! Configuration module for the farm bot.
//!
//! Handles runtime settings from the environment and loading of the
//! account credential and proxy lists.

mod accounts;
mod settings;

pub use accounts::{
    AccountEntry, AccountList, ConfigError, RejectedLine, parse_proxies, read_lines,
};
pub use settings::BotSettings;
