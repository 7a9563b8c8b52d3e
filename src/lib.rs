//! Zoo Farm Bot Library
//!
//! Automation client for the Zoo Telegram mini-game.
//!
//! This crate provides the core functionality for:
//! - Parsing Telegram `initData` credentials and signing API requests
//! - Talking to the game API, optionally through a per-account proxy
//! - Claiming daily rewards and quests, feeding and buying animals
//! - Looping over all accounts with a wait until the next feed time

pub mod api;
pub mod config;
pub mod farm;
pub mod scheduler;
