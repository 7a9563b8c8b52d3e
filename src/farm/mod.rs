//! Daily farming routine for a single account.
//!
//! Sequences the dependent API calls (login, rewards, quests, feeding,
//! animal shop) using the snapshots the gateway returns.

mod economy;
mod quests;
mod runner;

pub use economy::{can_afford, next_free_position, upgrade_price};
pub use quests::{QUEST_FAMILIES, REWARD_DAYS, claimable_day, pending_quest};
pub use runner::{AccountReport, AccountRunner};

pub(crate) use runner::pause;
