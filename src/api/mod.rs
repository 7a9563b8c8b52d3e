//! Zoo game API client module.
//!
//! Provides request signing, session credential parsing and the HTTP
//! gateway used by the farm runner.

mod client;
mod init_data;
mod proxy;
pub mod signer;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{ApiError, ApiResult, GameApi, ZooClient};
pub use init_data::{CredentialError, InitData, TelegramUser};
pub use proxy::{ProxyEntry, ProxyError};
pub use types::{
    AnimalDefinition, AnimalLevel, Catalog, CLAIMABLE, CompletedQuest, DailyRewards, FeedStatus,
    Hero, OwnedAnimal, QuestDefinition, UserData, UserDataAfter,
};
