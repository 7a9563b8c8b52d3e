//! Per-account daily routine.
//!
//! Steps run strictly in order against one account:
//! 1. Authenticate and fetch the full snapshot (failure ends the account)
//! 2. Finish the initial onboarding if the server sent an empty list
//! 3. Claim the daily reward and solve the daily quests
//! 4. Feed the animals when the server asks for it
//! 5. Buy and upgrade animals when the balance is above the threshold
//! 6. Re-fetch and report balances
//!
//! Every step after the first is guarded on its own, so one failing call
//! only skips the work that depends on it.

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use tracing::{debug, info, warn};

use super::economy::{can_afford, next_free_position, upgrade_price};
use super::quests::{QUEST_FAMILIES, claimable_day, pending_quest};
use crate::api::{ApiError, ApiResult, GameApi, QuestDefinition, UserDataAfter};
use crate::config::BotSettings;

/// Onboarding step recorded when the account is first set up.
const INITIAL_ONBOARDING_STEP: u32 = 1;

/// Onboarding step the server requires before auto-feed can be bought.
const FEED_ONBOARDING_STEP: u32 = 20;

/// What one account run produced for the scheduler and the log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountReport {
    /// Server-reported next feed time, only when no feeding is due now.
    pub next_feed_time: Option<String>,
    /// Balances from the final snapshot, `None` if it could not be fetched.
    pub coins: Option<f64>,
    pub tokens: Option<f64>,
}

/// Runs the daily routine for one account.
pub struct AccountRunner<'a, A> {
    api: &'a A,
    settings: &'a BotSettings,
}

impl<'a, A: GameApi> AccountRunner<'a, A> {
    #[must_use]
    pub const fn new(api: &'a A, settings: &'a BotSettings) -> Self {
        Self { api, settings }
    }

    /// Runs every step for the account.
    ///
    /// # Errors
    ///
    /// Returns an error only if login or the first snapshot fetch fails;
    /// later failures are logged and skipped.
    pub async fn run(&self) -> Result<AccountReport, ApiError> {
        info!("Logging in...");
        self.api.authenticate().await?;
        info!("Login successful");

        let snapshot = self.api.fetch_user_data().await?;
        let mut report = AccountReport {
            next_feed_time: snapshot
                .feed
                .next_feed_time
                .clone()
                .filter(|_| !snapshot.feed.is_need_feed),
            ..AccountReport::default()
        };

        if snapshot.hero.onboarding_not_started() {
            info!("Finishing onboarding...");
            match self.api.finish_onboarding(INITIAL_ONBOARDING_STEP).await {
                Ok(_) => info!("Onboarding finished"),
                Err(e) => warn!("Onboarding failed: {}", e),
            }
        }

        match self.api.fetch_user_data_after().await {
            Ok(after) => {
                self.claim_daily_reward(&after).await;
                self.solve_daily_quests(&snapshot.db_data.db_quests, &after)
                    .await;
            }
            Err(e) => warn!("Could not load quest state: {}", e),
        }

        if let Err(e) = self.auto_feed().await {
            warn!("Auto-feed failed: {}", e);
        }

        if snapshot.hero.coins > self.settings.coin_threshold {
            if let Err(e) = self.expand_zoo().await {
                warn!("Animal shop pass failed: {}", e);
            }
        } else {
            debug!(
                "Skipping shop: {} coins is not above {}",
                snapshot.hero.coins, self.settings.coin_threshold
            );
        }

        match self.api.fetch_user_data().await {
            Ok(data) => {
                info!("Tokens: {}", data.hero.tokens);
                info!("Coins: {}", data.hero.coins);
                report.coins = Some(data.hero.coins);
                report.tokens = Some(data.hero.tokens);
            }
            Err(e) => warn!("Could not fetch final balances: {}", e),
        }

        Ok(report)
    }

    /// Claims at most one daily reward: the first claimable day.
    async fn claim_daily_reward(&self, after: &UserDataAfter) {
        let Some(day) = claimable_day(&after.daily_rewards) else {
            debug!("No daily reward available");
            return;
        };

        info!("Claiming daily reward for day {}...", day);
        match self.api.claim_daily_reward(day).await {
            Ok(_) => info!("Daily reward claimed"),
            Err(e) => warn!("Daily reward claim failed: {}", e),
        }
    }

    /// Solves the rebus and riddle quests in sequence.
    async fn solve_daily_quests(&self, catalog: &[QuestDefinition], after: &UserDataAfter) {
        for (i, family) in QUEST_FAMILIES.iter().enumerate() {
            if i > 0 {
                pause(self.settings.quest_delay()).await;
            }
            if let Err(e) = self.solve_quest(family, catalog, after).await {
                warn!("Quest {} failed: {}", family.trim_end_matches('_'), e);
            }
        }
    }

    async fn solve_quest(
        &self,
        family: &str,
        catalog: &[QuestDefinition],
        after: &UserDataAfter,
    ) -> ApiResult<()> {
        let Some(quest) = pending_quest(catalog, after, family) else {
            debug!("No pending {} quest", family);
            return Ok(());
        };

        self.api.check_quest(&quest.key, &quest.check_data).await?;
        pause(self.settings.quest_delay()).await;
        self.api.claim_quest(&quest.key, &quest.check_data).await?;

        info!("Quest {} completed", quest.key);
        Ok(())
    }

    /// Buys an instant feed if the animals are hungry.
    ///
    /// Returns whether a feed was bought.
    async fn auto_feed(&self) -> ApiResult<bool> {
        let data = self.api.fetch_user_data().await?;
        if !data.feed.is_need_feed {
            return Ok(false);
        }

        if !data.hero.has_onboarding_step(FEED_ONBOARDING_STEP) {
            self.api.finish_onboarding(FEED_ONBOARDING_STEP).await?;
        }

        self.api.buy_auto_feed().await?;
        info!("Animals fed");
        Ok(true)
    }

    /// Buys every affordable missing animal, then upgrades owned ones.
    ///
    /// The balance is reduced locally after each purchase so later
    /// candidates are judged against what is actually left.
    async fn expand_zoo(&self) -> ApiResult<()> {
        let data = self.api.fetch_user_data().await?;
        let catalog = &data.db_data.db_animals;

        let mut balance = data.hero.coins;
        let mut owned: HashSet<&str> = data.animals.iter().map(|a| a.key.as_str()).collect();
        let mut occupied: BTreeSet<u32> = data.animals.iter().map(|a| a.position).collect();

        for definition in catalog {
            if owned.contains(definition.key.as_str()) {
                continue;
            }
            let Some(price) = definition.base_price() else {
                continue;
            };
            if !can_afford(balance, price) {
                continue;
            }

            let position = next_free_position(&occupied);
            match self.api.buy_animal(position, &definition.key).await {
                Ok(_) => {
                    info!("Bought {} at position {}", definition.display_name(), position);
                    occupied.insert(position);
                    owned.insert(definition.key.as_str());
                    balance -= price;
                }
                Err(e) => log_shop_failure("buy", definition.display_name(), &e),
            }
        }

        for animal in &data.animals {
            let Some(definition) = catalog.iter().find(|d| d.key == animal.key) else {
                continue;
            };
            let Some((level, price)) = upgrade_price(animal, definition) else {
                continue;
            };
            if !can_afford(balance, price) {
                continue;
            }

            match self.api.buy_animal(animal.position, &animal.key).await {
                Ok(_) => {
                    info!("Upgraded {} to level {}", definition.display_name(), level);
                    balance -= price;
                }
                Err(e) => log_shop_failure("upgrade", definition.display_name(), &e),
            }
        }

        Ok(())
    }
}

/// Shop failures never propagate; a server 500 is worth a warning.
fn log_shop_failure(action: &str, name: &str, err: &ApiError) {
    if err.is_server_error() {
        warn!("Could not {} {}: {}", action, name, err);
    } else {
        debug!("Skipped {} of {}: {}", action, name, err);
    }
}

/// Sleeps for a policy delay; zero means no suspension at all.
pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

impl<A> std::fmt::Debug for AccountRunner<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountRunner")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
