//! Cycle scheduler runner.
//!
//! Each cycle:
//! 1. Process every account in order, one call in flight at a time
//! 2. Capture the first account's next feed time, if it reported one
//! 3. Sleep until that time (or the default wait), then start over
//!
//! A failing account is logged and skipped; it never stops the batch.

use chrono::Utc;
use tracing::{error, info, warn};

use super::countdown::{countdown, format_wait};
use super::state::{CycleState, NextWait};
use crate::api::GameApi;
use crate::config::BotSettings;
use crate::farm::{AccountRunner, pause};

/// An account paired with the client that talks for it.
#[derive(Debug)]
pub struct FarmAccount<A> {
    /// Position in the data file, shown one-based in logs.
    pub index: usize,
    /// Telegram username for the log header.
    pub username: String,
    pub api: A,
}

/// Drives batches of accounts forever.
pub struct CycleScheduler<A> {
    accounts: Vec<FarmAccount<A>>,
    settings: BotSettings,
    show_countdown: bool,
}

impl<A: GameApi> CycleScheduler<A> {
    #[must_use]
    pub fn new(accounts: Vec<FarmAccount<A>>, settings: BotSettings) -> Self {
        Self {
            accounts,
            settings,
            show_countdown: true,
        }
    }

    /// Enables or disables the terminal countdown between cycles.
    #[must_use]
    pub const fn with_countdown(mut self, enabled: bool) -> Self {
        self.show_countdown = enabled;
        self
    }

    /// Runs batches until `max_cycles` is reached, or forever if `None`.
    pub async fn run(&self, max_cycles: Option<u64>) {
        info!("Farm scheduler started with {} account(s)", self.accounts.len());

        let mut state = CycleState::new();
        loop {
            self.run_batch(&mut state).await;

            if max_cycles.is_some_and(|max| state.cycle >= max) {
                info!("Completed {} cycle(s), stopping", state.cycle);
                break;
            }

            let wait = state.next_wait(Utc::now(), self.settings.default_wait());
            match wait {
                NextWait::UntilFeed { wait, .. } => {
                    info!("Waiting {} until the next feed", format_wait(wait));
                }
                NextWait::Default(wait) => {
                    info!("No feed time reported, using default wait of {}", format_wait(wait));
                }
            }

            if self.show_countdown {
                countdown(wait.duration()).await;
            } else {
                tokio::time::sleep(wait.duration()).await;
            }
        }
    }

    /// Processes every account once.
    pub async fn run_batch(&self, state: &mut CycleState) {
        state.begin_batch();
        info!("Starting cycle {}", state.cycle);

        for (position, account) in self.accounts.iter().enumerate() {
            let route = self.describe_route(account).await;
            info!(
                "========== Account {} | {} | ip: {} ==========",
                account.index + 1,
                account.username,
                route
            );

            match AccountRunner::new(&account.api, &self.settings).run().await {
                Ok(report) => state.record(position, &report),
                Err(e) => error!("Error processing account {}: {}", account.index + 1, e),
            }

            pause(self.settings.step_delay()).await;
        }
    }

    /// Public IP the account is seen from, for the log header.
    async fn describe_route(&self, account: &FarmAccount<A>) -> String {
        if !self.settings.check_proxy_ip {
            return "unchecked".to_owned();
        }
        match account.api.egress_ip().await {
            Ok(Some(ip)) => ip,
            Ok(None) => "No proxy".to_owned(),
            Err(e) => {
                warn!("Proxy check failed: {}", e);
                "No proxy".to_owned()
            }
        }
    }

    #[must_use]
    pub fn accounts(&self) -> &[FarmAccount<A>] {
        &self.accounts
    }
}

impl<A> std::fmt::Debug for CycleScheduler<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleScheduler")
            .field("accounts", &self.accounts.len())
            .field("show_countdown", &self.show_countdown)
            .finish_non_exhaustive()
    }
}
