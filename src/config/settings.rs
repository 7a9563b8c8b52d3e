//! Runtime settings read from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bot-wide settings.
///
/// Delays are pacing policy against the remote rate limiter, not correctness
/// requirements; tests set them to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Base URL of the game API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Pause after each account, in seconds.
    #[serde(default = "default_step_delay")]
    pub step_delay_secs: u64,

    /// Pause between quest check and claim, and between quest families.
    #[serde(default = "default_quest_delay")]
    pub quest_delay_secs: u64,

    /// Wait between cycles when no feed time is known, in seconds.
    #[serde(default = "default_wait")]
    pub default_wait_secs: u64,

    /// Coin balance that must be exceeded before the animal shop is visited.
    #[serde(default = "default_coin_threshold")]
    pub coin_threshold: f64,

    /// Timeout for authenticated API calls, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Timeout for the proxy IP check, in seconds.
    #[serde(default = "default_proxy_check_timeout")]
    pub proxy_check_timeout_secs: u64,

    /// Whether to report each proxy's public IP before processing an account.
    #[serde(default = "default_check_proxy_ip")]
    pub check_proxy_ip: bool,
}

fn default_api_base() -> String {
    "https://api.zoo.team".to_owned()
}

fn default_step_delay() -> u64 {
    2
}

fn default_quest_delay() -> u64 {
    2
}

fn default_wait() -> u64 {
    60 * 60 // 1 hour
}

fn default_coin_threshold() -> f64 {
    1000.0
}

fn default_request_timeout() -> u64 {
    30
}

fn default_proxy_check_timeout() -> u64 {
    10
}

fn default_check_proxy_ip() -> bool {
    true
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            step_delay_secs: default_step_delay(),
            quest_delay_secs: default_quest_delay(),
            default_wait_secs: default_wait(),
            coin_threshold: default_coin_threshold(),
            request_timeout_secs: default_request_timeout(),
            proxy_check_timeout_secs: default_proxy_check_timeout(),
            check_proxy_ip: default_check_proxy_ip(),
        }
    }
}

impl BotSettings {
    /// Creates settings from `ZOO_*` environment variables with defaults.
    ///
    /// Unparseable values fall back to the default.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self {
            api_base: std::env::var("ZOO_API_BASE").unwrap_or_else(|_| default_api_base()),
            step_delay_secs: env_or("ZOO_STEP_DELAY_SECS", default_step_delay),
            quest_delay_secs: env_or("ZOO_QUEST_DELAY_SECS", default_quest_delay),
            default_wait_secs: env_or("ZOO_DEFAULT_WAIT_SECS", default_wait),
            coin_threshold: env_or("ZOO_COIN_THRESHOLD", default_coin_threshold),
            request_timeout_secs: env_or("ZOO_REQUEST_TIMEOUT_SECS", default_request_timeout),
            proxy_check_timeout_secs: env_or(
                "ZOO_PROXY_CHECK_TIMEOUT_SECS",
                default_proxy_check_timeout,
            ),
            check_proxy_ip: env_or("ZOO_CHECK_PROXY_IP", default_check_proxy_ip),
        }
    }

    /// Settings with every delay zeroed, for tests.
    #[must_use]
    pub fn without_delays() -> Self {
        Self {
            step_delay_secs: 0,
            quest_delay_secs: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn step_delay(&self) -> Duration {
        Duration::from_secs(self.step_delay_secs)
    }

    #[must_use]
    pub const fn quest_delay(&self) -> Duration {
        Duration::from_secs(self.quest_delay_secs)
    }

    #[must_use]
    pub const fn default_wait(&self) -> Duration {
        Duration::from_secs(self.default_wait_secs)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: fn() -> T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(default)
}
