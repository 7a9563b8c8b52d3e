//! Cycle state and wait computation.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{info, warn};

use crate::farm::AccountReport;

/// Format of `nextFeedTime` as sent by the server, always UTC.
pub const FEED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a server feed time as UTC.
#[must_use]
pub fn parse_feed_time(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), FEED_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Whole seconds from `now` until `target`, clamped at zero.
#[must_use]
pub fn wait_until(target: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let secs = (target - now).num_seconds();
    Duration::from_secs(u64::try_from(secs).unwrap_or(0))
}

/// How long the scheduler will sleep before the next batch, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextWait {
    /// Sleep until the first account's animals get hungry.
    UntilFeed { at: DateTime<Utc>, wait: Duration },
    /// No feed time known; sleep the configured default.
    Default(Duration),
}

impl NextWait {
    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self {
            Self::UntilFeed { wait, .. } => *wait,
            Self::Default(wait) => *wait,
        }
    }
}

/// State carried across batches.
///
/// Only the first account of a batch drives the schedule.
#[derive(Debug, Default)]
pub struct CycleState {
    /// Number of batches started.
    pub cycle: u64,

    /// Feed time reported by the first account in the current batch.
    next_feed_time: Option<DateTime<Utc>>,
}

impl CycleState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new batch, forgetting the previous feed time.
    pub fn begin_batch(&mut self) {
        self.cycle += 1;
        self.next_feed_time = None;
    }

    /// Records an account's report; ignored unless it is the first account.
    pub fn record(&mut self, position: usize, report: &AccountReport) {
        if position != 0 {
            return;
        }
        let Some(raw) = report.next_feed_time.as_deref() else {
            return;
        };

        match parse_feed_time(raw) {
            Some(at) => {
                info!(
                    "Next feed time: {}",
                    at.with_timezone(&chrono::Local).format(FEED_TIME_FORMAT)
                );
                self.next_feed_time = Some(at);
            }
            None => warn!("Unrecognized feed time: {}", raw),
        }
    }

    #[must_use]
    pub const fn next_feed_time(&self) -> Option<DateTime<Utc>> {
        self.next_feed_time
    }

    /// Wait before the next batch given the current time.
    #[must_use]
    pub fn next_wait(&self, now: DateTime<Utc>, default: Duration) -> NextWait {
        match self.next_feed_time {
            Some(at) => NextWait::UntilFeed {
                at,
                wait: wait_until(at, now),
            },
            None => NextWait::Default(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn report(feed: Option<&str>) -> AccountReport {
        AccountReport {
            next_feed_time: feed.map(str::to_owned),
            ..AccountReport::default()
        }
    }

    #[test]
    fn test_parse_feed_time_is_utc() {
        let at = parse_feed_time("2026-10-19 12:30:05").unwrap();
        assert_eq!(at.to_rfc3339(), "2026-10-19T12:30:05+00:00");
        assert!(parse_feed_time("19/10/2026").is_none());
    }

    #[test]
    fn test_wait_until_future() {
        let now = Utc::now();
        let wait = wait_until(now + TimeDelta::seconds(90), now);
        assert!(wait.as_secs().abs_diff(90) <= 1);
    }

    #[test]
    fn test_wait_until_past_clamps() {
        let now = Utc::now();
        assert_eq!(wait_until(now - TimeDelta::seconds(30), now), Duration::ZERO);
    }

    #[test]
    fn test_next_wait_from_feed_string() {
        let now = parse_feed_time("2026-10-19 12:00:00").unwrap();
        let mut state = CycleState::new();
        state.begin_batch();
        state.record(0, &report(Some("2026-10-19 12:01:30")));

        let wait = state.next_wait(now, Duration::from_secs(3600));
        assert_eq!(wait.duration(), Duration::from_secs(90));
        assert!(matches!(wait, NextWait::UntilFeed { .. }));
    }

    #[test]
    fn test_next_wait_defaults_without_feed_time() {
        let mut state = CycleState::new();
        state.begin_batch();
        state.record(0, &report(None));
        state.record(1, &report(Some("2026-10-19 12:01:30")));

        assert_eq!(
            state.next_wait(Utc::now(), Duration::from_secs(3600)),
            NextWait::Default(Duration::from_secs(3600))
        );
    }

    #[test]
    fn test_begin_batch_forgets_previous_feed_time() {
        let mut state = CycleState::new();
        state.begin_batch();
        state.record(0, &report(Some("2026-10-19 12:01:30")));
        assert!(state.next_feed_time().is_some());

        state.begin_batch();
        assert_eq!(state.cycle, 2);
        assert!(state.next_feed_time().is_none());
    }
}
