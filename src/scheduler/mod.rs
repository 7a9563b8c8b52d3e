//! Cycle scheduler module.
//!
//! Runs the farm routine over all accounts and decides how long to sleep
//! before the next batch based on the server-reported feed time.

mod countdown;
mod runner;
mod state;

pub use countdown::{countdown, format_wait};
pub use runner::{CycleScheduler, FarmAccount};
pub use state::{CycleState, FEED_TIME_FORMAT, NextWait, parse_feed_time, wait_until};
