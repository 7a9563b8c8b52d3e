//! Daily reward and daily quest selection.

use std::ops::RangeInclusive;

use crate::api::{CLAIMABLE, DailyRewards, QuestDefinition, UserDataAfter};

/// Days of the daily reward calendar.
pub const REWARD_DAYS: RangeInclusive<u8> = 1..=16;

/// Key prefixes of the daily quest families, in processing order.
pub const QUEST_FAMILIES: [&str; 2] = ["rebus_", "riddle_"];

/// First day in the calendar whose reward can be taken now.
#[must_use]
pub fn claimable_day(rewards: &DailyRewards) -> Option<u8> {
    REWARD_DAYS.into_iter().find(|&day| rewards.status(day) == Some(CLAIMABLE))
}

/// The quest of a family that still needs solving.
///
/// Picks the first catalog entry whose key contains `prefix` and returns it
/// unless a quest with the same key is already completed.
#[must_use]
pub fn pending_quest<'a>(
    catalog: &'a [QuestDefinition],
    after: &UserDataAfter,
    prefix: &str,
) -> Option<&'a QuestDefinition> {
    catalog
        .iter()
        .find(|q| q.key.contains(prefix))
        .filter(|q| !after.is_completed(&q.key))
}
