//! Request payloads and response models for the Zoo API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Response envelope returned by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload of `/telegram/auth`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload<'a> {
    pub init_data: &'a str,
    pub start_param: &'a str,
    pub photo_url: &'a str,
    pub platform: &'a str,
    pub chat_id: &'a str,
    pub chat_type: &'a str,
    pub chat_instance: &'a str,
}

/// Payload of `/animal/buy`, used for both purchase and upgrade.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalOrder<'a> {
    pub position: u32,
    pub animal_key: &'a str,
}

/// Snapshot returned by `/user/data/all`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub hero: Hero,
    #[serde(default)]
    pub feed: FeedStatus,
    #[serde(default)]
    pub animals: Vec<OwnedAnimal>,
    #[serde(default)]
    pub db_data: Catalog,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    /// Soft currency spent in the animal shop.
    #[serde(default)]
    pub coins: f64,
    /// Premium currency, only reported.
    #[serde(default)]
    pub tokens: f64,
    /// Completed onboarding steps, `None` when the server sent no list.
    /// The server mixes strings and numbers.
    #[serde(default, deserialize_with = "string_list")]
    pub onboarding: Option<Vec<String>>,
}

impl Hero {
    /// Whether the server sent an onboarding list with nothing in it.
    #[must_use]
    pub fn onboarding_not_started(&self) -> bool {
        self.onboarding.as_ref().is_some_and(Vec::is_empty)
    }

    /// Whether the given onboarding step has been recorded.
    #[must_use]
    pub fn has_onboarding_step(&self, step: u32) -> bool {
        let step = step.to_string();
        self.onboarding.iter().flatten().any(|s| *s == step)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    #[serde(default)]
    pub is_need_feed: bool,
    /// UTC time formatted as `yyyy-MM-dd HH:mm:ss`.
    #[serde(default)]
    pub next_feed_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OwnedAnimal {
    /// Catalog key of the species.
    pub key: String,
    /// Current level, starting at 1.
    #[serde(default)]
    pub level: u32,
    /// Enclosure slot, starting at 1.
    #[serde(default)]
    pub position: u32,
}

/// Static game data shipped with the user snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub db_quests: Vec<QuestDefinition>,
    #[serde(default)]
    pub db_animals: Vec<AnimalDefinition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestDefinition {
    pub key: String,
    /// Proof echoed back to the server; its shape is opaque to us.
    #[serde(default)]
    pub check_data: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimalDefinition {
    pub key: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub levels: Vec<AnimalLevel>,
}

impl AnimalDefinition {
    /// Price of the first tier, if the catalog lists any levels.
    #[must_use]
    pub fn base_price(&self) -> Option<f64> {
        self.levels.first().map(|l| l.price)
    }

    /// Price of a specific level.
    #[must_use]
    pub fn level_price(&self, level: u32) -> Option<f64> {
        self.levels.iter().find(|l| l.level == level).map(|l| l.price)
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimalLevel {
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub price: f64,
}

/// Delta returned by `/user/data/after`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataAfter {
    #[serde(default)]
    pub daily_rewards: DailyRewards,
    #[serde(default)]
    pub quests: Vec<CompletedQuest>,
}

impl UserDataAfter {
    /// Whether a quest with exactly this key is already completed.
    #[must_use]
    pub fn is_completed(&self, key: &str) -> bool {
        self.quests.iter().any(|q| q.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletedQuest {
    pub key: String,
}

/// Status marker for a daily reward that may be claimed now.
pub const CLAIMABLE: &str = "canTake";

/// Per-day reward status, keyed by day number.
///
/// The server sends either an object keyed by day or an array indexed by
/// day, so the raw value is kept and looked up both ways.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DailyRewards(pub Value);

impl DailyRewards {
    /// Status string for a day, if any.
    #[must_use]
    pub fn status(&self, day: u8) -> Option<&str> {
        let entry = match &self.0 {
            Value::Object(map) => map.get(&day.to_string()),
            Value::Array(items) => items.get(usize::from(day)),
            _ => None,
        };
        entry.and_then(Value::as_str)
    }
}

/// Response of the public IP echo service.
#[derive(Debug, Clone, Deserialize)]
pub struct EgressIp {
    pub ip: String,
}

fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(values.map(|values| {
        values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect()
    }))
}
