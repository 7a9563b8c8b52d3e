//! Recording [`GameApi`] used by runner and scheduler tests.

use std::sync::Mutex;

use serde_json::Value;
use tokio::time::Instant;

use super::{ApiError, ApiResult, GameApi, UserData, UserDataAfter};

/// A call observed by [`MockApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Authenticate,
    FinishOnboarding(u32),
    FetchUserData,
    FetchUserDataAfter,
    ClaimDailyReward(u8),
    CheckQuest(String, Value),
    ClaimQuest(String, Value),
    BuyAnimal(u32, String),
    BuyAutoFeed,
    EgressIp,
}

/// Serves canned snapshots and records every call in order.
#[derive(Debug, Default)]
pub struct MockApi {
    pub user_data: UserData,
    pub after: UserDataAfter,
    pub fail_auth: bool,
    pub fail_after: bool,
    pub reject_onboarding: bool,
    /// HTTP status returned by every `buy_animal` call, if set.
    pub buy_status: Option<u16>,
    calls: Mutex<Vec<(Call, Instant)>>,
}

impl MockApi {
    pub fn new(user_data: UserData, after: UserDataAfter) -> Self {
        Self {
            user_data,
            after,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.timed_calls().into_iter().map(|(call, _)| call).collect()
    }

    /// Calls with the tokio clock reading at the moment each was made.
    pub fn timed_calls(&self) -> Vec<(Call, Instant)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((call, Instant::now()));
    }
}

impl GameApi for MockApi {
    async fn authenticate(&self) -> ApiResult<Value> {
        self.record(Call::Authenticate);
        if self.fail_auth {
            return Err(ApiError::Rejected("invalid initData".to_owned()));
        }
        Ok(Value::Null)
    }

    async fn finish_onboarding(&self, step: u32) -> ApiResult<Value> {
        self.record(Call::FinishOnboarding(step));
        if self.reject_onboarding {
            return Err(ApiError::Rejected("onboarding".to_owned()));
        }
        Ok(Value::Null)
    }

    async fn fetch_user_data(&self) -> ApiResult<UserData> {
        self.record(Call::FetchUserData);
        Ok(self.user_data.clone())
    }

    async fn fetch_user_data_after(&self) -> ApiResult<UserDataAfter> {
        self.record(Call::FetchUserDataAfter);
        if self.fail_after {
            return Err(ApiError::Status {
                status: 502,
                message: "bad gateway".to_owned(),
            });
        }
        Ok(self.after.clone())
    }

    async fn claim_daily_reward(&self, day: u8) -> ApiResult<Value> {
        self.record(Call::ClaimDailyReward(day));
        Ok(Value::Null)
    }

    async fn check_quest(&self, key: &str, check_data: &Value) -> ApiResult<Value> {
        self.record(Call::CheckQuest(key.to_owned(), check_data.clone()));
        Ok(Value::Null)
    }

    async fn claim_quest(&self, key: &str, check_data: &Value) -> ApiResult<Value> {
        self.record(Call::ClaimQuest(key.to_owned(), check_data.clone()));
        Ok(Value::Null)
    }

    async fn buy_animal(&self, position: u32, animal_key: &str) -> ApiResult<Value> {
        self.record(Call::BuyAnimal(position, animal_key.to_owned()));
        match self.buy_status {
            Some(status) => Err(ApiError::Status {
                status,
                message: "shop error".to_owned(),
            }),
            None => Ok(Value::Null),
        }
    }

    async fn buy_auto_feed(&self) -> ApiResult<Value> {
        self.record(Call::BuyAutoFeed);
        Ok(Value::Null)
    }

    async fn egress_ip(&self) -> ApiResult<Option<String>> {
        self.record(Call::EgressIp);
        Ok(None)
    }
}
