//! HTTP gateway for the Zoo game API.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use super::init_data::InitData;
use super::proxy::ProxyEntry;
use super::signer::SignedRequest;
use super::types::{AnimalOrder, ApiEnvelope, AuthPayload, EgressIp, UserData, UserDataAfter};
use crate::config::BotSettings;

/// Origin the game frontend is served from.
const GAME_ORIGIN: &str = "https://game.zoo.team";

/// Public IP echo service used to verify proxies.
const IP_ECHO_URL: &str = "https://api.ipify.org?format=json";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Errors that can occur during a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Could not extract hash from initData")]
    MissingHash,

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status code {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Server rejected request: {0}")]
    Rejected(String),

    #[error("Failed to encode request body: {0}")]
    Encode(serde_json::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the server answered with HTTP 500.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status: 500, .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Operations the farm runner needs from the game server.
///
/// One implementor is bound to one account.
#[allow(async_fn_in_trait)]
pub trait GameApi {
    /// Exchanges `initData` for a server session.
    async fn authenticate(&self) -> ApiResult<Value>;

    /// Records an onboarding step as finished.
    async fn finish_onboarding(&self, step: u32) -> ApiResult<Value>;

    /// Fetches the full user snapshot, catalog included.
    async fn fetch_user_data(&self) -> ApiResult<UserData>;

    /// Fetches quest and daily-reward state.
    async fn fetch_user_data_after(&self) -> ApiResult<UserDataAfter>;

    /// Claims the reward for one day of the daily streak.
    async fn claim_daily_reward(&self, day: u8) -> ApiResult<Value>;

    /// Submits a quest answer for verification.
    async fn check_quest(&self, key: &str, check_data: &Value) -> ApiResult<Value>;

    /// Collects the reward for a quest that passed its check.
    async fn claim_quest(&self, key: &str, check_data: &Value) -> ApiResult<Value>;

    /// Buys an animal into `position`, or upgrades the one already there.
    async fn buy_animal(&self, position: u32, animal_key: &str) -> ApiResult<Value>;

    /// Buys an instant feed.
    async fn buy_auto_feed(&self) -> ApiResult<Value>;

    /// Public IP seen through the account's proxy, `None` without a proxy.
    async fn egress_ip(&self) -> ApiResult<Option<String>>;
}

/// Reqwest-backed [`GameApi`] for a single account.
pub struct ZooClient {
    http: Client,
    base_url: String,
    init_data: InitData,
    proxy: Option<ProxyEntry>,
    request_timeout: Duration,
    proxy_check_timeout: Duration,
}

impl ZooClient {
    /// Builds a client for one account, routed through `proxy` if given.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy URL is rejected or the client cannot be built.
    pub fn new(
        settings: &BotSettings,
        init_data: InitData,
        proxy: Option<ProxyEntry>,
    ) -> ApiResult<Self> {
        let mut builder = Client::builder().default_headers(browser_headers());

        if let Some(ref proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.to_url())?);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: settings.api_base.trim_end_matches('/').to_owned(),
            init_data,
            proxy,
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            proxy_check_timeout: Duration::from_secs(settings.proxy_check_timeout_secs),
        })
    }

    /// Sends one signed POST and unwraps the response envelope.
    async fn post<P, T>(&self, path: &str, data: P) -> ApiResult<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let api_key = self.init_data.hash.as_deref().ok_or(ApiError::MissingHash)?;
        let request = SignedRequest::new(data, chrono::Utc::now().timestamp())
            .map_err(ApiError::Encode)?;

        debug!("POST {} ({} bytes)", path, request.body.len());

        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .headers(signing_headers(api_key, &request)?)
            .timeout(self.request_timeout)
            .body(request.body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_response(status, &body)
    }
}

impl GameApi for ZooClient {
    async fn authenticate(&self) -> ApiResult<Value> {
        let init = &self.init_data;
        let payload = AuthPayload {
            init_data: init.raw(),
            start_param: init.start_param.as_deref().unwrap_or(""),
            photo_url: init.photo_url(),
            platform: "android",
            chat_id: "",
            chat_type: "channel",
            chat_instance: init.chat_instance.as_deref().unwrap_or(""),
        };
        self.post("/telegram/auth", payload).await
    }

    async fn finish_onboarding(&self, step: u32) -> ApiResult<Value> {
        self.post("/hero/onboarding/finish", step).await
    }

    async fn fetch_user_data(&self) -> ApiResult<UserData> {
        self.post("/user/data/all", json!({})).await
    }

    async fn fetch_user_data_after(&self) -> ApiResult<UserDataAfter> {
        self.post("/user/data/after", json!({})).await
    }

    async fn claim_daily_reward(&self, day: u8) -> ApiResult<Value> {
        self.post("/quests/daily/claim", day).await
    }

    async fn check_quest(&self, key: &str, check_data: &Value) -> ApiResult<Value> {
        self.post("/quests/check", (key, check_data)).await
    }

    async fn claim_quest(&self, key: &str, check_data: &Value) -> ApiResult<Value> {
        self.post("/quests/claim", (key, check_data)).await
    }

    async fn buy_animal(&self, position: u32, animal_key: &str) -> ApiResult<Value> {
        self.post("/animal/buy", AnimalOrder { position, animal_key })
            .await
    }

    async fn buy_auto_feed(&self) -> ApiResult<Value> {
        self.post("/autofeed/buy", "instant").await
    }

    async fn egress_ip(&self) -> ApiResult<Option<String>> {
        if self.proxy.is_none() {
            return Ok(None);
        }

        let response = self
            .http
            .get(IP_ECHO_URL)
            .timeout(self.proxy_check_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: "IP check failed".to_owned(),
            });
        }

        let echo: EgressIp = response.json().await?;
        Ok(Some(echo.ip))
    }
}

impl std::fmt::Debug for ZooClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZooClient")
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy.as_ref().map(ProxyEntry::to_host_port))
            .finish_non_exhaustive()
    }
}

/// Interprets a raw HTTP response as an envelope and extracts `data`.
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> ApiResult<T> {
    let envelope = serde_json::from_str::<ApiEnvelope>(body);

    if !status.is_success() {
        let message = envelope
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_owned());
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let envelope = envelope?;
    if !envelope.success {
        return Err(ApiError::Rejected(
            envelope.message.unwrap_or_else(|| "no message".to_owned()),
        ));
    }

    Ok(serde_json::from_value(envelope.data.unwrap_or(Value::Null))?)
}

/// Headers that make requests look like the game's web frontend.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let fixed: [(HeaderName, &'static str); 7] = [
        (header::ACCEPT, "*/*"),
        (
            header::ACCEPT_LANGUAGE,
            "vi-VN,vi;q=0.9,fr-FR;q=0.8,fr;q=0.7,en-US;q=0.6,en;q=0.5",
        ),
        (header::CONTENT_TYPE, "application/json"),
        (header::ORIGIN, GAME_ORIGIN),
        (header::REFERER, "https://game.zoo.team/"),
        (header::USER_AGENT, USER_AGENT),
        (HeaderName::from_static("is-beta-server"), "null"),
    ];
    for (name, value) in fixed {
        headers.insert(name, HeaderValue::from_static(value));
    }

    let hints = [
        ("sec-ch-ua", r#""Not/A)Brand";v="99", "Google Chrome";v="115", "Chromium";v="115""#),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", r#""Windows""#),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-site"),
    ];
    for (name, value) in hints {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }

    headers
}

/// The three per-request authentication headers.
fn signing_headers(api_key: &str, request: &SignedRequest) -> ApiResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("api-hash"),
        HeaderValue::from_str(&request.hash)
            .map_err(|_| ApiError::InvalidHeader("api-hash".to_owned()))?,
    );
    headers.insert(
        HeaderName::from_static("api-key"),
        HeaderValue::from_str(api_key).map_err(|_| ApiError::InvalidHeader("Api-Key".to_owned()))?,
    );
    headers.insert(HeaderName::from_static("api-time"), HeaderValue::from(request.timestamp));
    Ok(headers)
}
