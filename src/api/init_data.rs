//! Telegram `initData` session credential parsing.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while parsing a session credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Session credential is empty")]
    Empty,

    #[error("Session credential has no `user` field")]
    MissingUser,

    #[error("Failed to decode `user` field: {0}")]
    InvalidUser(#[from] serde_json::Error),
}

/// Telegram user identity embedded in `initData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TelegramUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// A parsed `initData` string.
///
/// The raw string is kept because the auth endpoint expects it verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitData {
    raw: String,
    pub hash: Option<String>,
    pub user: Option<TelegramUser>,
    pub start_param: Option<String>,
    pub chat_instance: Option<String>,
}

impl InitData {
    /// Parses a URL-encoded `initData` query string.
    ///
    /// Unknown fields are ignored. A missing `user` is tolerated here; use
    /// [`InitData::require_user`] when the identity is needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is blank or the `user` field is not
    /// valid JSON.
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CredentialError::Empty);
        }

        let mut parsed = Self {
            raw: raw.to_owned(),
            ..Self::default()
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "hash" => parsed.hash = Some(value.into_owned()),
                "user" => parsed.user = Some(serde_json::from_str(&value)?),
                "start_param" => parsed.start_param = Some(value.into_owned()),
                "chat_instance" => parsed.chat_instance = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(parsed)
    }

    /// The credential exactly as loaded.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the embedded user or an error if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::MissingUser`] when `user` was not present.
    pub fn require_user(&self) -> Result<&TelegramUser, CredentialError> {
        self.user.as_ref().ok_or(CredentialError::MissingUser)
    }

    /// Display name for logs.
    #[must_use]
    pub fn username(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.username.as_deref())
            .unwrap_or("Unknown")
    }

    /// Photo URL sent with the auth request, empty when unknown.
    #[must_use]
    pub fn photo_url(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.photo_url.as_deref())
            .unwrap_or("")
    }
}
