//! Request signing for the Zoo API.
//!
//! Every authenticated call carries an `api-hash` header computed as
//! `md5(encodeURIComponent("{timestamp}_{body}"))`, where `body` is the exact
//! JSON text sent on the wire.

use md5::{Digest, Md5};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Computes the request digest for a timestamp and serialized payload.
#[must_use]
pub fn sign(timestamp: i64, payload: &str) -> String {
    let encoded = encode_uri_component(&format!("{timestamp}_{payload}"));
    hex::encode(Md5::digest(encoded.as_bytes()))
}

fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Wire envelope every request body is wrapped in.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// A serialized request body together with its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Unix timestamp in seconds, sent as `Api-Time`.
    pub timestamp: i64,
    /// JSON body, byte-for-byte what gets transmitted.
    pub body: String,
    /// Digest over `timestamp` and `body`, sent as `api-hash`.
    pub hash: String,
}

impl SignedRequest {
    /// Wraps `data` as `{"data": ...}`, serializes it once and signs the result.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` cannot be serialized.
    pub fn new<T: Serialize>(data: T, timestamp: i64) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(&Envelope { data })?;
        let hash = sign(timestamp, &body);
        Ok(Self {
            timestamp,
            body,
            hash,
        })
    }
}
