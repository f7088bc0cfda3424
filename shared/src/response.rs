//! API response envelopes
//!
//! The server is not consistent about response shapes. Depending on the
//! endpoint a successful call returns one of:
//!
//! ```json
//! [ { "id": 1 } ]                                  // bare array or object
//! { "success": true, "transfers": [ ... ] }        // envelope with named payload
//! { "success": false, "error": "..." }             // envelope reporting failure
//! ```
//!
//! Every typed client call names the shape it expects with [`Payload`] and
//! goes through [`normalize`], so callers only ever see `T` or an error.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Fallback text when an envelope reports failure without a message
pub const GENERIC_FAILURE: &str = "request failed";

/// Where the payload lives inside a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// The whole body is the payload (bare array or object)
    Whole,
    /// The payload is a named member of the body (`data`, `transfers`, ...)
    Field(&'static str),
}

/// Normalization failure
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The envelope carried `success: false`
    #[error("{0}")]
    Rejected(String),

    /// The expected payload member is absent
    #[error("missing `{0}` in response")]
    MissingField(&'static str),

    /// The payload does not match the expected type
    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),
}

/// Normalize a decoded response body into `T`.
///
/// A body carrying `"success": false` is a failure regardless of the HTTP
/// status it came with.
pub fn normalize<T: DeserializeOwned>(mut body: Value, payload: Payload) -> Result<T, EnvelopeError> {
    if let Some(false) = body.get("success").and_then(Value::as_bool) {
        let message = error_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
        return Err(EnvelopeError::Rejected(message));
    }

    let payload = match payload {
        Payload::Whole => body,
        Payload::Field(name) => match body.get_mut(name) {
            Some(value) => value.take(),
            None => return Err(EnvelopeError::MissingField(name)),
        },
    };

    Ok(serde_json::from_value(payload)?)
}

/// Extract a human readable error from a body (`error`, then `message`)
pub fn error_message(body: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Success flag plus optional message, used by mutation endpoints whose
/// payload is irrelevant to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl Ack {
    /// Read the acknowledgement members of any body.
    ///
    /// Members of an unexpected type are ignored one by one, so a
    /// `success: false` is never lost to a malformed `error` or `message`.
    pub fn from_body(body: &Value) -> Self {
        let text = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        };
        Self {
            success: body.get("success").and_then(Value::as_bool),
            message: text("message"),
            error: text("error"),
        }
    }

    /// Turn an acknowledgement into a result, honoring `success: false`
    pub fn into_result(self) -> Result<Option<String>, EnvelopeError> {
        match self.success {
            Some(false) => Err(EnvelopeError::Rejected(
                self.error
                    .or(self.message)
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            )),
            _ => Ok(self.message),
        }
    }
}
