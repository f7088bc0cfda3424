//! Client error types

use shared::EnvelopeError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before anything was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Non-2xx response carrying a server message
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose envelope reported `success: false`
    #[error("Rejected: {0}")]
    Rejected(String),

    /// A newer request for the same resource replaced this one
    #[error("Request superseded")]
    Superseded,

    /// Microphone or audio capture failure
    #[error("Media error: {0}")]
    Media(#[from] crate::chat::MediaError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Text to show the user: the server's own message when it sent one,
    /// the caller's fallback otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Api { message, .. } | ClientError::Rejected(message) => message.clone(),
            ClientError::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// True when the server reported the failure (as opposed to transport or parse)
    pub fn is_server_reported(&self) -> bool {
        matches!(
            self,
            ClientError::Api { .. }
                | ClientError::Rejected(_)
                | ClientError::Unauthorized
                | ClientError::Forbidden(_)
                | ClientError::NotFound(_)
        )
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Rejected(message) => ClientError::Rejected(message),
            other => ClientError::InvalidResponse(other.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ClientError::Api {
            status: 400,
            message: "الاسم مطلوب".into(),
        };
        assert_eq!(err.user_message("fallback"), "الاسم مطلوب");
        assert_eq!(ClientError::Rejected("no".into()).user_message("x"), "no");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ClientError::InvalidResponse("garbage".into());
        assert_eq!(err.user_message("Error loading data"), "Error loading data");
        assert_eq!(ClientError::Unauthorized.user_message("x"), "x");
    }

    #[test]
    fn test_envelope_conversion() {
        let err: ClientError = EnvelopeError::Rejected("bad".into()).into();
        assert!(matches!(err, ClientError::Rejected(ref m) if m == "bad"));
        let err: ClientError = EnvelopeError::MissingField("users").into();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }
}
