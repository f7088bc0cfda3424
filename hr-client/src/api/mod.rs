//! Typed API
//!
//! One function per server resource. Each knows the response shape its
//! endpoint uses and normalizes it, so callers never see envelopes.

mod chat;
mod employees;
mod payroll;
mod roles;
mod support;
mod tickets;

pub use chat::AudioClip;
pub use payroll::payslip_path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::response::{Ack, Payload, normalize};
use std::sync::Arc;

use crate::ClientResult;
use crate::client::HttpClient;

/// Typed client over an [`HttpClient`] transport
pub struct HrApi<C> {
    http: Arc<C>,
}

impl<C> Clone for HrApi<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
        }
    }
}

impl<C: HttpClient> HrApi<C> {
    pub fn new(http: C) -> Self {
        Self {
            http: Arc::new(http),
        }
    }

    pub fn from_arc(http: Arc<C>) -> Self {
        Self { http }
    }

    /// Underlying transport
    pub fn http(&self) -> &C {
        &self.http
    }

    pub fn http_arc(&self) -> Arc<C> {
        Arc::clone(&self.http)
    }

    /// GET and normalize
    async fn fetch<T: DeserializeOwned>(&self, path: &str, payload: Payload) -> ClientResult<T> {
        let body: Value = self.http.get(path).await?;
        Ok(normalize(body, payload)?)
    }
}

/// Interpret a mutation response: `success: false` is an error, anything
/// else is success with an optional server message.
fn acknowledge(body: Value) -> ClientResult<Option<String>> {
    Ok(Ack::from_body(&body).into_result()?)
}

/// Append URL-encoded query parameters to a path
pub(crate) fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use serde_json::json;
    use shared::response::GENERIC_FAILURE;

    #[test]
    fn test_with_query_encodes() {
        let path = with_query(
            "/api/user-roles",
            &[("page", "2".into()), ("search", "أحمد ali&co".into())],
        );
        assert!(path.starts_with("/api/user-roles?page=2&search="));
        assert!(!path.contains(' '));
        assert!(path.ends_with("ali%26co"));
        assert_eq!(with_query("/api/roles", &[]), "/api/roles");
    }

    #[test]
    fn test_acknowledge_shapes() {
        assert_eq!(acknowledge(Value::Null).unwrap(), None);
        assert_eq!(acknowledge(json!([1])).unwrap(), None);
        assert_eq!(
            acknowledge(json!({"success": true, "message": "ok"})).unwrap(),
            Some("ok".into())
        );
        assert!(acknowledge(json!({"success": false, "error": "no"})).is_err());
    }

    #[test]
    fn test_acknowledge_rejects_malformed_failures() {
        let err = acknowledge(json!({"success": false, "error": {"code": 400}})).unwrap_err();
        assert!(matches!(err, ClientError::Rejected(ref m) if m == GENERIC_FAILURE));

        let err = acknowledge(json!({"success": false, "error": {"code": 400}, "message": "denied"}))
            .unwrap_err();
        assert!(matches!(err, ClientError::Rejected(ref m) if m == "denied"));

        assert!(acknowledge(json!({"success": false, "message": ["a"]})).is_err());
        // A malformed message on success is dropped, not fatal
        assert_eq!(acknowledge(json!({"success": true, "message": 3})).unwrap(), None);
    }
}
