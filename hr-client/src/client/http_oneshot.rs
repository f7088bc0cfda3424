//! Oneshot HTTP client - in-memory calls
//!
//! Requires the "in-process" feature.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, header};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tower::ServiceExt;

use crate::{ClientError, ClientResult};

use super::http::{Fetched, HttpClient, decode_body, status_error};
use super::upload::UploadForm;

/// Oneshot HTTP client (in-memory calls)
///
/// Drives an axum `Router` through `tower::ServiceExt::oneshot`, so page
/// controllers can run against an in-process server with no socket.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get, Json};
/// use hr_client::client::OneshotHttpClient;
///
/// let router = Router::new().route("/api/roles", get(|| async { Json(Vec::<i64>::new()) }));
/// let client = OneshotHttpClient::new(router);
/// let roles: Vec<i64> = client.get("/api/roles").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    token: Arc<RwLock<Option<String>>>,
    boundary_seq: Arc<AtomicU64>,
}

impl OneshotHttpClient {
    /// Create a client around a router whose state is already attached
    pub fn new(router: Router) -> Self {
        Self {
            router,
            token: Arc::new(RwLock::new(None)),
            boundary_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Set the bearer token
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn build(
        &self,
        method: http::Method,
        path: &str,
        content_type: Option<String>,
        body: Body,
    ) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = self.token.read().await.as_deref() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }

    async fn build_json<B: serde::Serialize>(
        &self,
        method: http::Method,
        path: &str,
        body: &B,
    ) -> ClientResult<Request<Body>> {
        let bytes = serde_json::to_vec(body)?;
        self.build(method, path, Some("application/json".into()), Body::from(bytes))
            .await
    }

    /// Execute a request, returning status, content type and body
    async fn call(&self, request: Request<Body>) -> ClientResult<(u16, Option<String>, Vec<u8>)> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;
        Ok((status, content_type, bytes.to_vec()))
    }

    async fn execute<T: DeserializeOwned>(&self, request: Request<Body>) -> ClientResult<T> {
        let (status, _, body) = self.call(request).await?;
        if !(200..300).contains(&status) {
            return Err(status_error(status, &body));
        }
        decode_body(&body)
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.build(http::Method::GET, path, None, Body::empty()).await?;
        self.execute(request).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.build_json(http::Method::POST, path, body).await?;
        self.execute(request).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.build(http::Method::POST, path, None, Body::empty()).await?;
        self.execute(request).await
    }

    async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.build_json(http::Method::PUT, path, body).await?;
        self.execute(request).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.build(http::Method::DELETE, path, None, Body::empty()).await?;
        self.execute(request).await
    }

    async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: UploadForm,
    ) -> ClientResult<T> {
        let seq = self.boundary_seq.fetch_add(1, Ordering::Relaxed);
        let boundary = format!("hr-client-boundary-{seq:016x}");
        let body = form.encode(&boundary);
        let request = self
            .build(
                http::Method::POST,
                path,
                Some(format!("multipart/form-data; boundary={boundary}")),
                Body::from(body),
            )
            .await?;
        self.execute(request).await
    }

    async fn get_bytes(&self, path: &str) -> ClientResult<Fetched> {
        let request = self.build(http::Method::GET, path, None, Body::empty()).await?;
        let (status, content_type, bytes) = self.call(request).await?;
        if !(200..300).contains(&status) {
            return Err(status_error(status, &bytes));
        }
        Ok(Fetched {
            content_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::routing::get;

    #[tokio::test]
    async fn test_oneshot_round_trip() {
        let router = Router::new().route("/api/ping", get(|| async { Json(vec![1, 2, 3]) }));
        let client = OneshotHttpClient::new(router);
        let values: Vec<i64> = client.get("/api/ping").await.unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let client = OneshotHttpClient::new(Router::new());
        let err = client.get::<serde_json::Value>("/api/missing").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }
}
