//! Transport layer
//!
//! `HttpClient` is the seam every API call goes through. The network
//! implementation uses reqwest; the in-process one drives an axum router.

pub mod http;
#[cfg(feature = "in-process")]
pub mod http_oneshot;
pub mod upload;

// Re-export main types
pub use http::{Fetched, HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use http_oneshot::OneshotHttpClient;
pub use upload::{FilePart, UploadForm};
