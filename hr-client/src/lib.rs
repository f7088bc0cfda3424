//! HR Client - web client layer for the HR and support server
//!
//! Typed API calls with envelope normalization, list page controllers,
//! the WhatsApp chat panel, and the offline asset cache.

pub mod api;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod notify;
pub mod offline;
pub mod page;
pub mod render;
pub mod request;

pub use api::HrApi;
pub use client::{HttpClient, NetworkHttpClient};
#[cfg(feature = "in-process")]
pub use client::OneshotHttpClient;
pub use config::{ClientConfig, PollIntervals};
pub use error::{ClientError, ClientResult};
pub use notify::{Notice, NoticeBoard, NoticeLevel};

// Re-export shared types for convenience
pub use shared::Lang;
pub use shared::salary::{SalaryBreakdown, SalaryInputs, calculate};
