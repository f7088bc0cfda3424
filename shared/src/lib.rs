//! Shared types for the HR client
//!
//! Wire models for the REST API, response envelope normalization,
//! payroll arithmetic and display language selection.

pub mod i18n;
pub mod models;
pub mod response;
pub mod salary;

// Re-exports
pub use i18n::Lang;
pub use response::{EnvelopeError, Payload};
pub use serde::{Deserialize, Serialize};
