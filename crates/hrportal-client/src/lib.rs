//! HR Portal Client - typed REST gateway to the portal backend
//!
//! Resolves the backend base URL from an explicit origin, then speaks
//! plain JSON-over-HTTP: generic `get`/`create`/`update`/`delete` verbs,
//! a bounded health probe, and named auth/settings endpoints. Every call
//! is attempted exactly once; retry policy belongs to the caller.

pub mod client;
pub mod config;
mod endpoints;
pub mod error;

pub use client::RestClient;
pub use config::{resolve_base_url, Scheme, DEFAULT_API_PORT, HEALTH_TIMEOUT};
pub use error::{ApiError, ApiResult};
pub use tokio_util::sync::CancellationToken;
