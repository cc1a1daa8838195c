//! Gateway error taxonomy
//!
//! All non-2xx statuses are uniform failures; the status is carried on
//! write errors for diagnostics but never drives different handling.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A GET returned non-2xx. No body detail is attached.
    #[error("failed to fetch {endpoint}")]
    Fetch { endpoint: String },

    /// A write verb returned non-2xx. The raw response body text is
    /// kept for diagnostics; `path` embeds the record id for
    /// update/delete.
    #[error("{method} {path} failed with status {status}: {body}")]
    Rejected {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    /// A verification-style call failed and the server supplied a
    /// structured message; it is surfaced verbatim.
    #[error("{0}")]
    Verification(String),

    /// Transport failure - the request never completed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    pub fn fetch(endpoint: impl Into<String>) -> Self {
        Self::Fetch {
            endpoint: endpoint.into(),
        }
    }
}
