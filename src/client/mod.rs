//! Client for the remote analysis service.
//!
//! This module provides the HTTP client and the ordered chain of read
//! sources used to load analysis history.

pub mod api;
pub mod sources;

pub use api::{AnalysisService, ApiClient, ApiClientConfig};
pub use sources::{DataSource, EndpointSource, FallbackChain};

use reqwest::StatusCode;

/// Failures talking to the analysis service.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Cannot connect to analysis service at {0}")]
    Connect(String),
    #[error("Analysis service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Failed to parse response from {endpoint}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}
