//! Outbound service adapters - thin passthroughs to third-party HTTP APIs.

mod amap;
mod minimax;

use std::time::Duration;

use quill_core::ports::IntegrationError;

pub use amap::{AmapConfig, AmapWeatherProvider};
pub use minimax::{MinimaxConfig, MinimaxImageGenerator};

/// Upper bound for any single outbound request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn http_client() -> Result<reqwest::Client, IntegrationError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| IntegrationError::Upstream(e.to_string()))
}

fn upstream(err: reqwest::Error) -> IntegrationError {
    IntegrationError::Upstream(err.to_string())
}

fn invalid_response(err: reqwest::Error) -> IntegrationError {
    IntegrationError::InvalidResponse(err.to_string())
}
