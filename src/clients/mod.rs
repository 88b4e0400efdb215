pub mod football;
pub mod telegram;

use thiserror::Error;

/// Failure talking to an upstream HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{service} API key is not configured")]
    MissingApiKey { service: &'static str },

    #[error("{service} API error: {status} - {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned an unexpected payload: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Whether the upstream reported a client-side problem (4xx).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 400 && *status < 500)
    }
}

/// Turns a non-success response into [`ApiError::Status`], keeping the body.
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}
