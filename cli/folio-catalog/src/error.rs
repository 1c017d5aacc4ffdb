//! Error handling for catalog API operations.

use reqwest::StatusCode;
use thiserror::Error;

/// Upper bound on how much of an error response body is kept for display.
const MAX_ERROR_BODY_LEN: usize = 256;

/// Failure to establish an authenticated channel.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to build HTTP client")]
    BuildClient(#[source] reqwest::Error),
    #[error("invalid header value for '{0}'")]
    InvalidHeader(String),
    #[error("login request failed")]
    Request(#[source] reqwest::Error),
    #[error("login failed: {}", fmt_status(*status, body))]
    Status { status: StatusCode, body: String },
    #[error("Authentication failed: access token not found in cookies")]
    TokenNotFound,
}

/// Failure of a search or listing call on an authenticated channel.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed")]
    Request(#[source] reqwest::Error),
    #[error("search failed: {}", fmt_status(*status, body))]
    Status { status: StatusCode, body: String },
    #[error("could not decode search response")]
    Decode(#[source] reqwest::Error),
}

impl SearchError {
    /// The upstream status, if the failure was a non-success response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SearchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Either stage of a request-scoped catalog call can fail.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Reads the body of a failed response for inclusion in an error.
///
/// Gateways tend to answer with HTML pages, so only a prefix is kept.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY_LEN) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

fn fmt_status(status: StatusCode, body: &str) -> String {
    if body.is_empty() {
        format!("{status}")
    } else {
        format!("{status}: {body}")
    }
}
