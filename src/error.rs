use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// A failed call to the GitHub API.
///
/// Whether this is fatal depends on where it is caught: the organization's
/// repository listing propagates it, a single repository or commit absorbs it.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The API answered with a non-success status. `message` is the raw response body.
    #[error("GitHub API error ({status}): {message}")]
    Status { status: u16, message: String },

    /// The request never produced a usable HTTP response.
    #[error("GitHub API request failed: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("unexpected GitHub API payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<octocrab::Error> for UpstreamError {
    fn from(err: octocrab::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        match self {
            Self::Status { status, message } => {
                let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (code, format!("GitHub API error: {message}")).into_response()
            }
            other => (StatusCode::BAD_GATEWAY, other.to_string()).into_response(),
        }
    }
}
