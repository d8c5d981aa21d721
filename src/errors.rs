use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// A single script request that did not complete.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Network(String),
    #[error("integrity mismatch for {url} (expected {expected})")]
    Integrity { url: String, expected: String },
    #[error("unsupported integrity value: {0}")]
    BadIntegrity(String),
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
}

/// The fallback chain for a script was exhausted.
#[derive(Debug, Error)]
#[error("could not load {url} after {attempts} attempt(s): {last}")]
pub struct LoadError {
    /// The source originally requested.
    pub url: String,
    pub attempts: usize,
    #[source]
    pub last: ScriptError,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("mount \"{0}\" not found")]
    MissingMount(String),
    #[error("chart for \"{0}\" has no series")]
    NoSeries(String),
    #[error("surface \"{0}\" has no drawing context")]
    NoContext(String),
    #[error("invalid chart config: {0}")]
    Config(#[from] serde_json::Error),
}
