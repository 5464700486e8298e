//! Authentication error types

use thiserror::Error;

/// Failures raised by the remote exchange or the session store.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("token exchange succeeded but no token was returned")]
    MissingToken,

    #[error("session store error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("invalid session data: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("{0}")]
    Unavailable(String),
}

/// Why an authentication attempt ended without a verified identity.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("bad status code {0}")]
    BadStatus(u16),

    #[error("security issue: requested user '{requested}' but the session belongs to '{actual}'")]
    SecurityMismatch { requested: String, actual: String },

    #[error(transparent)]
    TransportFailure(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, AuthError>;
