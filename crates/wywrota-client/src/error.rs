//! Error types for the wywrota client.

use thiserror::Error;

/// Errors that can occur while logging in or fetching songs.
///
/// Song absence is not an error: a missing page or content block surfaces
/// as `Ok(None)` from [`crate::Session::fetch_song`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The login page did not contain a hidden `_token` input.
    #[error("login page did not contain a _token field")]
    TokenNotFound,

    /// The login POST did not complete within the deadline.
    #[error("login timed out after {0} ms")]
    LoginTimeout(u64),

    /// The server refused the login: non-success status, or the response
    /// body did not carry the logged-in marker.
    #[error("login rejected: {0}")]
    LoginRejected(String),

    /// HTTP transport error (DNS, connection refused, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Convenience alias for `Result<T, SessionError>`.
pub type Result<T> = std::result::Result<T, SessionError>;
