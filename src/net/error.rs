//! REST call failures.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is handled where the call was made: credential rejections
//! are shown inline on the login form, everything else is logged and
//! summarized in the page status line. Nothing is retried.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use thiserror::Error;

/// Message shown under the login form when credentials are rejected.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Неверный логин или пароль";

/// Message shown for any other failed sign-in.
pub const SIGN_IN_FAILED_MESSAGE: &str = "Не удалось войти, попробуйте позже";

/// A REST call against the backend failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend rejected the credentials or token (401).
    #[error("unauthorized")]
    Auth,
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a status the caller does not handle.
    #[error("unexpected status: {0}")]
    UnexpectedStatus(u16),
    /// The response arrived but its body could not be understood.
    #[error("malformed response: {0}")]
    Decode(String),
    /// Browser-only call made outside the browser build.
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// Classify a non-2xx status.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        if status == 401 { Self::Auth } else { Self::UnexpectedStatus(status) }
    }

    /// Text shown to the user after a failed sign-in.
    #[must_use]
    pub fn sign_in_message(&self) -> &'static str {
        match self {
            Self::Auth => INVALID_CREDENTIALS_MESSAGE,
            _ => SIGN_IN_FAILED_MESSAGE,
        }
    }
}
