//! Authentication error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Message shown when a login fails without a usable server message.
pub const GENERIC_LOGIN_ERROR: &str = "Login failed. Please try again.";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the credentials.
    #[error("login rejected: {0}")]
    Rejected(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed (response body or persisted profile).
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response decoded but is missing required data.
    #[error("malformed login response: {0}")]
    MalformedResponse(&'static str),

    /// Persistent storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// The message to show the user for this failure.
    ///
    /// Server-provided rejection messages pass through; everything else maps
    /// to [`GENERIC_LOGIN_ERROR`] so internal details are never shown.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_LOGIN_ERROR.to_string(),
        }
    }
}
