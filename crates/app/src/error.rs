//! Unified error type for hosts of the client core.
//!
//! Library operations report their own error enums; `AppError` gathers them
//! for binaries that wire the pieces together.

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The caller is not allowed to do this.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
