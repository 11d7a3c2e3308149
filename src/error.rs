//! Error types for ragchat
//!
//! This module defines the application-level error type, using `thiserror`
//! for ergonomic error handling. The request client and the session provider
//! carry their own typed errors ([`crate::api::ApiError`] and
//! [`crate::auth::AuthError`]); this type covers everything around them.

use thiserror::Error;

/// Main error type for ragchat operations
///
/// Covers configuration loading and validation, local file handling and the
/// command layer. Errors from the backend and the identity provider are
/// wrapped transparently so the command layer can report them uniformly.
#[derive(Error, Debug)]
pub enum RagChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input rejected before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Session provider errors (sign-in, sign-up, token refresh)
    #[error(transparent)]
    Auth(#[from] crate::auth::AuthError),

    /// Backend request errors
    #[error(transparent)]
    Api(#[from] crate::api::ApiError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Interactive line editor errors
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl RagChatError {
    /// Returns `true` when the error means the user has to sign in again.
    pub fn is_auth_error(&self) -> bool {
        match self {
            RagChatError::Auth(_) => true,
            RagChatError::Api(api) => api.is_auth_error(),
            _ => false,
        }
    }
}

/// Result type alias for ragchat operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

/// Returns `true` if any error in the chain is an authentication failure.
///
/// Used at the command boundary to decide whether to point the user at
/// `ragchat login`.
pub fn is_auth_failure(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<RagChatError>() {
            return e.is_auth_error();
        }
        if let Some(e) = cause.downcast_ref::<crate::api::ApiError>() {
            return e.is_auth_error();
        }
        cause.downcast_ref::<crate::auth::AuthError>().is_some()
    })
}
