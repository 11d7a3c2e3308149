//! Session provider for the RAG Chat identity pool
//!
//! The request client never talks to the identity provider itself. It asks a
//! [`SessionProvider`] for the current id token on every request, and the
//! provider decides whether that means reading the keyring, refreshing an
//! expired session or failing with [`AuthError`].
//!
//! # Module Layout
//!
//! - [`cognito`]  -- JSON client for the Cognito identity provider API
//! - [`provider`] -- Cognito-backed and static [`SessionProvider`]s
//! - [`session`]  -- the [`Session`] record and id token claims
//! - [`store`]    -- session persistence (OS keyring, in-memory)
//!
//! Providers are built explicitly from configuration with [`init`] and shared
//! as `Arc<dyn SessionProvider>`.

pub mod cognito;
pub mod provider;
pub mod session;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{AuthConfig, AuthProviderKind};

pub use cognito::CognitoClient;
pub use provider::{CognitoSessionProvider, StaticSessionProvider};
pub use session::{IdTokenClaims, Session};
pub use store::{KeyringSessionStore, MemorySessionStore, SessionStore};

/// Errors raised while obtaining or managing a session
#[derive(Error, Debug)]
pub enum AuthError {
    /// Nobody is signed in
    #[error("Not signed in")]
    NoSession,

    /// The stored session expired and could not be refreshed
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// The account exists but its email address was never confirmed
    #[error("Please confirm your email address before logging in.")]
    NotConfirmed,

    /// The identity provider asked for an extra sign-in step we do not support
    #[error("Unsupported sign-in challenge: {0}")]
    UnsupportedChallenge(String),

    /// The identity provider rejected the request
    #[error("{code}: {message}")]
    Rejected {
        /// Exception name reported by the provider (e.g. `NotAuthorizedException`)
        code: String,
        /// Human-readable message from the provider
        message: String,
    },

    /// The id token could not be decoded
    #[error("Invalid id token: {0}")]
    InvalidToken(String),

    /// Provider configuration is incomplete
    #[error("Auth configuration error: {0}")]
    Config(String),

    /// Transport error talking to the identity provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Source of the bearer credential attached to backend requests
///
/// Implementations are queried once per request; they must not cache
/// failures, and they never hand out a token they know to be expired.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns the current, unexpired session
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NoSession`] when nobody is signed in and
    /// [`AuthError::SessionExpired`] when the session cannot be renewed.
    async fn current_session(&self) -> Result<Session, AuthError>;

    /// Returns the id token of the current session
    async fn id_token(&self) -> Result<String, AuthError> {
        let session = self.current_session().await?;
        if session.id_token.is_empty() {
            return Err(AuthError::NoSession);
        }
        Ok(session.id_token)
    }
}

/// Builds the session provider selected by the configuration
///
/// This is the only place a provider is constructed; the result is shared by
/// every client created afterwards.
///
/// # Errors
///
/// Returns [`AuthError::Config`] when the selected provider is missing
/// required settings.
///
/// # Examples
///
/// ```
/// use ragchat::auth;
/// use ragchat::config::{AuthConfig, AuthProviderKind};
///
/// let config = AuthConfig {
///     provider: AuthProviderKind::Static,
///     token: Some("dev-token".to_string()),
///     ..Default::default()
/// };
/// let provider = auth::init(&config).unwrap();
/// # let _ = provider;
/// ```
pub fn init(config: &AuthConfig) -> Result<Arc<dyn SessionProvider>, AuthError> {
    match config.provider {
        AuthProviderKind::Static => {
            let token = config
                .token
                .clone()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| AuthError::Config("static provider needs a token".to_string()))?;
            tracing::debug!("Using static session provider");
            Ok(Arc::new(StaticSessionProvider::new(token)))
        }
        AuthProviderKind::Cognito => {
            let provider = CognitoSessionProvider::from_config(config)?;
            tracing::debug!(region = %config.region, "Using Cognito session provider");
            Ok(Arc::new(provider))
        }
    }
}
