//! Session providers
//!
//! [`CognitoSessionProvider`] owns the full account lifecycle: sign-up,
//! confirmation, sign-in, transparent refresh of an expired session, and
//! sign-out. [`StaticSessionProvider`] hands out a fixed token and is meant
//! for local development against an unauthenticated backend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::cognito::{AuthenticationResult, CognitoClient, SignUpOutcome};
use super::store::{KeyringSessionStore, SessionStore};
use super::{AuthError, Session, SessionProvider};
use crate::config::AuthConfig;

/// Session provider backed by a Cognito user pool
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use ragchat::auth::{CognitoClient, CognitoSessionProvider, MemorySessionStore};
///
/// # async fn example() -> Result<(), ragchat::auth::AuthError> {
/// let cognito = CognitoClient::new(
///     reqwest::Client::new(),
///     "https://cognito-idp.us-east-1.amazonaws.com/",
///     "my-app-client-id",
/// );
/// let provider = CognitoSessionProvider::new(cognito, Arc::new(MemorySessionStore::new()));
/// let session = provider.login("alice", "correct horse").await?;
/// println!("signed in as {}", session.username);
/// # Ok(())
/// # }
/// ```
pub struct CognitoSessionProvider {
    cognito: CognitoClient,
    store: Arc<dyn SessionStore>,
}

impl CognitoSessionProvider {
    /// Creates a provider from a Cognito client and a session store
    pub fn new(cognito: CognitoClient, store: Arc<dyn SessionStore>) -> Self {
        Self { cognito, store }
    }

    /// Creates a provider from configuration, keeping the session in the keyring
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Config`] when no app client id is configured.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let client_id = config
            .user_pool_client_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                AuthError::Config("auth.user_pool_client_id is not configured".to_string())
            })?;

        let cognito = CognitoClient::new(
            reqwest::Client::new(),
            config.cognito_endpoint(),
            client_id.clone(),
        );
        let store = Arc::new(KeyringSessionStore::new(client_id));
        Ok(Self::new(cognito, store))
    }

    fn session_from(
        username: &str,
        tokens: AuthenticationResult,
        previous_refresh: Option<String>,
    ) -> Session {
        let expires_at = if tokens.expires_in > 0 {
            Some(Utc::now() + chrono::Duration::seconds(tokens.expires_in))
        } else {
            None
        };

        Session {
            username: username.to_string(),
            id_token: tokens.id_token,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token.or(previous_refresh),
            expires_at,
        }
    }

    /// Signs in and stores the new session
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotConfirmed`] when the account still needs its
    /// confirmation code, or [`AuthError::Rejected`] for bad credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let tokens = self
            .cognito
            .initiate_password_auth(username, password)
            .await?;
        let session = Self::session_from(username, tokens, None);
        self.store.save(&session)?;
        info!(username = %username, "Signed in");
        Ok(session)
    }

    /// Registers a new account
    ///
    /// The account has to be confirmed with [`confirm_signup`](Self::confirm_signup)
    /// unless the outcome says it is already confirmed.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let outcome = self.cognito.sign_up(username, password, email).await?;
        info!(
            username = %username,
            confirmed = outcome.user_confirmed,
            "Registered account"
        );
        Ok(outcome)
    }

    /// Confirms a new account with the emailed code
    pub async fn confirm_signup(&self, username: &str, code: &str) -> Result<(), AuthError> {
        self.cognito.confirm_sign_up(username, code).await?;
        info!(username = %username, "Confirmed account");
        Ok(())
    }

    /// Signs out everywhere and forgets the stored session
    ///
    /// Revocation is best effort: the local session is cleared even when
    /// the provider call fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if let Some(session) = self.store.load()? {
            if let Err(e) = self.cognito.global_sign_out(&session.access_token).await {
                warn!(error = %e, "Global sign-out failed, clearing local session anyway");
            }
        }
        self.store.clear()?;
        info!("Signed out");
        Ok(())
    }
}

#[async_trait]
impl SessionProvider for CognitoSessionProvider {
    async fn current_session(&self) -> Result<Session, AuthError> {
        let session = self.store.load()?.ok_or(AuthError::NoSession)?;

        if !session.is_expired() {
            return Ok(session);
        }

        let Some(refresh_token) = session.refresh_token.clone() else {
            debug!("Session expired and no refresh token is available");
            self.store.clear()?;
            return Err(AuthError::SessionExpired);
        };

        debug!(username = %session.username, "Refreshing expired session");
        match self.cognito.refresh(&refresh_token).await {
            Ok(tokens) => {
                let refreshed = Self::session_from(&session.username, tokens, Some(refresh_token));
                self.store.save(&refreshed)?;
                Ok(refreshed)
            }
            Err(AuthError::Rejected { code, message }) => {
                warn!(code = %code, message = %message, "Refresh token rejected");
                self.store.clear()?;
                Err(AuthError::SessionExpired)
            }
            Err(e) => Err(e),
        }
    }
}

/// Session provider that always returns the same bearer token
pub struct StaticSessionProvider {
    token: String,
}

impl StaticSessionProvider {
    /// Creates a provider serving `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn current_session(&self) -> Result<Session, AuthError> {
        if self.token.trim().is_empty() {
            return Err(AuthError::NoSession);
        }
        Ok(Session {
            username: "static".to_string(),
            id_token: self.token.clone(),
            access_token: self.token.clone(),
            refresh_token: None,
            expires_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(id: &str, refresh: Option<&str>, expires_in: i64) -> AuthenticationResult {
        AuthenticationResult {
            access_token: format!("access-{}", id),
            id_token: id.to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_in,
            token_type: Some("Bearer".to_string()),
        }
    }

    #[test]
    fn test_session_from_sets_expiry() {
        let session = CognitoSessionProvider::session_from("alice", tokens("id", None, 3600), None);
        let expires_at = session.expires_at.expect("expiry set");
        assert!(expires_at > Utc::now() + chrono::Duration::minutes(59));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_from_zero_lifetime_has_no_expiry() {
        let session = CognitoSessionProvider::session_from("alice", tokens("id", None, 0), None);
        assert!(session.expires_at.is_none());
    }

    #[test]
    fn test_session_from_keeps_previous_refresh_token() {
        let session = CognitoSessionProvider::session_from(
            "alice",
            tokens("id", None, 3600),
            Some("old-refresh".to_string()),
        );
        assert_eq!(session.refresh_token.as_deref(), Some("old-refresh"));

        let session = CognitoSessionProvider::session_from(
            "alice",
            tokens("id", Some("new-refresh"), 3600),
            Some("old-refresh".to_string()),
        );
        assert_eq!(session.refresh_token.as_deref(), Some("new-refresh"));
    }

    #[test]
    fn test_from_config_requires_client_id() {
        let config = AuthConfig::default();
        assert!(matches!(
            CognitoSessionProvider::from_config(&config),
            Err(AuthError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_static_provider_returns_token() {
        let provider = StaticSessionProvider::new("dev-token");
        assert_eq!(provider.id_token().await.unwrap(), "dev-token");
        let session = provider.current_session().await.unwrap();
        assert!(!session.is_expired());
    }

    #[tokio::test]
    async fn test_static_provider_blank_token_is_no_session() {
        let provider = StaticSessionProvider::new("   ");
        assert!(matches!(
            provider.current_session().await,
            Err(AuthError::NoSession)
        ));
    }
}
