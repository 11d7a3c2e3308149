//! Signed-in session record
//!
//! A [`Session`] is what the identity provider hands back after a successful
//! sign-in or refresh. It is persisted as JSON in the session store and read
//! on every backend request; the request client only ever looks at
//! [`Session::id_token`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Seconds before the real expiry at which a session is treated as expired.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Tokens issued for a signed-in user.
///
/// `expires_at` is computed from the provider's `ExpiresIn` when the session
/// is created, so expiry can be checked without a round trip.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    /// Username the session was opened for
    pub username: String,

    /// OIDC id token, sent to the backend as the bearer credential
    pub id_token: String,

    /// Access token, used for provider calls such as global sign-out
    pub access_token: String,

    /// Refresh token used to renew the session without a password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// UTC timestamp at which the tokens expire
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Returns `true` when the tokens are expired or about to expire.
    ///
    /// A 60-second buffer is applied so a request never leaves with a token
    /// that lapses in flight. Sessions without `expires_at` never expire.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Duration, Utc};
    /// use ragchat::auth::Session;
    ///
    /// let session = Session {
    ///     username: "alice".to_string(),
    ///     id_token: "id".to_string(),
    ///     access_token: "access".to_string(),
    ///     refresh_token: None,
    ///     expires_at: Some(Utc::now() + Duration::hours(1)),
    /// };
    /// assert!(!session.is_expired());
    /// ```
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            None => false,
            Some(expires_at) => {
                Utc::now() >= expires_at - chrono::Duration::seconds(EXPIRY_BUFFER_SECS)
            }
        }
    }

    /// Decodes the claims carried in the id token.
    ///
    /// The signature is not verified; the backend does that. This is only
    /// used to show who is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the token is not a JWT or its
    /// payload is not valid JSON.
    pub fn claims(&self) -> Result<IdTokenClaims, AuthError> {
        let payload = self
            .id_token
            .split('.')
            .nth(1)
            .ok_or_else(|| AuthError::InvalidToken("token is not a JWT".to_string()))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::InvalidToken(format!("bad payload encoding: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::InvalidToken(format!("bad payload: {}", e)))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("id_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The id token claims ragchat cares about.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct IdTokenClaims {
    /// Stable user identifier
    pub sub: String,

    /// Email address, when the pool shares it
    #[serde(default)]
    pub email: Option<String>,

    /// User pool username
    #[serde(default, rename = "cognito:username")]
    pub username: Option<String>,

    /// Expiry as seconds since the epoch
    #[serde(default)]
    pub exp: Option<i64>,
}
