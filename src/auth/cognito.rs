//! Cognito identity provider client
//!
//! Talks to the user pool through the Cognito JSON protocol: every call is a
//! `POST /` with `Content-Type: application/x-amz-json-1.1` and the action
//! named in the `X-Amz-Target` header. Only the unauthenticated client
//! actions are used, so no AWS request signing is involved.
//!
//! # Example
//!
//! ```rust,no_run
//! use ragchat::auth::CognitoClient;
//!
//! # async fn example() -> Result<(), ragchat::auth::AuthError> {
//! let client = CognitoClient::new(
//!     reqwest::Client::new(),
//!     "https://cognito-idp.us-east-1.amazonaws.com/",
//!     "my-app-client-id",
//! );
//! let tokens = client.initiate_password_auth("alice", "correct horse").await?;
//! println!("expires in {}s", tokens.expires_in);
//! # Ok(())
//! # }
//! ```

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::AuthError;

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

/// Tokens returned by a successful `InitiateAuth`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticationResult {
    /// Access token
    #[serde(rename = "AccessToken")]
    pub access_token: String,
    /// Id token
    #[serde(rename = "IdToken")]
    pub id_token: String,
    /// Refresh token; absent on refresh responses
    #[serde(rename = "RefreshToken", default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access and id tokens in seconds
    #[serde(rename = "ExpiresIn", default)]
    pub expires_in: i64,
    /// Token type, normally `Bearer`
    #[serde(rename = "TokenType", default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InitiateAuthResponse {
    #[serde(rename = "AuthenticationResult", default)]
    authentication_result: Option<AuthenticationResult>,
    #[serde(rename = "ChallengeName", default)]
    challenge_name: Option<String>,
}

/// Outcome of a `SignUp` call.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpOutcome {
    /// Whether the user can sign in straight away
    #[serde(rename = "UserConfirmed", default)]
    pub user_confirmed: bool,
    /// Identifier of the new user
    #[serde(rename = "UserSub", default)]
    pub user_sub: Option<String>,
    /// Where the confirmation code was sent
    #[serde(rename = "CodeDeliveryDetails", default)]
    pub code_delivery: Option<CodeDeliveryDetails>,
}

/// Where a confirmation code was delivered.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeDeliveryDetails {
    /// Masked destination, e.g. `a***@e***`
    #[serde(rename = "Destination", default)]
    pub destination: Option<String>,
    /// `EMAIL` or `SMS`
    #[serde(rename = "DeliveryMedium", default)]
    pub delivery_medium: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(rename = "__type", default)]
    error_type: Option<String>,
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

/// Client for the user pool actions ragchat needs
#[derive(Clone)]
pub struct CognitoClient {
    http: Client,
    endpoint: String,
    client_id: String,
}

impl CognitoClient {
    /// Creates a client for the given endpoint and app client id
    pub fn new(http: Client, endpoint: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            client_id: client_id.into(),
        }
    }

    /// App client id this client signs in against
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    async fn call<B, R>(&self, action: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(action = %action, "Calling identity provider");

        let response = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", AMZ_JSON)
            .header("X-Amz-Target", format!("{}.{}", TARGET_PREFIX, action))
            .body(serde_json::to_vec(body)?)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            let parsed = if bytes.is_empty() {
                serde_json::from_slice(b"{}")?
            } else {
                serde_json::from_slice(&bytes)?
            };
            return Ok(parsed);
        }

        let error = Self::parse_error(status.as_u16(), &bytes);
        warn!(action = %action, status = status.as_u16(), error = %error, "Identity provider call failed");
        Err(error)
    }

    /// Maps a provider error body onto [`AuthError`].
    fn parse_error(status: u16, body: &[u8]) -> AuthError {
        let parsed: Option<ProviderErrorBody> = serde_json::from_slice(body).ok();

        let code = parsed
            .as_ref()
            .and_then(|b| b.error_type.as_deref())
            // Some endpoints qualify the name: `com.amazonaws...#NotAuthorizedException`
            .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
            .unwrap_or_else(|| format!("HTTP {}", status));

        if code == "UserNotConfirmedException" {
            return AuthError::NotConfirmed;
        }

        let message = parsed
            .and_then(|b| b.message)
            .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

        AuthError::Rejected { code, message }
    }

    fn tokens_from(response: InitiateAuthResponse) -> Result<AuthenticationResult, AuthError> {
        if let Some(challenge) = response.challenge_name {
            return Err(AuthError::UnsupportedChallenge(challenge));
        }
        response.authentication_result.ok_or_else(|| AuthError::Rejected {
            code: "MissingAuthenticationResult".to_string(),
            message: "identity provider returned no tokens".to_string(),
        })
    }

    /// Signs in with username and password (`USER_PASSWORD_AUTH`)
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotConfirmed`] for unconfirmed accounts,
    /// [`AuthError::UnsupportedChallenge`] when the pool demands an extra
    /// step, and [`AuthError::Rejected`] for wrong credentials.
    pub async fn initiate_password_auth(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticationResult, AuthError> {
        let body = json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": self.client_id,
            "AuthParameters": {
                "USERNAME": username,
                "PASSWORD": password,
            },
        });
        let response: InitiateAuthResponse = self.call("InitiateAuth", &body).await?;
        Self::tokens_from(response)
    }

    /// Exchanges a refresh token for fresh tokens (`REFRESH_TOKEN_AUTH`)
    ///
    /// The response carries no new refresh token; callers keep the old one.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthenticationResult, AuthError> {
        let body = json!({
            "AuthFlow": "REFRESH_TOKEN_AUTH",
            "ClientId": self.client_id,
            "AuthParameters": {
                "REFRESH_TOKEN": refresh_token,
            },
        });
        let response: InitiateAuthResponse = self.call("InitiateAuth", &body).await?;
        Self::tokens_from(response)
    }

    /// Registers a new user with an `email` attribute
    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let body = json!({
            "ClientId": self.client_id,
            "Username": username,
            "Password": password,
            "UserAttributes": [{ "Name": "email", "Value": email }],
        });
        self.call("SignUp", &body).await
    }

    /// Confirms a registration with the emailed code
    pub async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), AuthError> {
        let body = json!({
            "ClientId": self.client_id,
            "Username": username,
            "ConfirmationCode": code,
        });
        let _: serde_json::Value = self.call("ConfirmSignUp", &body).await?;
        Ok(())
    }

    /// Revokes every token issued to the user on every device
    pub async fn global_sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let body = json!({ "AccessToken": access_token });
        let _: serde_json::Value = self.call("GlobalSignOut", &body).await?;
        Ok(())
    }
}
