//! Configuration management for ragchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{RagChatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for ragchat
///
/// Holds the backend location and the identity provider settings. Built once
/// at startup and handed to the request client and the session provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Identity provider configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every request path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional per-request timeout in seconds
    ///
    /// Unset by default: requests wait until the transport gives up.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

/// Which session provider to construct at startup
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthProviderKind {
    /// Cognito user pool sign-in with the session kept in the OS keyring
    #[default]
    Cognito,
    /// A fixed bearer token from configuration or `RAGCHAT_TOKEN`
    Static,
}

impl std::fmt::Display for AuthProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthProviderKind::Cognito => write!(f, "cognito"),
            AuthProviderKind::Static => write!(f, "static"),
        }
    }
}

impl std::str::FromStr for AuthProviderKind {
    type Err = RagChatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cognito" => Ok(AuthProviderKind::Cognito),
            "static" => Ok(AuthProviderKind::Static),
            other => Err(RagChatError::Config(format!(
                "Invalid auth provider: {}. Must be one of: cognito, static",
                other
            ))),
        }
    }
}

/// Identity provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session provider to use
    #[serde(default)]
    pub provider: AuthProviderKind,

    /// AWS region hosting the user pool
    #[serde(default = "default_region")]
    pub region: String,

    /// Cognito user pool identifier
    ///
    /// Optional. When set, its `<region>_` prefix must match `region`.
    #[serde(default)]
    pub user_pool_id: Option<String>,

    /// Cognito app client identifier
    #[serde(default)]
    pub user_pool_client_id: Option<String>,

    /// Override for the Cognito endpoint (LocalStack, mock servers)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Static bearer token, used by the `static` provider
    #[serde(default)]
    pub token: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider: AuthProviderKind::default(),
            region: default_region(),
            user_pool_id: None,
            user_pool_client_id: None,
            endpoint: None,
            token: None,
        }
    }
}

// Keeps the static token out of debug logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("provider", &self.provider)
            .field("region", &self.region)
            .field("user_pool_id", &self.user_pool_id)
            .field("user_pool_client_id", &self.user_pool_client_id)
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AuthConfig {
    /// Cognito endpoint URL for this configuration
    ///
    /// Uses the explicit override when set, otherwise the regional
    /// `cognito-idp` endpoint.
    pub fn cognito_endpoint(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://cognito-idp.{}.amazonaws.com/", self.region),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RagChatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| RagChatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("RAGCHAT_BACKEND_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("RAGCHAT_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(secs) => self.api.timeout_seconds = Some(secs),
                Err(_) => tracing::warn!("Invalid RAGCHAT_TIMEOUT_SECONDS: {}", timeout),
            }
        }

        if let Ok(provider) = std::env::var("RAGCHAT_AUTH_PROVIDER") {
            match provider.parse() {
                Ok(kind) => self.auth.provider = kind,
                Err(e) => tracing::warn!("{}", e),
            }
        }

        if let Ok(region) = std::env::var("RAGCHAT_AWS_REGION") {
            self.auth.region = region;
        }

        if let Ok(pool_id) = std::env::var("RAGCHAT_USER_POOL_ID") {
            self.auth.user_pool_id = Some(pool_id);
        }

        if let Ok(client_id) = std::env::var("RAGCHAT_USER_POOL_CLIENT_ID") {
            self.auth.user_pool_client_id = Some(client_id);
        }

        if let Ok(endpoint) = std::env::var("RAGCHAT_COGNITO_ENDPOINT") {
            self.auth.endpoint = Some(endpoint);
        }

        // A token in the environment always selects the static provider.
        if let Ok(token) = std::env::var("RAGCHAT_TOKEN") {
            if !token.trim().is_empty() {
                self.auth.token = Some(token);
                self.auth.provider = AuthProviderKind::Static;
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(base_url) = &cli.backend_url {
            self.api.base_url = base_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// Ensures the backend URL is usable and that the selected session
    /// provider has what it needs.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api.base_url).map_err(|e| {
            RagChatError::Config(format!(
                "Invalid api.base_url '{}': {}",
                self.api.base_url, e
            ))
        })?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(RagChatError::Config(format!(
                "api.base_url must use http or https, got '{}'",
                base.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == Some(0) {
            return Err(RagChatError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        match self.auth.provider {
            AuthProviderKind::Cognito => {
                if self.auth.region.trim().is_empty() {
                    return Err(
                        RagChatError::Config("auth.region cannot be empty".to_string()).into(),
                    );
                }

                let client_id_missing = self
                    .auth
                    .user_pool_client_id
                    .as_deref()
                    .map_or(true, |id| id.trim().is_empty());
                if client_id_missing {
                    return Err(RagChatError::Config(
                        "auth.user_pool_client_id is required for the cognito provider \
                         (set RAGCHAT_USER_POOL_CLIENT_ID)"
                            .to_string(),
                    )
                    .into());
                }

                if let Some(pool_id) = self.auth.user_pool_id.as_deref() {
                    let pool_region = pool_id.split_once('_').map(|(region, _)| region);
                    if pool_region != Some(self.auth.region.as_str()) {
                        return Err(RagChatError::Config(format!(
                            "auth.user_pool_id '{}' does not belong to region '{}'",
                            pool_id, self.auth.region
                        ))
                        .into());
                    }
                }
            }
            AuthProviderKind::Static => {
                let token_missing = self
                    .auth
                    .token
                    .as_deref()
                    .map_or(true, |t| t.trim().is_empty());
                if token_missing {
                    return Err(RagChatError::Config(
                        "auth.token is required for the static provider (set RAGCHAT_TOKEN)"
                            .to_string(),
                    )
                    .into());
                }
            }
        }

        Ok(())
    }
}
