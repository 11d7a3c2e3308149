//! Authenticated HTTP client for the RAG Chat backend
//!
//! Every request asks the session provider for the current id token and
//! sends it as a bearer credential. Exactly one round trip is made per call:
//! no retries, no caching, and concurrent calls never share state beyond the
//! connection pool.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::{AuthError, SessionProvider};
use crate::config::ApiConfig;

/// Errors raised by backend calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// No usable session; the request was never sent
    #[error("Authentication required: {0}")]
    Auth(#[from] AuthError),

    /// The backend answered with a non-success status
    #[error("Request failed ({status}): {message}")]
    Request {
        /// HTTP status code
        status: u16,
        /// Message taken from the response body, or a generic fallback
        message: String,
    },

    /// The knowledge base rejected an upload
    #[error("Upload failed ({status}): {message}")]
    Upload {
        /// HTTP status code
        status: u16,
        /// Message taken from the response body, or a generic fallback
        message: String,
    },

    /// Only PDF documents can be added to the knowledge base
    #[error("Unsupported file type for {file}: {mime} (only application/pdf can be uploaded)")]
    UnsupportedFileType {
        /// File name as given by the caller
        file: String,
        /// Detected MIME type
        mime: String,
    },

    /// The call was rejected before anything was sent
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a local file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Returns `true` if signing in again could fix this error
    pub fn is_auth_error(&self) -> bool {
        match self {
            ApiError::Auth(_) => true,
            ApiError::Request { status, .. } | ApiError::Upload { status, .. } => {
                *status == 401 || *status == 403
            }
            _ => false,
        }
    }

    /// HTTP status of a backend rejection, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } | ApiError::Upload { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the RAG Chat backend
///
/// Cheap to clone; clones share the connection pool and the session provider.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use ragchat::api::ApiClient;
/// use ragchat::auth::StaticSessionProvider;
/// use ragchat::config::ApiConfig;
///
/// # async fn example() -> Result<(), ragchat::api::ApiError> {
/// let config = ApiConfig {
///     base_url: "http://localhost:3000".to_string(),
///     timeout_seconds: None,
/// };
/// let client = ApiClient::new(&config, Arc::new(StaticSessionProvider::new("dev-token")))?;
/// for chat in client.get_chats().await? {
///     println!("{} {}", chat.chat_id, chat.display_title());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) http: Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    /// Creates a client for the configured backend
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, session: Arc<dyn SessionProvider>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Base URL requests are sent to, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builds the headers every backend request carries
    ///
    /// The token is fetched fresh from the session provider on each call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] when there is no valid session. A header
    /// set is never returned without an `Authorization` entry.
    pub async fn auth_headers(&self) -> Result<HeaderMap, ApiError> {
        let token = self.session.id_token().await?;

        let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            AuthError::InvalidToken("token contains characters not allowed in a header".to_string())
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let headers = self.auth_headers().await?;
        debug!(method = %method, path = %path, "Sending backend request");
        Ok(self.http.request(method, self.url(path)).headers(headers))
    }

    /// Sends a GET request and decodes the JSON response
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] for a non-success status.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path).await?;
        Self::decode(request.send().await?, path).await
    }

    /// Sends a POST request with a JSON body and decodes the JSON response
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] for a non-success status.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).await?.json(body);
        Self::decode(request.send().await?, path).await
    }

    /// Sends a POST request without a body
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path).await?;
        Self::decode(request.send().await?, path).await
    }

    async fn decode<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, ApiError> {
        let status = response.status();
        debug!(path = %path, status = status.as_u16(), "Backend responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = request_error_message(status.as_u16(), &body);
            warn!(path = %path, status = status.as_u16(), message = %message, "Backend request failed");
            return Err(ApiError::Request {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Pulls a `message` or `error` field out of a JSON error body
pub(crate) fn body_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

/// Message for a failed request: JSON field, else raw text, else a fallback
fn request_error_message(status: u16, body: &str) -> String {
    if let Some(message) = body_message(body) {
        return message;
    }

    let text = body.trim();
    if text.is_empty() || text.starts_with('{') || text.starts_with('[') {
        format!("Request failed with status {}", status)
    } else {
        text.to_string()
    }
}
