//! Session provider integration tests
//!
//! Runs `CognitoSessionProvider` against a `wiremock` stand-in for the
//! identity provider's JSON API, with sessions kept in a
//! `MemorySessionStore` so nothing touches the OS keyring.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{chat_json, client_with};
use ragchat::auth::{
    AuthError, CognitoClient, CognitoSessionProvider, MemorySessionStore, Session,
    SessionProvider, SessionStore,
};

const TARGET: &str = "x-amz-target";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn provider_for(server: &MockServer, store: Arc<MemorySessionStore>) -> CognitoSessionProvider {
    let cognito = CognitoClient::new(reqwest::Client::new(), server.uri(), "client-123");
    CognitoSessionProvider::new(cognito, store)
}

fn tokens(id_token: &str, refresh_token: Option<&str>) -> serde_json::Value {
    let mut result = json!({
        "AccessToken": format!("access-{}", id_token),
        "IdToken": id_token,
        "ExpiresIn": 3600,
        "TokenType": "Bearer"
    });
    if let Some(refresh) = refresh_token {
        result["RefreshToken"] = json!(refresh);
    }
    json!({ "AuthenticationResult": result, "ChallengeParameters": {} })
}

fn provider_error(kind: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({ "__type": kind, "message": message }))
}

fn expired_session() -> Session {
    Session {
        username: "alice".to_string(),
        id_token: "stale-id".to_string(),
        access_token: "stale-access".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: Some(Utc::now() - Duration::minutes(5)),
    }
}

// ---------------------------------------------------------------------------
// Sign-in
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_stores_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.InitiateAuth"))
        .and(header("content-type", "application/x-amz-json-1.1"))
        .and(body_partial_json(json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": "client-123",
            "AuthParameters": { "USERNAME": "alice", "PASSWORD": "correct horse" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokens("id-1", Some("refresh-1"))))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let provider = provider_for(&server, store.clone());

    let session = provider.login("alice", "correct horse").await.unwrap();
    assert_eq!(session.id_token, "id-1");
    assert!(!session.is_expired());

    let stored = store.load().unwrap().expect("session stored");
    assert_eq!(stored.username, "alice");
    assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));

    // Served from the store; the mock expects exactly one provider call.
    assert_eq!(provider.id_token().await.unwrap(), "id-1");
}

#[tokio::test]
async fn test_login_unconfirmed_account() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(provider_error("UserNotConfirmedException", "User is not confirmed."))
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let provider = provider_for(&server, store.clone());

    let err = provider.login("alice", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::NotConfirmed));
    assert_eq!(
        err.to_string(),
        "Please confirm your email address before logging in."
    );
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(provider_error(
            "NotAuthorizedException",
            "Incorrect username or password.",
        ))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Arc::new(MemorySessionStore::new()));
    match provider.login("alice", "wrong").await.unwrap_err() {
        AuthError::Rejected { code, message } => {
            assert_eq!(code, "NotAuthorizedException");
            assert_eq!(message, "Incorrect username or password.");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_login_challenge_is_unsupported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ChallengeName": "NEW_PASSWORD_REQUIRED",
            "Session": "opaque"
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Arc::new(MemorySessionStore::new()));
    assert!(matches!(
        provider.login("alice", "pw").await,
        Err(AuthError::UnsupportedChallenge(_))
    ));
}

// ---------------------------------------------------------------------------
// Current session and refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_current_session_without_sign_in() {
    let server = MockServer::start().await;
    let provider = provider_for(&server, Arc::new(MemorySessionStore::new()));

    assert!(matches!(
        provider.current_session().await,
        Err(AuthError::NoSession)
    ));
}

#[tokio::test]
async fn test_expired_session_is_refreshed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.InitiateAuth"))
        .and(body_partial_json(json!({
            "AuthFlow": "REFRESH_TOKEN_AUTH",
            "AuthParameters": { "REFRESH_TOKEN": "refresh-1" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokens("fresh-id", None)))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::with_session(expired_session()));
    let provider = provider_for(&server, store.clone());

    let session = provider.current_session().await.unwrap();
    assert_eq!(session.id_token, "fresh-id");
    assert!(!session.is_expired());
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));

    let stored = store.load().unwrap().unwrap();
    assert_eq!(stored.id_token, "fresh-id");
}

#[tokio::test]
async fn test_rejected_refresh_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(provider_error(
            "NotAuthorizedException",
            "Refresh Token has expired",
        ))
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::with_session(expired_session()));
    let provider = provider_for(&server, store.clone());

    assert!(matches!(
        provider.current_session().await,
        Err(AuthError::SessionExpired)
    ));
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_expired_session_without_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = expired_session();
    session.refresh_token = None;
    let store = Arc::new(MemorySessionStore::with_session(session));
    let provider = provider_for(&server, store.clone());

    assert!(matches!(
        provider.current_session().await,
        Err(AuthError::SessionExpired)
    ));
    assert!(store.load().unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Registration and sign-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_register_and_confirm() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.SignUp"))
        .and(body_partial_json(json!({
            "Username": "alice",
            "UserAttributes": [{ "Name": "email", "Value": "alice@example.com" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "UserConfirmed": false,
            "UserSub": "1234-abcd",
            "CodeDeliveryDetails": {
                "AttributeName": "email",
                "DeliveryMedium": "EMAIL",
                "Destination": "a***@e***"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.ConfirmSignUp"))
        .and(body_partial_json(json!({ "Username": "alice", "ConfirmationCode": "123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Arc::new(MemorySessionStore::new()));

    let outcome = provider
        .register("alice", "correct horse", "alice@example.com")
        .await
        .unwrap();
    assert!(!outcome.user_confirmed);
    assert_eq!(outcome.user_sub.as_deref(), Some("1234-abcd"));

    provider.confirm_signup("alice", "123456").await.unwrap();
}

#[tokio::test]
async fn test_register_existing_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(provider_error("UsernameExistsException", "User already exists"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Arc::new(MemorySessionStore::new()));
    match provider
        .register("alice", "pw", "alice@example.com")
        .await
        .unwrap_err()
    {
        AuthError::Rejected { code, .. } => assert_eq!(code, "UsernameExistsException"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_logout_revokes_and_clears() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header(TARGET, "AWSCognitoIdentityProviderService.GlobalSignOut"))
        .and(body_partial_json(json!({ "AccessToken": "access-live" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = expired_session();
    session.access_token = "access-live".to_string();
    let store = Arc::new(MemorySessionStore::with_session(session));
    let provider = provider_for(&server, store.clone());

    provider.logout().await.unwrap();
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_even_when_revocation_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::with_session(expired_session()));
    let provider = provider_for(&server, store.clone());

    provider.logout().await.unwrap();
    assert!(store.load().unwrap().is_none());
}

// ---------------------------------------------------------------------------
// End to end: sign in, then call the backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_backend_receives_id_token_after_login() {
    let identity = MockServer::start().await;
    let backend = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tokens("id-live", Some("r"))))
        .mount(&identity)
        .await;

    Mock::given(method("GET"))
        .and(path("/chats"))
        .and(header("authorization", "Bearer id-live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([chat_json("abc123", "Trip Notes")])))
        .expect(1)
        .mount(&backend)
        .await;

    let provider = Arc::new(provider_for(&identity, Arc::new(MemorySessionStore::new())));
    provider.login("alice", "pw").await.unwrap();

    let client = client_with(&backend.uri(), provider);
    let chats = client.get_chats().await.unwrap();
    assert_eq!(chats[0].chat_id, "abc123");
}
