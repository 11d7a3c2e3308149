use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use ragchat::api::ApiClient;
use ragchat::auth::{SessionProvider, StaticSessionProvider};
use ragchat::config::ApiConfig;

/// Bearer token served by [`client_for`]
#[allow(dead_code)]
pub const TOKEN: &str = "test-id-token";

/// Client for a mock backend, authenticated with [`TOKEN`]
#[allow(dead_code)]
pub fn client_for(base_url: &str) -> ApiClient {
    client_with(base_url, Arc::new(StaticSessionProvider::new(TOKEN)))
}

/// Client for a mock backend with a custom session provider
#[allow(dead_code)]
pub fn client_with(base_url: &str, session: Arc<dyn SessionProvider>) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: Some(10),
    };
    ApiClient::new(&config, session).expect("failed to build client")
}

/// A chat record as the backend returns it
#[allow(dead_code)]
pub fn chat_json(chat_id: &str, title: &str) -> Value {
    json!({
        "userId": "user-1",
        "chatId": chat_id,
        "title": title,
        "created_at": "2024-05-01T09:30:00.123456",
        "updated_at": "2024-05-01T09:30:00.123456",
        "messageCount": 0
    })
}

/// A message record as the backend returns it
#[allow(dead_code)]
pub fn message_json(chat_id: &str, author: &str, content: &str, timestamp: i64) -> Value {
    json!({
        "chatId": chat_id,
        "messageId": format!("msg_{}_{}", timestamp, author),
        "userId": "user-1",
        "author": author,
        "message": content,
        "timestamp": timestamp
    })
}

/// Writes a file into a fresh temporary directory
#[allow(dead_code)]
pub fn temp_file(name: &str, contents: &[u8]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let path = temp_dir.path().join(name);
    fs::write(&path, contents).expect("failed to write file");
    (temp_dir, path)
}
