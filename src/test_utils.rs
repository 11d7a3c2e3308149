//! Test utilities for ragchat
//!
//! Fixture builders for chats, messages and sessions, plus config helpers
//! shared by the unit tests.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::api::{Author, Chat, Message};
use crate::auth::Session;
use crate::config::Config;

/// Create a temporary directory for testing
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Create a test file with the given content
///
/// # Panics
///
/// Panics if file creation or writing fails
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Assert that an error's display output contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or the message does not match
pub fn assert_error_contains<T, E: std::fmt::Display>(result: Result<T, E>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}', got Ok", expected),
        Err(e) => {
            let message = e.to_string();
            assert!(
                message.contains(expected),
                "Expected error containing '{}', got '{}'",
                expected,
                message
            );
        }
    }
}

/// A chat record as the backend would return it
pub fn sample_chat(chat_id: &str, title: &str) -> Chat {
    Chat {
        chat_id: chat_id.to_string(),
        title: title.to_string(),
        created_at: None,
        updated_at: None,
        message_count: 0,
        last_message_at: None,
    }
}

fn message(content: &str, author: Author, timestamp: i64) -> Message {
    Message {
        content: content.to_string(),
        author,
        timestamp,
        message_id: None,
        chat_id: None,
    }
}

/// A stored user message
pub fn user_message(content: &str, timestamp: i64) -> Message {
    message(content, Author::User, timestamp)
}

/// A stored assistant message
pub fn assistant_message(content: &str, timestamp: i64) -> Message {
    message(content, Author::Assistant, timestamp)
}

/// A session that never expires
pub fn test_session(username: &str) -> Session {
    Session {
        username: username.to_string(),
        id_token: format!("id-{}", username),
        access_token: format!("access-{}", username),
        refresh_token: Some(format!("refresh-{}", username)),
        expires_at: None,
    }
}

/// Create a test configuration with default values
pub fn test_config() -> Config {
    Config::default()
}

/// A configuration YAML using the static provider
pub fn test_config_yaml() -> String {
    r#"
api:
  base_url: http://localhost:8080
  timeout_seconds: 30
auth:
  provider: static
  token: test-token
"#
    .to_string()
}
