//! ragchat - terminal client for the RAG Chat assistant
//!
//! This library provides the session and request client for the RAG Chat
//! backend: signing in against the identity provider, managing chats,
//! exchanging messages with the assistant and uploading PDF documents into
//! its knowledge base.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `api`: Authenticated backend client, wire types and [`api::ApiError`]
//! - `auth`: Session providers, session storage and the identity provider client
//! - `conversation`: In-memory chat view with pending and failed sends
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Handlers behind each subcommand
//!
//! # Example
//!
//! ```no_run
//! use ragchat::{auth, ApiClient, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let session = auth::init(&config.auth)?;
//!     let client = ApiClient::new(&config.api, session)?;
//!     let chat = client.create_chat("Trip Notes").await?;
//!     let reply = client.send_message(&chat.chat_id, "Where should we go?").await?;
//!     println!("{}", reply.content);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod conversation;
pub mod error;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, Chat, Message};
pub use auth::{AuthError, Session, SessionProvider};
pub use config::Config;
pub use conversation::Conversation;
pub use error::{RagChatError, Result};

#[cfg(test)]
pub mod test_utils;
