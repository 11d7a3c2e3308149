//! Session & request client for the RAG Chat backend
//!
//! [`ApiClient`] attaches the current bearer credential to every request and
//! exposes typed operations for chats, messages and knowledge uploads.
//!
//! # Module Layout
//!
//! - [`client`]    -- the client itself, generic `get`/`post`, [`ApiError`]
//! - [`chats`]     -- chat and message operations
//! - [`knowledge`] -- PDF uploads into the knowledge base
//! - [`types`]     -- wire types and title encoding

pub mod chats;
pub mod client;
pub mod knowledge;
pub mod types;

pub use client::{ApiClient, ApiError};
pub use knowledge::{mime_for, PDF_MIME};
pub use types::{decode_title, encode_title, Author, Chat, Message, SendMessageRequest};
