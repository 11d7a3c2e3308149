//! Chat and message operations

use tracing::{debug, info};

use super::client::{ApiClient, ApiError};
use super::types::{encode_title, is_dot_segment, Chat, Message, SendMessageRequest};

impl ApiClient {
    /// Creates a chat with the given title
    ///
    /// The title travels percent-encoded as a single path segment. The
    /// server assigns the chat id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] for an empty or whitespace-only
    /// title, or a title of `.` or `..`, without contacting the backend.
    pub async fn create_chat(&self, title: &str) -> Result<Chat, ApiError> {
        if title.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "chat title must not be empty".to_string(),
            ));
        }
        if is_dot_segment(title) {
            return Err(ApiError::InvalidInput(format!(
                "chat title cannot be '{}'",
                title
            )));
        }

        let path = format!("/chats/{}", encode_title(title));
        let chat: Chat = self.post_empty(&path).await?;
        info!(chat_id = %chat.chat_id, "Created chat");
        Ok(chat)
    }

    /// Lists the signed-in user's chats
    pub async fn get_chats(&self) -> Result<Vec<Chat>, ApiError> {
        let chats: Vec<Chat> = self.get("/chats").await?;
        debug!(count = chats.len(), "Fetched chats");
        Ok(chats)
    }

    /// Fetches a single chat
    pub async fn get_chat(&self, chat_id: &str) -> Result<Chat, ApiError> {
        let path = chat_path(chat_id)?;
        self.get(&path).await
    }

    /// Fetches a chat's messages, oldest first
    pub async fn get_messages(&self, chat_id: &str) -> Result<Vec<Message>, ApiError> {
        let path = format!("{}/messages", chat_path(chat_id)?);
        let mut messages: Vec<Message> = self.get(&path).await?;
        messages.sort_by_key(|m| m.timestamp);
        debug!(chat_id = %chat_id, count = messages.len(), "Fetched messages");
        Ok(messages)
    }

    /// Sends a user message and returns the assistant's reply
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] for empty content without
    /// contacting the backend.
    pub async fn send_message(&self, chat_id: &str, content: &str) -> Result<Message, ApiError> {
        if content.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "message content must not be empty".to_string(),
            ));
        }

        let path = format!("{}/messages", chat_path(chat_id)?);
        let reply: Message = self.post(&path, &SendMessageRequest { content }).await?;
        debug!(chat_id = %chat_id, reply_len = reply.content.len(), "Received reply");
        Ok(reply)
    }
}

fn chat_path(chat_id: &str) -> Result<String, ApiError> {
    let chat_id = chat_id.trim();
    if chat_id.is_empty() {
        return Err(ApiError::InvalidInput(
            "chat id must not be empty".to_string(),
        ));
    }
    if is_dot_segment(chat_id) {
        return Err(ApiError::InvalidInput(format!(
            "chat id cannot be '{}'",
            chat_id
        )));
    }
    Ok(format!("/chats/{}", urlencoding::encode(chat_id)))
}
