//! In-memory view of one chat
//!
//! A [`Conversation`] starts from a fetched message snapshot. Sending appends
//! a pending user entry straight away, tagged with a correlation id; when the
//! backend call settles the entry is confirmed (and the reply appended once)
//! or marked failed. Replies are matched to their own request by id, so
//! several sends can be in flight at once.

use uuid::Uuid;

use crate::api::{Chat, Message};

/// Delivery state of a conversation entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Stored on the backend
    Confirmed,
    /// Sent, waiting for the reply
    Pending,
    /// The send failed with the given reason
    Failed(String),
}

/// A message plus its delivery state
#[derive(Debug, Clone)]
pub struct Entry {
    /// The message as shown to the user
    pub message: Message,
    /// Delivery state
    pub delivery: Delivery,
    /// Correlation id of the send that produced this entry, if any
    pub correlation_id: Option<Uuid>,
}

impl Entry {
    fn confirmed(message: Message) -> Self {
        Self {
            message,
            delivery: Delivery::Confirmed,
            correlation_id: None,
        }
    }

    /// Returns `true` while the entry waits for its reply
    pub fn is_pending(&self) -> bool {
        self.delivery == Delivery::Pending
    }
}

/// Message list of one chat
///
/// # Examples
///
/// ```
/// use ragchat::api::{Author, Chat, Message};
/// use ragchat::conversation::Conversation;
///
/// let chat: Chat = serde_json::from_str(r#"{"chatId":"abc123","title":"Trip%20Notes"}"#).unwrap();
/// let mut conversation = Conversation::from_history(chat, Vec::new());
/// assert_eq!(conversation.title(), "Trip Notes");
///
/// let id = conversation.push_pending("Where should we go?");
/// assert_eq!(conversation.pending_count(), 1);
///
/// let reply = Message {
///     content: "Lisbon.".to_string(),
///     author: Author::Assistant,
///     timestamp: 1,
///     message_id: None,
///     chat_id: None,
/// };
/// assert!(conversation.resolve(id, reply.clone()));
/// assert!(!conversation.resolve(id, reply));
/// assert_eq!(conversation.entries().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Conversation {
    chat: Chat,
    entries: Vec<Entry>,
}

impl Conversation {
    /// Builds a conversation from a fetched snapshot, oldest message first
    pub fn from_history(chat: Chat, mut messages: Vec<Message>) -> Self {
        messages.sort_by_key(|m| m.timestamp);
        Self {
            chat,
            entries: messages.into_iter().map(Entry::confirmed).collect(),
        }
    }

    /// The chat this conversation belongs to
    pub fn chat(&self) -> &Chat {
        &self.chat
    }

    /// Display title (percent-decoded)
    pub fn title(&self) -> String {
        self.chat.display_title()
    }

    /// All entries in display order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of sends still waiting for a reply
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_pending()).count()
    }

    /// Looks up the entry created by the send with `id`
    pub fn find(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.correlation_id == Some(id))
    }

    /// Appends a pending user entry and returns its correlation id
    pub fn push_pending(&mut self, content: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.push(Entry {
            message: Message::user(content),
            delivery: Delivery::Pending,
            correlation_id: Some(id),
        });
        id
    }

    fn pending_mut(&mut self, id: Uuid) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| e.correlation_id == Some(id) && e.is_pending())
    }

    /// Confirms the send `id` and appends its reply
    ///
    /// Returns `false` and changes nothing when `id` is unknown or already
    /// settled, so a reply can never be appended twice.
    pub fn resolve(&mut self, id: Uuid, reply: Message) -> bool {
        let Some(entry) = self.pending_mut(id) else {
            return false;
        };
        entry.delivery = Delivery::Confirmed;
        self.entries.push(Entry::confirmed(reply));
        true
    }

    /// Marks the send `id` as failed; the entry stays visible
    ///
    /// Returns `false` when `id` is unknown or already settled.
    pub fn fail(&mut self, id: Uuid, reason: impl Into<String>) -> bool {
        let Some(entry) = self.pending_mut(id) else {
            return false;
        };
        entry.delivery = Delivery::Failed(reason.into());
        true
    }
}
