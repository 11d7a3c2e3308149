//! Wire types for the RAG Chat backend
//!
//! Field names follow what the backend stores and returns: chat records mix
//! camelCase (`chatId`, `messageCount`) with snake_case timestamps
//! (`created_at`), and message text travels as `message`.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Percent-encodes a chat title for use as a single path segment
///
/// # Examples
///
/// ```
/// use ragchat::api::{decode_title, encode_title};
///
/// let encoded = encode_title("Q&A / 2024?");
/// assert_eq!(encoded, "Q%26A%20%2F%202024%3F");
/// assert_eq!(decode_title(&encoded), "Q&A / 2024?");
/// ```
pub fn encode_title(title: &str) -> String {
    urlencoding::encode(title).into_owned()
}

/// Returns `true` for `.` and `..`
///
/// URL parsing collapses these segments, including their `%2E` spellings,
/// so they cannot be sent as a single path segment.
pub(crate) fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Percent-decodes a chat title for display
///
/// Titles that are not valid percent-encoded UTF-8 are returned unchanged.
pub fn decode_title(title: &str) -> String {
    urlencoding::decode(title)
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| title.to_string())
}

/// A named conversation with the assistant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    /// Server-assigned identifier
    #[serde(rename = "chatId")]
    pub chat_id: String,

    /// Title as stored by the server, possibly percent-encoded
    #[serde(default)]
    pub title: String,

    /// Creation time
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update time
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,

    /// Number of messages in the chat
    #[serde(rename = "messageCount", default)]
    pub message_count: u64,

    /// Epoch milliseconds of the most recent message
    #[serde(
        rename = "lastMessageAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_message_at: Option<i64>,
}

impl Chat {
    /// Title ready for display (percent-decoded)
    pub fn display_title(&self) -> String {
        decode_title(&self.title)
    }

    /// Most recent activity: last message time, else update time, else creation time
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_message_at
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .or(self.updated_at)
            .or(self.created_at)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// The signed-in user
    User,
    /// The backend assistant
    Assistant,
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Author::User => write!(f, "user"),
            Author::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn in a chat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Message text
    #[serde(rename = "message")]
    pub content: String,

    /// Author of the message
    pub author: Author,

    /// Epoch milliseconds
    pub timestamp: i64,

    /// Server-assigned message identifier
    #[serde(rename = "messageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Chat the message belongs to
    #[serde(rename = "chatId", default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
}

impl Message {
    /// Builds a local user message stamped with the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: Author::User,
            timestamp: Utc::now().timestamp_millis(),
            message_id: None,
            chat_id: None,
        }
    }

    /// Message time as a UTC instant
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// Body of a send-message request
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    /// Message text
    pub content: &'a str,
}

/// Accepts RFC 3339 timestamps as well as the naive ISO form the backend
/// writes (`2024-05-01T09:30:00.123456`, implicitly UTC).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| parse_timestamp(&s)))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
