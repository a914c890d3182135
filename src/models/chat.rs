use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Shown in place of a missing or empty user message.
pub const NO_MESSAGE_PLACEHOLDER: &str = "No message";

// Naive timestamps come from the backend's `isoformat()` and are UTC.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

/// Accepts ids sent either as JSON strings or integers.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(n) => n.to_string(),
    })
}

/// Opaque chat identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ChatId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_id(deserializer).map(ChatId)
    }
}

/// A timestamp as the backend sent it. Parsing is deferred so a malformed
/// value never fails deserialization of the surrounding list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(untagged)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch.
    Epoch(i64),
    Text(String),
    /// Any other JSON value, kept as its JSON text.
    Other(String),
    #[default]
    Missing,
}

impl From<Value> for Timestamp {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Timestamp::Missing,
            Value::String(text) => Timestamp::Text(text),
            Value::Number(number) => match number.as_i64() {
                Some(millis) => Timestamp::Epoch(millis),
                None => number
                    .as_f64()
                    .filter(|millis| millis.is_finite() && millis.abs() < i64::MAX as f64)
                    .map(|millis| Timestamp::Epoch(millis as i64))
                    .unwrap_or_else(|| Timestamp::Other(number.to_string())),
            },
            other => Timestamp::Other(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Timestamp::from)
    }
}

impl Timestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Epoch(millis) => Utc.timestamp_millis_opt(*millis).single(),
            Timestamp::Text(text) => parse_timestamp(text),
            Timestamp::Other(_) | Timestamp::Missing => None,
        }
    }

    /// The value as received, for display when it cannot be parsed.
    pub fn raw(&self) -> String {
        match self {
            Timestamp::Epoch(millis) => millis.to_string(),
            Timestamp::Text(text) | Timestamp::Other(text) => text.clone(),
            Timestamp::Missing => String::new(),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp::Text(value.to_rfc3339())
    }
}

/// Parse an ISO-8601 timestamp. Strings without an offset are taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// One saved exchange, as listed by `GET /api/chats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: ChatId,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub ai_message: Option<String>,
    #[serde(default)]
    pub timestamp: Timestamp,
}

impl ChatRecord {
    /// The text used as the history title, before truncation.
    pub fn title_text(&self) -> &str {
        non_empty_or_placeholder(self.user_message.as_deref())
    }
}

pub(crate) fn non_empty_or_placeholder(message: Option<&str>) -> &str {
    match message {
        Some(text) if !text.is_empty() => text,
        _ => NO_MESSAGE_PLACEHOLDER,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChatPage {
    #[serde(default)]
    pub chats: Vec<ChatRecord>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub pages: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
}

/// Full conversation from `GET /api/chats/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatDetail {
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub ai_message: String,
    #[serde(default)]
    pub timestamp: Timestamp,
}

/// A match returned by `GET /api/chats/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChatId,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveChatRequest {
    pub user_message: String,
    pub ai_message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedChat {
    pub chat_id: ChatId,
    #[serde(default)]
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiChatRequest {
    pub message: String,
    pub file_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub chat_id: Option<ChatId>,
    #[serde(default)]
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    #[serde(deserialize_with = "deserialize_id")]
    pub file_id: String,
    pub filename: String,
    #[serde(default)]
    pub filetype: Option<String>,
}

/// One entry of `GET /api/chats/export`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedChat {
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub ai_message: String,
    #[serde(default)]
    pub timestamp: Timestamp,
}

/// Error payload the backend sends alongside non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
