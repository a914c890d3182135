use serde::{Deserialize, Serialize};

use super::ChatId;

const DEFAULT_AVATAR: &str = "/static/Avatar.jpeg";

/// Profile returned by `GET /api/profile`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl UserProfile {
    /// First two characters of the username, uppercased. `U` when unknown.
    pub fn initials(&self) -> String {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name.chars().take(2).collect::<String>().to_uppercase(),
            _ => "U".to_string(),
        }
    }

    /// The uploaded avatar URL, if the user replaced the default one.
    pub fn custom_avatar(&self) -> Option<&str> {
        self.avatar
            .as_deref()
            .filter(|avatar| !avatar.is_empty() && *avatar != DEFAULT_AVATAR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFile {
    pub file_id: String,
    pub filename: String,
}

/// Everything the controller remembers between user actions.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub current_user: Option<UserProfile>,
    pub active_chat_id: Option<ChatId>,
    pub active_file: Option<ActiveFile>,
    /// Set while an AI reply is pending.
    pub is_typing: bool,
}

impl SessionState {
    pub fn active_file_id(&self) -> Option<String> {
        self.active_file.as_ref().map(|file| file.file_id.clone())
    }

    pub fn reset_conversation(&mut self) {
        self.active_chat_id = None;
        self.active_file = None;
    }
}
