//! Test doubles shared by the integration tests: an in-memory backend and a
//! renderer that records every call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use echobot_lib::models::{
    AiChatRequest, AiReply, ChatDetail, ChatId, ChatPage, ChatRecord, ExportedChat, HistoryGroup,
    SaveChatRequest, SavedChat, SearchHit, SearchResult, Timestamp, UploadedFile, UserProfile,
};
use echobot_lib::{Area, ChatBackend, ClientError, ClientResult, Renderer, Sender};

pub fn record(id: &str, message: &str, at: DateTime<Utc>) -> ChatRecord {
    ChatRecord {
        id: ChatId::from(id),
        user_message: Some(message.to_string()),
        ai_message: Some(format!("reply to {}", message)),
        timestamp: Timestamp::from(at),
    }
}

#[derive(Default)]
pub struct MockBackend {
    pub chats: Mutex<Vec<ChatRecord>>,
    pub list_fails: AtomicBool,
    pub search_fails: AtomicBool,
    /// Makes `search_chats` panic instead of returning.
    pub search_panics: AtomicBool,
    pub ai_fails: AtomicBool,
    pub unauthorized: AtomicBool,
    /// Extra latency per search query.
    pub search_delays: Mutex<HashMap<String, Duration>>,
    pub search_queries: Mutex<Vec<String>>,
    pub opened_chats: Mutex<Vec<String>>,
    pub ai_requests: Mutex<Vec<(String, Option<String>)>>,
    pub deleted: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<(String, usize)>>,
}

impl MockBackend {
    pub fn with_chats(chats: Vec<ChatRecord>) -> Self {
        let backend = Self::default();
        *backend.chats.lock().unwrap() = chats;
        backend
    }

    pub fn fail_search(self) -> Self {
        self.search_fails.store(true, Ordering::SeqCst);
        self
    }

    pub fn search_queries(&self) -> Vec<String> {
        self.search_queries.lock().unwrap().clone()
    }

    pub fn opened_chats(&self) -> Vec<String> {
        self.opened_chats.lock().unwrap().clone()
    }

    fn unavailable() -> ClientError {
        ClientError::from_status(503, Some("backend unavailable".to_string()))
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn fetch_profile(&self) -> ClientResult<UserProfile> {
        if self.unauthorized.load(Ordering::SeqCst) {
            return Err(ClientError::Unauthorized);
        }
        Ok(UserProfile {
            username: Some("alice".to_string()),
            email: Some("alice@example.com".to_string()),
            avatar: None,
        })
    }

    async fn logout(&self) -> ClientResult<()> {
        Ok(())
    }

    async fn list_chats(&self) -> ClientResult<ChatPage> {
        if self.list_fails.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let chats = self.chats.lock().unwrap().clone();
        Ok(ChatPage {
            total: Some(chats.len() as u64),
            chats,
            ..ChatPage::default()
        })
    }

    async fn search_chats(&self, query: &str) -> ClientResult<Vec<SearchHit>> {
        self.search_queries.lock().unwrap().push(query.to_string());
        let delay = self.search_delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.search_panics.load(Ordering::SeqCst) {
            panic!("search backend crashed");
        }
        if self.search_fails.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(vec![SearchHit {
            id: ChatId::from(query),
            user_message: Some(format!("match for {}", query)),
            timestamp: Timestamp::Text("2024-05-01T10:00:00Z".to_string()),
        }])
    }

    async fn get_chat(&self, id: &ChatId) -> ClientResult<ChatDetail> {
        self.opened_chats.lock().unwrap().push(id.to_string());
        let chats = self.chats.lock().unwrap();
        let chat = chats
            .iter()
            .find(|chat| &chat.id == id)
            .ok_or_else(|| ClientError::NotFound("Chat not found".to_string()))?;
        Ok(ChatDetail {
            user_message: chat.user_message.clone().unwrap_or_default(),
            ai_message: chat.ai_message.clone().unwrap_or_default(),
            timestamp: chat.timestamp.clone(),
        })
    }

    async fn delete_chat(&self, id: &ChatId) -> ClientResult<()> {
        self.deleted.lock().unwrap().push(id.to_string());
        self.chats.lock().unwrap().retain(|chat| &chat.id != id);
        Ok(())
    }

    async fn save_chat(&self, request: &SaveChatRequest) -> ClientResult<SavedChat> {
        let mut chats = self.chats.lock().unwrap();
        let id = ChatId::new(format!("saved-{}", chats.len() + 1));
        chats.insert(0, record(id.as_str(), &request.user_message, Utc::now()));
        Ok(SavedChat { chat_id: id, timestamp: Timestamp::from(Utc::now()) })
    }

    async fn send_ai_message(&self, request: &AiChatRequest) -> ClientResult<AiReply> {
        self.ai_requests
            .lock()
            .unwrap()
            .push((request.message.clone(), request.file_id.clone()));
        if self.ai_fails.load(Ordering::SeqCst) {
            return Err(ClientError::from_status(503, Some("AI service temporarily unavailable".into())));
        }

        let mut chats = self.chats.lock().unwrap();
        let id = ChatId::new(format!("ai-{}", chats.len() + 1));
        chats.insert(0, record(id.as_str(), &request.message, Utc::now()));
        Ok(AiReply {
            response: Some(format!("echo: {}", request.message)),
            chat_id: Some(id),
            timestamp: Timestamp::from(Utc::now()),
        })
    }

    async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<UploadedFile> {
        self.uploads.lock().unwrap().push((filename.to_string(), bytes.len()));
        Ok(UploadedFile {
            file_id: "17".to_string(),
            filename: filename.to_string(),
            filetype: Some("pdf".to_string()),
        })
    }

    async fn export_chats(&self) -> ClientResult<Vec<ExportedChat>> {
        Ok(self
            .chats
            .lock()
            .unwrap()
            .iter()
            .map(|chat| ExportedChat {
                user_message: chat.user_message.clone().unwrap_or_default(),
                ai_message: chat.ai_message.clone().unwrap_or_default(),
                timestamp: chat.timestamp.clone(),
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// (label, titles) per group.
    History(Vec<(String, Vec<String>)>),
    SearchResults(Vec<SearchResult>),
    Placeholder(Area, String),
    Message(Sender, String),
    ClearMessages,
    Typing(bool),
    Highlight(Option<String>),
    SearchOpen(bool),
    User(String),
    ActiveFile(Option<String>),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub events: Vec<Event>,
}

impl RecordingRenderer {
    pub fn placeholders(&self, area: Area) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Placeholder(a, text) if *a == area => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<(Sender, String)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Message(sender, text) => Some((*sender, text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn last_history(&self) -> Option<Vec<(String, Vec<String>)>> {
        self.events.iter().rev().find_map(|event| match event {
            Event::History(groups) => Some(groups.clone()),
            _ => None,
        })
    }

    pub fn last_search_results(&self) -> Option<Vec<SearchResult>> {
        self.events.iter().rev().find_map(|event| match event {
            Event::SearchResults(results) => Some(results.clone()),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn render_grouped_history(&mut self, groups: &[HistoryGroup]) {
        self.events.push(Event::History(
            groups
                .iter()
                .map(|group| {
                    (
                        group.label.to_string(),
                        group.entries.iter().map(|entry| entry.title.clone()).collect(),
                    )
                })
                .collect(),
        ));
    }

    fn render_search_results(&mut self, results: &[SearchResult]) {
        self.events.push(Event::SearchResults(results.to_vec()));
    }

    fn render_placeholder(&mut self, area: Area, text: &str) {
        self.events.push(Event::Placeholder(area, text.to_string()));
    }

    fn render_message(&mut self, sender: Sender, text: &str, _timestamp: Option<&str>) {
        self.events.push(Event::Message(sender, text.to_string()));
    }

    fn clear_messages(&mut self) {
        self.events.push(Event::ClearMessages);
    }

    fn show_typing_indicator(&mut self, show: bool) {
        self.events.push(Event::Typing(show));
    }

    fn highlight_chat(&mut self, id: Option<&ChatId>) {
        self.events.push(Event::Highlight(id.map(|id| id.to_string())));
    }

    fn set_search_open(&mut self, open: bool) {
        self.events.push(Event::SearchOpen(open));
    }

    fn render_user(&mut self, profile: &UserProfile) {
        self.events.push(Event::User(profile.initials()));
    }

    fn show_active_file(&mut self, filename: Option<&str>) {
        self.events.push(Event::ActiveFile(filename.map(str::to_string)));
    }
}
