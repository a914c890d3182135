use chrono::Local;

use crate::error::ClientResult;
use crate::models::{AiChatRequest, ChatId, HistoryView, SaveChatRequest};
use crate::render::{Area, Renderer, Sender};
use crate::services::history_service::{build_history_view, format_date_time, HISTORY_LOAD_FAILED_TEXT};
use super::ChatController;

pub const WELCOME_TEXT: &str =
    "Welcome to EchoBot! Start a conversation by typing a message below. You can also upload files to analyze.";

/// Conversation notice when the history could not be fetched.
pub const HISTORY_NOTICE_TEXT: &str = "Failed to load chat history. Please refresh the page.";

pub const AI_UNAVAILABLE_PREFIX: &str = "I apologize, but I'm having trouble connecting to the AI service";

pub const EMPTY_REPLY_TEXT: &str = "Sorry, I could not generate a response.";

impl<R: Renderer> ChatController<R> {
    /// Fetch the chat list, render it grouped by day and open the most
    /// recent conversation.
    pub async fn load_chat_history(&mut self) -> ClientResult<()> {
        let page = match self.backend.list_chats().await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load chat history");
                self.history = HistoryView::Placeholder { text: HISTORY_LOAD_FAILED_TEXT };
                self.render_history();
                self.renderer.render_message(Sender::Ai, HISTORY_NOTICE_TEXT, None);
                return Err(err);
            }
        };

        tracing::debug!(count = page.chats.len(), "chat history loaded");
        self.history = build_history_view(&page.chats, &Local::now(), self.history_title_len);
        self.render_history();

        if let Some(latest) = page.chats.first() {
            if let Err(err) = self.load_specific_chat(&latest.id).await {
                tracing::warn!(chat_id = %latest.id, error = %err, "failed to open most recent chat");
            }
        }

        Ok(())
    }

    /// Open one conversation in the message pane.
    pub async fn load_specific_chat(&mut self, id: &ChatId) -> ClientResult<()> {
        self.session.active_chat_id = Some(id.clone());
        self.renderer.highlight_chat(Some(id));

        let chat = self.backend.get_chat(id).await?;
        let when = format_date_time(&chat.timestamp, &Local);

        self.renderer.clear_messages();
        self.renderer.render_message(Sender::User, &chat.user_message, Some(&when));
        self.renderer.render_message(Sender::Ai, &chat.ai_message, Some(&when));
        Ok(())
    }

    /// Send a message to the AI proxy and show the reply. Returns the reply
    /// text, or `None` when the message was ignored (blank, or a reply is
    /// still pending). Backend failures become an apology in the conversation.
    pub async fn send_message(&mut self, text: &str) -> Option<String> {
        if self.session.is_typing {
            return None;
        }
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.renderer.render_message(Sender::User, text, None);
        self.session.is_typing = true;
        self.renderer.show_typing_indicator(true);

        let request = AiChatRequest {
            message: text.to_string(),
            file_id: self.session.active_file_id(),
        };
        let reply = match self.backend.send_ai_message(&request).await {
            Ok(reply) => {
                if let Some(chat_id) = reply.chat_id {
                    self.session.active_chat_id = Some(chat_id);
                }
                reply
                    .response
                    .filter(|response| !response.trim().is_empty())
                    .unwrap_or_else(|| EMPTY_REPLY_TEXT.to_string())
            }
            Err(err) => {
                tracing::warn!(error = %err, "AI request failed");
                format!("{}: {}", AI_UNAVAILABLE_PREFIX, err)
            }
        };

        self.renderer.show_typing_indicator(false);
        self.renderer.render_message(Sender::Ai, &reply, None);

        // The backend stores the exchange itself; refresh to pick it up.
        if let Err(err) = self.load_chat_history().await {
            tracing::debug!(error = %err, "history refresh after send failed");
        }
        self.session.is_typing = false;

        Some(reply)
    }

    /// Store an exchange explicitly and refresh the history.
    pub async fn save_chat(&mut self, user_message: &str, ai_message: &str) -> ClientResult<ChatId> {
        let request = SaveChatRequest {
            user_message: user_message.to_string(),
            ai_message: ai_message.to_string(),
        };
        let saved = self.backend.save_chat(&request).await?;
        self.session.active_chat_id = Some(saved.chat_id.clone());

        self.load_chat_history().await?;
        Ok(saved.chat_id)
    }

    /// Reset the conversation pane for a fresh chat.
    pub fn start_new_chat(&mut self) {
        self.session.reset_conversation();
        self.renderer.clear_messages();
        self.renderer.render_placeholder(Area::Conversation, WELCOME_TEXT);
        self.renderer.show_active_file(None);
        self.renderer.highlight_chat(None);
    }

    pub async fn delete_chat(&mut self, id: &ChatId) -> ClientResult<()> {
        self.backend.delete_chat(id).await?;
        tracing::info!(chat_id = %id, "chat deleted");

        if self.session.active_chat_id.as_ref() == Some(id) {
            self.session.active_chat_id = None;
            self.renderer.clear_messages();
            self.renderer.render_placeholder(Area::Conversation, WELCOME_TEXT);
        }

        self.load_chat_history().await
    }
}
