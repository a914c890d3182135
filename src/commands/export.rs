use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::ClientResult;
use crate::render::{Renderer, Sender};
use super::ChatController;

pub fn export_file_name() -> String {
    format!("echobot-chat-history-{}.json", Utc::now().format("%Y-%m-%d"))
}

impl<R: Renderer> ChatController<R> {
    /// Download every chat as pretty JSON into `dir`. Returns the written path.
    pub async fn export_chat_history(&mut self, dir: &Path) -> ClientResult<PathBuf> {
        let result = self.write_export(dir).await;
        match &result {
            Ok(path) => {
                tracing::info!(path = %path.display(), "chat history exported");
                self.renderer
                    .render_message(Sender::Ai, "Chat history exported successfully!", None);
            }
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                self.renderer
                    .render_message(Sender::Ai, &format!("Export failed: {}", err), None);
            }
        }
        result
    }

    async fn write_export(&self, dir: &Path) -> ClientResult<PathBuf> {
        let chats = self.backend.export_chats().await?;
        let content = serde_json::to_string_pretty(&chats)?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(export_file_name());
        tokio::fs::write(&path, content).await?;
        Ok(path)
    }
}
