use std::path::Path;

use crate::error::{ClientError, ClientResult};
use crate::models::{ActiveFile, UploadedFile};
use crate::render::{Renderer, Sender};
use super::ChatController;

impl<R: Renderer> ChatController<R> {
    /// Upload a file so later questions carry it as context.
    pub async fn upload_file(&mut self, path: &Path) -> ClientResult<UploadedFile> {
        match self.try_upload(path).await {
            Ok(uploaded) => {
                self.session.active_file = Some(ActiveFile {
                    file_id: uploaded.file_id.clone(),
                    filename: uploaded.filename.clone(),
                });
                self.renderer.show_active_file(Some(&uploaded.filename));
                self.renderer.render_message(
                    Sender::Ai,
                    &format!(
                        "File \"{}\" uploaded successfully. You can now ask questions about it.",
                        uploaded.filename
                    ),
                    None,
                );
                Ok(uploaded)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "upload failed");
                self.renderer
                    .render_message(Sender::Ai, &format!("Upload failed: {}", err), None);
                Err(err)
            }
        }
    }

    async fn try_upload(&self, path: &Path) -> ClientResult<UploadedFile> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| ClientError::Config("Please select a file first.".to_string()))?;
        let bytes = tokio::fs::read(path).await?;
        self.backend.upload_file(&filename, bytes).await
    }

    /// Stop sending the uploaded file with new questions.
    pub fn clear_active_file(&mut self) {
        self.session.active_file = None;
        self.renderer.show_active_file(None);
    }
}
