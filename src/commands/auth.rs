use crate::error::{ClientError, ClientResult};
use crate::models::{SessionState, UserProfile};
use crate::render::{Area, Renderer};
use super::ChatController;

pub const SESSION_EXPIRED_TEXT: &str = "Your session has expired. Please log in again.";

impl<R: Renderer> ChatController<R> {
    /// Fetch the signed-in user and show their name and avatar.
    pub async fn initialize_user(&mut self) -> ClientResult<UserProfile> {
        match self.backend.fetch_profile().await {
            Ok(profile) => {
                self.renderer.render_user(&profile);
                self.session.current_user = Some(profile.clone());
                Ok(profile)
            }
            Err(ClientError::Unauthorized) => {
                self.renderer.render_placeholder(Area::Conversation, SESSION_EXPIRED_TEXT);
                Err(ClientError::Unauthorized)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load user profile");
                Err(err)
            }
        }
    }

    /// End the backend session and forget everything tied to it.
    pub async fn logout(&mut self) -> ClientResult<()> {
        self.backend.logout().await?;
        self.search.reset();
        self.session = SessionState::default();
        tracing::info!("logged out");
        Ok(())
    }
}
