mod auth;
mod chat;
mod export;
mod files;
mod search;

pub use chat::{AI_UNAVAILABLE_PREFIX, EMPTY_REPLY_TEXT, HISTORY_NOTICE_TEXT, WELCOME_TEXT};
pub use auth::SESSION_EXPIRED_TEXT;

use std::sync::Arc;

use crate::models::{HistoryView, SearchPhase, SessionState};
use crate::render::{Area, Renderer};
use crate::services::backend_client::ChatBackend;
use crate::services::config_service::Config;
use crate::services::history_service::{HISTORY_TITLE_MAX_LEN, NO_HISTORY_TEXT};
use crate::services::search_service::IncrementalSearch;

/// Owns the session state and turns user actions into backend calls and
/// renderer updates. Operations are split by concern across this module.
pub struct ChatController<R: Renderer> {
    backend: Arc<dyn ChatBackend>,
    renderer: R,
    session: SessionState,
    /// The history as currently rendered; replaced on every load.
    history: HistoryView,
    search: IncrementalSearch,
    history_title_len: usize,
}

impl<R: Renderer> ChatController<R> {
    pub fn new(backend: Arc<dyn ChatBackend>, renderer: R) -> Self {
        let search = IncrementalSearch::new(Arc::clone(&backend));
        Self {
            backend,
            renderer,
            session: SessionState::default(),
            history: HistoryView::Placeholder { text: NO_HISTORY_TEXT },
            search,
            history_title_len: HISTORY_TITLE_MAX_LEN,
        }
    }

    pub fn from_config(backend: Arc<dyn ChatBackend>, renderer: R, config: &Config) -> Self {
        let mut controller = Self::new(backend, renderer);
        controller.search = IncrementalSearch::new(Arc::clone(&controller.backend))
            .with_settings(config.debounce_delay(), config.search_title_len);
        controller.history_title_len = config.history_title_len;
        controller
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn search_phase(&self) -> SearchPhase {
        self.search.phase()
    }

    fn render_history(&mut self) {
        match &self.history {
            HistoryView::Placeholder { text } => self.renderer.render_placeholder(Area::History, text),
            HistoryView::Groups { groups } => self.renderer.render_grouped_history(groups),
        }
        self.renderer.highlight_chat(self.session.active_chat_id.as_ref());
    }
}
