mod terminal;

pub use terminal::TerminalRenderer;

use crate::models::{ChatId, HistoryGroup, SearchResult, UserProfile};

/// Region of the screen a placeholder is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    History,
    Search,
    Conversation,
}

/// Who wrote a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

/// Display surface driven by the controller. Implementations only draw; all
/// grouping, truncation and formatting has already happened.
pub trait Renderer {
    /// Replace the history sidebar with these groups.
    fn render_grouped_history(&mut self, groups: &[HistoryGroup]);

    /// Replace the search result list. Never called with an empty slice;
    /// empty result sets arrive as a placeholder.
    fn render_search_results(&mut self, results: &[SearchResult]);

    fn render_placeholder(&mut self, area: Area, text: &str);

    fn render_message(&mut self, sender: Sender, text: &str, timestamp: Option<&str>);

    fn clear_messages(&mut self);

    fn show_typing_indicator(&mut self, show: bool);

    /// Mark the history row of the open chat, or clear the mark.
    fn highlight_chat(&mut self, id: Option<&ChatId>);

    fn set_search_open(&mut self, open: bool);

    fn render_user(&mut self, profile: &UserProfile);

    /// Show the name of the file attached to upcoming questions, or hide it.
    fn show_active_file(&mut self, filename: Option<&str>);
}
