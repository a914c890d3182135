use crate::error::ClientResult;
use crate::models::{ChatId, HistoryEntry, SearchPhase, SearchResult};
use crate::render::{Area, Renderer};
use crate::services::search_service::{SearchUpdate, NO_RESULTS_TEXT, SEARCHING_TEXT, SEARCH_PROMPT_TEXT};
use super::ChatController;

impl<R: Renderer> ChatController<R> {
    pub fn open_search(&mut self) {
        self.renderer.set_search_open(true);
        self.renderer.render_placeholder(Area::Search, SEARCH_PROMPT_TEXT);
    }

    /// Feed the current contents of the search box.
    pub fn on_search_input(&mut self, text: &str) -> SearchPhase {
        let phase = self.search.on_input(text);
        if phase == SearchPhase::Idle {
            self.renderer.render_placeholder(Area::Search, SEARCH_PROMPT_TEXT);
        }
        phase
    }

    /// Wait for the next visible change of the current search and render it.
    /// Returns `None` once nothing is pending.
    pub async fn poll_search(&mut self) -> Option<SearchUpdate> {
        let rendered: Vec<HistoryEntry> = self.history.entries().cloned().collect();
        let update = self.search.next_update(&rendered).await?;

        match &update {
            SearchUpdate::Searching => self.renderer.render_placeholder(Area::Search, SEARCHING_TEXT),
            SearchUpdate::Results { results, .. } if results.is_empty() => {
                self.renderer.render_placeholder(Area::Search, NO_RESULTS_TEXT)
            }
            SearchUpdate::Results { results, .. } => self.renderer.render_search_results(results),
        }
        Some(update)
    }

    /// Drive the current search until its results are rendered.
    pub async fn settle_search(&mut self) -> Vec<SearchResult> {
        let mut latest = Vec::new();
        while let Some(update) = self.poll_search().await {
            if let SearchUpdate::Results { results, .. } = update {
                latest = results;
            }
        }
        latest
    }

    /// Open a result's conversation and close the search surface.
    pub async fn select_search_result(&mut self, id: &ChatId) -> ClientResult<()> {
        self.close_search();
        self.load_specific_chat(id).await
    }

    pub fn close_search(&mut self) {
        self.search.reset();
        self.renderer.set_search_open(false);
        self.renderer.render_placeholder(Area::Search, SEARCH_PROMPT_TEXT);
    }
}
