use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, TimeZone};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::error::{ClientError, ClientResult};
use crate::models::{non_empty_or_placeholder, HistoryEntry, ResultSource, SearchHit, SearchPhase, SearchResult};
use super::backend_client::ChatBackend;
use super::history_service::{format_date, truncate_message};

/// Quiet period after the last keystroke before a query is sent.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// Search result titles longer than this many characters are cut.
pub const SEARCH_TITLE_MAX_LEN: usize = 100;

pub const SEARCH_PROMPT_TEXT: &str = "Type to search your chat history...";
pub const SEARCHING_TEXT: &str = "Searching...";
pub const NO_RESULTS_TEXT: &str = "No results found.";

/// Sent by a debounce task back to the `IncrementalSearch` that spawned it.
/// Every message carries the generation of the query it belongs to.
#[derive(Debug)]
pub enum SearchMessage {
    /// The debounce timer fired and the remote request is going out.
    Started { generation: u64 },
    Finished {
        generation: u64,
        query: String,
        outcome: ClientResult<Vec<SearchHit>>,
    },
}

/// What to show after a message for the current query was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchUpdate {
    Searching,
    Results {
        source: ResultSource,
        results: Vec<SearchResult>,
    },
}

/// Debounced search with a local fallback.
///
/// Each call to [`IncrementalSearch::on_input`] aborts the previous timer task
/// and bumps the generation, so a response for an older query is dropped even
/// if it was already queued.
pub struct IncrementalSearch {
    backend: Arc<dyn ChatBackend>,
    delay: Duration,
    title_max_len: usize,
    generation: u64,
    phase: SearchPhase,
    query: String,
    pending: Option<JoinHandle<()>>,
    tx: UnboundedSender<SearchMessage>,
    rx: UnboundedReceiver<SearchMessage>,
}

impl IncrementalSearch {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            delay: DEBOUNCE_DELAY,
            title_max_len: SEARCH_TITLE_MAX_LEN,
            generation: 0,
            phase: SearchPhase::Idle,
            query: String::new(),
            pending: None,
            tx,
            rx,
        }
    }

    pub fn with_settings(mut self, delay: Duration, title_max_len: usize) -> Self {
        self.delay = delay;
        self.title_max_len = title_max_len;
        self
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a timer or request for the current query is outstanding.
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, SearchPhase::Debouncing | SearchPhase::Searching)
    }

    /// Handle a change of the search box. Blank text returns to `Idle`;
    /// anything else re-arms the debounce timer.
    pub fn on_input(&mut self, text: &str) -> SearchPhase {
        self.cancel_pending();
        self.generation += 1;

        let query = text.trim();
        if query.is_empty() {
            self.query.clear();
            self.phase = SearchPhase::Idle;
            return self.phase;
        }

        self.query = query.to_string();
        self.phase = SearchPhase::Debouncing;

        let generation = self.generation;
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let delay = self.delay;
        let query = self.query.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(SearchMessage::Started { generation }).is_err() {
                return;
            }
            let outcome = backend.search_chats(&query).await;
            let _ = tx.send(SearchMessage::Finished { generation, query, outcome });
        }));

        self.phase
    }

    /// Drop the current query and anything still in flight for it.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        self.query.clear();
        self.phase = SearchPhase::Idle;
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Next message from a debounce task, or `None` when nothing is pending.
    /// A task that dies before reporting is turned into a failed search for
    /// the current query.
    pub async fn next_message(&mut self) -> Option<SearchMessage> {
        loop {
            if !self.is_pending() {
                return None;
            }

            let Some(handle) = self.pending.as_mut() else {
                // The task is gone; only what it queued is left.
                return match self.rx.try_recv() {
                    Ok(message) => Some(message),
                    Err(_) => {
                        self.phase = SearchPhase::Idle;
                        None
                    }
                };
            };

            tokio::select! {
                biased;
                message = self.rx.recv() => return message,
                joined = handle => {
                    self.pending = None;
                    if let Err(err) = joined {
                        tracing::warn!(error = %err, "search task ended without a result");
                        let _ = self.tx.send(SearchMessage::Finished {
                            generation: self.generation,
                            query: self.query.clone(),
                            outcome: Err(ClientError::Task(err)),
                        });
                    }
                }
            }
        }
    }

    /// Apply a task message. Messages from superseded queries return `None`.
    /// `rendered` is the history currently on screen, used when the remote
    /// search fails.
    pub fn resolve(&mut self, message: SearchMessage, rendered: &[HistoryEntry]) -> Option<SearchUpdate> {
        match message {
            SearchMessage::Started { generation } => {
                if generation != self.generation {
                    tracing::debug!(generation, current = self.generation, "ignoring stale search start");
                    return None;
                }
                self.phase = SearchPhase::Searching;
                Some(SearchUpdate::Searching)
            }
            SearchMessage::Finished { generation, query, outcome } => {
                if generation != self.generation {
                    tracing::debug!(generation, current = self.generation, "discarding stale search results");
                    return None;
                }
                self.pending = None;
                self.phase = SearchPhase::Results;

                let (source, results) = match outcome {
                    Ok(hits) => (ResultSource::Remote, shape_hits(&hits, self.title_max_len, &Local)),
                    Err(err) => {
                        tracing::warn!(error = %err, "remote search failed, searching rendered history");
                        (
                            ResultSource::Local,
                            local_scan(&query, rendered, self.title_max_len, &Local),
                        )
                    }
                };
                Some(SearchUpdate::Results { source, results })
            }
        }
    }

    /// Wait until the current query produces something to show.
    pub async fn next_update(&mut self, rendered: &[HistoryEntry]) -> Option<SearchUpdate> {
        while let Some(message) = self.next_message().await {
            if let Some(update) = self.resolve(message, rendered) {
                return Some(update);
            }
        }
        None
    }
}

impl Drop for IncrementalSearch {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Turn server matches into display rows.
pub fn shape_hits<Tz>(hits: &[SearchHit], title_max_len: usize, zone: &Tz) -> Vec<SearchResult>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    hits.iter()
        .map(|hit| SearchResult {
            id: hit.id.clone(),
            display_title: truncate_message(non_empty_or_placeholder(hit.user_message.as_deref()), title_max_len),
            display_date: format_date(&hit.timestamp, zone),
        })
        .collect()
}

/// Case-insensitive substring match of `query` against rendered history titles.
pub fn local_scan<Tz>(query: &str, rendered: &[HistoryEntry], title_max_len: usize, zone: &Tz) -> Vec<SearchResult>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let needle = query.trim().to_lowercase();

    rendered
        .iter()
        .filter(|entry| entry.title.to_lowercase().contains(&needle))
        .map(|entry| SearchResult {
            id: entry.id.clone(),
            display_title: truncate_message(&entry.title, title_max_len),
            display_date: format_date(&entry.timestamp, zone),
        })
        .collect()
}
