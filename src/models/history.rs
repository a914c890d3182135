use serde::Serialize;

use super::{ChatId, Timestamp};

/// Calendar bucket a chat falls into, relative to the viewer's today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Bucket {
    Today,
    Yesterday,
    Past7Days,
    Older,
}

impl Bucket {
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Today => "Today",
            Bucket::Yesterday => "Yesterday",
            Bucket::Past7Days => "Past 7 Days",
            Bucket::Older => "Older",
        }
    }

    /// Position in display order.
    fn index(&self) -> usize {
        match self {
            Bucket::Today => 0,
            Bucket::Yesterday => 1,
            Bucket::Past7Days => 2,
            Bucket::Older => 3,
        }
    }
}

impl Ord for Bucket {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index().cmp(&other.index())
    }
}

impl PartialOrd for Bucket {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A history row ready for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: ChatId,
    pub title: String,
    pub display_time: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryGroup {
    pub bucket: Bucket,
    pub label: &'static str,
    pub entries: Vec<HistoryEntry>,
}

/// What the history sidebar shows after a load.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum HistoryView {
    Placeholder { text: &'static str },
    Groups { groups: Vec<HistoryGroup> },
}

impl HistoryView {
    pub fn groups(&self) -> &[HistoryGroup] {
        match self {
            HistoryView::Placeholder { .. } => &[],
            HistoryView::Groups { groups } => groups,
        }
    }

    /// Rows in display order, across all groups.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.groups().iter().flat_map(|group| group.entries.iter())
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, HistoryView::Placeholder { .. })
    }
}
