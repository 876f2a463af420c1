use serde::{Deserialize, Serialize};

use crate::types::hostname_of;

/// Maximum number of remembered submissions.
pub const HISTORY_LIMIT: usize = 5;

/// One remembered (url, requirement) submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub url: String,
    pub requirement: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl HistoryItem {
    pub fn hostname(&self) -> String {
        hostname_of(&self.url)
    }
}

/// Newest-first, url-unique list of at most [`HISTORY_LIMIT`] items.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct History {
    items: Vec<HistoryItem>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the invariants over untrusted persisted input: the first
    /// entry for each url wins and the list is capped.
    pub fn from_persisted(items: Vec<HistoryItem>) -> Self {
        let mut history = Self::new();
        for item in items {
            if history.items.len() == HISTORY_LIMIT {
                break;
            }
            if !history.items.iter().any(|kept| kept.url == item.url) {
                history.items.push(item);
            }
        }
        history
    }

    /// Builds an item for `url` with an id derived from `timestamp` that is
    /// unique among the current entries.
    pub fn new_item(&self, url: &str, requirement: &str, timestamp: i64) -> HistoryItem {
        let base = timestamp.to_string();
        let mut id = base.clone();
        let mut suffix = 1;
        while self.items.iter().any(|item| item.id == id) {
            id = format!("{base}-{suffix}");
            suffix += 1;
        }
        HistoryItem {
            id,
            url: url.to_string(),
            requirement: requirement.to_string(),
            timestamp,
        }
    }

    /// Prepends `item`, drops older entries for the same url, then truncates.
    pub fn record(&mut self, item: HistoryItem) {
        self.items.retain(|existing| existing.url != item.url);
        self.items.insert(0, item);
        self.items.truncate(HISTORY_LIMIT);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
