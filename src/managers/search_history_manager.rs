//! Search History Manager for Phonebook.
//!
//! Implements `SearchHistoryManagerTrait`: recording settled search terms
//! newest-first, de-duplicating consecutive repeats, capping the list, and
//! clearing it. The whole list is persisted as one JSON value under
//! [`HISTORY_KEY`] in the local database after every change.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::Database;
use crate::types::errors::HistoryError;
use crate::types::history::SearchHistoryItem;

/// Local storage key holding the serialized history list.
pub const HISTORY_KEY: &str = "searchHistory";

/// Trait defining search history operations.
pub trait SearchHistoryManagerTrait {
    fn items(&self) -> &[SearchHistoryItem];
    fn find(&self, id: &str) -> Option<&SearchHistoryItem>;
    /// Records `term`; returns `Ok(false)` when it repeats the newest entry.
    fn record(&mut self, term: &str, result_count: usize) -> Result<bool, HistoryError>;
    fn clear(&mut self) -> Result<(), HistoryError>;
}

/// Search history backed by the local key/value store.
pub struct SearchHistoryManager {
    db: Database,
    items: Vec<SearchHistoryItem>,
    max_items: usize,
}

impl SearchHistoryManager {
    /// Restores the persisted history from `db`.
    ///
    /// A corrupt stored value is discarded and history starts empty.
    pub fn new(db: Database, max_items: usize) -> Result<Self, HistoryError> {
        let items = match db.get_value(HISTORY_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<SearchHistoryItem>>(&raw) {
                Ok(mut items) => {
                    items.truncate(max_items);
                    items
                }
                Err(e) => {
                    warn!(error = %e, "discarding unreadable search history");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!(count = items.len(), "search history restored");

        Ok(Self {
            db,
            items,
            max_items,
        })
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Records `term` with an explicit timestamp in epoch milliseconds.
    pub fn record_at(
        &mut self,
        term: &str,
        result_count: usize,
        timestamp: i64,
    ) -> Result<bool, HistoryError> {
        if self.items.first().is_some_and(|newest| newest.term == term) {
            return Ok(false);
        }

        let mut candidate = self.items.clone();
        candidate.insert(
            0,
            SearchHistoryItem {
                id: Uuid::now_v7().to_string(),
                term: term.to_string(),
                timestamp,
                result_count,
            },
        );
        candidate.truncate(self.max_items);
        self.persist(&candidate)?;
        self.items = candidate;
        Ok(true)
    }

    /// Changes the cap; the list is trimmed on the next recording.
    pub fn set_max_items(&mut self, max_items: usize) {
        self.max_items = max_items;
    }

    /// Writes `items` to the database; in-memory state is untouched.
    fn persist(&self, items: &[SearchHistoryItem]) -> Result<(), HistoryError> {
        let json = serde_json::to_string(items)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;
        self.db.put_value(HISTORY_KEY, &json)?;
        Ok(())
    }
}

impl SearchHistoryManagerTrait for SearchHistoryManager {
    fn items(&self) -> &[SearchHistoryItem] {
        &self.items
    }

    fn find(&self, id: &str) -> Option<&SearchHistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn record(&mut self, term: &str, result_count: usize) -> Result<bool, HistoryError> {
        let now = chrono::Utc::now().timestamp_millis();
        self.record_at(term, result_count, now)
    }

    fn clear(&mut self) -> Result<(), HistoryError> {
        self.persist(&[])?;
        self.items.clear();
        Ok(())
    }
}
