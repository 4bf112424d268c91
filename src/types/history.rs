use serde::{Deserialize, Serialize};

/// One recorded search term, as persisted under the local history key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryItem {
    pub id: String,
    pub term: String,
    /// Recording time in epoch milliseconds.
    pub timestamp: i64,
    /// Number of entries matching `term` when it was recorded.
    pub result_count: usize,
}
