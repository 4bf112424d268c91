use serde::{Deserialize, Serialize};

/// Top-level application settings container.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub store: StoreSettings,
    pub history: HistorySettings,
    pub export: ExportSettings,
}

/// Connection details for the remote record collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreSettings {
    /// Project root URL; requests go to `<base_url>/rest/v1/<table>`.
    pub base_url: String,
    pub api_key: String,
    pub schema: String,
    pub table: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            schema: "Book-Phone".to_string(),
            table: "hospital_phonebook".to_string(),
        }
    }
}

/// Search-history recording rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    pub max_items: usize,
    pub debounce_ms: u64,
    /// A term is recorded only when it is longer than this many characters.
    pub min_term_chars: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_items: 50,
            debounce_ms: 2000,
            min_term_chars: 2,
        }
    }
}

/// CSV backup settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory for backup files; empty means the working directory.
    pub directory: String,
}
