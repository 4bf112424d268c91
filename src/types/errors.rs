use std::fmt;

// === StoreError ===

/// Errors returned by the remote record store.
#[derive(Debug)]
pub enum StoreError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    Transport(String),
    /// The store answered with a non-success status code.
    Status { status: u16, body: String },
    /// The response body could not be decoded into records.
    Decode(String),
    /// No row matched the given ID.
    NotFound(String),
    /// The client is not configured well enough to issue requests.
    Config(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transport(msg) => write!(f, "Store transport error: {}", msg),
            StoreError::Status { status, body } => {
                write!(f, "Store rejected request ({}): {}", status, body)
            }
            StoreError::Decode(msg) => write!(f, "Store response decode error: {}", msg),
            StoreError::NotFound(id) => write!(f, "Store record not found: {}", id),
            StoreError::Config(msg) => write!(f, "Store configuration error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

// === ValidationError ===

/// Errors raised when a form is submitted with required fields left blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The named field is empty.
    MissingField(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField(field) => write!(f, "Missing required field: {}", field),
        }
    }
}

impl std::error::Error for ValidationError {}

// === HistoryError ===

/// Errors related to the persisted search history.
#[derive(Debug)]
pub enum HistoryError {
    /// The local database rejected a read or write.
    Storage(String),
    /// The persisted history could not be (de)serialized.
    Serialization(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::Storage(msg) => write!(f, "Search history storage error: {}", msg),
            HistoryError::Serialization(msg) => {
                write!(f, "Search history serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<rusqlite::Error> for HistoryError {
    fn from(err: rusqlite::Error) -> Self {
        HistoryError::Storage(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

// === ExportError ===

/// Errors related to CSV backup export.
#[derive(Debug)]
pub enum ExportError {
    /// There are no records to export.
    Empty,
    /// Writing the backup file failed.
    Io(String),
    /// The CSV writer failed.
    Csv(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Empty => write!(f, "Nothing to export: record list is empty"),
            ExportError::Io(msg) => write!(f, "Export I/O error: {}", msg),
            ExportError::Csv(msg) => write!(f, "Export CSV error: {}", msg),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}
