//! Unit tests for Phonebook error types: Display output and conversions.

use phonebook::types::errors::{
    ExportError, HistoryError, SettingsError, StoreError, ValidationError,
};

#[test]
fn test_store_error_display() {
    assert_eq!(
        StoreError::Transport("timed out".to_string()).to_string(),
        "Store transport error: timed out"
    );
    assert_eq!(
        StoreError::Status {
            status: 401,
            body: "JWT expired".to_string()
        }
        .to_string(),
        "Store rejected request (401): JWT expired"
    );
    assert_eq!(
        StoreError::Decode("expected array".to_string()).to_string(),
        "Store response decode error: expected array"
    );
    assert_eq!(
        StoreError::NotFound("17".to_string()).to_string(),
        "Store record not found: 17"
    );
    assert_eq!(
        StoreError::Config("store.base_url is not set".to_string()).to_string(),
        "Store configuration error: store.base_url is not set"
    );
}

#[test]
fn test_validation_error_display() {
    assert_eq!(
        ValidationError::MissingField("department").to_string(),
        "Missing required field: department"
    );
}

#[test]
fn test_history_error_from_rusqlite() {
    let err: HistoryError = rusqlite::Error::InvalidQuery.into();
    assert!(matches!(err, HistoryError::Storage(_)));
    assert!(err.to_string().starts_with("Search history storage error:"));
}

#[test]
fn test_settings_error_display() {
    assert_eq!(
        SettingsError::InvalidKey("foo.bar".to_string()).to_string(),
        "Invalid settings key: foo.bar"
    );
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
}

#[test]
fn test_export_error_from_io() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err: ExportError = io.into();
    assert!(matches!(err, ExportError::Io(_)));
    assert_eq!(
        ExportError::Empty.to_string(),
        "Nothing to export: record list is empty"
    );
}

#[test]
fn test_errors_are_std_errors() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&StoreError::NotFound("1".to_string()));
    assert_error(&ValidationError::MissingField("number"));
    assert_error(&HistoryError::Serialization("x".to_string()));
    assert_error(&SettingsError::InvalidValue("x".to_string()));
    assert_error(&ExportError::Csv("x".to_string()));
}
