//! App Core for Phonebook.
//!
//! Central struct holding the settings engine and the directory controller,
//! managing application lifecycle.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::database::Database;
use crate::managers::directory_manager::DirectoryManager;
use crate::managers::search_history_manager::SearchHistoryManager;
use crate::platform;
use crate::services::record_store::{RecordStore, RestRecordStore, UnconfiguredStore};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::StoreError;
use crate::types::settings::StoreSettings;

/// Overrides the directory holding `phonebook.db`.
pub const ENV_DATA_DIR: &str = "PHONEBOOK_DATA_DIR";

const DB_FILE: &str = "phonebook.db";

/// Central application struct.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub directory: DirectoryManager,
    /// Store settings the current store was built from.
    store_settings: StoreSettings,
}

impl App {
    /// Assembles an app from already-built parts.
    pub fn new(
        settings_engine: SettingsEngine,
        db: Database,
        store: Arc<dyn RecordStore>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let settings = settings_engine.get_settings().clone();
        let history = SearchHistoryManager::new(db, settings.history.max_items)?;
        let directory = DirectoryManager::new(store, history, &settings.history);
        Ok(Self {
            settings_engine,
            directory,
            store_settings: settings.store,
        })
    }

    /// Loads settings from the platform config path, applies environment
    /// overrides, opens the local database and connects the REST store.
    pub fn open(config_override: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        Self::open_in(config_override, Self::data_dir())
    }

    /// [`Self::open`] with `phonebook.db` placed under `data_dir`.
    pub fn open_in(
        config_override: Option<String>,
        data_dir: PathBuf,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(config_override);
        settings_engine.load()?;
        settings_engine.apply_env_overrides();

        std::fs::create_dir_all(&data_dir)?;
        let db = Database::open(data_dir.join(DB_FILE))?;

        let store = Self::connect_store(&settings_engine.get_settings().store);
        Self::new(settings_engine, db, store)
    }

    /// Builds the REST store. A store that cannot be configured is replaced
    /// by one that fails every call, so the app still runs on the bundled
    /// directory.
    pub fn connect_store(settings: &StoreSettings) -> Arc<dyn RecordStore> {
        match RestRecordStore::new(settings) {
            Ok(store) => {
                info!(endpoint = store.endpoint(), "record store configured");
                Arc::new(store)
            }
            Err(e) => {
                warn!(error = %e, "record store unavailable, running on the bundled directory");
                let reason = match e {
                    StoreError::Config(msg) => msg,
                    other => other.to_string(),
                };
                Arc::new(UnconfiguredStore::new(reason))
            }
        }
    }

    /// Pushes the current settings into the running controller. The store
    /// is rebuilt only when its own section changed.
    pub fn apply_settings(&mut self) {
        let settings = self.settings_engine.get_settings().clone();
        self.directory.apply_history_settings(&settings.history);
        if settings.store != self.store_settings {
            self.directory.set_store(Self::connect_store(&settings.store));
            self.store_settings = settings.store;
        }
    }

    /// `$PHONEBOOK_DATA_DIR`, falling back to the platform data directory.
    pub fn data_dir() -> PathBuf {
        match std::env::var(ENV_DATA_DIR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => platform::get_data_dir(),
        }
    }

    /// Directory CSV backups go to when the caller does not name one.
    pub fn export_dir(&self) -> PathBuf {
        let configured = &self.settings_engine.get_settings().export.directory;
        if configured.is_empty() {
            Path::new(".").to_path_buf()
        } else {
            PathBuf::from(configured)
        }
    }

    /// Shutdown sequence: an unfired history timer is dropped without
    /// recording its term.
    pub fn shutdown(&mut self) {
        if self.directory.next_history_deadline().is_some() {
            debug!("dropping unsettled search term on shutdown");
            self.directory.cancel_history_timer();
        }
    }
}
