// Phonebook services
// Services provide leaf functionality: the remote record store, settings, CSV export,
// the bundled directory, derived list views, and the debounce primitive.

pub mod csv_export;
pub mod debounce;
pub mod default_directory;
pub mod directory_query;
pub mod record_store;
pub mod settings_engine;
