//! Phonebook local database layer.
//!
//! Provides SQLite connection management, schema migrations, and the durable
//! key/value storage used for client-side state such as search history.
//!
//! # Usage
//!
//! ```no_run
//! use phonebook::database::Database;
//!
//! // Open a persistent database
//! let db = Database::open("phonebook.db").expect("failed to open database");
//!
//! // Or use an in-memory database for testing
//! let db = Database::open_in_memory().expect("failed to open in-memory database");
//!
//! db.put_value("searchHistory", "[]").expect("write failed");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
