// Phonebook shared type definitions
// Each submodule defines types used across the application.

pub mod directory;
pub mod errors;
pub mod history;
pub mod settings;
