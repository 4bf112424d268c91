// Phonebook state managers
// Managers handle stateful operations: the directory controller and the search history log.

pub mod directory_manager;
pub mod search_history_manager;
