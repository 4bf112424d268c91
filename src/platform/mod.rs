// Phonebook platform abstraction
// Provides platform-specific paths for Windows, macOS, and Linux.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific configuration directory for Phonebook.
///
/// - **Linux**: `~/.config/phonebook` (or `$XDG_CONFIG_HOME/phonebook`)
/// - **macOS**: `~/Library/Application Support/Phonebook`
/// - **Windows**: `%APPDATA%/Phonebook`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the platform-specific data directory, home of the local database.
///
/// - **Linux**: `~/.local/share/phonebook` (or `$XDG_DATA_HOME/phonebook`)
/// - **macOS**: `~/Library/Application Support/Phonebook`
/// - **Windows**: `%APPDATA%/Phonebook`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
