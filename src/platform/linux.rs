// Phonebook platform paths for Linux
// Config: ~/.config/phonebook
// Data:   ~/.local/share/phonebook

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/phonebook` if set, otherwise `~/.config/phonebook`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg).join("phonebook"),
        Err(_) => home_dir().join(".config").join("phonebook"),
    }
}

/// Uses `$XDG_DATA_HOME/phonebook` if set, otherwise `~/.local/share/phonebook`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) => PathBuf::from(xdg).join("phonebook"),
        Err(_) => home_dir().join(".local").join("share").join("phonebook"),
    }
}
