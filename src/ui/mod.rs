//! Phonebook terminal UI layer.
//!
//! Renders the controller's state as text and turns typed commands into
//! RPC method calls, so the terminal front end mutates state only through
//! `rpc_handler::handle_method`, exactly like the RPC shell.

pub mod commands;
pub mod terminal_view;
