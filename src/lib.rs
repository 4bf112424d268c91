//! Phonebook: internal hospital phone directory.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod telemetry;
pub mod types;
pub mod ui;
