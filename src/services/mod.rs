//! External collaborator module
//!
//! Persistence for the rotation settings.

pub mod settings_store;

// Re-export main items
pub use settings_store::{JsonFileStore, MemoryStore, SettingsStore, SETTINGS_KEY};
