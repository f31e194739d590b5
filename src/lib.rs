//! Pomo Relay - A shared round-robin Pomodoro timer
//!
//! Builds a repeating cycle of work slots rotating through a group of
//! participants followed by a shared break, and counts down through it with
//! start, pause and stop controls exposed over HTTP.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod render;
pub mod schedule;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{StartOutcome, TimerEngine, TimerSnapshot};
pub use error::{AppError, SettingsStoreError, TimerError};
pub use events::TimerEvent;
pub use schedule::{build_schedule, Schedule, Task};
pub use state::{AppState, Settings};
pub use utils::signals::shutdown_signal;
