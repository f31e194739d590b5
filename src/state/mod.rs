//! State management module
//!
//! Countdown state, persisted settings and the shared application state.

pub mod app_state;
pub mod settings;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use settings::{Settings, SettingsForm};
pub use timer_state::{TimerPhase, TimerState};
