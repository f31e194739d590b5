//! Error types shared across the timer, the settings store and the HTTP layer

use thiserror::Error;

/// Errors raised by the schedule builder and the timer engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimerError {
    /// Participant list, durations or round count are unusable
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `start` was handed a schedule with no tasks
    #[error("schedule has no tasks")]
    EmptySchedule,
}

/// Errors raised while reading or writing persisted settings
#[derive(Debug, Error)]
pub enum SettingsStoreError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings blob is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("saved settings are out of range: {0}")]
    Invalid(#[from] TimerError),
}

/// Application-level error returned by `AppState` operations
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Timer(#[from] TimerError),

    #[error(transparent)]
    Settings(#[from] SettingsStoreError),

    #[error("failed to lock {0}")]
    StateLock(&'static str),
}
