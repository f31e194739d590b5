//! Countdown state owned by the timer engine

use serde::{Deserialize, Serialize};

/// Coarse lifecycle of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Stopped,
    Running,
    Paused,
}

/// Mutable countdown position. Only the engine writes to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub current_index: usize,
    pub remaining_seconds: u64,
    pub running: bool,
    pub paused: bool,
}

impl TimerState {
    /// Create a stopped timer state
    pub fn new() -> Self {
        Self {
            current_index: 0,
            remaining_seconds: 0,
            running: false,
            paused: false,
        }
    }

    /// Create a running state positioned at the start of a task
    pub fn running(current_index: usize, remaining_seconds: u64) -> Self {
        Self {
            current_index,
            remaining_seconds,
            running: true,
            paused: false,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        match (self.running, self.paused) {
            (false, _) => TimerPhase::Stopped,
            (true, false) => TimerPhase::Running,
            (true, true) => TimerPhase::Paused,
        }
    }

    /// True while ticks should advance the countdown
    pub fn is_ticking(&self) -> bool {
        self.running && !self.paused
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_flags() {
        let mut state = TimerState::new();
        assert_eq!(state.phase(), TimerPhase::Stopped);

        state = TimerState::running(2, 30);
        assert_eq!(state.phase(), TimerPhase::Running);
        assert!(state.is_ticking());

        state.paused = true;
        assert_eq!(state.phase(), TimerPhase::Paused);
        assert!(!state.is_ticking());
    }
}
