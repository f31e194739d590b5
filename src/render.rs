//! Display model folded from timer events

use serde::{Deserialize, Serialize};

use crate::{engine::progress_fraction, events::TimerEvent, schedule::Schedule};

/// Format seconds as zero-padded `MM:SS`. Minutes are not wrapped at 60.
pub fn format_countdown(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format elapsed seconds as `"1h 2m 3s"`, dropping leading zero units
pub fn format_elapsed(seconds: u64) -> String {
    let units = [(seconds / 3600, 'h'), (seconds % 3600 / 60, 'm'), (seconds % 60, 's')];
    let first = units
        .iter()
        .position(|&(value, _)| value > 0)
        .unwrap_or(units.len() - 1);

    units[first..]
        .iter()
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One line per task: `"<label> (<minutes> min)"`
pub fn render_schedule_listing(schedule: &Schedule) -> Vec<String> {
    schedule
        .iter()
        .map(|task| format!("{} ({} min)", task.label, task.duration_seconds / 60))
        .collect()
}

/// What a front end should currently show
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub status_line: String,
    pub timer_text: String,
    /// Remaining fraction of the active task, 0.0 to 1.0
    pub progress: f64,
    pub active_index: Option<usize>,
    pub on_break: bool,
}

impl DisplayState {
    pub fn new() -> Self {
        Self {
            status_line: "Stopped".to_string(),
            timer_text: format_countdown(0),
            progress: 0.0,
            active_index: None,
            on_break: false,
        }
    }

    pub fn apply(&mut self, event: &TimerEvent) {
        match event {
            TimerEvent::Tick {
                index,
                remaining_seconds,
                task,
            } => {
                self.active_index = Some(*index);
                self.timer_text = format_countdown(*remaining_seconds);
                self.progress = progress_fraction(*remaining_seconds, task.duration_seconds);
            }
            TimerEvent::TaskChanged { index, task } => {
                self.active_index = Some(*index);
                self.on_break = task.is_break;
                self.status_line = format!("Now: {}", task.label);
                self.timer_text = format_countdown(task.duration_seconds);
                self.progress = progress_fraction(task.duration_seconds, task.duration_seconds);
            }
            TimerEvent::CycleComplete { .. } => {}
            TimerEvent::Paused { task, .. } => {
                self.status_line = format!("Now: {} (paused)", task.label);
            }
            TimerEvent::Resumed {
                index,
                remaining_seconds,
                task,
            } => {
                self.active_index = Some(*index);
                self.on_break = task.is_break;
                self.status_line = format!("Now: {}", task.label);
                self.timer_text = format_countdown(*remaining_seconds);
                self.progress = progress_fraction(*remaining_seconds, task.duration_seconds);
            }
            TimerEvent::Stopped => *self = Self::new(),
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}
