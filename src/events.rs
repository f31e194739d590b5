//! Events published by the timer engine

use serde::{Deserialize, Serialize};

use crate::schedule::Task;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TimerEvent {
    /// One second elapsed inside the active task
    Tick {
        index: usize,
        remaining_seconds: u64,
        task: Task,
    },
    /// A task became active with its full duration remaining
    TaskChanged { index: usize, task: Task },
    /// The countdown wrapped from the last task back to the first
    CycleComplete { cycles_completed: u64 },
    Paused {
        index: usize,
        remaining_seconds: u64,
        task: Task,
    },
    Resumed {
        index: usize,
        remaining_seconds: u64,
        task: Task,
    },
    Stopped,
}

impl TimerEvent {
    /// Name used for the SSE `event:` field
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Tick { .. } => "tick",
            TimerEvent::TaskChanged { .. } => "task-changed",
            TimerEvent::CycleComplete { .. } => "cycle-complete",
            TimerEvent::Paused { .. } => "paused",
            TimerEvent::Resumed { .. } => "resumed",
            TimerEvent::Stopped => "stopped",
        }
    }
}
