//! Schedule construction: one work slot per round, then a shared break

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Label carried by the break slot at the end of every cycle
pub const BREAK_LABEL: &str = "Break";

/// A single timed slot in the rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub label: String,
    pub duration_seconds: u64,
    pub is_break: bool,
}

impl Task {
    pub fn work(label: impl Into<String>, duration_seconds: u64) -> Self {
        Self {
            label: label.into(),
            duration_seconds,
            is_break: false,
        }
    }

    pub fn rest(duration_seconds: u64) -> Self {
        Self {
            label: BREAK_LABEL.to_string(),
            duration_seconds,
            is_break: true,
        }
    }
}

/// Ordered sequence of tasks making up one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    tasks: Vec<Task>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Length of one full cycle, `None` if it does not fit in a `u64`
    pub fn total_seconds(&self) -> Option<u64> {
        self.tasks
            .iter()
            .try_fold(0u64, |total, task| total.checked_add(task.duration_seconds))
    }
}

impl From<Vec<Task>> for Schedule {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}

/// Build one cycle of the rotation.
///
/// Work slots are labeled `names[i % names.len()]` for `i` in `0..rounds`, so
/// names repeat in order when there are more rounds than participants. A
/// single break slot of `break_seconds` closes the cycle; a zero-length break
/// is allowed and still occupies a slot.
pub fn build_schedule<S: AsRef<str>>(
    names: &[S],
    work_seconds: u64,
    rounds: u32,
    break_seconds: u64,
) -> Result<Schedule, TimerError> {
    if names.is_empty() {
        return Err(TimerError::InvalidConfiguration(
            "participant list is empty".to_string(),
        ));
    }
    if rounds == 0 {
        return Err(TimerError::InvalidConfiguration(
            "rounds per cycle must be positive".to_string(),
        ));
    }
    if work_seconds == 0 {
        return Err(TimerError::InvalidConfiguration(
            "work duration must be positive".to_string(),
        ));
    }

    let mut tasks: Vec<Task> = (0..rounds as usize)
        .map(|round| Task::work(names[round % names.len()].as_ref(), work_seconds))
        .collect();
    tasks.push(Task::rest(break_seconds));

    Ok(Schedule::from(tasks))
}
