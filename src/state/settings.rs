//! Persisted rotation settings and parsing of raw form input

use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    schedule::{build_schedule, Schedule},
};

/// Rotation settings as saved between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub participant_count: u32,
    pub names: Vec<String>,
    pub work_minutes: u64,
    pub rounds_per_cycle: u32,
    pub break_minutes: u64,
}

/// Largest accepted participant count
pub const MAX_PARTICIPANTS: u32 = 100;

/// Largest accepted number of work slots per cycle
pub const MAX_ROUNDS: u32 = 100;

/// Longest accepted work or break slot, one day
pub const MAX_MINUTES: u64 = 24 * 60;

/// Placeholder name for the participant at zero-based `index`
pub fn default_name(index: usize) -> String {
    format!("Person{}", index + 1)
}

impl Settings {
    /// Settings used when nothing has been saved yet
    pub fn new() -> Self {
        Self {
            participant_count: 2,
            names: vec![default_name(0), default_name(1)],
            work_minutes: 25,
            rounds_per_cycle: 4,
            break_minutes: 5,
        }
    }

    /// Make `names` exactly `participant_count` long, filling gaps and blanks.
    ///
    /// Counts are range-checked first so an oversized participant count is
    /// rejected before any names are allocated.
    pub fn normalized(mut self) -> Result<Self, TimerError> {
        self.check_limits()?;

        let count = self.participant_count as usize;
        self.names.truncate(count);
        for (index, name) in self.names.iter_mut().enumerate() {
            let trimmed = name.trim();
            *name = if trimmed.is_empty() {
                default_name(index)
            } else {
                trimmed.to_string()
            };
        }
        while self.names.len() < count {
            self.names.push(default_name(self.names.len()));
        }
        Ok(self)
    }

    /// Range checks that need no allocation
    fn check_limits(&self) -> Result<(), TimerError> {
        if !(1..=MAX_PARTICIPANTS).contains(&self.participant_count) {
            return Err(TimerError::InvalidConfiguration(format!(
                "participant count must be between 1 and {MAX_PARTICIPANTS}, got {}",
                self.participant_count
            )));
        }
        if !(1..=MAX_ROUNDS).contains(&self.rounds_per_cycle) {
            return Err(TimerError::InvalidConfiguration(format!(
                "rounds per cycle must be between 1 and {MAX_ROUNDS}, got {}",
                self.rounds_per_cycle
            )));
        }
        if !(1..=MAX_MINUTES).contains(&self.work_minutes) {
            return Err(TimerError::InvalidConfiguration(format!(
                "work minutes must be between 1 and {MAX_MINUTES}, got {}",
                self.work_minutes
            )));
        }
        if self.break_minutes > MAX_MINUTES {
            return Err(TimerError::InvalidConfiguration(format!(
                "break minutes must be at most {MAX_MINUTES}, got {}",
                self.break_minutes
            )));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), TimerError> {
        self.check_limits()?;
        if self.names.len() != self.participant_count as usize {
            return Err(TimerError::InvalidConfiguration(format!(
                "expected {} names, got {}",
                self.participant_count,
                self.names.len()
            )));
        }
        self.durations_in_seconds().map(|_| ())
    }

    /// Work and break lengths in seconds
    pub fn durations_in_seconds(&self) -> Result<(u64, u64), TimerError> {
        Ok((
            minutes_to_seconds("work minutes", self.work_minutes)?,
            minutes_to_seconds("break minutes", self.break_minutes)?,
        ))
    }

    /// Build one cycle from these settings
    pub fn build_schedule(&self) -> Result<Schedule, TimerError> {
        self.validate()?;
        let (work_seconds, break_seconds) = self.durations_in_seconds()?;
        build_schedule(&self.names, work_seconds, self.rounds_per_cycle, break_seconds)
    }
}

fn minutes_to_seconds(field: &str, minutes: u64) -> Result<u64, TimerError> {
    minutes.checked_mul(60).ok_or_else(|| {
        TimerError::InvalidConfiguration(format!("{field} is too large: {minutes}"))
    })
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw values as typed into the settings form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsForm {
    pub num_people: String,
    #[serde(default)]
    pub names: Vec<String>,
    pub work_time: String,
    pub frequency: String,
    pub break_time: String,
}

fn parse_field<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T, TimerError> {
    raw.trim().parse().map_err(|_| {
        TimerError::InvalidConfiguration(format!("{field} must be a non-negative whole number, got {raw:?}"))
    })
}

impl TryFrom<SettingsForm> for Settings {
    type Error = TimerError;

    fn try_from(form: SettingsForm) -> Result<Self, Self::Error> {
        let settings = Settings {
            participant_count: parse_field("participant count", &form.num_people)?,
            names: form.names,
            work_minutes: parse_field("work minutes", &form.work_time)?,
            rounds_per_cycle: parse_field("rounds per cycle", &form.frequency)?,
            break_minutes: parse_field("break minutes", &form.break_time)?,
        }
        .normalized()?;

        settings.validate()?;
        Ok(settings)
    }
}

impl From<&Settings> for SettingsForm {
    fn from(settings: &Settings) -> Self {
        Self {
            num_people: settings.participant_count.to_string(),
            names: settings.names.clone(),
            work_time: settings.work_minutes.to_string(),
            frequency: settings.rounds_per_cycle.to_string(),
            break_time: settings.break_minutes.to_string(),
        }
    }
}
