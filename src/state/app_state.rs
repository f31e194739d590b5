//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{Settings, SettingsForm};
use crate::{
    engine::{StartOutcome, TimerSnapshot},
    error::AppError,
    render::{format_elapsed, DisplayState},
    schedule::Schedule,
    services::SettingsStore,
    tasks::TimerDriver,
};

/// Shared state behind the HTTP handlers and background tasks
pub struct AppState {
    /// Countdown engine and its tick source
    pub driver: TimerDriver,
    /// Settings persistence
    pub store: Arc<dyn SettingsStore>,
    /// Latest display model, kept current by the display task
    pub display: Arc<Mutex<DisplayState>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(port: u16, host: String, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            driver: TimerDriver::new(),
            store,
            display: Arc::new(Mutex::new(DisplayState::new())),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Saved settings, or defaults when nothing usable is stored
    pub fn current_settings(&self) -> Settings {
        match self.store.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                Settings::default()
            }
        }
    }

    /// Schedule the current settings would produce
    pub fn preview_schedule(&self) -> Result<Schedule, AppError> {
        Ok(self.current_settings().build_schedule()?)
    }

    /// Start from the saved settings, or resume a paused countdown
    pub fn start_timer(&self) -> Result<(StartOutcome, TimerSnapshot), AppError> {
        let schedule = self.preview_schedule()?;
        let outcome = self.driver.start(schedule)?;
        info!("Start requested: {:?}", outcome);
        self.record_action("start");
        Ok((outcome, self.driver.snapshot()?))
    }

    pub fn pause_timer(&self) -> Result<(bool, TimerSnapshot), AppError> {
        let paused = self.driver.pause()?;
        info!("Pause requested: paused={}", paused);
        self.record_action("pause");
        Ok((paused, self.driver.snapshot()?))
    }

    pub fn stop_timer(&self) -> Result<TimerSnapshot, AppError> {
        self.driver.stop()?;
        info!("Stop requested");
        self.record_action("stop");
        self.driver.snapshot()
    }

    /// Validate and persist form input. A running countdown keeps its
    /// schedule until the next stop.
    pub fn update_settings(&self, form: SettingsForm) -> Result<Settings, AppError> {
        let settings = Settings::try_from(form)?;
        self.store.save(&settings)?;
        info!(
            "Settings updated: {} participants, {}min work, {} rounds, {}min break",
            settings.participant_count,
            settings.work_minutes,
            settings.rounds_per_cycle,
            settings.break_minutes
        );
        self.record_action("settings");
        Ok(settings)
    }

    pub fn get_timer_snapshot(&self) -> Result<TimerSnapshot, AppError> {
        self.driver.snapshot()
    }

    pub fn get_display(&self) -> Result<DisplayState, AppError> {
        self.display
            .lock()
            .map(|display| display.clone())
            .map_err(|_| AppError::StateLock("display state"))
    }

    /// Time since the server started, e.g. `"3m 12s"`
    pub fn uptime(&self) -> String {
        format_elapsed(self.start_time.elapsed().as_secs())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
