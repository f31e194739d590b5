//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use tracing::info;

use crate::{
    engine::StartOutcome,
    error::{AppError, TimerError},
    render::render_schedule_listing,
    state::{AppState, SettingsForm},
};
use super::responses::{
    ApiError, ApiResponse, HealthResponse, ScheduleResponse, SettingsResponse, StatusResponse,
};

/// Handle POST /start - Start from saved settings or resume a paused countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let (outcome, timer) = state.start_timer()?;
    let message = match outcome {
        StartOutcome::Started => "Timer started",
        StartOutcome::Resumed => "Timer resumed",
        StartOutcome::AlreadyRunning => "Timer already running",
    };
    info!("Start endpoint called - {}", message);
    Ok(Json(ApiResponse::new(message, timer)))
}

/// Handle POST /pause - Freeze the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let (paused, timer) = state.pause_timer()?;
    let message = if paused { "Timer paused" } else { "Timer was not running" };
    info!("Pause endpoint called - {}", message);
    Ok(Json(ApiResponse::new(message, timer)))
}

/// Handle POST /stop - Reset the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    let timer = state.stop_timer()?;
    info!("Stop endpoint called - timer stopped");
    Ok(Json(ApiResponse::new("Timer stopped", timer)))
}

/// Handle GET /status - Return countdown and display state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let timer = state.get_timer_snapshot()?;
    let display = state.get_display()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        display,
        uptime: state.uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /settings - Return saved settings or defaults
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    Json(SettingsResponse::new("Current settings", state.current_settings()))
}

/// Handle PUT /settings - Validate and save form input
pub async fn put_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SettingsForm>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = state.update_settings(form)?;
    Ok(Json(SettingsResponse::new(
        "Settings saved; they apply from the next start after a stop",
        settings,
    )))
}

/// Handle GET /schedule - Preview one cycle built from current settings
pub async fn schedule_handler(State(state): State<Arc<AppState>>) -> Result<Json<ScheduleResponse>, ApiError> {
    let schedule = state.preview_schedule()?;
    let cycle_seconds = schedule.total_seconds().ok_or_else(|| {
        AppError::from(TimerError::InvalidConfiguration(
            "cycle length is too large".to_string(),
        ))
    })?;

    Ok(Json(ScheduleResponse {
        listing: render_schedule_listing(&schedule),
        cycle_seconds,
        tasks: schedule,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
