//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    engine::TimerSnapshot,
    error::{AppError, TimerError},
    render::DisplayState,
    state::{Settings, TimerPhase},
};

/// Response for the start/pause/stop endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: TimerPhase,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a response whose status mirrors the timer phase
    pub fn new(message: impl Into<String>, timer: TimerSnapshot) -> Self {
        Self {
            status: timer.phase,
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Full status including the display model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub display: DisplayState,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub settings: Settings,
}

impl SettingsResponse {
    pub fn new(message: impl Into<String>, settings: Settings) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            settings,
        }
    }
}

/// Preview of one cycle built from the saved settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub tasks: crate::schedule::Schedule,
    pub listing: Vec<String>,
    pub cycle_seconds: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body returned for failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Handler error mapped onto an HTTP status
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Timer(TimerError::InvalidConfiguration(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Timer(TimerError::EmptySchedule) => StatusCode::CONFLICT,
            AppError::Settings(_) | AppError::StateLock(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}
