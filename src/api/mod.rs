//! HTTP API module
//!
//! Endpoint handlers, the event stream and response structures.

pub mod handlers;
pub mod responses;
pub mod stream;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;
use stream::events_handler;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/stop", post(stop_handler))
        .route("/status", get(status_handler))
        .route("/settings", get(get_settings_handler).put(put_settings_handler))
        .route("/schedule", get(schedule_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::services::MemoryStore;

    fn app() -> Router {
        let state = AppState::new(0, "127.0.0.1".to_string(), Arc::new(MemoryStore::new()));
        create_router(Arc::new(state))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn start_pause_stop_round() {
        let app = app();

        let (status, body) = call(&app, "POST", "/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["timer"]["remaining_seconds"], 25 * 60);

        let (_, body) = call(&app, "POST", "/pause", None).await;
        assert_eq!(body["status"], "paused");

        let (_, body) = call(&app, "POST", "/start", None).await;
        assert_eq!(body["message"], "Timer resumed");

        let (_, body) = call(&app, "POST", "/stop", None).await;
        assert_eq!(body["status"], "stopped");
        assert_eq!(body["timer"]["remaining_seconds"], 0);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_settings_are_unprocessable() {
        let app = app();
        let form = json!({
            "num_people": "2",
            "names": ["Ann", "Bo"],
            "work_time": "0",
            "frequency": "4",
            "break_time": "5"
        });

        let (status, body) = call(&app, "PUT", "/settings", Some(form)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_form_values_are_rejected_and_not_saved() {
        let app = app();
        for (num_people, work_time) in [("2", u64::MAX.to_string()), ("4000000000", "25".to_string())] {
            let form = json!({
                "num_people": num_people,
                "names": [],
                "work_time": work_time,
                "frequency": "4",
                "break_time": "5"
            });
            let (status, _) = call(&app, "PUT", "/settings", Some(form)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        }

        let (status, body) = call(&app, "GET", "/schedule", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cycle_seconds"], (4 * 25 + 5) * 60);

        let (status, _) = call(&app, "POST", "/start", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn saved_settings_drive_the_schedule_preview() {
        let app = app();
        let form = json!({
            "num_people": "2",
            "names": ["Ann", "Bo"],
            "work_time": "10",
            "frequency": "3",
            "break_time": "2"
        });

        let (status, _) = call(&app, "PUT", "/settings", Some(form)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = call(&app, "GET", "/schedule", None).await;
        assert_eq!(
            body["listing"],
            json!(["Ann (10 min)", "Bo (10 min)", "Ann (10 min)", "Break (2 min)"])
        );
        assert_eq!(body["cycle_seconds"], 32 * 60);

        let (_, body) = call(&app, "GET", "/settings", None).await;
        assert_eq!(body["settings"]["names"], json!(["Ann", "Bo"]));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = call(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
