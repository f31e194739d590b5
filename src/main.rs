//! Pomo Relay - A shared round-robin Pomodoro timer
//!
//! This is the main entry point for the pomo-relay server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use pomo_relay::{
    api::create_router,
    config::Config,
    services::{JsonFileStore, MemoryStore, SettingsStore},
    state::AppState,
    tasks::display_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomo_relay={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomo-relay server v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn SettingsStore> = if config.no_persist {
        info!("Settings are kept in memory only");
        Arc::new(MemoryStore::new())
    } else {
        let store = JsonFileStore::new(config.settings_path());
        info!("Settings file: {}", store.path().display());
        Arc::new(store)
    };

    let state = Arc::new(AppState::new(config.port, config.host.clone(), store));
    let settings = state.current_settings();
    info!(
        "Rotation: {:?}, {}min work x {} rounds, {}min break",
        settings.names, settings.work_minutes, settings.rounds_per_cycle, settings.break_minutes
    );

    // Keep the display model in step with the timer
    tokio::spawn(display_task(state.driver.subscribe(), Arc::clone(&state.display)));

    if config.autostart {
        if let Err(e) = state.start_timer() {
            warn!("Autostart failed: {}", e);
        }
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start    - Start or resume the countdown");
    info!("  POST /pause    - Pause the countdown");
    info!("  POST /stop     - Stop and reset the countdown");
    info!("  GET  /status   - Countdown and display state");
    info!("  GET  /settings - Saved settings");
    info!("  PUT  /settings - Save settings (applies after stop)");
    info!("  GET  /schedule - Preview one cycle");
    info!("  GET  /events   - Server-sent timer events");
    info!("  GET  /health   - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.stop_timer() {
        warn!("Failed to stop timer during shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
