//! Background task keeping the display model in step with the timer

use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::{events::TimerEvent, render::DisplayState};

/// Apply every timer event to `display` until the event channel closes
pub async fn display_task(
    mut events: broadcast::Receiver<TimerEvent>,
    display: Arc<Mutex<DisplayState>>,
) {
    info!("Starting display task");

    loop {
        match events.recv().await {
            Ok(event) => {
                log_event(&event);
                match display.lock() {
                    Ok(mut display) => display.apply(&event),
                    Err(e) => warn!("Failed to lock display state: {}", e),
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Display task lagged, skipped {} timer events", skipped);
            }
            Err(RecvError::Closed) => {
                debug!("Timer event channel closed, display task exiting");
                break;
            }
        }
    }
}

fn log_event(event: &TimerEvent) {
    match event {
        TimerEvent::Tick { remaining_seconds, task, .. } => {
            debug!("{}: {}s remaining", task.label, remaining_seconds);
        }
        TimerEvent::TaskChanged { index, task } => {
            info!(
                "Now on task {} ({}, {}s{})",
                index,
                task.label,
                task.duration_seconds,
                if task.is_break { ", break" } else { "" }
            );
        }
        TimerEvent::CycleComplete { cycles_completed } => {
            info!("Cycle {} complete, starting over", cycles_completed);
        }
        TimerEvent::Paused { task, .. } => info!("{} paused", task.label),
        TimerEvent::Resumed { task, .. } => info!("{} resumed", task.label),
        TimerEvent::Stopped => info!("Timer stopped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Task;

    #[tokio::test]
    async fn applies_events_until_channel_closes() {
        let (tx, rx) = broadcast::channel(16);
        let display = Arc::new(Mutex::new(DisplayState::new()));
        let handle = tokio::spawn(display_task(rx, Arc::clone(&display)));

        let task = Task::work("Ann", 90);
        tx.send(TimerEvent::TaskChanged { index: 0, task: task.clone() }).unwrap();
        tx.send(TimerEvent::Tick { index: 0, remaining_seconds: 89, task }).unwrap();
        drop(tx);
        handle.await.unwrap();

        let display = display.lock().unwrap();
        assert_eq!(display.status_line, "Now: Ann");
        assert_eq!(display.timer_text, "01:29");
    }
}
