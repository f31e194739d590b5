//! One-second tick source driving the timer engine

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};
use tokio::{
    sync::broadcast,
    task::AbortHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::{
    engine::{StartOutcome, TimerEngine, TimerSnapshot},
    error::AppError,
    events::TimerEvent,
    schedule::Schedule,
};

/// Fixed countdown resolution
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Capacity of the timer event channel
const EVENT_CAPACITY: usize = 100;

#[derive(Debug)]
struct DriverInner {
    engine: TimerEngine,
    ticker: Option<AbortHandle>,
    /// Bumped on every reschedule; a tick task with an older value is stale
    generation: u64,
}

impl DriverInner {
    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            debug!("Cancelling tick task (generation {})", self.generation);
            handle.abort();
        }
        self.generation += 1;
    }
}

/// Owns a [`TimerEngine`] together with the single task that ticks it.
///
/// Starting or resuming always cancels the previous tick task before a new
/// one is spawned, so at most one task can advance the engine.
#[derive(Debug)]
pub struct TimerDriver {
    inner: Arc<Mutex<DriverInner>>,
    events: broadcast::Sender<TimerEvent>,
}

impl TimerDriver {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(DriverInner {
                engine: TimerEngine::new(events.clone()),
                ticker: None,
                generation: 0,
            })),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    fn lock(&self) -> Result<MutexGuard<'_, DriverInner>, AppError> {
        self.inner.lock().map_err(|e| {
            error!("Failed to lock timer engine: {}", e);
            AppError::StateLock("timer engine")
        })
    }

    /// Start or resume the countdown. Must be called inside a tokio runtime.
    pub fn start(&self, schedule: Schedule) -> Result<StartOutcome, AppError> {
        let mut inner = self.lock()?;
        let outcome = inner.engine.start(schedule)?;

        if outcome != StartOutcome::AlreadyRunning || inner.ticker.is_none() {
            inner.cancel_ticker();
            let generation = inner.generation;
            let first_tick = Instant::now() + TICK_INTERVAL;
            let handle = tokio::spawn(tick_loop(Arc::downgrade(&self.inner), generation, first_tick));
            inner.ticker = Some(handle.abort_handle());
            debug!("Tick task scheduled (generation {})", generation);
        }

        Ok(outcome)
    }

    /// Pause the countdown; returns false when it was not ticking
    pub fn pause(&self) -> Result<bool, AppError> {
        let mut inner = self.lock()?;
        let paused = inner.engine.pause();
        if paused {
            inner.cancel_ticker();
        }
        Ok(paused)
    }

    pub fn stop(&self) -> Result<(), AppError> {
        let mut inner = self.lock()?;
        inner.cancel_ticker();
        inner.engine.stop();
        Ok(())
    }

    pub fn snapshot(&self) -> Result<TimerSnapshot, AppError> {
        Ok(self.lock()?.engine.snapshot())
    }
}

impl Default for TimerDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one tick; returns false when this tick task should exit
fn tick_once(shared: &Mutex<DriverInner>, generation: u64) -> bool {
    let mut inner = match shared.lock() {
        Ok(inner) => inner,
        Err(e) => {
            error!("Tick task could not lock timer engine: {}", e);
            return false;
        }
    };

    if inner.generation != generation {
        debug!("Stale tick task (generation {}) exiting", generation);
        return false;
    }

    inner.engine.tick();
    true
}

/// Tick every [`TICK_INTERVAL`] from `first_tick`, which is fixed when the
/// countdown starts rather than when this task is first polled
async fn tick_loop(shared: Weak<Mutex<DriverInner>>, generation: u64, first_tick: Instant) {
    let mut interval = interval_at(first_tick, TICK_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(inner) = shared.upgrade() else {
            debug!("Timer driver dropped, tick task exiting");
            break;
        };
        if !tick_once(&inner, generation) {
            break;
        }
    }
}
