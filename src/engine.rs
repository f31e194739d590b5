//! Countdown state machine driving a schedule
//!
//! The engine is synchronous: it never sleeps and never spawns. Something
//! else (see [`crate::tasks::ticker`]) calls [`TimerEngine::tick`] once per
//! second while the timer is running. Every observable change is published
//! on a broadcast channel as a [`TimerEvent`].

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use crate::{
    error::TimerError,
    events::TimerEvent,
    schedule::{Schedule, Task},
    state::{TimerPhase, TimerState},
};

/// What a call to [`TimerEngine::start`] actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Fresh start from the first task of the given schedule
    Started,
    /// Continued a paused countdown; the given schedule was ignored
    Resumed,
    /// Already counting down; nothing changed
    AlreadyRunning,
}

/// Read-only view of the engine handed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub current_index: usize,
    pub remaining_seconds: u64,
    pub progress: f64,
    pub current_task: Option<Task>,
    pub cycles_completed: u64,
    pub schedule: Schedule,
}

/// Fraction of the task still remaining, `0.0` for zero-length tasks
pub fn progress_fraction(remaining_seconds: u64, duration_seconds: u64) -> f64 {
    if duration_seconds == 0 {
        0.0
    } else {
        remaining_seconds as f64 / duration_seconds as f64
    }
}

#[derive(Debug)]
pub struct TimerEngine {
    schedule: Schedule,
    state: TimerState,
    cycles_completed: u64,
    events: broadcast::Sender<TimerEvent>,
}

impl TimerEngine {
    pub fn new(events: broadcast::Sender<TimerEvent>) -> Self {
        Self {
            schedule: Schedule::default(),
            state: TimerState::new(),
            cycles_completed: 0,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.phase()
    }

    /// Schedule currently being counted down; empty while stopped
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn current_task(&self) -> Option<&Task> {
        if self.state.running {
            self.schedule.get(self.state.current_index)
        } else {
            None
        }
    }

    /// Start from the first task, or resume a paused countdown.
    ///
    /// The schedule is only adopted when starting from `Stopped`; while
    /// running or paused it is validated and otherwise ignored, so new
    /// settings take effect after the next stop.
    pub fn start(&mut self, schedule: Schedule) -> Result<StartOutcome, TimerError> {
        if schedule.is_empty() {
            return Err(TimerError::EmptySchedule);
        }

        match self.state.phase() {
            TimerPhase::Running => {
                debug!("Start requested while already running, ignoring");
                Ok(StartOutcome::AlreadyRunning)
            }
            TimerPhase::Paused => {
                self.state.paused = false;
                info!(
                    "Resuming task {} with {}s remaining",
                    self.state.current_index, self.state.remaining_seconds
                );
                if let Some(task) = self.current_task().cloned() {
                    self.emit(TimerEvent::Resumed {
                        index: self.state.current_index,
                        remaining_seconds: self.state.remaining_seconds,
                        task,
                    });
                }
                Ok(StartOutcome::Resumed)
            }
            TimerPhase::Stopped => {
                let first = schedule.get(0).cloned().ok_or(TimerError::EmptySchedule)?;
                info!("Starting schedule of {} tasks", schedule.len());

                self.schedule = schedule;
                self.state = TimerState::running(0, first.duration_seconds);
                self.cycles_completed = 0;
                self.emit(TimerEvent::TaskChanged { index: 0, task: first });
                Ok(StartOutcome::Started)
            }
        }
    }

    /// Freeze the countdown. Returns false when there was nothing to pause.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_ticking() {
            return false;
        }

        self.state.paused = true;
        info!(
            "Paused task {} with {}s remaining",
            self.state.current_index, self.state.remaining_seconds
        );
        if let Some(task) = self.current_task().cloned() {
            self.emit(TimerEvent::Paused {
                index: self.state.current_index,
                remaining_seconds: self.state.remaining_seconds,
                task,
            });
        }
        true
    }

    /// Reset to `Stopped` from any phase
    pub fn stop(&mut self) {
        if self.state.running {
            info!("Stopping timer after {} completed cycles", self.cycles_completed);
        }
        self.state = TimerState::new();
        self.schedule = Schedule::default();
        self.cycles_completed = 0;
        self.emit(TimerEvent::Stopped);
    }

    /// Advance the countdown by one second.
    ///
    /// A task that reached zero on the previous tick is replaced by the next
    /// one here, so the next task shows its full duration at the moment it
    /// becomes active.
    pub fn tick(&mut self) {
        if !self.state.is_ticking() {
            return;
        }

        let index = self.state.current_index;
        if self.state.remaining_seconds > 0 {
            self.state.remaining_seconds -= 1;
            if let Some(task) = self.schedule.get(index).cloned() {
                self.emit(TimerEvent::Tick {
                    index,
                    remaining_seconds: self.state.remaining_seconds,
                    task,
                });
            }
            return;
        }

        let next = (index + 1) % self.schedule.len();
        if next == 0 {
            self.cycles_completed += 1;
            debug!("Cycle {} complete", self.cycles_completed);
            self.emit(TimerEvent::CycleComplete {
                cycles_completed: self.cycles_completed,
            });
        }

        if let Some(task) = self.schedule.get(next).cloned() {
            debug!("Advancing to task {} ({})", next, task.label);
            self.state.current_index = next;
            self.state.remaining_seconds = task.duration_seconds;
            self.emit(TimerEvent::TaskChanged { index: next, task });
        }
    }

    /// Remaining fraction of the active task, `0.0` when stopped
    pub fn progress(&self) -> f64 {
        self.current_task()
            .map(|task| progress_fraction(self.state.remaining_seconds, task.duration_seconds))
            .unwrap_or(0.0)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.state.phase(),
            current_index: self.state.current_index,
            remaining_seconds: self.state.remaining_seconds,
            progress: self.progress(),
            current_task: self.current_task().cloned(),
            cycles_completed: self.cycles_completed,
            schedule: self.schedule.clone(),
        }
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is a normal condition, not a failure
        if self.events.send(event).is_err() {
            trace!("No subscribers for timer event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::build_schedule;
    use tokio::sync::broadcast::error::TryRecvError;

    fn engine() -> (TimerEngine, broadcast::Receiver<TimerEvent>) {
        let (tx, rx) = broadcast::channel(256);
        (TimerEngine::new(tx), rx)
    }

    fn work_then_break() -> Schedule {
        Schedule::from(vec![Task::work("A", 5), Task::rest(3)])
    }

    fn drain(rx: &mut broadcast::Receiver<TimerEvent>) -> Vec<TimerEvent> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => return events,
                Err(e) => panic!("unexpected receive error: {e}"),
            }
        }
    }

    #[test]
    fn start_positions_on_first_task() {
        let (mut engine, mut rx) = engine();
        assert_eq!(engine.start(work_then_break()), Ok(StartOutcome::Started));

        assert_eq!(engine.state(), &TimerState::running(0, 5));
        assert_eq!(
            drain(&mut rx),
            vec![TimerEvent::TaskChanged { index: 0, task: Task::work("A", 5) }]
        );
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn empty_schedule_is_rejected() {
        let (mut engine, _rx) = engine();
        assert_eq!(engine.start(Schedule::default()), Err(TimerError::EmptySchedule));
        assert_eq!(engine.phase(), TimerPhase::Stopped);
    }

    #[test]
    fn countdown_reaches_zero_then_switches_to_break() {
        let (mut engine, mut rx) = engine();
        engine.start(work_then_break()).unwrap();
        drain(&mut rx);

        let mut seen = Vec::new();
        for _ in 0..5 {
            engine.tick();
            seen.push(engine.state().remaining_seconds);
        }
        assert_eq!(seen, vec![4, 3, 2, 1, 0]);
        assert_eq!(drain(&mut rx).len(), 5);

        engine.tick();
        assert_eq!(engine.state().current_index, 1);
        assert_eq!(engine.state().remaining_seconds, 3);
        assert_eq!(
            drain(&mut rx),
            vec![TimerEvent::TaskChanged { index: 1, task: Task::rest(3) }]
        );
    }

    #[test]
    fn tick_events_carry_position_and_task() {
        let (mut engine, mut rx) = engine();
        engine.start(work_then_break()).unwrap();
        drain(&mut rx);

        engine.tick();
        assert_eq!(
            drain(&mut rx),
            vec![TimerEvent::Tick {
                index: 0,
                remaining_seconds: 4,
                task: Task::work("A", 5),
            }]
        );
        assert!((engine.progress() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn pause_then_resume_preserves_position() {
        let (mut engine, mut rx) = engine();
        engine.start(work_then_break()).unwrap();
        engine.tick();
        engine.tick();
        let before = engine.state().clone();

        assert!(engine.pause());
        for _ in 0..10 {
            engine.tick();
        }
        assert_eq!(engine.phase(), TimerPhase::Paused);
        assert_eq!(engine.state().current_index, before.current_index);
        assert_eq!(engine.state().remaining_seconds, before.remaining_seconds);

        drain(&mut rx);
        let other = build_schedule(&["Z"], 99, 1, 1).unwrap();
        assert_eq!(engine.start(other), Ok(StartOutcome::Resumed));
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.schedule(), &work_then_break());
        assert!(matches!(drain(&mut rx).as_slice(), [TimerEvent::Resumed { remaining_seconds: 3, .. }]));

        engine.tick();
        assert_eq!(engine.state().remaining_seconds, 2);
    }

    #[test]
    fn start_while_running_changes_nothing() {
        let (mut engine, mut rx) = engine();
        engine.start(work_then_break()).unwrap();
        engine.tick();
        drain(&mut rx);

        let other = build_schedule(&["Z"], 99, 1, 1).unwrap();
        assert_eq!(engine.start(other), Ok(StartOutcome::AlreadyRunning));
        assert_eq!(engine.state(), &TimerState::running(0, 4));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn pause_when_stopped_is_a_no_op() {
        let (mut engine, mut rx) = engine();
        assert!(!engine.pause());
        assert_eq!(engine.phase(), TimerPhase::Stopped);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn stop_is_safe_from_every_phase() {
        let (mut engine, mut rx) = engine();

        engine.stop();
        assert_eq!(engine.state(), &TimerState::new());

        engine.start(work_then_break()).unwrap();
        engine.tick();
        engine.stop();
        assert!(!engine.state().running);
        assert!(!engine.state().paused);
        assert_eq!(engine.state().remaining_seconds, 0);

        engine.start(work_then_break()).unwrap();
        engine.pause();
        engine.stop();
        engine.stop();
        assert_eq!(engine.state(), &TimerState::new());
        assert!(engine.schedule().is_empty());

        let stops = drain(&mut rx)
            .into_iter()
            .filter(|e| *e == TimerEvent::Stopped)
            .count();
        assert_eq!(stops, 4);
    }

    #[test]
    fn ticks_after_stop_do_nothing() {
        let (mut engine, mut rx) = engine();
        engine.start(work_then_break()).unwrap();
        engine.stop();
        drain(&mut rx);

        engine.tick();
        assert_eq!(engine.state(), &TimerState::new());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn each_traversal_completes_exactly_one_cycle() {
        let (mut engine, mut rx) = engine();
        let schedule = build_schedule(&["A", "B"], 2, 3, 1).unwrap();
        let expected: Vec<Task> = schedule.tasks().to_vec();
        engine.start(schedule).unwrap();

        // Each task needs `duration` ticks to reach zero plus one to advance
        let per_cycle: u64 = expected.iter().map(|t| t.duration_seconds + 1).sum();
        let mut changed = Vec::new();
        let mut cycles = 0;
        for _ in 0..per_cycle * 3 {
            engine.tick();
            for event in drain(&mut rx) {
                match event {
                    TimerEvent::TaskChanged { task, .. } => changed.push(task),
                    TimerEvent::CycleComplete { .. } => cycles += 1,
                    _ => {}
                }
            }
        }

        assert_eq!(cycles, 3);
        assert_eq!(engine.snapshot().cycles_completed, 3);
        assert_eq!(engine.state(), &TimerState::running(0, 2));
        let repeated: Vec<Task> = expected.iter().cycle().skip(1).take(changed.len()).cloned().collect();
        assert_eq!(changed, repeated);
    }

    #[test]
    fn cycle_complete_is_emitted_before_first_task_returns() {
        let (mut engine, mut rx) = engine();
        engine.start(Schedule::from(vec![Task::work("A", 1), Task::rest(0)])).unwrap();
        drain(&mut rx);

        engine.tick(); // A: 1 -> 0
        engine.tick(); // advance to break (0s)
        engine.tick(); // break already at zero: wrap
        let events = drain(&mut rx);
        assert_eq!(
            &events[events.len() - 2..],
            &[
                TimerEvent::CycleComplete { cycles_completed: 1 },
                TimerEvent::TaskChanged { index: 0, task: Task::work("A", 1) },
            ]
        );
    }

    #[test]
    fn zero_length_task_reports_zero_progress() {
        let (mut engine, _rx) = engine();
        engine.start(Schedule::from(vec![Task::work("A", 1), Task::rest(0)])).unwrap();
        engine.tick();
        engine.tick();
        assert_eq!(engine.current_task(), Some(&Task::rest(0)));
        assert_eq!(engine.progress(), 0.0);
        assert_eq!(progress_fraction(0, 0), 0.0);
    }

    #[test]
    fn restart_after_stop_adopts_new_schedule() {
        let (mut engine, _rx) = engine();
        engine.start(work_then_break()).unwrap();
        engine.stop();

        let next = build_schedule(&["B"], 7, 1, 2).unwrap();
        assert_eq!(engine.start(next.clone()), Ok(StartOutcome::Started));
        assert_eq!(engine.schedule(), &next);
        assert_eq!(engine.state(), &TimerState::running(0, 7));
    }
}
