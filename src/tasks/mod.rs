//! Background tasks module
//!
//! The tick source driving the timer engine and the display updater.

pub mod display;
pub mod ticker;

// Re-export main items
pub use display::display_task;
pub use ticker::{TimerDriver, TICK_INTERVAL};
