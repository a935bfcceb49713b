//! Timer core: countdown engine, mode/session state machine, duration
//! registry, and alarm state.
//!
//! Everything in this module is pure, synchronous state manipulation. The
//! wall-clock instant is always passed in by the caller, which keeps the
//! core testable without a running clock and makes the countdown math
//! indifferent to how often (or how rarely) it is invoked.

pub mod alarm;
pub mod controller;
pub mod countdown;
pub mod durations;
pub mod session;

// Re-export main types
pub use alarm::{AlarmCue, AlarmState};
pub use controller::{TimerController, TimerSnapshot};
pub use countdown::Countdown;
pub use durations::DurationRegistry;
pub use session::{Mode, SessionState};
