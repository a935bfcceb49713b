//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP
//! server: the reconcile tick and the alarm notifier.

pub mod alarm_notifier;
pub mod tick;

// Re-export main functions
pub use alarm_notifier::alarm_notifier_task;
pub use tick::reconcile_tick_task;
