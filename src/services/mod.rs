//! External side-effect module
//!
//! This module contains the process's only outward-facing side effect:
//! the advisory desktop notification raised on countdown completion.

pub mod notify;

// Re-export main functions
pub use notify::send_completion_notification;
