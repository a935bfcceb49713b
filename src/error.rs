//! Error types shared by the timer core and the HTTP layer

use thiserror::Error;

/// Errors produced by timer commands, settings updates, and task edits.
///
/// Every variant is recoverable at the call site; none is fatal to the
/// process. The HTTP layer maps each kind to a client-visible status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Operation is not valid in the current state (pausing a stopped
    /// countdown, dismissing with no pending alarm, starting over a
    /// pending alarm).
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Mode switch attempted while the focus-session lock is held.
    #[error("Complete or reset your focus session first")]
    Locked,

    /// Input failed validation (empty task text, unknown mode tag,
    /// unknown task id).
    #[error("{0}")]
    Validation(String),
}
