//! Alarm state
//!
//! Raised the instant a countdown reaches zero, cleared only by an
//! explicit dismiss. The cue records which kind of countdown completed so
//! that dismissal accounting never depends on whatever mode happens to be
//! active by the time the user reacts.

use serde::{Deserialize, Serialize};

use crate::timer::session::Mode;

/// Which sound the presentation layer should loop while the alarm rings.
/// Focus completions and break completions use distinct cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmCue {
    FocusComplete,
    BreakComplete,
}

impl AlarmCue {
    pub fn for_mode(mode: Mode) -> Self {
        if mode.is_break() {
            AlarmCue::BreakComplete
        } else {
            AlarmCue::FocusComplete
        }
    }
}

/// Pending-alarm flag plus the cue captured at completion time.
///
/// While pending, the countdown is stopped and no new countdown may start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmState {
    cue: Option<AlarmCue>,
}

impl AlarmState {
    pub fn is_pending(&self) -> bool {
        self.cue.is_some()
    }

    pub fn cue(&self) -> Option<AlarmCue> {
        self.cue
    }

    /// Raise the alarm for a completion of the given kind.
    pub fn ring(&mut self, cue: AlarmCue) {
        self.cue = Some(cue);
    }

    /// Clear the alarm, returning the cue it was ringing with, or `None`
    /// if no alarm was pending.
    pub fn dismiss(&mut self) -> Option<AlarmCue> {
        self.cue.take()
    }
}
