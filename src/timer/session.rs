//! Mode and session accounting state

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Completed focus sessions per cycle; every fourth completion routes to a
/// long break.
pub const SESSIONS_PER_CYCLE: u64 = 4;

/// The three timer modes. Determines the active duration, the alarm cue,
/// and the session-accounting rule that fires on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Mode {
    /// Integer tag used by the persisted document (0, 1, 2).
    pub fn tag(self) -> u8 {
        match self {
            Mode::Focus => 0,
            Mode::ShortBreak => 1,
            Mode::LongBreak => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, TimerError> {
        match tag {
            0 => Ok(Mode::Focus),
            1 => Ok(Mode::ShortBreak),
            2 => Ok(Mode::LongBreak),
            other => Err(TimerError::Validation(format!("unknown mode tag: {}", other))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Focus => "Focus",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    pub fn is_break(self) -> bool {
        matches!(self, Mode::ShortBreak | Mode::LongBreak)
    }
}

/// Session-level state: the active mode, the focus-session lock, and the
/// completed-session counter.
///
/// `focus_session_active` is the lock preventing mode switches away from
/// Focus while a focus countdown is running or awaiting dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub active_mode: Mode,
    pub focus_session_active: bool,
    pub completed_sessions: u64,
    pub auto_switch_enabled: bool,
}

impl SessionState {
    pub fn new(active_mode: Mode, completed_sessions: u64) -> Self {
        Self {
            active_mode,
            focus_session_active: false,
            completed_sessions,
            // Not persisted; the widget always boots with auto-switch on.
            auto_switch_enabled: true,
        }
    }

    /// Position within the current 4-session cycle (0..=3).
    pub fn cycle_position(&self) -> u64 {
        self.completed_sessions % SESSIONS_PER_CYCLE
    }

    /// 1-based number of the cycle in progress.
    pub fn cycle_number(&self) -> u64 {
        self.completed_sessions / SESSIONS_PER_CYCLE + 1
    }

    /// Break mode owed after the most recent focus completion: a long
    /// break when it closed out a cycle, a short break otherwise. Call
    /// after incrementing `completed_sessions`.
    pub fn next_break_mode(&self) -> Mode {
        if self.cycle_position() == 0 {
            Mode::LongBreak
        } else {
            Mode::ShortBreak
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Mode::Focus, 0)
    }
}
