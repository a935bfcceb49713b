//! Persisted state document and file store
//!
//! The document uses the page's camelCase storage keys, so a state
//! exported from browser-local storage maps onto it one-to-one. Reads fall
//! back to defaults on a missing or corrupt file; writes rewrite the whole
//! file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::store::task_list::Task;
use crate::timer::durations::{
    DEFAULT_FOCUS_SECS, DEFAULT_LONG_BREAK_SECS, DEFAULT_SHORT_BREAK_SECS,
};

/// Errors that can occur while saving durable state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem read/write failed.
    #[error("state file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("state serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything the widget keeps across restarts.
///
/// `autoSwitch` is intentionally absent: the widget never persisted it and
/// always boots with auto-switch enabled. Countdown and alarm state are
/// transient by design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub focus_time: u64,
    pub short_break_time: u64,
    pub long_break_time: u64,
    pub active_tag: u8,
    pub completed_sessions: u64,
    pub tasks: Vec<Task>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            focus_time: DEFAULT_FOCUS_SECS,
            short_break_time: DEFAULT_SHORT_BREAK_SECS,
            long_break_time: DEFAULT_LONG_BREAK_SECS,
            active_tag: 0,
            completed_sessions: 0,
            tasks: Vec::new(),
        }
    }
}

/// JSON-file-backed store for [`PersistedState`].
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Platform data directory location, e.g.
    /// `~/.local/share/flow-zone/state.json` on Linux.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("flow-zone");
        path.push("state.json");
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, falling back to defaults when the file is
    /// missing or unreadable. A corrupt file is reported but never fatal.
    pub fn load(&self) -> PersistedState {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(state) => state,
                Err(e) => {
                    warn!(
                        "Corrupt state file {}, starting from defaults: {}",
                        self.path.display(),
                        e
                    );
                    PersistedState::default()
                }
            },
            Err(_) => PersistedState::default(),
        }
    }

    /// Rewrite the whole document.
    pub fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("state.json"));
        let state = store.load();
        assert_eq!(state, PersistedState::default());
        assert_eq!(state.focus_time, 1500);
        assert_eq!(state.short_break_time, 300);
        assert_eq!(state.long_break_time, 600);
        assert_eq!(state.active_tag, 0);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let store = Store::new(dir.path().join("nested").join("state.json"));

        let mut state = PersistedState::default();
        state.focus_time = 3000;
        state.active_tag = 2;
        state.completed_sessions = 7;
        state.tasks.push(Task {
            text: "water the plants".to_string(),
            done: true,
            id: 42,
        });

        store.save(&state).unwrap();
        assert_eq!(store.load(), state);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        let store = Store::new(&path);
        assert_eq!(store.load(), PersistedState::default());
    }

    #[test]
    fn test_document_uses_widget_storage_keys() {
        let state = PersistedState::default();
        let json = serde_json::to_value(&state).unwrap();
        for key in [
            "focusTime",
            "shortBreakTime",
            "longBreakTime",
            "activeTag",
            "completedSessions",
            "tasks",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"focusTime": 900}"#).unwrap();
        let state = Store::new(&path).load();
        assert_eq!(state.focus_time, 900);
        assert_eq!(state.short_break_time, 300);
        assert!(state.tasks.is_empty());
    }
}
