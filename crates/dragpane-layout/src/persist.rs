#![forbid(unsafe_code)]

//! State snapshot for save/restore across container destruction.
//!
//! The snapshot is a plain serde struct; the embedding application picks the
//! wire format. Restoring never animates: it only seeds the fields the
//! first-layout rule reads, and the open/close motion happens once the
//! container has real bounds.
//!
//! Unknown mode values fail deserialization (serde rejects unknown enum
//! variants) rather than silently defaulting.

use serde::{Deserialize, Serialize};

use crate::state::{Mode, PaneState};

/// Persistable container state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    /// Whether the pane was open when the snapshot was taken.
    pub is_open: bool,
    /// Whether drag gestures may open the pane.
    pub is_drag_openable: bool,
    /// Open direction policy.
    pub mode: Mode,
    /// Truncated rest offset (-1, 0, +1); which side `Both` mode reopens to.
    pub both_mode_offset_state: i32,
    /// Maximum horizontal travel in pixels.
    pub drag_range: i32,
}

impl SavedState {
    /// Snapshot the given live state.
    #[must_use]
    pub(crate) fn capture(state: &PaneState) -> Self {
        Self {
            is_open: state.is_opened(),
            is_drag_openable: state.drag_openable,
            mode: state.mode,
            // Truncated sign of the rest offset: -1, 0, or +1 at rest.
            both_mode_offset_state: state.offset as i32,
            drag_range: state.drag_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_reflects_live_state() {
        let mut state = PaneState {
            mode: Mode::Both,
            drag_range: 120,
            ..PaneState::default()
        };
        state.set_current_left(120);
        let ss = SavedState::capture(&state);
        assert!(ss.is_open);
        assert!(ss.is_drag_openable);
        assert_eq!(ss.mode, Mode::Both);
        assert_eq!(ss.both_mode_offset_state, 1);
        assert_eq!(ss.drag_range, 120);
    }

    #[test]
    fn json_round_trip() {
        let ss = SavedState {
            is_open: true,
            is_drag_openable: false,
            mode: Mode::Left,
            both_mode_offset_state: 0,
            drag_range: 120,
        };
        let json = serde_json::to_string(&ss).unwrap();
        let back: SavedState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ss);
    }

    #[test]
    fn unknown_mode_fails_fast() {
        let json = r#"{
            "is_open": false,
            "is_drag_openable": true,
            "mode": "Diagonal",
            "both_mode_offset_state": 0,
            "drag_range": 100
        }"#;
        assert!(serde_json::from_str::<SavedState>(json).is_err());
    }
}
