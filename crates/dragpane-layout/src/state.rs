#![forbid(unsafe_code)]

//! Pane state: the single source of truth for the container's position.
//!
//! # Invariants
//!
//! 1. `offset == 0.0` exactly when the pane is closed; `|offset| == 1.0`
//!    exactly when fully open; anything strictly between is a drag or settle
//!    in flight.
//! 2. `current_left` stays inside the mode's travel interval:
//!    `[-drag_range, 0]` for [`Mode::Right`], `[0, drag_range]` for
//!    [`Mode::Left`], `[-drag_range, drag_range]` for [`Mode::Both`].
//! 3. `drag_range == 0` forces `offset` to `0.0`; never a division fault.
//!
//! The invariants are maintained by [`PaneState::clamp_left`] and
//! [`PaneState::set_current_left`]; the container's setters close the pane
//! before any change that would invalidate them (mode away from `Both`,
//! new drag range).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Offsets closer to zero than this count as closed (guards float noise
/// from settle arithmetic, not exact zero).
pub const CLOSED_EPSILON: f32 = 0.0009;

/// Which side(s) the pane may open toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// The pane slides right, opening from the left.
    Left,
    /// The pane slides left, opening from the right.
    #[default]
    Right,
    /// Either direction.
    Both,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Both => "Both",
        })
    }
}

/// Restore rejects unknown mode names rather than defaulting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pane mode: {0:?}")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Left" => Ok(Self::Left),
            "Right" => Ok(Self::Right),
            "Both" => Ok(Self::Both),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Live drag state of the pane. One instance per container; mutated only by
/// the drag controller and the container's lifecycle hooks.
#[derive(Debug, Clone)]
pub struct PaneState {
    /// Open direction policy.
    pub mode: Mode,
    /// Maximum horizontal travel in pixels; 0 disables dragging.
    pub drag_range: i32,
    /// Live horizontal offset from the rest-closed position.
    pub current_left: i32,
    /// `current_left / drag_range`, sign encodes side. 0 when range is 0.
    pub offset: f32,
    /// Whether a drag gesture alone may open the pane.
    pub drag_openable: bool,
    /// Last settled open/closed intent; survives detach/reattach.
    pub preserved_open_state: bool,
    /// Truncated rest offset (-1, 0, +1): the side last open in `Both` mode.
    pub both_mode_offset_state: i32,
    /// Forces a one-time snap to the preserved state on the next layout.
    pub first_layout: bool,
}

impl Default for PaneState {
    fn default() -> Self {
        Self {
            mode: Mode::Right,
            drag_range: 0,
            current_left: 0,
            offset: 0.0,
            drag_openable: true,
            preserved_open_state: false,
            both_mode_offset_state: 0,
            first_layout: true,
        }
    }
}

impl PaneState {
    /// Clamp a proposed horizontal offset to the mode's travel interval.
    #[must_use]
    pub fn clamp_left(&self, proposed: i32) -> i32 {
        match self.mode {
            Mode::Right => proposed.clamp(-self.drag_range, 0),
            Mode::Left => proposed.clamp(0, self.drag_range),
            Mode::Both => proposed.clamp(-self.drag_range, self.drag_range),
        }
    }

    /// Accept a new horizontal offset and rederive `offset`.
    pub fn set_current_left(&mut self, left: i32) {
        self.current_left = left;
        self.offset = if self.drag_range > 0 {
            left as f32 / self.drag_range as f32
        } else {
            0.0
        };
    }

    /// Whether the pane is at (or indistinguishably near) its closed rest.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.offset.abs() < CLOSED_EPSILON
    }

    /// Whether the pane is fully open on either side.
    #[inline]
    #[must_use]
    pub fn is_opened(&self) -> bool {
        self.offset.abs().round() == 1.0
    }
}
