#![forbid(unsafe_code)]

//! Drag controller: mediates between the drag engine and pane state.
//!
//! Implements [`DragCallback`] over a [`PaneState`]: clamps proposed
//! positions to the mode's travel interval, derives the normalized offset on
//! every accepted move, decides the rest position a released pane settles
//! to, and fires the settled notification when motion reaches Idle.
//!
//! Notifications are never delivered re-entrantly: the controller queues
//! [`PaneEvent`]s and the container drains the queue after each engine call,
//! so a subscriber can safely call back into the container.
//!
//! # Invariants
//!
//! 1. `Dragged` events are queued in strict chronological order, one per
//!    accepted position change (drag motion and settle ticks alike).
//! 2. Exactly one `Opened` or `Closed` is queued per completed settle,
//!    decided by the offset at the moment the engine goes Idle.
//! 3. The drag pane's rest bounds are fixed; engine-facing absolute
//!    positions are always `rest.x + current_left`.

use std::collections::VecDeque;

use dragpane_core::{DragCallback, DragState, EdgeFlags, Rect};
use tracing::trace;

use crate::state::{Mode, PaneState};

/// Notification delivered to the embedding application.
///
/// Offset ranges per mode: `Right` ∈ [-1, 0], `Left` ∈ [0, 1],
/// `Both` ∈ [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaneEvent {
    /// The pane settled fully closed.
    Closed,
    /// The pane settled fully open.
    Opened {
        /// Open direction policy at the time of settling.
        mode: Mode,
        /// Rest offset; ±1.0 in practice.
        offset: f32,
    },
    /// The pane moved (gesture tick or settle tick).
    Dragged {
        /// Open direction policy.
        mode: Mode,
        /// Live normalized offset.
        offset: f32,
    },
}

/// Decide the rest position for a released pane.
///
/// A definite fling (`velocity_x` past the engine's minimum, so nonzero
/// here) wins outright; an ambiguous release (`velocity_x == 0`) falls back
/// to which side of the halfway point the pane sits on. In `Both` mode a
/// direction only commits if the pane is already on that side of center, so
/// a drag that never crossed the middle cannot jump to the opposite side.
#[must_use]
pub fn settle_target(
    mode: Mode,
    drag_range: i32,
    current_left: i32,
    offset: f32,
    velocity_x: f32,
) -> i32 {
    let mut final_left = 0;
    let moving_left = velocity_x < 0.0 || (velocity_x == 0.0 && offset < -0.5);
    let moving_right = velocity_x > 0.0 || (velocity_x == 0.0 && offset > 0.5);
    match mode {
        Mode::Right => {
            if moving_left {
                final_left -= drag_range;
            }
        }
        Mode::Left => {
            if moving_right {
                final_left += drag_range;
            }
        }
        Mode::Both => {
            if moving_left {
                if current_left < 0 {
                    final_left -= drag_range;
                }
            } else if moving_right && current_left > 0 {
                final_left += drag_range;
            }
        }
    }
    final_left
}

/// Owns the pane state and answers the engine's per-drag queries.
#[derive(Debug, Default)]
pub struct DragController {
    pub(crate) state: PaneState,
    /// Rest bounds of the drag pane (its position when closed), if any.
    pane: Option<Rect>,
    events: VecDeque<PaneEvent>,
}

impl DragController {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn pane_rest(&self) -> Option<Rect> {
        self.pane
    }

    pub(crate) fn set_pane(&mut self, pane: Option<Rect>) {
        self.pane = pane;
    }

    /// Take every queued notification, oldest first.
    pub(crate) fn take_events(&mut self) -> VecDeque<PaneEvent> {
        std::mem::take(&mut self.events)
    }

    fn rest_x(&self) -> i32 {
        self.pane.map_or(0, |p| p.left())
    }

    fn rest_y(&self) -> i32 {
        self.pane.map_or(0, |p| p.top())
    }
}

impl DragCallback for DragController {
    fn try_capture(&mut self, _pointer_id: i32) -> bool {
        // Single-pane container: capturable iff a drag pane is configured.
        self.pane.is_some()
    }

    fn pane_bounds(&self) -> Option<Rect> {
        self.pane.map(|p| p.offset(self.state.current_left, 0))
    }

    fn clamp_horizontal(&mut self, proposed_left: i32, _dx: i32) -> i32 {
        self.rest_x() + self.state.clamp_left(proposed_left - self.rest_x())
    }

    fn clamp_vertical(&mut self, _proposed_top: i32, _dy: i32) -> i32 {
        self.rest_y()
    }

    fn on_position_changed(&mut self, left: i32, _top: i32, _dx: i32, _dy: i32) {
        self.state.set_current_left(left - self.rest_x());
        trace!(
            current_left = self.state.current_left,
            offset = self.state.offset,
            "pane dragged"
        );
        self.events.push_back(PaneEvent::Dragged {
            mode: self.state.mode,
            offset: self.state.offset,
        });
    }

    fn on_released(&mut self, velocity_x: f32, _velocity_y: f32) -> Option<(i32, i32)> {
        let target = settle_target(
            self.state.mode,
            self.state.drag_range,
            self.state.current_left,
            self.state.offset,
            velocity_x,
        );
        Some((self.rest_x() + target, self.rest_y()))
    }

    fn on_drag_state_changed(&mut self, state: DragState) {
        if state != DragState::Idle {
            return;
        }
        if self.state.offset == 0.0 {
            self.state.preserved_open_state = false;
            self.events.push_back(PaneEvent::Closed);
        } else {
            self.state.preserved_open_state = true;
            if self.state.mode == Mode::Both {
                // Remember the side so reopening returns there.
                self.state.both_mode_offset_state = self.state.offset as i32;
            }
            self.events.push_back(PaneEvent::Opened {
                mode: self.state.mode,
                offset: self.state.offset,
            });
        }
    }

    fn on_edge_drag_started(&mut self, _edges: EdgeFlags, _pointer_id: i32) -> bool {
        // An edge drag always binds to the drag pane when one exists.
        self.pane.is_some()
    }
}
