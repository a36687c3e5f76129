#![forbid(unsafe_code)]

//! Drag engine: the capture/drag/release/settle state machine.
//!
//! [`DragEngine`] consumes normalized [`TouchEvent`]s and talks to its host
//! through the [`DragCallback`] contract: the host decides what may be
//! captured, clamps proposed positions, receives position updates, and picks
//! the rest position a released pane settles to.
//!
//! # State Machine
//!
//! Three states, reported through `on_drag_state_changed`:
//!
//! - **Idle**: no pointer owns the pane and no settle is running.
//! - **Dragging**: a pointer has captured the pane; every move proposes a
//!   clamped position update.
//! - **Settling**: an eased slide toward a rest position is in progress,
//!   ticked by [`continue_settling`](DragEngine::continue_settling).
//!
//! # Invariants
//!
//! 1. Position updates are only delivered between capture and release (or
//!    during a settle); never while Idle.
//! 2. Release velocity below the minimum fling threshold is reported as
//!    exactly `0.0`, so position-based snap decisions see an unambiguous
//!    zero.
//! 3. `cancel()` and `abort()` return to Idle *silently*: no state-changed
//!    notification, no settled notification downstream.
//! 4. A new pointer going down during a settle aborts the settle only if it
//!    captures the pane; otherwise the settle keeps running.
//! 5. `on_edge_drag_started` fires at most once per gesture.
//!
//! # Failure Modes
//!
//! - No pane configured (`pane_bounds()` returns `None`): nothing is ever
//!   captured; events pass through without effect.
//! - Move events before any Down: ignored.

use tracing::{debug, trace};
use web_time::Instant;

use crate::event::{EdgeFlags, TouchAction, TouchEvent};
use crate::geometry::Rect;
use crate::settle::SettleScroller;
use crate::velocity::VelocityTracker;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for drag detection, in density-independent units where noted.
#[derive(Debug, Clone)]
pub struct DragEngineConfig {
    /// Minimum travel (px) before an uncaptured pointer starts a drag.
    pub touch_slop: f32,
    /// Minimum release speed (dp/s) treated as a fling; slower releases are
    /// reported with zero velocity. Default 400, the conventional fling
    /// floor.
    pub min_fling_velocity: f32,
    /// Width (dp) of the edge strips that start edge drags.
    pub edge_size: f32,
    /// Display density multiplier applied to dp-denominated thresholds.
    pub density: f32,
}

impl Default for DragEngineConfig {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            min_fling_velocity: 400.0,
            edge_size: 20.0,
            density: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Motion state of the drag pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// At rest; no gesture or animation owns the pane.
    #[default]
    Idle,
    /// A pointer is actively dragging the pane.
    Dragging,
    /// A settle animation is sliding the pane to a rest position.
    Settling,
}

/// What the host must provide for the engine to drive a drag.
///
/// The original helper-style APIs let these hooks call back into the engine
/// (settling from inside the release hook, capturing from inside the edge
/// hook). Here those cycles are return values instead: `on_released` returns
/// the settle target and `on_edge_drag_started` returns a capture directive.
pub trait DragCallback {
    /// May `pointer_id` capture the drag pane right now?
    fn try_capture(&mut self, pointer_id: i32) -> bool;

    /// Live on-screen bounds of the drag pane, or `None` if no pane is
    /// configured.
    fn pane_bounds(&self) -> Option<Rect>;

    /// Clamp a proposed horizontal position. `dx` is the motion that
    /// produced the proposal.
    fn clamp_horizontal(&mut self, proposed_left: i32, dx: i32) -> i32;

    /// Clamp a proposed vertical position. Containers that never move the
    /// pane vertically return the current top unchanged.
    fn clamp_vertical(&mut self, proposed_top: i32, dy: i32) -> i32;

    /// The pane moved to `(left, top)`; `(dx, dy)` is the accepted delta.
    /// Fires for both drag motion and settle ticks.
    fn on_position_changed(&mut self, left: i32, top: i32, dx: i32, dy: i32);

    /// The pointer released with the given velocity (px/s; sub-fling speeds
    /// arrive as exactly zero). Return the rest position to settle to, or
    /// `None` to stay put.
    fn on_released(&mut self, velocity_x: f32, velocity_y: f32) -> Option<(i32, i32)>;

    /// The engine transitioned between Idle/Dragging/Settling.
    fn on_drag_state_changed(&mut self, state: DragState);

    /// A drag started from a container edge. Return `true` to force-capture
    /// the drag pane for that pointer.
    fn on_edge_drag_started(&mut self, edges: EdgeFlags, pointer_id: i32) -> bool;
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The drag/settle state machine.
///
/// Feed it every touch event via [`process_touch`](Self::process_touch)
/// (and optionally consult [`should_intercept_touch`]
/// (Self::should_intercept_touch) in the host's pre-dispatch phase), then
/// tick [`continue_settling`](Self::continue_settling) from the frame
/// scheduler while it returns `true`.
#[derive(Debug)]
pub struct DragEngine {
    config: DragEngineConfig,
    state: DragState,
    bounds: Rect,

    active_pointer: Option<i32>,
    down_x: f32,
    down_y: f32,
    last_x: f32,
    last_y: f32,
    velocity: VelocityTracker,

    captured: bool,
    drag_left: i32,
    drag_top: i32,

    scroller: Option<SettleScroller>,

    edge_touch: EdgeFlags,
    edge_reported: bool,
}

impl DragEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: DragEngineConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
            bounds: Rect::default(),
            active_pointer: None,
            down_x: 0.0,
            down_y: 0.0,
            last_x: 0.0,
            last_y: 0.0,
            velocity: VelocityTracker::new(),
            captured: false,
            drag_left: 0,
            drag_top: 0,
            scroller: None,
            edge_touch: EdgeFlags::empty(),
            edge_reported: false,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn drag_state(&self) -> DragState {
        self.state
    }

    /// Whether a pointer currently owns the pane.
    #[inline]
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.captured
    }

    /// Update the container bounds used for edge detection.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &DragEngineConfig {
        &self.config
    }

    /// Slop/slope heuristic for the host's pre-dispatch phase.
    ///
    /// Returns `true` once the gesture should belong to the container:
    /// either the pane was captured directly, or an uncaptured pointer moved
    /// past the touch slop with horizontal dominance over a capturable
    /// start point.
    pub fn should_intercept_touch<C: DragCallback>(&mut self, ev: &TouchEvent, cb: &mut C) -> bool {
        match ev.action {
            TouchAction::Down => {
                self.begin_gesture(ev);
                // Touching a settling pane reclaims it immediately.
                if self.state == DragState::Settling && self.point_in_pane(cb, ev.x, ev.y) {
                    self.capture(cb, ev.pointer_id);
                }
                self.captured
            }
            TouchAction::Move => {
                if self.active_pointer != Some(ev.pointer_id) {
                    return false;
                }
                self.velocity.add_sample(ev.x, ev.y, ev.time);
                if !self.captured {
                    self.consider_capture(cb, ev);
                }
                self.last_x = ev.x;
                self.last_y = ev.y;
                self.captured
            }
            TouchAction::Up | TouchAction::Cancel => {
                self.cancel();
                false
            }
        }
    }

    /// Drive the gesture. The host forwards every event of a claimed gesture
    /// here.
    pub fn process_touch<C: DragCallback>(&mut self, ev: &TouchEvent, cb: &mut C) {
        match ev.action {
            TouchAction::Down => {
                self.begin_gesture(ev);
                if self.point_in_pane(cb, ev.x, ev.y) {
                    // A down on a settling pane aborts the slide and takes
                    // over; a down on a resting pane starts a drag.
                    self.capture(cb, ev.pointer_id);
                }
            }
            TouchAction::Move => {
                if self.active_pointer != Some(ev.pointer_id) {
                    return;
                }
                self.velocity.add_sample(ev.x, ev.y, ev.time);
                if self.captured {
                    self.drag_to(cb, ev.x, ev.y);
                } else {
                    self.consider_capture(cb, ev);
                }
                self.last_x = ev.x;
                self.last_y = ev.y;
            }
            TouchAction::Up => {
                if self.captured {
                    self.release(cb, ev.time);
                } else {
                    self.end_gesture();
                }
            }
            TouchAction::Cancel => self.cancel(),
        }
    }

    /// Abort any in-flight pointer gesture without a settled notification.
    ///
    /// A settle animation, if running, keeps running; use [`abort`]
    /// (Self::abort) to kill that too.
    pub fn cancel(&mut self) {
        self.end_gesture();
        if self.state == DragState::Dragging {
            debug!("drag cancelled");
            // Silent: a cancelled drag never reports a rest state.
            self.state = DragState::Idle;
        }
    }

    /// Abort everything: pointer gesture and settle animation, silently.
    pub fn abort(&mut self) {
        self.end_gesture();
        if self.scroller.take().is_some() || self.state != DragState::Idle {
            debug!("settle aborted");
            self.state = DragState::Idle;
        }
    }

    /// Start an animated slide of the pane to `(target_left, target_top)`.
    ///
    /// Returns `false` (and stays Idle) if the pane is missing or already at
    /// the target. On `true`, tick [`continue_settling`]
    /// (Self::continue_settling) until it reports rest.
    pub fn smooth_slide_to<C: DragCallback>(
        &mut self,
        target_left: i32,
        target_top: i32,
        cb: &mut C,
        now: Instant,
    ) -> bool {
        let Some(bounds) = cb.pane_bounds() else {
            return false;
        };
        self.end_gesture();
        self.drag_left = bounds.left();
        self.drag_top = bounds.top();
        if self.drag_left == target_left && self.drag_top == target_top {
            return false;
        }
        debug!(
            from = self.drag_left,
            to = target_left,
            "programmatic slide"
        );
        self.scroller = Some(SettleScroller::new(
            self.drag_left,
            self.drag_top,
            target_left,
            target_top,
            0.0,
            now,
        ));
        self.set_state(cb, DragState::Settling);
        true
    }

    /// Advance an in-flight settle. Returns `true` while another frame is
    /// needed; the host keeps scheduling ticks until it returns `false`.
    pub fn continue_settling<C: DragCallback>(&mut self, cb: &mut C, now: Instant) -> bool {
        if self.state != DragState::Settling {
            return false;
        }
        let Some(scroller) = self.scroller.clone() else {
            return false;
        };
        let (x, y) = scroller.position(now);
        if x != self.drag_left || y != self.drag_top {
            let dx = x - self.drag_left;
            let dy = y - self.drag_top;
            self.drag_left = x;
            self.drag_top = y;
            cb.on_position_changed(x, y, dx, dy);
        }
        if scroller.is_finished(now) {
            self.scroller = None;
            self.set_state(cb, DragState::Idle);
            return false;
        }
        true
    }

    // -- internals ----------------------------------------------------------

    fn begin_gesture(&mut self, ev: &TouchEvent) {
        self.active_pointer = Some(ev.pointer_id);
        self.down_x = ev.x;
        self.down_y = ev.y;
        self.last_x = ev.x;
        self.last_y = ev.y;
        self.velocity.clear();
        self.velocity.add_sample(ev.x, ev.y, ev.time);
        self.edge_touch = self.edges_at(ev.x, ev.y);
        self.edge_reported = false;
    }

    fn end_gesture(&mut self) {
        self.active_pointer = None;
        self.captured = false;
        self.velocity.clear();
        self.edge_touch = EdgeFlags::empty();
        self.edge_reported = false;
    }

    fn point_in_pane<C: DragCallback>(&self, cb: &C, x: f32, y: f32) -> bool {
        cb.pane_bounds().is_some_and(|b| b.contains(x, y))
    }

    /// Uncaptured pointer moved: start a drag once past the slop with
    /// horizontal dominance, honoring edge bindings first.
    fn consider_capture<C: DragCallback>(&mut self, cb: &mut C, ev: &TouchEvent) {
        let dx = ev.x - self.down_x;
        let dy = ev.y - self.down_y;
        if dx.abs() <= self.config.touch_slop || dx.abs() <= dy.abs() {
            return;
        }
        if !self.edge_touch.is_empty() && !self.edge_reported {
            self.edge_reported = true;
            trace!(edges = ?self.edge_touch, "edge drag started");
            if cb.on_edge_drag_started(self.edge_touch, ev.pointer_id) {
                self.capture(cb, ev.pointer_id);
                return;
            }
        }
        if self.point_in_pane(cb, self.down_x, self.down_y) {
            self.capture(cb, ev.pointer_id);
        }
    }

    fn capture<C: DragCallback>(&mut self, cb: &mut C, pointer_id: i32) {
        if !cb.try_capture(pointer_id) {
            return;
        }
        let Some(bounds) = cb.pane_bounds() else {
            return;
        };
        self.scroller = None;
        self.captured = true;
        self.active_pointer = Some(pointer_id);
        self.drag_left = bounds.left();
        self.drag_top = bounds.top();
        debug!(pointer_id, left = self.drag_left, "pane captured");
        self.set_state(cb, DragState::Dragging);
    }

    fn drag_to<C: DragCallback>(&mut self, cb: &mut C, x: f32, y: f32) {
        let dx = (x - self.last_x).round() as i32;
        let dy = (y - self.last_y).round() as i32;
        if dx == 0 && dy == 0 {
            return;
        }
        let new_left = cb.clamp_horizontal(self.drag_left + dx, dx);
        let new_top = cb.clamp_vertical(self.drag_top + dy, dy);
        if new_left != self.drag_left || new_top != self.drag_top {
            let adx = new_left - self.drag_left;
            let ady = new_top - self.drag_top;
            self.drag_left = new_left;
            self.drag_top = new_top;
            cb.on_position_changed(new_left, new_top, adx, ady);
        }
    }

    fn release<C: DragCallback>(&mut self, cb: &mut C, now: Instant) {
        let (mut vx, mut vy) = self.velocity.velocity(now);
        let min = self.config.min_fling_velocity * self.config.density;
        if vx.abs() < min {
            vx = 0.0;
        }
        if vy.abs() < min {
            vy = 0.0;
        }
        debug!(vx, vy, left = self.drag_left, "pane released");
        let target = cb.on_released(vx, vy);
        self.end_gesture();
        match target {
            Some((left, top)) if left != self.drag_left || top != self.drag_top => {
                self.scroller = Some(SettleScroller::new(
                    self.drag_left,
                    self.drag_top,
                    left,
                    top,
                    vx,
                    now,
                ));
                self.set_state(cb, DragState::Settling);
            }
            _ => self.set_state(cb, DragState::Idle),
        }
    }

    fn edges_at(&self, x: f32, y: f32) -> EdgeFlags {
        let mut edges = EdgeFlags::empty();
        if self.bounds.is_empty() {
            return edges;
        }
        let size = self.config.edge_size * self.config.density;
        if x < self.bounds.left() as f32 + size {
            edges |= EdgeFlags::LEFT;
        }
        if x >= self.bounds.right() as f32 - size {
            edges |= EdgeFlags::RIGHT;
        }
        if y < self.bounds.top() as f32 + size {
            edges |= EdgeFlags::TOP;
        }
        if y >= self.bounds.bottom() as f32 - size {
            edges |= EdgeFlags::BOTTOM;
        }
        edges
    }

    fn set_state<C: DragCallback>(&mut self, cb: &mut C, state: DragState) {
        if self.state != state {
            debug!(?state, "drag state changed");
            self.state = state;
            cb.on_drag_state_changed(state);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
