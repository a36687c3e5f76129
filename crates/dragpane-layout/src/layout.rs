#![forbid(unsafe_code)]

//! The draggable side-pane container.
//!
//! [`DragPaneLayout`] hosts a primary drag pane that slides horizontally out
//! of the container, revealing a secondary pane and a dimming background.
//! The host framework owns measurement and rendering; it feeds this
//! container normalized touch events, calls [`on_layout`]
//! (DragPaneLayout::on_layout) after each layout pass, ticks
//! [`compute_scroll`](DragPaneLayout::compute_scroll) from its frame
//! scheduler while it returns `true`, and reads back pane bounds and
//! [`PaneTransform`] to draw.
//!
//! # Event pipeline
//!
//! Notifications flow through two explicit stages: the transform stage
//! consumes every `Dragged` synchronously (recomputing the visual
//! parameters), then all events land in an outbound queue the application
//! drains with [`drain_events`](DragPaneLayout::drain_events). Subscribers
//! therefore never run inside a mutation and may call back into the
//! container freely.
//!
//! # Ordering guarantees
//!
//! `Dragged` events arrive in strict chronological order; exactly one
//! `Opened` or `Closed` is delivered per completed settle; a cancelled
//! gesture or aborted settle delivers neither.

use std::collections::VecDeque;

use dragpane_core::{DragEngine, DragEngineConfig, Rect, TouchAction, TouchEvent};
use tracing::debug;
use web_time::Instant;

use crate::controller::{DragController, PaneEvent};
use crate::persist::SavedState;
use crate::state::Mode;
use crate::transform::{PaneTransform, TransformEngine};

/// Vertical travel (dp) beyond which a closed container lets ancestor
/// scrollables steal the gesture.
const ANCESTOR_INTERCEPT_MAX_Y: f32 = 20.0;

/// A container whose primary pane can be dragged horizontally open.
#[derive(Debug)]
pub struct DragPaneLayout {
    engine: DragEngine,
    controller: DragController,
    transform: TransformEngine,
    last_transform: PaneTransform,
    bounds: Rect,
    drag_range_ratio: Option<f32>,
    allow_ancestor_intercept: bool,
    last_touch_y: f32,
    out_events: VecDeque<PaneEvent>,
}

impl Default for DragPaneLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl DragPaneLayout {
    /// Create a container with default gesture thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DragEngineConfig::default())
    }

    /// Create a container with explicit gesture thresholds (touch slop,
    /// fling floor, edge size, display density).
    #[must_use]
    pub fn with_config(config: DragEngineConfig) -> Self {
        let transform = TransformEngine::default();
        let last_transform = transform.compute(0.0);
        Self {
            engine: DragEngine::new(config),
            controller: DragController::new(),
            transform,
            last_transform,
            bounds: Rect::default(),
            drag_range_ratio: None,
            allow_ancestor_intercept: false,
            last_touch_y: 0.0,
            out_events: VecDeque::new(),
        }
    }

    // -- configuration ------------------------------------------------------

    /// Set (or clear) the drag pane by its rest bounds: where the pane sits
    /// when closed. Aborts any in-flight gesture or settle first.
    pub fn set_drag_pane(&mut self, pane: Option<Rect>) {
        self.engine.abort();
        self.controller.set_pane(pane);
    }

    /// Set (or clear) the secondary pane by its measured width.
    pub fn set_secondary_pane(&mut self, width: Option<i32>) {
        self.transform.set_secondary_width(width);
        self.last_transform = self.transform.compute(self.controller.state.offset);
    }

    /// Set the drag pane's fully-open scale (default 0.8).
    pub fn set_min_scale(&mut self, min_scale: f32) {
        self.transform.set_min_scale(min_scale);
        self.last_transform = self.transform.compute(self.controller.state.offset);
    }

    /// Change the open direction policy. Leaving [`Mode::Both`] closes the
    /// pane first; Left↔Right while closed is a pure state change.
    pub fn set_mode(&mut self, mode: Mode, now: Instant) {
        if self.controller.state.mode == mode {
            return;
        }
        if mode != Mode::Both {
            self.close_pane(now);
        }
        debug!(%mode, "pane mode changed");
        self.controller.state.mode = mode;
    }

    /// Change the maximum travel in pixels. Closes the pane first so no
    /// stale offset math survives the change.
    pub fn set_drag_range(&mut self, drag_range: i32, now: Instant) {
        if self.controller.state.drag_range == drag_range {
            return;
        }
        self.close_pane(now);
        self.controller.state.drag_range = drag_range.max(0);
    }

    /// Express the drag range as a fraction of the container width,
    /// recomputed on every layout pass.
    pub fn set_drag_range_ratio(&mut self, ratio: f32, now: Instant) {
        let ratio = ratio.clamp(0.0, 1.0);
        self.drag_range_ratio = Some(ratio);
        if self.bounds.width > 0 {
            self.set_drag_range((ratio * self.bounds.width as f32) as i32, now);
        }
    }

    /// Allow or forbid opening the pane by drag. Programmatic
    /// [`open_pane`](Self::open_pane) always works.
    pub fn set_drag_openable(&mut self, openable: bool) {
        self.controller.state.drag_openable = openable;
    }

    // -- queries ------------------------------------------------------------

    /// Whether a drag gesture may open the pane.
    #[must_use]
    pub fn is_drag_openable(&self) -> bool {
        self.controller.state.drag_openable
    }

    /// Current open direction policy.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.controller.state.mode
    }

    /// Current maximum travel in pixels.
    #[must_use]
    pub fn drag_range(&self) -> i32 {
        self.controller.state.drag_range
    }

    /// Configured width fraction, when the drag range tracks the container
    /// width; `None` when the range was set absolutely.
    #[must_use]
    pub fn drag_range_ratio(&self) -> Option<f32> {
        self.drag_range_ratio
    }

    /// Live normalized offset: `Right` ∈ [-1, 0], `Left` ∈ [0, 1],
    /// `Both` ∈ [-1, 1].
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.controller.state.offset
    }

    /// Whether the pane is fully open.
    #[must_use]
    pub fn is_opened(&self) -> bool {
        self.controller.state.is_opened()
    }

    /// Whether the pane is closed (within float-noise tolerance).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.controller.state.is_closed()
    }

    /// Live on-screen bounds of the drag pane, for hit testing and drawing.
    #[must_use]
    pub fn drag_pane_bounds(&self) -> Option<Rect> {
        use dragpane_core::DragCallback as _;
        self.controller.pane_bounds()
    }

    /// Visual parameters for the current offset.
    #[must_use]
    pub fn transform(&self) -> PaneTransform {
        self.last_transform
    }

    /// Whether a vertically-scrolling ancestor may steal the gesture right
    /// now. Only true once vertical travel exceeds the threshold while the
    /// pane is closed.
    #[must_use]
    pub fn ancestor_intercept_allowed(&self) -> bool {
        self.allow_ancestor_intercept
    }

    /// Take every pending notification, oldest first.
    pub fn drain_events(&mut self) -> Vec<PaneEvent> {
        self.out_events.drain(..).collect()
    }

    // -- commands -----------------------------------------------------------

    /// Animate the pane to its open rest position. No-op without a pane.
    ///
    /// In `Both` mode the first layout after a restore reopens the side the
    /// snapshot remembered; otherwise `Both` defaults to the right-mode
    /// direction.
    pub fn open_pane(&mut self, now: Instant) {
        let Some(rest) = self.controller.pane_rest() else {
            return;
        };
        let state = &self.controller.state;
        let target = match state.mode {
            Mode::Left => state.drag_range,
            Mode::Both if state.first_layout => state.both_mode_offset_state * state.drag_range,
            Mode::Right | Mode::Both => -state.drag_range,
        };
        debug!(target, "open pane");
        self.engine
            .smooth_slide_to(rest.left() + target, rest.top(), &mut self.controller, now);
        self.dispatch();
    }

    /// Animate the pane closed. No-op without a pane or when already closed.
    pub fn close_pane(&mut self, now: Instant) {
        let Some(rest) = self.controller.pane_rest() else {
            return;
        };
        if self.controller.state.is_closed() {
            return;
        }
        debug!("close pane");
        self.engine
            .smooth_slide_to(rest.left(), rest.top(), &mut self.controller, now);
        self.dispatch();
    }

    // -- input --------------------------------------------------------------

    /// Pre-dispatch phase: should the container claim this touch instead of
    /// delivering it to the pane's children?
    pub fn on_intercept_touch_event(&mut self, ev: &TouchEvent) -> bool {
        if !self.controller.state.drag_openable && self.is_closed() {
            return false;
        }
        if matches!(ev.action, TouchAction::Up | TouchAction::Cancel) {
            self.engine.cancel();
            return false;
        }
        // Touches on a non-closed pane belong to the container, not the
        // pane's children.
        let on_open_pane = !self.is_closed()
            && self
                .drag_pane_bounds()
                .is_some_and(|b| b.contains(ev.x, ev.y));
        let intercept =
            self.engine.should_intercept_touch(ev, &mut self.controller) || on_open_pane;
        self.dispatch();
        intercept
    }

    /// Main dispatch phase: feed a claimed gesture's events.
    ///
    /// Returns `false` when the container ignores the stream entirely
    /// (drag-opening disabled while closed), so the host passes the events
    /// through untouched.
    pub fn on_touch_event(&mut self, ev: &TouchEvent) -> bool {
        if !self.controller.state.drag_openable && self.is_closed() {
            return false;
        }
        match ev.action {
            TouchAction::Down => {
                self.last_touch_y = ev.y;
                self.allow_ancestor_intercept = false;
            }
            TouchAction::Move => {
                let dy = ev.y - self.last_touch_y;
                let threshold = ANCESTOR_INTERCEPT_MAX_Y * self.engine.config().density;
                self.allow_ancestor_intercept = dy.abs() >= threshold && self.is_closed();
                self.last_touch_y = ev.y;
            }
            TouchAction::Up | TouchAction::Cancel => {}
        }
        self.engine.process_touch(ev, &mut self.controller);
        self.dispatch();
        true
    }

    /// Advance an in-flight settle. Call once per frame while it returns
    /// `true` (the "invalidate" loop).
    pub fn compute_scroll(&mut self, now: Instant) -> bool {
        let more = self.engine.continue_settling(&mut self.controller, now);
        self.dispatch();
        more
    }

    // -- lifecycle ----------------------------------------------------------

    /// The host laid the container out. A changed width redeclares the first
    /// layout; the first layout after attach/restore snaps the pane to its
    /// preserved state.
    pub fn on_layout(&mut self, bounds: Rect, now: Instant) {
        if bounds.width != self.bounds.width {
            self.controller.state.first_layout = true;
        }
        self.bounds = bounds;
        self.engine.set_bounds(bounds);
        if let Some(ratio) = self.drag_range_ratio {
            self.set_drag_range((ratio * bounds.width as f32) as i32, now);
        }
        if self.controller.state.first_layout {
            if self.controller.state.preserved_open_state {
                self.open_pane(now);
            } else {
                self.close_pane(now);
            }
            self.controller.state.first_layout = false;
        }
    }

    /// The container joined a window; the next layout re-applies the
    /// preserved state.
    pub fn on_attached_to_window(&mut self) {
        self.controller.state.first_layout = true;
    }

    /// The container left its window.
    pub fn on_detached_from_window(&mut self) {
        self.controller.state.first_layout = true;
    }

    // -- persistence --------------------------------------------------------

    /// Snapshot the state that survives destroy/recreate.
    #[must_use]
    pub fn save_state(&self) -> SavedState {
        SavedState::capture(&self.controller.state)
    }

    /// Seed a fresh container from a snapshot.
    ///
    /// Never animates: the open/close motion is deferred to the first-layout
    /// rule, once the container has real bounds. The mode setter's
    /// close-first side effect has nothing to do on a fresh instance, so the
    /// fields are applied directly.
    pub fn restore_state(&mut self, ss: &SavedState) {
        debug!(?ss, "restore state");
        let state = &mut self.controller.state;
        state.mode = ss.mode;
        state.drag_openable = ss.is_drag_openable;
        state.preserved_open_state = ss.is_open;
        state.both_mode_offset_state = ss.both_mode_offset_state;
        state.drag_range = ss.drag_range;
        state.first_layout = true;
    }

    // -- internals ----------------------------------------------------------

    /// Two-stage notification pipeline: the transform stage consumes every
    /// `Dragged`, then events enter the outbound queue.
    fn dispatch(&mut self) {
        for event in self.controller.take_events() {
            if let PaneEvent::Dragged { offset, .. } = event {
                self.last_transform = self.transform.compute(offset);
            }
            self.out_events.push_back(event);
        }
    }
}
