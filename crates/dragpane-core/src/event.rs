#![forbid(unsafe_code)]

//! Canonical touch event types.
//!
//! The host framework normalizes its raw pointer input into [`TouchEvent`]
//! values before feeding the engine. Coordinates are container-local pixels;
//! each event carries the timestamp the host observed it at, so velocity
//! estimation and settle timing stay deterministic under test.

use bitflags::bitflags;
use web_time::Instant;

/// What a pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    /// Primary pointer went down.
    Down,
    /// Pointer moved while down.
    Move,
    /// Pointer lifted; the gesture completes normally.
    Up,
    /// The gesture was taken away (e.g. by the host); abort without release
    /// semantics.
    Cancel,
}

bitflags! {
    /// Container edges a gesture may originate from.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EdgeFlags: u8 {
        const LEFT   = 1 << 0;
        const RIGHT  = 1 << 1;
        const TOP    = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

/// A single normalized touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// What happened.
    pub action: TouchAction,
    /// Horizontal position in container-local pixels.
    pub x: f32,
    /// Vertical position in container-local pixels.
    pub y: f32,
    /// Host-assigned pointer id. Single-touch containers pass 0.
    pub pointer_id: i32,
    /// When the host observed the event.
    pub time: Instant,
}

impl TouchEvent {
    /// Create an event with pointer id 0.
    #[must_use]
    pub const fn new(action: TouchAction, x: f32, y: f32, time: Instant) -> Self {
        Self {
            action,
            x,
            y,
            pointer_id: 0,
            time,
        }
    }

    /// A `Down` event at `(x, y)`.
    #[must_use]
    pub const fn down(x: f32, y: f32, time: Instant) -> Self {
        Self::new(TouchAction::Down, x, y, time)
    }

    /// A `Move` event at `(x, y)`.
    #[must_use]
    pub const fn moved(x: f32, y: f32, time: Instant) -> Self {
        Self::new(TouchAction::Move, x, y, time)
    }

    /// An `Up` event at `(x, y)`.
    #[must_use]
    pub const fn up(x: f32, y: f32, time: Instant) -> Self {
        Self::new(TouchAction::Up, x, y, time)
    }

    /// A `Cancel` event at `(x, y)`.
    #[must_use]
    pub const fn cancel(x: f32, y: f32, time: Instant) -> Self {
        Self::new(TouchAction::Cancel, x, y, time)
    }

    /// Set the pointer id (builder pattern).
    #[must_use]
    pub const fn with_pointer(mut self, pointer_id: i32) -> Self {
        self.pointer_id = pointer_id;
        self
    }
}
