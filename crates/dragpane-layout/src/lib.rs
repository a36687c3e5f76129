#![forbid(unsafe_code)]

//! Draggable side-pane container.
//!
//! A [`DragPaneLayout`] hosts a primary pane that slides horizontally open
//! under a drag gesture or a programmatic command, plus an optional
//! secondary pane and dimming overlay whose visuals follow the pane's
//! normalized offset. The gesture state machine itself lives in
//! `dragpane-core`; this crate binds it to pane state, mode policy
//! ([`Mode::Left`] / [`Mode::Right`] / [`Mode::Both`]), release snapping,
//! visual transforms, and save/restore.
//!
//! # Quick start
//!
//! ```
//! use dragpane_core::{Rect, TouchEvent};
//! use dragpane_layout::{DragPaneLayout, Mode, PaneEvent};
//! use web_time::Instant;
//!
//! let mut layout = DragPaneLayout::new();
//! layout.set_drag_pane(Some(Rect::new(0, 0, 300, 600)));
//! layout.set_drag_range(120, Instant::now());
//!
//! let mut now = Instant::now();
//! layout.on_layout(Rect::from_size(300, 600), now);
//! layout.open_pane(now);
//! while layout.compute_scroll(now) {
//!     now += std::time::Duration::from_millis(16);
//! }
//! assert!(layout.is_opened());
//! assert!(matches!(
//!     layout.drain_events().last(),
//!     Some(PaneEvent::Opened { .. })
//! ));
//! ```

pub mod controller;
pub mod layout;
pub mod persist;
pub mod state;
pub mod transform;

pub use controller::{DragController, PaneEvent, settle_target};
pub use layout::DragPaneLayout;
pub use persist::SavedState;
pub use state::{CLOSED_EPSILON, Mode, PaneState, ParseModeError};
pub use transform::{
    DEFAULT_MIN_SCALE, OVERLAY_CLOSED, OVERLAY_OPEN, PaneTransform, SecondaryTransform,
    TransformEngine, lerp_argb,
};
