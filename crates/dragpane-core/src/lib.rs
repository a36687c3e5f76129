#![forbid(unsafe_code)]

//! Core: touch events, velocity estimation, and the drag/settle state machine.
//!
//! # Role in dragpane
//! `dragpane-core` is the input layer. It owns the gesture-side state machine
//! that turns normalized touch events into capture decisions, clamped
//! position updates, velocity-tagged releases, and settle-animation ticks.
//!
//! # Primary responsibilities
//! - **TouchEvent**: canonical pointer events (down, move, up, cancel).
//! - **VelocityTracker**: windowed velocity estimation for fling decisions.
//! - **SettleScroller**: resumable eased slide toward a rest position.
//! - **DragEngine**: the capture/drag/release/settle state machine, talking
//!   to its host through the [`engine::DragCallback`] contract.
//!
//! # How it fits in the system
//! The container crate (`dragpane-layout`) implements `DragCallback` and
//! feeds this engine from the host's event loop. The engine never renders
//! and never owns pane state; it only proposes positions and reports
//! transitions.

pub mod engine;
pub mod event;
pub mod geometry;
pub mod settle;
pub mod velocity;

pub use engine::{DragCallback, DragEngine, DragEngineConfig, DragState};
pub use event::{EdgeFlags, TouchAction, TouchEvent};
pub use geometry::Rect;
pub use settle::SettleScroller;
pub use velocity::VelocityTracker;
