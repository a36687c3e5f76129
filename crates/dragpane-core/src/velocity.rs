#![forbid(unsafe_code)]

//! Windowed pointer velocity estimation.
//!
//! Tracks recent `(position, time)` samples and estimates release velocity
//! over a fixed look-back window. Samples older than the window are ignored,
//! so a drag that pauses before lifting reports zero velocity rather than
//! the speed of its earlier motion.
//!
//! # Invariants
//!
//! 1. `velocity(now)` only considers samples within [`SAMPLE_WINDOW`] of
//!    `now`.
//! 2. Fewer than two usable samples yield `(0.0, 0.0)`.
//! 3. `clear()` returns the tracker to its initial empty state.
//!
//! # Failure Modes
//!
//! - Two samples with identical timestamps: the pair is skipped (no division
//!   by zero); if no other pair exists, velocity is zero.

use std::time::Duration;

use web_time::Instant;

/// Look-back window for velocity estimation (100ms).
pub const SAMPLE_WINDOW: Duration = Duration::from_millis(100);

/// Maximum retained samples. Old samples beyond the window are dropped on
/// insertion, so the buffer stays small even for long drags.
const MAX_SAMPLES: usize = 20;

#[derive(Debug, Clone, Copy)]
struct Sample {
    x: f32,
    y: f32,
    time: Instant,
}

/// Estimates pointer velocity from recent motion samples.
#[derive(Debug, Default)]
pub struct VelocityTracker {
    samples: Vec<Sample>,
}

impl VelocityTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            samples: Vec::with_capacity(MAX_SAMPLES),
        }
    }

    /// Record a pointer position at `time`.
    pub fn add_sample(&mut self, x: f32, y: f32, time: Instant) {
        // Drop samples that have aged out of the window.
        self.samples
            .retain(|s| time.duration_since(s.time) <= SAMPLE_WINDOW);
        if self.samples.len() == MAX_SAMPLES {
            self.samples.remove(0);
        }
        self.samples.push(Sample { x, y, time });
    }

    /// Discard all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Estimate `(vx, vy)` in pixels per second at `now`.
    ///
    /// Uses the oldest and newest samples inside the look-back window.
    #[must_use]
    pub fn velocity(&self, now: Instant) -> (f32, f32) {
        let mut in_window = self
            .samples
            .iter()
            .filter(|s| now.duration_since(s.time) <= SAMPLE_WINDOW);
        let Some(first) = in_window.next() else {
            return (0.0, 0.0);
        };
        let Some(last) = in_window.last() else {
            return (0.0, 0.0);
        };
        let dt = last.time.duration_since(first.time).as_secs_f32();
        if dt <= f32::EPSILON {
            return (0.0, 0.0);
        }
        ((last.x - first.x) / dt, (last.y - first.y) / dt)
    }
}
