#![forbid(unsafe_code)]

//! Settle animation: a resumable eased slide toward a rest position.
//!
//! A [`SettleScroller`] captures everything a settle needs (start position,
//! target, start time, duration) as a value; the host's per-frame scheduler
//! re-invokes [`position`](SettleScroller::position) until
//! [`is_finished`](SettleScroller::is_finished) reports rest. There is no
//! internal clock: the caller passes `now`, keeping tests deterministic.
//!
//! # Invariants
//!
//! 1. `position(now)` is clamped to the segment between start and target.
//! 2. Once elapsed time reaches the duration, `position` returns exactly the
//!    target (no floating-point residue in the final rest position).
//! 3. A zero-distance settle is finished immediately.
//!
//! # Failure Modes
//!
//! - Zero or negative release velocity magnitude: the default duration is
//!   used; never a division fault.

use std::time::Duration;

use web_time::Instant;

/// Duration used when the release velocity is zero (position-based snap).
const DEFAULT_SETTLE: Duration = Duration::from_millis(256);

/// Upper bound on any settle duration.
const MAX_SETTLE: Duration = Duration::from_millis(600);

/// A time-bounded eased slide from a start position to a target.
#[derive(Debug, Clone)]
pub struct SettleScroller {
    start_x: i32,
    start_y: i32,
    target_x: i32,
    target_y: i32,
    start_time: Instant,
    duration: Duration,
}

impl SettleScroller {
    /// Begin a settle from `(start_x, start_y)` to `(target_x, target_y)`.
    ///
    /// `velocity_x` is the release velocity in px/s (0 for programmatic
    /// slides); faster releases settle sooner.
    #[must_use]
    pub fn new(
        start_x: i32,
        start_y: i32,
        target_x: i32,
        target_y: i32,
        velocity_x: f32,
        now: Instant,
    ) -> Self {
        let distance = (target_x - start_x).abs().max((target_y - start_y).abs());
        Self {
            start_x,
            start_y,
            target_x,
            target_y,
            start_time: now,
            duration: compute_duration(distance, velocity_x),
        }
    }

    /// The rest position this settle is heading to.
    #[inline]
    #[must_use]
    pub const fn target(&self) -> (i32, i32) {
        (self.target_x, self.target_y)
    }

    /// Current position at `now`, eased along the segment.
    #[must_use]
    pub fn position(&self, now: Instant) -> (i32, i32) {
        if self.is_finished(now) {
            return (self.target_x, self.target_y);
        }
        let elapsed = now.duration_since(self.start_time).as_secs_f32();
        let t = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        let f = ease_out_cubic(t);
        (
            lerp_px(self.start_x, self.target_x, f),
            lerp_px(self.start_y, self.target_y, f),
        )
    }

    /// Whether the settle has reached its duration.
    #[inline]
    #[must_use]
    pub fn is_finished(&self, now: Instant) -> bool {
        now.duration_since(self.start_time) >= self.duration
    }
}

/// Deceleration curve: fast start, smooth stop.
#[inline]
fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[inline]
fn lerp_px(start: i32, end: i32, f: f32) -> i32 {
    start + ((end - start) as f32 * f).round() as i32
}

/// Settle duration from travel distance and release speed, capped so slow
/// flings never produce a sluggish snap.
fn compute_duration(distance: i32, velocity_x: f32) -> Duration {
    if distance == 0 {
        return Duration::ZERO;
    }
    let speed = velocity_x.abs();
    if speed <= f32::EPSILON {
        return DEFAULT_SETTLE;
    }
    let secs = distance as f32 / speed;
    Duration::from_secs_f32(secs).min(MAX_SETTLE)
}
