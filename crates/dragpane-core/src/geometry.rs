#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle in container pixel coordinates (origin at top-left).
///
/// Used for pane bounds and touch hit testing. Positions may be negative: a
/// pane dragged past its rest position has a negative `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    #[must_use]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Left edge (alias for x).
    #[inline]
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a touch point is inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && x < self.right() as f32
            && y >= self.y as f32
            && y < self.bottom() as f32
    }

    /// The rectangle translated by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}
