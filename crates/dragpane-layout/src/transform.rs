#![forbid(unsafe_code)]

//! Offset-driven visual transform.
//!
//! A pure, stateless mapping from `|offset|` to the visual parameters of the
//! three surfaces: the drag pane shrinks toward a minimum scale, the
//! secondary pane slides in from half-hidden while growing, and a dimming
//! overlay fades out. Recomputed on every `Dragged` notification; the host
//! applies the result however its renderer represents scale, translation,
//! and tint.
//!
//! The formulas and constants are part of the container's visual contract
//! and are reproduced exactly, including the per-channel integer truncation
//! of the overlay interpolation and the secondary pane's scale curve being
//! based at the drag pane's minimum scale (intentional: it keeps the two
//! scale curves parallel).

/// Default minimum scale of the drag pane when fully open.
pub const DEFAULT_MIN_SCALE: f32 = 0.8;

/// Overlay at rest-closed: semi-transparent black.
pub const OVERLAY_CLOSED: u32 = 0x9900_0000;

/// Overlay at fully open: transparent.
pub const OVERLAY_OPEN: u32 = 0x0000_0000;

/// Transform of the secondary pane, when one is configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondaryTransform {
    /// Horizontal translation in pixels: half the pane's width when the drag
    /// pane is closed, 0 when fully open.
    pub translate_x: f32,
    /// Uniform scale.
    pub scale: f32,
}

/// Visual parameters for one offset, for up to three surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneTransform {
    /// Uniform scale of the drag pane: 1.0 closed, `min_scale` open.
    pub drag_pane_scale: f32,
    /// Secondary pane parameters; `None` when no secondary pane is set.
    pub secondary: Option<SecondaryTransform>,
    /// ARGB tint for the container background, if it has one.
    pub overlay_argb: u32,
}

/// Computes [`PaneTransform`]s from normalized offsets.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    min_scale: f32,
    secondary_width: Option<i32>,
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            secondary_width: None,
        }
    }
}

impl TransformEngine {
    /// Set the drag pane's fully-open scale.
    pub fn set_min_scale(&mut self, min_scale: f32) {
        self.min_scale = min_scale;
    }

    /// The drag pane's fully-open scale.
    #[inline]
    #[must_use]
    pub const fn min_scale(&self) -> f32 {
        self.min_scale
    }

    /// Configure (or remove) the secondary pane by its measured width.
    pub fn set_secondary_width(&mut self, width: Option<i32>) {
        self.secondary_width = width;
    }

    /// Map a signed offset to visual parameters.
    #[must_use]
    pub fn compute(&self, offset: f32) -> PaneTransform {
        let abs = offset.abs();
        let secondary = self.secondary_width.map(|width| SecondaryTransform {
            translate_x: (width / 2) as f32 * (1.0 - abs),
            scale: 0.2 * abs + self.min_scale,
        });
        PaneTransform {
            drag_pane_scale: (self.min_scale - 1.0) * abs + 1.0,
            secondary,
            overlay_argb: lerp_argb(abs, OVERLAY_CLOSED, OVERLAY_OPEN),
        }
    }
}

/// Per-channel linear interpolation between two ARGB colors.
///
/// Each channel moves by `trunc(fraction * delta)`; the truncation (not
/// rounding) is part of the contract.
#[must_use]
pub fn lerp_argb(fraction: f32, start: u32, end: u32) -> u32 {
    let channel = |shift: u32| {
        let s = ((start >> shift) & 0xff) as i32;
        let e = ((end >> shift) & 0xff) as i32;
        (s + (fraction * (e - s) as f32) as i32) as u32
    };
    (channel(24) << 24) | (channel(16) << 16) | (channel(8) << 8) | channel(0)
}
