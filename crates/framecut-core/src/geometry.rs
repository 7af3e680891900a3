//! Geometric primitives and the logical-canvas viewport fit.

use bytemuck::{Pod, Zeroable};
use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector.
pub type Vec2 = GlamVec2;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Minimum corner (top-left).
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Maximum corner (bottom-right).
    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// Size as a vector.
    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// A scale-to-fit mapping from logical canvas space into a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Uniform scale applied to logical coordinates.
    pub scale: f32,
    /// Offset that centers the scaled logical canvas in the container.
    pub offset: Vec2,
}

impl Viewport {
    /// Identity viewport (logical space == container space).
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
    };
}

/// Fit a logical canvas into a container, preserving aspect ratio.
///
/// Padding is subtracted from both sides of each axis before computing the
/// scale; when the container is smaller than the padding the full container
/// size is used instead so the scale stays positive.
pub fn fit_viewport(container: Vec2, logical: Vec2, padding: Vec2) -> Viewport {
    let available = container - padding * 2.0;
    let width_basis = if available.x > 0.0 {
        available.x
    } else {
        container.x
    };
    let height_basis = if available.y > 0.0 {
        available.y
    } else {
        container.y
    };

    let mut scale = (width_basis / logical.x).min(height_basis / logical.y);
    if !scale.is_finite() || scale <= 0.0 {
        scale = 1.0;
    }

    let effective = logical * scale;
    Viewport {
        scale,
        offset: (container - effective) * 0.5,
    }
}
