//! FrameCut Core - Foundation types for the compositing editor
//!
//! This crate provides the fundamental types used throughout FrameCut:
//! - Error types
//! - Geometric primitives and the logical-canvas viewport fit
//! - RGBA render surfaces
//! - The coordinate mapper (timeline-seconds ↔ pixels ↔ source-seconds)

pub mod error;
pub mod geometry;
pub mod mapper;
pub mod surface;

pub use error::{FramecutError, Result};
pub use geometry::{fit_viewport, Rect, Vec2, Viewport};
pub use mapper::{SourceWindow, TimeScale, ViewTransform, SAMPLE_EPSILON};
pub use surface::RenderSurface;

/// Logical canvas space all clip spatial coordinates are expressed in.
pub mod logical_bounds {
    /// Logical canvas width in pixels.
    pub const WIDTH: f32 = 1920.0;

    /// Logical canvas height in pixels.
    pub const HEIGHT: f32 = 1080.0;
}
