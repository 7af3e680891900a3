//! Coordinate mapper: timeline-seconds ↔ pixel-space ↔ source-media-seconds.
//!
//! All functions here are pure. Display code may round pixel positions to
//! whole pixels, but inversion always goes through the unrounded math so
//! repeated conversions do not drift.

use serde::{Deserialize, Serialize};

/// Guard against sampling at or past a clip's trimmed-out tail
/// (just under half a frame at 120 fps).
pub const SAMPLE_EPSILON: f64 = 1.0 / 240.0;

/// Clamp that tolerates an inverted range by preferring `min`.
#[inline]
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Linear mapping between timeline seconds `[0, duration]` and track
/// pixels `[0, width]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    /// Total timeline duration in seconds.
    pub duration: f64,
    /// Track width in pixels at zoom 1.
    pub width: f64,
}

impl TimeScale {
    /// Create a new scale. Width and duration must both be positive.
    pub fn new(duration: f64, width: f64) -> Self {
        Self { duration, width }
    }

    /// Timeline seconds → pixels.
    #[inline]
    pub fn to_pixels(&self, seconds: f64) -> f64 {
        seconds / self.duration * self.width
    }

    /// Pixels → timeline seconds.
    #[inline]
    pub fn to_time(&self, pixels: f64) -> f64 {
        pixels / self.width * self.duration
    }
}

/// Zoom/pan transform over track pixel space.
///
/// `apply(p) = p * k + x`; the inverse recovers the untransformed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Zoom factor, > 0.
    pub k: f64,
    /// Horizontal pan in screen pixels.
    pub x: f64,
}

impl ViewTransform {
    /// No zoom, no pan.
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0 };

    /// Track pixel → screen pixel.
    #[inline]
    pub fn apply(&self, pixels: f64) -> f64 {
        pixels * self.k + self.x
    }

    /// Screen pixel → track pixel.
    #[inline]
    pub fn invert(&self, pixels: f64) -> f64 {
        (pixels - self.x) / self.k
    }
}

/// The temporal window a clip occupies: its placement on the timeline and
/// the trimmed region of its source content.
///
/// `bounded` distinguishes true media (trims clamped to the source length)
/// from generated content like flat color or text, which has a nominal
/// duration but no upper trim bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceWindow {
    pub timeline_start: f64,
    pub source_duration: f64,
    pub trim_start: f64,
    pub trim_end: f64,
    pub bounded: bool,
}

impl SourceWindow {
    /// Seconds of source content that survive trimming.
    #[inline]
    pub fn playable_duration(&self) -> f64 {
        self.source_duration - self.trim_start - self.trim_end
    }

    /// Exclusive end of the clip on the timeline.
    #[inline]
    pub fn timeline_end(&self) -> f64 {
        self.timeline_start + self.playable_duration()
    }

    /// Visibility rule: `timeline_start <= t < timeline_end`.
    #[inline]
    pub fn contains(&self, timeline_seconds: f64) -> bool {
        timeline_seconds >= self.timeline_start && timeline_seconds < self.timeline_end()
    }

    /// Map a playhead position to the source-media timestamp to decode.
    ///
    /// Clamped into the trimmed region; the upper bound backs off by
    /// [`SAMPLE_EPSILON`] so a playhead sitting exactly on the clip edge
    /// never requests a frame from the trimmed-out tail.
    pub fn source_timestamp(&self, playhead: f64) -> f64 {
        let raw = self.trim_start + (playhead - self.timeline_start);
        if self.bounded {
            let tail = self.source_duration - self.trim_end - SAMPLE_EPSILON;
            clamp(raw, self.trim_start, tail.max(self.trim_start))
        } else {
            raw.max(self.trim_start)
        }
    }
}
