//! Clip types: a placed, trimmed, positioned instance of content on the
//! timeline.

use framecut_core::SourceWindow;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::media_bin::MediaId;

/// Opaque unique key for a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(pub Uuid);

impl ClipId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether a clip's content has a finite source duration constraining its
/// trim range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemporalMode {
    /// True media: trims are clamped to the source duration.
    Bounded,
    /// Generated content (solid color, text): the nominal duration grows to
    /// accommodate any requested length.
    Unbounded,
}

/// Spatial transform of a clip on the logical canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipSpatial {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl ClipSpatial {
    /// Place content at the canvas origin at its natural size.
    pub fn at_natural_size(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            opacity: 1.0,
        }
    }
}

impl Default for ClipSpatial {
    fn default() -> Self {
        Self::at_natural_size(192, 108)
    }
}

/// A partial spatial update. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipSpatialPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    pub opacity: Option<f32>,
}

impl ClipSpatialPatch {
    /// Merge this patch into a spatial transform.
    pub fn apply_to(&self, spatial: &mut ClipSpatial) {
        if let Some(x) = self.x {
            spatial.x = x;
        }
        if let Some(y) = self.y {
            spatial.y = y;
        }
        if let Some(width) = self.width {
            spatial.width = width;
        }
        if let Some(height) = self.height {
            spatial.height = height;
        }
        if let Some(rotation) = self.rotation {
            spatial.rotation = rotation;
        }
        if let Some(scale_x) = self.scale_x {
            spatial.scale_x = scale_x;
        }
        if let Some(scale_y) = self.scale_y {
            spatial.scale_y = scale_y;
        }
        if let Some(opacity) = self.opacity {
            spatial.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// A patch that replaces every field.
    pub fn from_spatial(s: ClipSpatial) -> Self {
        Self {
            x: Some(s.x),
            y: Some(s.y),
            width: Some(s.width),
            height: Some(s.height),
            rotation: Some(s.rotation),
            scale_x: Some(s.scale_x),
            scale_y: Some(s.scale_y),
            opacity: Some(s.opacity),
        }
    }
}

/// Content carried by a clip. Each variant owns only the fields it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClipContent {
    /// Frames decoded from an uploaded video asset.
    Video {
        media_id: MediaId,
        /// Natural frame size, copied from the asset at clip creation.
        width: u32,
        height: u32,
    },
    /// A static uploaded image.
    Image {
        media_id: MediaId,
        width: u32,
        height: u32,
    },
    /// Inline text.
    Text {
        text: String,
        font_family: String,
        font_size: f32,
        color: [u8; 4],
    },
    /// A flat color rectangle (placeholder content).
    Solid { rgba: [u8; 4] },
}

impl ClipContent {
    /// The referenced media asset, if any.
    pub fn media_id(&self) -> Option<MediaId> {
        match self {
            Self::Video { media_id, .. } | Self::Image { media_id, .. } => Some(*media_id),
            Self::Text { .. } | Self::Solid { .. } => None,
        }
    }

    /// Whether this content has a true, finite source length.
    pub fn temporal_mode(&self) -> TemporalMode {
        match self {
            Self::Video { .. } => TemporalMode::Bounded,
            // Images are static: display length is nominal, not a source
            // length, so they behave as unbounded content.
            Self::Image { .. } | Self::Text { .. } | Self::Solid { .. } => TemporalMode::Unbounded,
        }
    }

    /// Nominal duration assigned at clip creation when the content has no
    /// true source length.
    pub fn default_duration(&self) -> f64 {
        match self {
            Self::Video { .. } => 0.0, // taken from the asset instead
            Self::Image { .. } | Self::Solid { .. } => 60.0,
            Self::Text { .. } => 5.0,
        }
    }
}

/// A placement of content on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip id
    pub id: ClipId,
    /// Display name
    pub name: String,
    /// Position on the global timeline, seconds
    pub timeline_start: f64,
    /// Total seconds of underlying content (nominal for unbounded content)
    pub source_duration: f64,
    /// Seconds trimmed from the source head
    pub trim_start: f64,
    /// Seconds trimmed from the source tail
    pub trim_end: f64,
    /// Track lane
    pub track_index: usize,
    /// Bounded/unbounded trim behavior
    pub mode: TemporalMode,
    /// Transform on the logical canvas
    pub spatial: ClipSpatial,
    /// What the clip shows
    pub content: ClipContent,
}

impl Clip {
    /// Seconds of content that survive trimming.
    #[inline]
    pub fn playable_duration(&self) -> f64 {
        self.source_duration - self.trim_start - self.trim_end
    }

    /// Exclusive end of the clip on the timeline.
    #[inline]
    pub fn timeline_end(&self) -> f64 {
        self.timeline_start + self.playable_duration()
    }

    /// The clip's temporal window, for coordinate mapping.
    pub fn window(&self) -> SourceWindow {
        SourceWindow {
            timeline_start: self.timeline_start,
            source_duration: self.source_duration,
            trim_start: self.trim_start,
            trim_end: self.trim_end,
            bounded: self.mode == TemporalMode::Bounded,
        }
    }

    /// Visibility rule: `timeline_start <= t < timeline_end`.
    #[inline]
    pub fn is_active_at(&self, time: f64) -> bool {
        self.window().contains(time)
    }
}
