//! Media inputs: containers exposing metadata, tracks, and frame samplers.
//!
//! A [`MediaInput`] wraps one uploaded container. Its primary
//! [`VideoTrack`] creates [`FrameSampler`]s, which are the stateful decode
//! sessions: seek-and-decode one frame at a requested source timestamp.
//! Samplers are `Send` so the decode scheduler can drive them off-thread,
//! but not `Sync` - each asset gets exactly one, behind a mutex.

use framecut_core::Result;
use framecut_timeline::MediaKind;

/// One decoded frame in RGBA8.
#[derive(Debug, Clone)]
pub struct VideoSample {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Presentation timestamp in source seconds.
    pub timestamp: f64,
    /// Frame duration in seconds.
    pub duration: f64,
}

/// Container-level metadata, probed at upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaMetadata {
    pub kind: MediaKind,
    pub width: u32,
    pub height: u32,
    /// Source duration in seconds; `None` for still images.
    pub duration: Option<f64>,
}

/// An opened media container.
pub trait MediaInput: Send {
    /// Probed container metadata.
    fn metadata(&self) -> MediaMetadata;

    /// The primary video track, if the container has one.
    fn primary_video(&self) -> Option<Box<dyn VideoTrack>>;
}

/// A decodable video track inside a container.
pub trait VideoTrack: Send {
    /// Natural frame size in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Track duration in seconds.
    fn duration(&self) -> f64;

    /// Open a decode session on this track.
    fn sampler(&self) -> Result<Box<dyn FrameSampler>>;
}

/// A stateful decode session: seek and decode one frame at a time.
pub trait FrameSampler: Send {
    /// Decode the frame covering `timestamp` (source seconds).
    ///
    /// Returns `Ok(None)` past the end of the track. Timestamps before the
    /// first frame snap to it.
    fn sample_at(&mut self, timestamp: f64) -> Result<Option<VideoSample>>;
}

/// A generated test-pattern video source.
///
/// Stands in for a real demuxer in tests and the demo binary: every frame
/// is a gradient whose red channel encodes the frame's position in the
/// track, so assertions can tell exactly which timestamp got decoded.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticInput {
    width: u32,
    height: u32,
    duration: f64,
    fps: f64,
}

impl SyntheticInput {
    pub fn new(width: u32, height: u32, duration: f64, fps: f64) -> Self {
        Self {
            width,
            height,
            duration,
            fps,
        }
    }

    /// 640x360 at 24 fps, 10 seconds.
    pub fn small() -> Self {
        Self::new(640, 360, 10.0, 24.0)
    }
}

impl MediaInput for SyntheticInput {
    fn metadata(&self) -> MediaMetadata {
        MediaMetadata {
            kind: MediaKind::Video,
            width: self.width,
            height: self.height,
            duration: Some(self.duration),
        }
    }

    fn primary_video(&self) -> Option<Box<dyn VideoTrack>> {
        Some(Box::new(*self))
    }
}

impl VideoTrack for SyntheticInput {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn sampler(&self) -> Result<Box<dyn FrameSampler>> {
        Ok(Box::new(SyntheticSampler { track: *self }))
    }
}

struct SyntheticSampler {
    track: SyntheticInput,
}

impl FrameSampler for SyntheticSampler {
    fn sample_at(&mut self, timestamp: f64) -> Result<Option<VideoSample>> {
        let t = &self.track;
        if timestamp >= t.duration {
            return Ok(None);
        }
        let frame_index = (timestamp.max(0.0) * t.fps).floor();
        let pts = frame_index / t.fps;

        // Red encodes track position, green/blue a spatial gradient.
        let red = ((pts / t.duration) * 255.0) as u8;
        let mut data = vec![0u8; (t.width * t.height * 4) as usize];
        for y in 0..t.height {
            for x in 0..t.width {
                let i = ((y * t.width + x) * 4) as usize;
                data[i] = red;
                data[i + 1] = ((x * 255) / t.width.max(1)) as u8;
                data[i + 2] = ((y * 255) / t.height.max(1)) as u8;
                data[i + 3] = 255;
            }
        }

        Ok(Some(VideoSample {
            data,
            width: t.width,
            height: t.height,
            timestamp: pts,
            duration: 1.0 / t.fps,
        }))
    }
}
