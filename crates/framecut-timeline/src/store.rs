//! The observable timeline store.
//!
//! Single source of truth for clips and the playhead. Every mutation is
//! atomic, enforces the trim/placement invariants by clamping (never by
//! rejecting), and synchronously notifies subscribers exactly once after it
//! completes. Operations on a missing clip id are silent no-ops so that
//! async completions racing a concurrent delete stay harmless.

use framecut_core::{FramecutError, Result};
use tracing::debug;

use crate::clip::{Clip, ClipContent, ClipId, ClipSpatial, ClipSpatialPatch, TemporalMode};
use crate::media_bin::{MediaBin, MediaKind};

/// Fixed number of track lanes.
pub const TRACK_COUNT: usize = 6;

/// Default total timeline length in seconds.
pub const DEFAULT_TIMELINE_DURATION: f64 = 600.0;

/// Who initiated a spatial update. Carried in the emitted event so the
/// compositor bridge can ignore writes it made itself instead of relying on
/// a shared guard flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    /// Direct edit through the editor (timeline panel, inspector, tests).
    User,
    /// Write-back from a scene-graph "object modified" event.
    Compositor,
}

/// Change notification emitted after each store mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    ClipAdded { clip_id: ClipId },
    ClipRemoved { clip_id: ClipId },
    ClipMoved { clip_id: ClipId },
    ClipTrimmed { clip_id: ClipId },
    ClipSpatialChanged { clip_id: ClipId, source: UpdateSource },
    PlayheadMoved { time: f64 },
}

/// Which edge of a clip a trim applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimHandle {
    Left,
    Right,
}

/// Handle for removing a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&TimelineEvent)>;

/// Clamp that tolerates an inverted range by preferring `min`.
#[inline]
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// The authoritative timeline state for one editor session.
pub struct TimelineStore {
    clips: Vec<Clip>,
    timeline_duration: f64,
    current_time: f64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl std::fmt::Debug for TimelineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineStore")
            .field("clips", &self.clips.len())
            .field("timeline_duration", &self.timeline_duration)
            .field("current_time", &self.current_time)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TimelineStore {
    /// Create an empty store with the given total timeline length.
    pub fn new(timeline_duration: f64) -> Self {
        Self {
            clips: Vec::new(),
            timeline_duration,
            current_time: 0.0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Rebuild a store from persisted state. Subscribers start empty.
    pub fn from_parts(clips: Vec<Clip>, timeline_duration: f64, current_time: f64) -> Self {
        let mut store = Self::new(timeline_duration);
        store.clips = clips;
        store.current_time = clamp(current_time, 0.0, timeline_duration);
        store
    }

    /// The demo session the editor seeds on first launch: two solid clips
    /// on separate tracks.
    pub fn seeded() -> Self {
        let mut store = Self::new(DEFAULT_TIMELINE_DURATION);
        store.clips.push(Clip {
            id: ClipId::new(),
            name: "Clip 1".into(),
            timeline_start: 0.0,
            source_duration: 150.0,
            trim_start: 0.0,
            trim_end: 0.0,
            track_index: 0,
            mode: TemporalMode::Unbounded,
            spatial: ClipSpatial {
                x: 100.0,
                y: 100.0,
                ..ClipSpatial::at_natural_size(192, 108)
            },
            content: ClipContent::Solid {
                rgba: [66, 133, 244, 255],
            },
        });
        store.clips.push(Clip {
            id: ClipId::new(),
            name: "Clip 2".into(),
            timeline_start: 220.0,
            source_duration: 100.0,
            trim_start: 0.0,
            trim_end: 0.0,
            track_index: 1,
            mode: TemporalMode::Unbounded,
            spatial: ClipSpatial {
                x: 400.0,
                y: 300.0,
                ..ClipSpatial::at_natural_size(192, 108)
            },
            content: ClipContent::Solid {
                rgba: [251, 188, 4, 255],
            },
        });
        store
    }

    // ── Accessors ───────────────────────────────────────────────

    /// All clips, in insertion order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Look up a clip by id.
    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    /// Current playhead position in seconds.
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Total timeline length in seconds.
    pub fn timeline_duration(&self) -> f64 {
        self.timeline_duration
    }

    // ── Subscriptions ───────────────────────────────────────────

    /// Register a subscriber, notified synchronously after every mutation.
    pub fn subscribe(&mut self, f: impl FnMut(&TimelineEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    fn notify(&mut self, event: TimelineEvent) {
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event);
        }
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Add a clip for the given content at the timeline origin on track 0.
    ///
    /// Media-backed content must reference an asset in the bin with known
    /// dimensions; video assets additionally need a probed duration. A
    /// failure here leaves the store untouched.
    pub fn add_clip(&mut self, content: ClipContent, bin: &MediaBin) -> Result<ClipId> {
        let (name, spatial, source_duration, mode) = match &content {
            ClipContent::Video { media_id, .. } => {
                let asset = bin
                    .get(*media_id)
                    .ok_or_else(|| FramecutError::NotFound(format!("media asset {media_id}")))?;
                if asset.kind != MediaKind::Video {
                    return Err(FramecutError::Media(format!(
                        "asset {} is not a video",
                        asset.name
                    )));
                }
                let duration = asset.duration.ok_or_else(|| {
                    FramecutError::UnsupportedFormat(format!(
                        "asset {} has no decodable video track",
                        asset.name
                    ))
                })?;
                if asset.width == 0 || asset.height == 0 {
                    return Err(FramecutError::Media(format!(
                        "asset {} has unknown dimensions",
                        asset.name
                    )));
                }
                (
                    asset.name.clone(),
                    ClipSpatial::at_natural_size(asset.width, asset.height),
                    duration,
                    TemporalMode::Bounded,
                )
            }
            ClipContent::Image { media_id, .. } => {
                let asset = bin
                    .get(*media_id)
                    .ok_or_else(|| FramecutError::NotFound(format!("media asset {media_id}")))?;
                if asset.width == 0 || asset.height == 0 {
                    return Err(FramecutError::Media(format!(
                        "asset {} has unknown dimensions",
                        asset.name
                    )));
                }
                (
                    asset.name.clone(),
                    ClipSpatial::at_natural_size(asset.width, asset.height),
                    content.default_duration(),
                    TemporalMode::Unbounded,
                )
            }
            ClipContent::Text { text, .. } => (
                text.clone(),
                ClipSpatial::default(),
                content.default_duration(),
                TemporalMode::Unbounded,
            ),
            ClipContent::Solid { .. } => (
                "Color".to_string(),
                ClipSpatial::default(),
                content.default_duration(),
                TemporalMode::Unbounded,
            ),
        };

        let mut clip = Clip {
            id: ClipId::new(),
            name,
            timeline_start: 0.0,
            source_duration,
            trim_start: 0.0,
            trim_end: 0.0,
            track_index: 0,
            mode,
            spatial,
            content,
        };
        // A source longer than the timeline would violate
        // timeline_end <= timeline_duration at insertion.
        if clip.playable_duration() > self.timeline_duration {
            clip.trim_end = clip.source_duration - self.timeline_duration;
        }

        let clip_id = clip.id;
        self.clips.push(clip);
        self.notify(TimelineEvent::ClipAdded { clip_id });
        Ok(clip_id)
    }

    /// Remove a clip. Returns false (and emits nothing) when the id is
    /// unknown. Cached decode/render resources keyed by the id are released
    /// by subscribers reacting to the event.
    pub fn remove_clip(&mut self, clip_id: ClipId) -> bool {
        let Some(idx) = self.clips.iter().position(|c| c.id == clip_id) else {
            debug!(%clip_id, "remove_clip: no such clip");
            return false;
        };
        self.clips.remove(idx);
        self.notify(TimelineEvent::ClipRemoved { clip_id });
        true
    }

    /// Move the playhead, clamped to `[0, timeline_duration]`.
    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = clamp(time, 0.0, self.timeline_duration);
        let time = self.current_time;
        self.notify(TimelineEvent::PlayheadMoved { time });
    }

    /// Move a clip to a new timeline position and track, clamping both into
    /// range. No-op for unknown ids.
    pub fn update_clip_position(
        &mut self,
        clip_id: ClipId,
        new_timeline_start: f64,
        new_track_index: usize,
    ) {
        let timeline_duration = self.timeline_duration;
        let Some(clip) = self.clips.iter_mut().find(|c| c.id == clip_id) else {
            debug!(%clip_id, "update_clip_position: no such clip");
            return;
        };

        let max_start = (timeline_duration - clip.playable_duration()).max(0.0);
        clip.timeline_start = clamp(new_timeline_start, 0.0, max_start);
        clip.track_index = new_track_index.min(TRACK_COUNT - 1);

        self.notify(TimelineEvent::ClipMoved { clip_id });
    }

    /// Trim a clip edge to a new duration, recomputing the trim on that side.
    ///
    /// Bounded clips clamp so `0 <= trim` and `trim_start + trim_end <=
    /// source_duration` always hold, even for a requested non-positive
    /// duration (which degenerates to a zero-length clip). Unbounded clips
    /// grow their nominal source duration instead of clamping the requested
    /// length.
    pub fn trim_clip(
        &mut self,
        clip_id: ClipId,
        handle: TrimHandle,
        new_timeline_start: f64,
        new_duration: f64,
    ) {
        let timeline_duration = self.timeline_duration;
        let Some(clip) = self.clips.iter_mut().find(|c| c.id == clip_id) else {
            debug!(%clip_id, "trim_clip: no such clip");
            return;
        };

        match handle {
            TrimHandle::Right => {
                let candidate = clip.source_duration - new_duration - clip.trim_start;
                match clip.mode {
                    TemporalMode::Bounded => {
                        clip.trim_end =
                            clamp(candidate, 0.0, clip.source_duration - clip.trim_start);
                    }
                    TemporalMode::Unbounded => {
                        if candidate < 0.0 {
                            clip.source_duration -= candidate;
                            clip.trim_end = 0.0;
                        } else {
                            clip.trim_end = candidate.min(clip.source_duration - clip.trim_start);
                        }
                    }
                }
                clip.timeline_start = new_timeline_start;
            }
            TrimHandle::Left => {
                clip.timeline_start = new_timeline_start;
                let candidate = clip.source_duration - new_duration - clip.trim_end;
                match clip.mode {
                    TemporalMode::Bounded => {
                        clip.trim_start =
                            clamp(candidate, 0.0, clip.source_duration - clip.trim_end);
                    }
                    TemporalMode::Unbounded => {
                        if candidate < 0.0 {
                            clip.source_duration -= candidate;
                            clip.trim_start = 0.0;
                        } else {
                            clip.trim_start = candidate.min(clip.source_duration - clip.trim_end);
                        }
                    }
                }
            }
        }

        // Keep the clip inside the timeline regardless of the requested
        // start position.
        let max_start = (timeline_duration - clip.playable_duration()).max(0.0);
        clip.timeline_start = clamp(clip.timeline_start, 0.0, max_start);

        self.notify(TimelineEvent::ClipTrimmed { clip_id });
    }

    /// Merge a partial spatial patch into a clip. The source tag is carried
    /// in the event so the compositor bridge can skip its own write-backs.
    /// No-op for unknown ids.
    pub fn update_clip_spatial(
        &mut self,
        clip_id: ClipId,
        patch: ClipSpatialPatch,
        source: UpdateSource,
    ) {
        let Some(clip) = self.clips.iter_mut().find(|c| c.id == clip_id) else {
            debug!(%clip_id, "update_clip_spatial: no such clip");
            return;
        };
        patch.apply_to(&mut clip.spatial);
        self.notify(TimelineEvent::ClipSpatialChanged { clip_id, source });
    }
}
