//! Clip drag interaction: moving a clip in time and across tracks.

use framecut_core::{TimeScale, ViewTransform};
use framecut_timeline::{Clip, ClipId, TimelineStore, TRACK_COUNT};

/// Map a pointer y (relative to the top of the track area) to a track lane.
pub fn track_at_y(y: f64, track_height: f64) -> usize {
    if y <= 0.0 || track_height <= 0.0 {
        return 0;
    }
    ((y / track_height) as usize).min(TRACK_COUNT - 1)
}

/// Active drag gesture on one clip.
///
/// Same memo discipline as [`crate::trim::TrimGesture`]: geometry captured
/// at press, preview recomputed from the total delta, one store write at
/// release.
#[derive(Debug, Clone)]
pub struct DragGesture {
    pub clip_id: ClipId,
    /// Pointer x at press, screen pixels.
    anchor_px: f64,
    origin_start: f64,
    playable: f64,
    preview_start: f64,
    preview_track: usize,
}

impl DragGesture {
    /// Capture the press-time memo for a clip body.
    pub fn begin(clip: &Clip, pointer_px: f64) -> Self {
        Self {
            clip_id: clip.id,
            anchor_px: pointer_px,
            origin_start: clip.timeline_start,
            playable: clip.playable_duration(),
            preview_start: clip.timeline_start,
            preview_track: clip.track_index,
        }
    }

    /// Recompute the preview from the total pointer delta, clamped so the
    /// clip stays inside `[0, timeline_duration]`.
    pub fn update(
        &mut self,
        pointer_px: f64,
        pointer_track: usize,
        scale: TimeScale,
        view: ViewTransform,
        timeline_duration: f64,
    ) {
        let delta = scale.to_time((pointer_px - self.anchor_px) / view.k);
        let max_start = (timeline_duration - self.playable).max(0.0);
        self.preview_start = (self.origin_start + delta).clamp(0.0, max_start);
        self.preview_track = pointer_track.min(TRACK_COUNT - 1);
    }

    /// Preview timeline start in seconds.
    pub fn preview_start(&self) -> f64 {
        self.preview_start
    }

    /// Preview track lane.
    pub fn preview_track(&self) -> usize {
        self.preview_track
    }

    /// Commit the gesture: one store write.
    pub fn commit(self, store: &mut TimelineStore) {
        store.update_clip_position(self.clip_id, self.preview_start, self.preview_track);
    }
}
