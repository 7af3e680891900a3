//! Trim handle interaction for timeline clips.
//!
//! A [`TrimGesture`] is created when the pointer presses a clip edge and
//! updated on every move. The preview geometry is always derived from the
//! press-time memo plus the total pointer delta, converted through the
//! current zoom, so the live clamps never compound. The store sees a single
//! `trim_clip` call, at release.

use framecut_core::{Rect, TimeScale, Vec2, ViewTransform};
use framecut_timeline::{Clip, ClipId, TemporalMode, TimelineStore, TrimHandle};

/// Hit test a pointer position against a clip's trim handles.
///
/// Returns `Some(TrimHandle)` when the position is over a handle strip of
/// `handle_width` pixels at either edge, otherwise `None`.
pub fn hit_test_trim_handle(clip_rect: Rect, pos: Vec2, handle_width: f32) -> Option<TrimHandle> {
    if !clip_rect.contains(pos) {
        return None;
    }

    let left = Rect::new(clip_rect.x, clip_rect.y, handle_width, clip_rect.height);
    if left.contains(pos) {
        return Some(TrimHandle::Left);
    }

    let right = Rect::new(
        clip_rect.x + clip_rect.width - handle_width,
        clip_rect.y,
        handle_width,
        clip_rect.height,
    );
    if right.contains(pos) {
        return Some(TrimHandle::Right);
    }

    None
}

/// Active trim gesture on one clip edge.
#[derive(Debug, Clone)]
pub struct TrimGesture {
    pub clip_id: ClipId,
    pub handle: TrimHandle,
    /// Pointer x at press, screen pixels.
    anchor_px: f64,
    /// Clip geometry at press.
    origin_start: f64,
    origin_duration: f64,
    /// Largest duration this edge can expose. `None` for unbounded content.
    max_duration: Option<f64>,
    preview_start: f64,
    preview_duration: f64,
}

impl TrimGesture {
    /// Capture the press-time memo for a clip edge.
    pub fn begin(clip: &Clip, handle: TrimHandle, pointer_px: f64) -> Self {
        // The opposite trim stays fixed for the whole gesture, so the
        // available source extension is known up front.
        let max_duration = match clip.mode {
            TemporalMode::Bounded => Some(match handle {
                TrimHandle::Right => clip.source_duration - clip.trim_start,
                TrimHandle::Left => clip.source_duration - clip.trim_end,
            }),
            TemporalMode::Unbounded => None,
        };
        Self {
            clip_id: clip.id,
            handle,
            anchor_px: pointer_px,
            origin_start: clip.timeline_start,
            origin_duration: clip.playable_duration(),
            max_duration,
            preview_start: clip.timeline_start,
            preview_duration: clip.playable_duration(),
        }
    }

    /// Recompute the preview from the total pointer delta.
    pub fn update(&mut self, pointer_px: f64, scale: TimeScale, view: ViewTransform) {
        let delta = scale.to_time((pointer_px - self.anchor_px) / view.k);

        match self.handle {
            TrimHandle::Right => {
                let mut duration = (self.origin_duration + delta).max(0.0);
                if let Some(max) = self.max_duration {
                    duration = duration.min(max);
                }
                self.preview_start = self.origin_start;
                self.preview_duration = duration;
            }
            TrimHandle::Left => {
                let mut duration = (self.origin_duration - delta).max(0.0);
                if let Some(max) = self.max_duration {
                    duration = duration.min(max);
                }
                // The right edge is pinned, so extending the head past the
                // timeline origin is cut off there.
                let origin_end = self.origin_start + self.origin_duration;
                duration = duration.min(origin_end);
                self.preview_start = origin_end - duration;
                self.preview_duration = duration;
            }
        }
    }

    /// Preview timeline start in seconds, for rendering the ghost clip.
    pub fn preview_start(&self) -> f64 {
        self.preview_start
    }

    /// Preview duration in seconds.
    pub fn preview_duration(&self) -> f64 {
        self.preview_duration
    }

    /// Commit the gesture: one store write.
    pub fn commit(self, store: &mut TimelineStore) {
        store.trim_clip(
            self.clip_id,
            self.handle,
            self.preview_start,
            self.preview_duration,
        );
    }
}
