//! Frame resolution: per-playhead visibility and decoded pixel content.
//!
//! One pass per playhead change. Every clip gets a visibility decision;
//! visible media-backed clips get a source timestamp and, when it moved by
//! more than the sample epsilon, an async decode request. Completions are
//! applied only while their token is still the latest issued for the clip,
//! so late results from fast scrubbing are discarded, never displayed.

use framecut_core::{RenderSurface, SAMPLE_EPSILON};
use framecut_media::{
    DecodeCompletion, DecodeRequest, DecodeScheduler, DecodeSessionCache, FrameSampler,
};
use framecut_timeline::{ClipContent, ClipId, MediaId, TimelineStore};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::scene::SceneGraph;

/// Opens decode sessions for media assets. The editor shell implements
/// this over the blob store and its demuxer; tests use synthetic inputs.
pub trait MediaOpener {
    fn open_sampler(&self, id: MediaId) -> framecut_core::Result<Box<dyn FrameSampler>>;
}

/// Resolves the timeline at the playhead into scene-graph content.
pub struct FrameResolutionEngine {
    opener: Box<dyn MediaOpener>,
    sessions: DecodeSessionCache,
    scheduler: DecodeScheduler,
    /// Reusable per-clip render surfaces.
    surfaces: HashMap<ClipId, RenderSurface>,
    /// Latest issued token per clip; completions with any other token are
    /// stale. Absence means every in-flight decode for the clip is stale.
    latest_token: HashMap<ClipId, u64>,
    /// Timestamp of the most recent request per clip, for the epsilon skip.
    last_requested: HashMap<ClipId, f64>,
    next_token: u64,
    issued: u64,
}

impl FrameResolutionEngine {
    pub fn new(opener: Box<dyn MediaOpener>) -> Self {
        Self {
            opener,
            sessions: DecodeSessionCache::new(),
            scheduler: DecodeScheduler::new(),
            surfaces: HashMap::new(),
            latest_token: HashMap::new(),
            last_requested: HashMap::new(),
            next_token: 1,
            issued: 0,
        }
    }

    /// Run one resolution pass for the current playhead.
    ///
    /// Per-clip failures (missing media, unsupported container) are logged
    /// and skipped; they never abort the pass for other clips.
    pub fn resolve(&mut self, store: &TimelineStore, scene: &mut dyn SceneGraph) {
        let t = store.current_time();

        for clip in store.clips() {
            let visible = clip.is_active_at(t);
            scene.set_visible(clip.id, visible);

            if !visible {
                // Any in-flight decode becomes stale the moment the clip
                // leaves the screen.
                self.latest_token.remove(&clip.id);
                self.last_requested.remove(&clip.id);
                continue;
            }

            // Static content needs no decode; images decode once.
            let (media_id, timestamp) = match &clip.content {
                ClipContent::Video { media_id, .. } => {
                    (*media_id, clip.window().source_timestamp(t))
                }
                ClipContent::Image { media_id, .. } => (*media_id, 0.0),
                ClipContent::Text { .. } | ClipContent::Solid { .. } => continue,
            };

            if let Some(prev) = self.last_requested.get(&clip.id) {
                if (timestamp - prev).abs() < SAMPLE_EPSILON {
                    continue;
                }
            }

            let opener = &self.opener;
            let session = match self
                .sessions
                .get_or_create(media_id, || opener.open_sampler(media_id))
            {
                Ok(session) => session,
                Err(e) => {
                    warn!(clip_id = %clip.id, %media_id, error = %e, "decode session unavailable");
                    continue;
                }
            };

            let token = self.next_token;
            self.next_token += 1;
            self.latest_token.insert(clip.id, token);
            self.last_requested.insert(clip.id, timestamp);
            self.issued += 1;

            self.scheduler.request(DecodeRequest {
                clip_id: clip.id,
                token,
                timestamp,
                sampler: session,
            });
        }
    }

    /// Apply every decode completion that has arrived so far.
    pub fn poll(&mut self, store: &TimelineStore, scene: &mut dyn SceneGraph) {
        for completion in self.scheduler.poll_completions() {
            self.apply_completion(completion, store, scene);
        }
    }

    /// Apply one completion, enforcing the staleness check.
    pub fn apply_completion(
        &mut self,
        completion: DecodeCompletion,
        store: &TimelineStore,
        scene: &mut dyn SceneGraph,
    ) {
        let clip_id = completion.clip_id;
        if self.latest_token.get(&clip_id) != Some(&completion.token) {
            debug!(%clip_id, token = completion.token, "stale decode discarded");
            return;
        }

        let sample = match completion.result {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                debug!(%clip_id, ts = completion.timestamp, "no frame at timestamp");
                return;
            }
            Err(e) => {
                // Leave the clip's last-good visual in place.
                warn!(%clip_id, ts = completion.timestamp, error = %e, "decode failed");
                return;
            }
        };

        // The clip may have been deleted while the decode was in flight.
        let Some(clip) = store.clip(clip_id) else {
            debug!(%clip_id, "decode completed for removed clip");
            return;
        };

        let width = (clip.spatial.width.max(1.0)) as u32;
        let height = (clip.spatial.height.max(1.0)) as u32;
        let surface = self
            .surfaces
            .entry(clip_id)
            .or_insert_with(|| RenderSurface::new(width, height));
        surface.ensure_size(width, height);
        surface.draw_scaled(&sample.data, sample.width, sample.height);
        scene.set_image(clip_id, surface);
    }

    /// Forget a removed clip: surface, token space, request history.
    pub fn release_clip(&mut self, clip_id: ClipId) {
        self.surfaces.remove(&clip_id);
        self.latest_token.remove(&clip_id);
        self.last_requested.remove(&clip_id);
    }

    /// Drop the decode session for a deleted media asset.
    pub fn release_media(&mut self, media_id: MediaId) {
        self.sessions.invalidate(media_id);
    }

    /// Total decode requests issued. Test observability.
    pub fn issued_requests(&self) -> u64 {
        self.issued
    }

    /// Number of live decode sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The cached render surface for a clip, if one exists.
    pub fn surface(&self, clip_id: ClipId) -> Option<&RenderSurface> {
        self.surfaces.get(&clip_id)
    }
}
