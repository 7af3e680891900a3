//! The bridge between the timeline store and the scene graph.
//!
//! Objects map one-to-one to clips. Reconciliation removes objects for
//! deleted clips (releasing their cached decode resources), creates objects
//! for new clips with content-specific fills, and leaves matching objects
//! untouched. Canvas edits flow back into the store tagged
//! [`UpdateSource::Compositor`]; the bridge skips events carrying that tag,
//! so it never reacts to its own writes.

use framecut_timeline::{ClipContent, TimelineEvent, TimelineStore, UpdateSource};
use tracing::debug;

use crate::resolve::FrameResolutionEngine;
use crate::scene::SceneGraph;

/// Fill shown for media-backed clips until decoded pixels arrive.
const MEDIA_PLACEHOLDER_FILL: [u8; 4] = [24, 24, 24, 255];

/// Content-specific initial fill for a clip's scene object.
fn initial_fill(content: &ClipContent) -> [u8; 4] {
    match content {
        ClipContent::Solid { rgba } => *rgba,
        ClipContent::Text { color, .. } => *color,
        ClipContent::Video { .. } | ClipContent::Image { .. } => MEDIA_PLACEHOLDER_FILL,
    }
}

/// Keeps the scene graph consistent with the clip list.
#[derive(Debug, Default)]
pub struct CompositorBridge;

impl CompositorBridge {
    pub fn new() -> Self {
        Self
    }

    /// Reconcile the scene graph with the store's clip list.
    pub fn sync_clips(
        &mut self,
        store: &TimelineStore,
        scene: &mut dyn SceneGraph,
        engine: &mut FrameResolutionEngine,
    ) {
        for id in scene.object_ids() {
            if store.clip(id).is_none() {
                debug!(clip_id = %id, "removing scene object for deleted clip");
                scene.remove_object(id);
                engine.release_clip(id);
            }
        }

        for clip in store.clips() {
            if !scene.contains(clip.id) {
                scene.create_object(clip.id, clip.spatial, initial_fill(&clip.content));
            }
        }
    }

    /// React to one store event.
    pub fn apply_event(
        &mut self,
        event: &TimelineEvent,
        store: &TimelineStore,
        scene: &mut dyn SceneGraph,
        engine: &mut FrameResolutionEngine,
    ) {
        match event {
            TimelineEvent::ClipAdded { clip_id } => {
                if let Some(clip) = store.clip(*clip_id) {
                    scene.create_object(clip.id, clip.spatial, initial_fill(&clip.content));
                }
            }
            TimelineEvent::ClipRemoved { clip_id } => {
                scene.remove_object(*clip_id);
                engine.release_clip(*clip_id);
            }
            TimelineEvent::ClipSpatialChanged { clip_id, source } => {
                // Our own write-back; the canvas already shows it.
                if *source == UpdateSource::Compositor {
                    return;
                }
                if let Some(clip) = store.clip(*clip_id) {
                    scene.update_object(clip.id, clip.spatial);
                }
            }
            // Temporal changes surface through the next resolution pass.
            TimelineEvent::ClipMoved { .. }
            | TimelineEvent::ClipTrimmed { .. }
            | TimelineEvent::PlayheadMoved { .. } => {}
        }
    }

    /// Route user canvas edits into the store, tagged so `apply_event`
    /// ignores the resulting notifications.
    pub fn drain_scene_edits(&mut self, scene: &mut dyn SceneGraph, store: &mut TimelineStore) {
        for (clip_id, patch) in scene.drain_modified() {
            store.update_clip_spatial(clip_id, patch, UpdateSource::Compositor);
        }
    }
}
