//! The abstract scene graph the compositor renders into.
//!
//! Objects are keyed by clip id, one per clip. The trait models exactly
//! what frame resolution and the bridge need: create/update/remove, a
//! static-image upload, a visibility switch, and a queue of user-driven
//! geometry edits flowing back toward the store.

use framecut_core::RenderSurface;
use framecut_timeline::{ClipId, ClipSpatial, ClipSpatialPatch};
use std::collections::HashMap;

/// A drawable object's retained state.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub spatial: ClipSpatial,
    /// Flat fill shown until (or instead of) decoded pixels.
    pub fill: [u8; 4],
    pub visible: bool,
    /// Whether the user can select/transform the object on the canvas.
    pub interactive: bool,
    /// Decoded pixel content, when any has arrived.
    pub image: Option<RenderSurface>,
    /// Number of image uploads applied to this object.
    pub image_updates: u64,
}

/// Scene-graph collaborator interface.
pub trait SceneGraph {
    /// Create an object for a clip. Replaces any existing object with the
    /// same id.
    fn create_object(&mut self, clip_id: ClipId, spatial: ClipSpatial, fill: [u8; 4]);

    /// Apply new geometry to an existing object. Unknown ids are ignored.
    fn update_object(&mut self, clip_id: ClipId, spatial: ClipSpatial);

    /// Remove an object. Unknown ids are ignored.
    fn remove_object(&mut self, clip_id: ClipId);

    /// Show or hide an object; hidden objects are non-interactive.
    fn set_visible(&mut self, clip_id: ClipId, visible: bool);

    /// Upload decoded pixels as the object's static image content.
    fn set_image(&mut self, clip_id: ClipId, surface: &RenderSurface);

    /// Whether an object exists for the clip.
    fn contains(&self, clip_id: ClipId) -> bool;

    /// Ids of all live objects, for reconciliation.
    fn object_ids(&self) -> Vec<ClipId>;

    /// Drain user-driven geometry edits (the canvas "modified" events)
    /// accumulated since the last call.
    fn drain_modified(&mut self) -> Vec<(ClipId, ClipSpatialPatch)>;
}

/// Retained in-memory scene graph.
///
/// The real canvas in the editor shell implements [`SceneGraph`] over its
/// own renderer; this implementation backs the headless demo and the tests.
#[derive(Debug, Default)]
pub struct BasicSceneGraph {
    objects: HashMap<ClipId, SceneObject>,
    modified: Vec<(ClipId, ClipSpatialPatch)>,
}

impl BasicSceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retained state for a clip's object.
    pub fn object(&self, clip_id: ClipId) -> Option<&SceneObject> {
        self.objects.get(&clip_id)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Simulate the user transforming an object on the canvas: applies the
    /// patch to the retained object and queues a modified event.
    pub fn user_transform(&mut self, clip_id: ClipId, patch: ClipSpatialPatch) {
        if let Some(object) = self.objects.get_mut(&clip_id) {
            patch.apply_to(&mut object.spatial);
            self.modified.push((clip_id, patch));
        }
    }
}

impl SceneGraph for BasicSceneGraph {
    fn create_object(&mut self, clip_id: ClipId, spatial: ClipSpatial, fill: [u8; 4]) {
        self.objects.insert(
            clip_id,
            SceneObject {
                spatial,
                fill,
                visible: true,
                interactive: true,
                image: None,
                image_updates: 0,
            },
        );
    }

    fn update_object(&mut self, clip_id: ClipId, spatial: ClipSpatial) {
        if let Some(object) = self.objects.get_mut(&clip_id) {
            object.spatial = spatial;
        }
    }

    fn remove_object(&mut self, clip_id: ClipId) {
        self.objects.remove(&clip_id);
    }

    fn set_visible(&mut self, clip_id: ClipId, visible: bool) {
        if let Some(object) = self.objects.get_mut(&clip_id) {
            object.visible = visible;
            object.interactive = visible;
        }
    }

    fn set_image(&mut self, clip_id: ClipId, surface: &RenderSurface) {
        if let Some(object) = self.objects.get_mut(&clip_id) {
            object.image = Some(surface.clone());
            object.image_updates += 1;
        }
    }

    fn contains(&self, clip_id: ClipId) -> bool {
        self.objects.contains_key(&clip_id)
    }

    fn object_ids(&self) -> Vec<ClipId> {
        self.objects.keys().copied().collect()
    }

    fn drain_modified(&mut self) -> Vec<(ClipId, ClipSpatialPatch)> {
        std::mem::take(&mut self.modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_update_remove() {
        let mut scene = BasicSceneGraph::new();
        let id = ClipId::new();
        scene.create_object(id, ClipSpatial::default(), [0, 0, 255, 255]);
        assert!(scene.contains(id));

        let mut spatial = ClipSpatial::default();
        spatial.x = 77.0;
        scene.update_object(id, spatial);
        assert_eq!(scene.object(id).unwrap().spatial.x, 77.0);

        scene.remove_object(id);
        assert!(!scene.contains(id));
    }

    #[test]
    fn test_hidden_objects_lose_interactivity() {
        let mut scene = BasicSceneGraph::new();
        let id = ClipId::new();
        scene.create_object(id, ClipSpatial::default(), [0; 4]);
        scene.set_visible(id, false);
        let object = scene.object(id).unwrap();
        assert!(!object.visible);
        assert!(!object.interactive);
    }

    #[test]
    fn test_user_transform_queues_modified() {
        let mut scene = BasicSceneGraph::new();
        let id = ClipId::new();
        scene.create_object(id, ClipSpatial::default(), [0; 4]);
        scene.user_transform(
            id,
            ClipSpatialPatch {
                x: Some(10.0),
                ..Default::default()
            },
        );

        let modified = scene.drain_modified();
        assert_eq!(modified.len(), 1);
        assert_eq!(modified[0].0, id);
        // Drained; a second drain is empty.
        assert!(scene.drain_modified().is_empty());
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let mut scene = BasicSceneGraph::new();
        let id = ClipId::new();
        scene.update_object(id, ClipSpatial::default());
        scene.set_visible(id, true);
        scene.set_image(id, &RenderSurface::new(2, 2));
        scene.remove_object(id);
        assert!(scene.is_empty());
    }
}
