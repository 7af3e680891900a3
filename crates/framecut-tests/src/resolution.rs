//! Integration tests for the resolve/composite loop.
//!
//! Drives the store, bridge, engine, and scene graph together the way the
//! editor shell does, with synthetic media standing in for a demuxer.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use framecut_compositor::{
    BasicSceneGraph, CompositorBridge, FrameResolutionEngine, MediaOpener, SceneGraph,
};
use framecut_core::{FramecutError, SAMPLE_EPSILON};
use framecut_media::{
    DecodeCompletion, FrameSampler, SyntheticInput, VideoSample, VideoTrack,
};
use framecut_timeline::{ClipContent, ClipId, MediaBin, MediaId, MediaKind, TimelineStore};
use parking_lot::RwLock;

// ── Helpers ────────────────────────────────────────────────────

/// Opener that serves synthetic video for ids still present in a shared
/// live set, and fails like a revoked blob for everything else.
struct TrackedOpener {
    live: Arc<RwLock<HashSet<MediaId>>>,
}

impl MediaOpener for TrackedOpener {
    fn open_sampler(&self, id: MediaId) -> framecut_core::Result<Box<dyn FrameSampler>> {
        if !self.live.read().contains(&id) {
            return Err(FramecutError::NotFound(format!("media asset {id}")));
        }
        VideoTrack::sampler(&SyntheticInput::small())
    }
}

struct Rig {
    store: TimelineStore,
    bin: MediaBin,
    scene: BasicSceneGraph,
    bridge: CompositorBridge,
    engine: FrameResolutionEngine,
    live: Arc<RwLock<HashSet<MediaId>>>,
}

fn rig_with_video() -> (Rig, ClipId, MediaId) {
    let mut bin = MediaBin::new();
    let media_id = bin.add(MediaKind::Video, "cam.mp4", 640, 360, Some(10.0));
    let live = Arc::new(RwLock::new(HashSet::from([media_id])));

    let mut store = TimelineStore::new(600.0);
    let clip_id = store
        .add_clip(
            ClipContent::Video {
                media_id,
                width: 640,
                height: 360,
            },
            &bin,
        )
        .unwrap();

    let mut rig = Rig {
        store,
        bin,
        scene: BasicSceneGraph::new(),
        bridge: CompositorBridge::new(),
        engine: FrameResolutionEngine::new(Box::new(TrackedOpener { live: live.clone() })),
        live,
    };
    rig.bridge
        .sync_clips(&rig.store, &mut rig.scene, &mut rig.engine);
    (rig, clip_id, media_id)
}

fn pump(rig: &mut Rig, clip_id: ClipId, updates: u64) {
    for _ in 0..200 {
        rig.engine.poll(&rig.store, &mut rig.scene);
        if rig.scene.object(clip_id).map(|o| o.image_updates) >= Some(updates) {
            return;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("decode never completed");
}

fn synthetic_sample(timestamp: f64) -> VideoSample {
    let mut sampler = VideoTrack::sampler(&SyntheticInput::small()).unwrap();
    sampler.sample_at(timestamp).unwrap().unwrap()
}

// ── Visibility ─────────────────────────────────────────────────

#[test]
fn seeded_layout_only_first_clip_visible_at_origin() {
    let mut rig = {
        let store = TimelineStore::seeded();
        let mut rig = Rig {
            store,
            bin: MediaBin::new(),
            scene: BasicSceneGraph::new(),
            bridge: CompositorBridge::new(),
            engine: FrameResolutionEngine::new(Box::new(TrackedOpener {
                live: Arc::new(RwLock::new(HashSet::new())),
            })),
            live: Arc::new(RwLock::new(HashSet::new())),
        };
        rig.bridge
            .sync_clips(&rig.store, &mut rig.scene, &mut rig.engine);
        rig
    };

    rig.store.set_current_time(0.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);

    let a = rig.store.clips()[0].id;
    let b = rig.store.clips()[1].id;
    assert!(rig.scene.object(a).unwrap().visible);
    assert!(!rig.scene.object(b).unwrap().visible);

    // At 250 s the situation flips.
    rig.store.set_current_time(250.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    assert!(!rig.scene.object(a).unwrap().visible);
    assert!(rig.scene.object(b).unwrap().visible);
}

// ── Decode idempotence and staleness ───────────────────────────

#[test]
fn repeated_playhead_set_issues_no_duplicate_decode() {
    let (mut rig, clip_id, _) = rig_with_video();

    rig.store.set_current_time(3.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    rig.store.set_current_time(3.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    assert_eq!(rig.engine.issued_requests(), 1);

    pump(&mut rig, clip_id, 1);
    assert!(rig.scene.object(clip_id).unwrap().image.is_some());
}

#[test]
fn sub_frame_scrub_is_a_no_op() {
    let (mut rig, _clip_id, _) = rig_with_video();

    rig.store.set_current_time(3.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    rig.store.set_current_time(3.0 + SAMPLE_EPSILON * 0.9);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    assert_eq!(rig.engine.issued_requests(), 1);
}

#[test]
fn stale_result_discarded_even_when_it_resolves_last() {
    let (mut rig, clip_id, _) = rig_with_video();

    // Two scrubs before anything resolves: tokens 1 then 2.
    rig.store.set_current_time(1.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    rig.store.set_current_time(7.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    assert_eq!(rig.engine.issued_requests(), 2);

    // Deliver the completions by hand, latest first, then the stale one.
    rig.engine.apply_completion(
        DecodeCompletion {
            clip_id,
            token: 2,
            timestamp: 7.0,
            result: Ok(Some(synthetic_sample(7.0))),
        },
        &rig.store,
        &mut rig.scene,
    );
    rig.engine.apply_completion(
        DecodeCompletion {
            clip_id,
            token: 1,
            timestamp: 1.0,
            result: Ok(Some(synthetic_sample(1.0))),
        },
        &rig.store,
        &mut rig.scene,
    );

    let object = rig.scene.object(clip_id).unwrap();
    assert_eq!(object.image_updates, 1);
    // The displayed frame is the late-timeline one (red channel encodes
    // source position).
    let red = object.image.as_ref().unwrap().as_rgba()[0];
    assert!(red > 150, "stale frame displayed (red={red})");
}

#[test]
fn decode_error_leaves_last_good_frame() {
    let (mut rig, clip_id, _) = rig_with_video();

    rig.store.set_current_time(2.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    pump(&mut rig, clip_id, 1);

    rig.store.set_current_time(5.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    // Fabricate the failure for the newest token.
    rig.engine.apply_completion(
        DecodeCompletion {
            clip_id,
            token: 2,
            timestamp: 5.0,
            result: Err(FramecutError::Decode("bitstream error".into())),
        },
        &rig.store,
        &mut rig.scene,
    );

    let object = rig.scene.object(clip_id).unwrap();
    assert_eq!(object.image_updates, 1);
    assert!(object.image.is_some());
}

// ── Deletion races ─────────────────────────────────────────────

#[test]
fn deleting_media_leaves_dangling_clip_resolvable() {
    let (mut rig, clip_id, media_id) = rig_with_video();

    // Delete the asset: bin entry, blob, decode session all revoked.
    rig.bin.remove(media_id);
    rig.live.write().remove(&media_id);
    rig.engine.release_media(media_id);

    // The clip stays on the timeline; resolution logs and skips it.
    rig.store.set_current_time(2.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);
    assert_eq!(rig.engine.issued_requests(), 0);
    assert_eq!(rig.engine.session_count(), 0);
    assert!(rig.scene.object(clip_id).unwrap().visible);
    assert!(rig.scene.object(clip_id).unwrap().image.is_none());
}

#[test]
fn removing_clip_mid_flight_discards_its_completion() {
    let (mut rig, clip_id, _) = rig_with_video();

    rig.store.set_current_time(2.0);
    rig.engine.resolve(&rig.store, &mut rig.scene);

    // Clip removed before the decode lands.
    rig.store.remove_clip(clip_id);
    rig.bridge.apply_event(
        &framecut_timeline::TimelineEvent::ClipRemoved { clip_id },
        &rig.store,
        &mut rig.scene,
        &mut rig.engine,
    );

    rig.engine.apply_completion(
        DecodeCompletion {
            clip_id,
            token: 1,
            timestamp: 2.0,
            result: Ok(Some(synthetic_sample(2.0))),
        },
        &rig.store,
        &mut rig.scene,
    );
    assert!(!rig.scene.contains(clip_id));
    assert!(rig.engine.surface(clip_id).is_none());
}
