//! FrameCut - headless compositing editor demo
//!
//! Wires the full loop without a GUI shell: seeded session, media upload,
//! scene-graph reconciliation, playhead scrubbing with async decode, a
//! trim gesture, a canvas edit flowing back into the store, and session
//! save/load.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use framecut_compositor::{BasicSceneGraph, CompositorBridge, FrameResolutionEngine, MediaOpener};
use framecut_core::{fit_viewport, logical_bounds, TimeScale, Vec2, ViewTransform};
use framecut_media::{
    BlobStore, FrameSampler, ImageInput, MediaInput, MemoryBlobStore, SyntheticInput,
};
use framecut_timeline::{
    ClipContent, ClipSpatialPatch, MediaBin, MediaId, MediaKind, SessionFile, TimelineEvent,
    TimelineStore, TrimHandle,
};
use framecut_ui::TrimGesture;

/// Opens decode sessions from the demo's blob store. Image blobs decode
/// through the image pipeline; everything else gets the synthetic test
/// pattern standing in for a real demuxer.
struct DemoOpener {
    blobs: Arc<MemoryBlobStore>,
}

impl MediaOpener for DemoOpener {
    fn open_sampler(&self, id: MediaId) -> framecut_core::Result<Box<dyn FrameSampler>> {
        if let Some(bytes) = self.blobs.get(id) {
            let input = ImageInput::from_bytes(&bytes)?;
            return input
                .primary_video()
                .ok_or_else(|| {
                    framecut_core::FramecutError::UnsupportedFormat("no video track".into())
                })?
                .sampler();
        }
        SyntheticInput::small()
            .primary_video()
            .ok_or_else(|| framecut_core::FramecutError::UnsupportedFormat("no video track".into()))?
            .sampler()
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("FrameCut starting...");

    // Session state: the seeded two-clip timeline plus one uploaded video.
    let mut store = TimelineStore::seeded();
    let mut bin = MediaBin::new();
    let blobs = Arc::new(MemoryBlobStore::new());

    let probe = SyntheticInput::small().metadata();
    let video_id = bin.add(
        MediaKind::Video,
        "demo.mp4",
        probe.width,
        probe.height,
        probe.duration,
    );

    // Store events queue up here; the loop routes them to the bridge.
    let events: Rc<RefCell<VecDeque<TimelineEvent>>> = Rc::new(RefCell::new(VecDeque::new()));
    let sink = events.clone();
    store.subscribe(move |e| sink.borrow_mut().push_back(e.clone()));

    let clip_id = store.add_clip(
        ClipContent::Video {
            media_id: video_id,
            width: probe.width,
            height: probe.height,
        },
        &bin,
    )?;
    store.update_clip_position(clip_id, 0.0, 2);

    // Fit the logical canvas into a notional 960x540 preview pane.
    let viewport = fit_viewport(
        Vec2::new(960.0, 540.0),
        Vec2::new(logical_bounds::WIDTH, logical_bounds::HEIGHT),
        Vec2::new(16.0, 16.0),
    );
    info!(scale = viewport.scale, "preview viewport fitted");

    let mut scene = BasicSceneGraph::new();
    let mut bridge = CompositorBridge::new();
    let mut engine = FrameResolutionEngine::new(Box::new(DemoOpener {
        blobs: blobs.clone(),
    }));
    bridge.sync_clips(&store, &mut scene, &mut engine);

    // Scrub across the first seconds of the timeline.
    for time in [0.0, 1.0, 2.5, 4.0] {
        store.set_current_time(time);
        while let Some(event) = events.borrow_mut().pop_front() {
            bridge.apply_event(&event, &store, &mut scene, &mut engine);
        }
        engine.resolve(&store, &mut scene);
        std::thread::sleep(Duration::from_millis(30));
        engine.poll(&store, &mut scene);

        let visible = store
            .clips()
            .iter()
            .filter(|c| c.is_active_at(time))
            .count();
        info!(time, visible, "resolved frame");
    }

    // Trim the uploaded clip to 6 s with a right-handle gesture.
    let scale = TimeScale::new(store.timeline_duration(), 1200.0);
    let clip = store
        .clip(clip_id)
        .cloned()
        .context("demo clip missing after add")?;
    let mut gesture = TrimGesture::begin(&clip, TrimHandle::Right, scale.to_pixels(10.0));
    gesture.update(scale.to_pixels(6.0), scale, ViewTransform::IDENTITY);
    gesture.commit(&mut store);
    info!(
        duration = store.clip(clip_id).map(|c| c.playable_duration()).unwrap_or(0.0),
        "trimmed demo clip"
    );

    // A canvas edit: the user drags the first seeded clip on the preview.
    let first = store.clips()[0].id;
    scene.user_transform(
        first,
        ClipSpatialPatch {
            x: Some(320.0),
            y: Some(180.0),
            ..Default::default()
        },
    );
    bridge.drain_scene_edits(&mut scene, &mut store);
    while let Some(event) = events.borrow_mut().pop_front() {
        bridge.apply_event(&event, &store, &mut scene, &mut engine);
    }

    // Persist and restore the session.
    let path = std::env::temp_dir().join("framecut-session.json");
    SessionFile::capture(&store, &bin).save_to_file(&path)?;
    let (restored, restored_bin) = SessionFile::load_from_file(&path)?.restore();
    info!(
        path = %path.display(),
        clips = restored.clips().len(),
        assets = restored_bin.len(),
        "session round-tripped"
    );

    info!("FrameCut demo finished");
    Ok(())
}
