//! Integration tests for timeline editing.
//!
//! Exercises the store, the gesture controllers, and session persistence
//! together: every edit path a user can take must leave the clip
//! invariants intact.

use framecut_core::{TimeScale, ViewTransform};
use framecut_timeline::{
    Clip, ClipContent, MediaBin, MediaKind, SessionFile, TimelineStore, TrimHandle, TRACK_COUNT,
};
use framecut_ui::{DragGesture, TrimGesture};

// ── Helpers ────────────────────────────────────────────────────

fn session_with_video(duration: f64) -> (TimelineStore, MediaBin, framecut_timeline::ClipId) {
    let mut bin = MediaBin::new();
    let media_id = bin.add(MediaKind::Video, "source.mp4", 1280, 720, Some(duration));
    let mut store = TimelineStore::new(600.0);
    let clip_id = store
        .add_clip(
            ClipContent::Video {
                media_id,
                width: 1280,
                height: 720,
            },
            &bin,
        )
        .unwrap();
    (store, bin, clip_id)
}

fn assert_invariants(clip: &Clip, timeline_duration: f64) {
    assert!(clip.trim_start >= 0.0, "trim_start negative");
    assert!(clip.trim_end >= 0.0, "trim_end negative");
    assert!(
        clip.trim_start + clip.trim_end <= clip.source_duration + 1e-9,
        "trims exceed source"
    );
    assert!(clip.timeline_start >= 0.0, "start before origin");
    assert!(
        clip.timeline_end() <= timeline_duration + 1e-9,
        "clip past timeline end"
    );
    assert!(clip.track_index < TRACK_COUNT, "track out of range");
}

fn unit_scale() -> TimeScale {
    TimeScale::new(600.0, 600.0)
}

// ── Store invariants under edit sequences ──────────────────────

#[test]
fn invariants_survive_hostile_edit_sequence() {
    let (mut store, _bin, id) = session_with_video(150.0);

    store.trim_clip(id, TrimHandle::Right, 0.0, 100.0);
    store.update_clip_position(id, 9999.0, 42);
    store.trim_clip(id, TrimHandle::Left, -50.0, 1000.0);
    store.trim_clip(id, TrimHandle::Right, 580.0, -5.0);
    store.update_clip_position(id, -1.0, 0);
    store.trim_clip(id, TrimHandle::Left, 10.0, 80.0);

    assert_invariants(store.clip(id).unwrap(), store.timeline_duration());
}

#[test]
fn right_trim_scenario_produces_trim_end_fifty() {
    let (mut store, _bin, id) = session_with_video(150.0);
    store.trim_clip(id, TrimHandle::Right, 0.0, 100.0);

    let clip = store.clip(id).unwrap();
    assert!((clip.trim_end - 50.0).abs() < 1e-9);
    assert!((clip.playable_duration() - 100.0).abs() < 1e-9);
}

#[test]
fn non_positive_duration_never_inverts_the_clip() {
    let (mut store, _bin, id) = session_with_video(150.0);
    store.trim_clip(id, TrimHandle::Right, 0.0, 0.0);
    let clip = store.clip(id).unwrap();
    assert!(clip.playable_duration() >= 0.0);
    assert!(clip.timeline_end() >= clip.timeline_start);

    store.trim_clip(id, TrimHandle::Right, 0.0, -30.0);
    let clip = store.clip(id).unwrap();
    assert!(clip.playable_duration() >= 0.0);
    assert!(clip.timeline_end() >= clip.timeline_start);
}

// ── Gesture → store paths ──────────────────────────────────────

#[test]
fn trim_gesture_end_to_end() {
    let (mut store, _bin, id) = session_with_video(150.0);
    let clip = store.clip(id).unwrap().clone();

    // Right handle dragged from the 150 s mark back to 100 s, zoomed 2x.
    let view = ViewTransform { k: 2.0, x: 0.0 };
    let mut gesture = TrimGesture::begin(&clip, TrimHandle::Right, 300.0);
    gesture.update(200.0, unit_scale(), view); // -100 px screen == -50 s
    gesture.commit(&mut store);

    let clip = store.clip(id).unwrap();
    assert!((clip.playable_duration() - 100.0).abs() < 1e-9);
    assert!((clip.trim_end - 50.0).abs() < 1e-9);
    assert_invariants(clip, store.timeline_duration());
}

#[test]
fn drag_gesture_end_to_end() {
    let (mut store, _bin, id) = session_with_video(100.0);
    let clip = store.clip(id).unwrap().clone();

    let mut gesture = DragGesture::begin(&clip, 0.0);
    gesture.update(
        250.0,
        3,
        unit_scale(),
        ViewTransform::IDENTITY,
        store.timeline_duration(),
    );
    gesture.commit(&mut store);

    let clip = store.clip(id).unwrap();
    assert!((clip.timeline_start - 250.0).abs() < 1e-9);
    assert_eq!(clip.track_index, 3);
    assert_invariants(clip, store.timeline_duration());
}

#[test]
fn live_preview_clamps_before_commit() {
    let (mut store, _bin, id) = session_with_video(20.0);
    store.trim_clip(id, TrimHandle::Right, 0.0, 10.0); // trim_end = 10
    let clip = store.clip(id).unwrap().clone();

    // Dragging the right handle far out must stop at the source tail (20 s)
    // while the pointer is still down, not only at commit.
    let mut gesture = TrimGesture::begin(&clip, TrimHandle::Right, 10.0);
    gesture.update(10_000.0, unit_scale(), ViewTransform::IDENTITY);
    assert!((gesture.preview_duration() - 20.0).abs() < 1e-9);

    gesture.commit(&mut store);
    assert_invariants(store.clip(id).unwrap(), store.timeline_duration());
}

// ── Persistence ────────────────────────────────────────────────

#[test]
fn edited_session_round_trips_through_json() {
    let (mut store, bin, id) = session_with_video(150.0);
    store.trim_clip(id, TrimHandle::Right, 0.0, 100.0);
    store.update_clip_position(id, 30.0, 1);
    store.set_current_time(42.0);

    let json = SessionFile::capture(&store, &bin).to_json().unwrap();
    let (restored, restored_bin) = SessionFile::from_json(&json).unwrap().restore();

    let clip = restored.clip(id).unwrap();
    assert!((clip.trim_end - 50.0).abs() < 1e-9);
    assert!((clip.timeline_start - 30.0).abs() < 1e-9);
    assert_eq!(clip.track_index, 1);
    assert_eq!(restored.current_time(), 42.0);
    assert_eq!(restored_bin.len(), 1);
    assert_invariants(clip, restored.timeline_duration());
}
