//! FrameCut UI - Timeline interaction controllers
//!
//! Headless gesture state machines for the timeline panel. Each gesture
//! captures an immutable memo of the clip's geometry at press time; every
//! pointer move recomputes the preview from that memo plus the total pointer
//! delta, so intermediate clamping never accumulates error. The store is
//! written exactly once, on release.

pub mod drag;
pub mod trim;

pub use drag::DragGesture;
pub use trim::{hit_test_trim_handle, TrimGesture};
