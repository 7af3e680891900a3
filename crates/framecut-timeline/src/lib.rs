//! FrameCut Timeline - Timeline data model
//!
//! The authoritative, observable state of an editing session:
//! - Media bin of uploaded assets
//! - Clips with independent temporal and spatial state
//! - The timeline store with invariant-preserving edit operations
//! - Session serialization

pub mod clip;
pub mod media_bin;
pub mod serialization;
pub mod store;

pub use clip::{Clip, ClipContent, ClipId, ClipSpatial, ClipSpatialPatch, TemporalMode};
pub use media_bin::{MediaAsset, MediaBin, MediaId, MediaKind};
pub use serialization::{SessionData, SessionFile};
pub use store::{
    SubscriptionId, TimelineEvent, TimelineStore, TrimHandle, UpdateSource,
    DEFAULT_TIMELINE_DURATION, TRACK_COUNT,
};
