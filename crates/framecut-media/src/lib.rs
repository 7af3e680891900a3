//! FrameCut Media - media storage and frame decoding
//!
//! This crate handles:
//! - The blob store holding uploaded media bytes
//! - Media inputs: containers exposing tracks and frame samplers
//! - Cached decode sessions, one per media asset
//! - The background decode scheduler

pub mod blob;
pub mod image_input;
pub mod scheduler;
pub mod session;
pub mod source;

pub use blob::{BlobStore, MemoryBlobStore};
pub use image_input::ImageInput;
pub use scheduler::{DecodeCompletion, DecodeRequest, DecodeScheduler};
pub use session::{DecodeSessionCache, SharedSampler};
pub use source::{FrameSampler, MediaInput, MediaMetadata, SyntheticInput, VideoSample, VideoTrack};
