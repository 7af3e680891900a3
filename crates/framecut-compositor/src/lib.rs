//! FrameCut Compositor - frame resolution and the scene-graph bridge
//!
//! The preview canvas is an external collaborator behind the [`SceneGraph`]
//! trait. This crate keeps it in sync with the timeline store:
//! - [`CompositorBridge`] reconciles objects with the clip list and routes
//!   canvas edits back into the store without feedback loops.
//! - [`FrameResolutionEngine`] decides per-clip visibility for the playhead
//!   and drives asynchronous frame decodes into per-clip render surfaces.

pub mod bridge;
pub mod resolve;
pub mod scene;

pub use bridge::CompositorBridge;
pub use resolve::{FrameResolutionEngine, MediaOpener};
pub use scene::{BasicSceneGraph, SceneGraph, SceneObject};
