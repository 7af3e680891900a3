//! The media bin: uploaded source assets and their metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque key for an uploaded media asset. Doubles as the blob-store key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaId(pub Uuid);

impl MediaId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MediaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What kind of content an asset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Video,
    Image,
}

/// Metadata for an uploaded source file. The pixel data itself lives in the
/// blob store under the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Unique asset id
    pub id: MediaId,
    /// Content kind
    pub kind: MediaKind,
    /// Display name (usually the uploaded file name)
    pub name: String,
    /// Natural width in pixels
    pub width: u32,
    /// Natural height in pixels
    pub height: u32,
    /// Source duration in seconds; video only
    pub duration: Option<f64>,
}

/// Flat, insertion-ordered collection of media assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaBin {
    assets: Vec<MediaAsset>,
}

impl MediaBin {
    /// Create an empty bin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new asset, assigning it a fresh id.
    pub fn add(
        &mut self,
        kind: MediaKind,
        name: impl Into<String>,
        width: u32,
        height: u32,
        duration: Option<f64>,
    ) -> MediaId {
        let id = MediaId::new();
        self.assets.push(MediaAsset {
            id,
            kind,
            name: name.into(),
            width,
            height,
            duration,
        });
        id
    }

    /// Look up an asset by id.
    pub fn get(&self, id: MediaId) -> Option<&MediaAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Remove an asset, returning it so the caller can revoke cached
    /// decode/preview resources keyed by its id. Clips referencing the
    /// asset stay on the timeline and render as placeholders.
    pub fn remove(&mut self, id: MediaId) -> Option<MediaAsset> {
        let idx = self.assets.iter().position(|a| a.id == id)?;
        Some(self.assets.remove(idx))
    }

    /// Assets in insertion order.
    pub fn assets(&self) -> &[MediaAsset] {
        &self.assets
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True when no assets have been uploaded.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
