//! Blob storage for uploaded media bytes, keyed by media id.
//!
//! Asset metadata lives in the media bin; the raw container bytes live
//! here. Deleting an asset revokes its blob, which is why dangling clips
//! must tolerate a missing blob at resolve time.

use framecut_timeline::MediaId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Byte storage for uploaded media, keyed by [`MediaId`].
pub trait BlobStore: Send + Sync {
    /// Store bytes under an id, replacing any previous blob.
    fn put(&self, id: MediaId, bytes: Vec<u8>);

    /// Fetch the bytes for an id.
    fn get(&self, id: MediaId) -> Option<Arc<Vec<u8>>>;

    /// Delete the blob. Returns false when the id was unknown.
    fn delete(&self, id: MediaId) -> bool;
}

/// In-memory blob store.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<MediaId, Arc<Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, id: MediaId, bytes: Vec<u8>) {
        self.blobs.write().insert(id, Arc::new(bytes));
    }

    fn get(&self, id: MediaId) -> Option<Arc<Vec<u8>>> {
        self.blobs.read().get(&id).cloned()
    }

    fn delete(&self, id: MediaId) -> bool {
        self.blobs.write().remove(&id).is_some()
    }
}
