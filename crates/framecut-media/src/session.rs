//! Cached decode sessions, one per media asset.
//!
//! Opening a sampler is expensive (demux, codec init), so the first clip to
//! need an asset creates the session and every later request reuses it.
//! Deleting the asset invalidates the entry; in-flight decodes holding the
//! old `Arc` finish against the dead session and are discarded by the
//! staleness check downstream.

use framecut_core::Result;
use framecut_timeline::MediaId;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::source::FrameSampler;

/// A decode session shared with the scheduler worker.
pub type SharedSampler = Arc<Mutex<Box<dyn FrameSampler>>>;

/// Lazily-created decode sessions keyed by media id.
#[derive(Default)]
pub struct DecodeSessionCache {
    sessions: RwLock<HashMap<MediaId, SharedSampler>>,
}

impl DecodeSessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session for an asset, creating it on first use.
    ///
    /// `open` is only called on a miss; its error is returned without
    /// caching anything, so a later retry can succeed.
    pub fn get_or_create(
        &self,
        id: MediaId,
        open: impl FnOnce() -> Result<Box<dyn FrameSampler>>,
    ) -> Result<SharedSampler> {
        if let Some(session) = self.sessions.read().get(&id) {
            return Ok(session.clone());
        }

        let sampler = open()?;
        let session: SharedSampler = Arc::new(Mutex::new(sampler));
        // A racing creator may have beaten us; keep whichever landed first.
        let mut sessions = self.sessions.write();
        Ok(sessions.entry(id).or_insert(session).clone())
    }

    /// Drop the session for a deleted or replaced asset.
    pub fn invalidate(&self, id: MediaId) {
        if self.sessions.write().remove(&id).is_some() {
            debug!(%id, "decode session invalidated");
        }
    }

    /// Drop all sessions.
    pub fn clear(&self) {
        self.sessions.write().clear();
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// True when no session is cached.
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SyntheticInput, VideoTrack};
    use framecut_core::FramecutError;

    fn open_synthetic() -> Result<Box<dyn FrameSampler>> {
        VideoTrack::sampler(&SyntheticInput::small())
    }

    #[test]
    fn test_created_once_then_reused() {
        let cache = DecodeSessionCache::new();
        let id = MediaId::new();

        let first = cache.get_or_create(id, open_synthetic).unwrap();
        let second = cache
            .get_or_create(id, || panic!("must not reopen"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_open_failure_not_cached() {
        let cache = DecodeSessionCache::new();
        let id = MediaId::new();

        let result = cache.get_or_create(id, || {
            Err(FramecutError::UnsupportedFormat("no video track".into()))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());

        // Retry succeeds and caches.
        cache.get_or_create(id, open_synthetic).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_forces_reopen() {
        let cache = DecodeSessionCache::new();
        let id = MediaId::new();

        let first = cache.get_or_create(id, open_synthetic).unwrap();
        cache.invalidate(id);
        let second = cache.get_or_create(id, open_synthetic).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
