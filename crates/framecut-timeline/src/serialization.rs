//! Session serialization with versioning and migration.
//!
//! Uses JSON with a schema version field for forward-compatible persistence.
//! Media pixel data is not stored here; the blob store keeps it under the
//! same `MediaId` keys.

use framecut_core::{FramecutError, Result};
use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::media_bin::MediaBin;
use crate::store::TimelineStore;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// The persisted editing state: everything needed to rebuild a session
/// except the media bytes themselves.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    /// Uploaded asset metadata.
    pub bin: MediaBin,
    /// All clips in insertion order.
    pub clips: Vec<Clip>,
    /// Playhead position in seconds.
    pub current_time: f64,
    /// Total timeline length in seconds.
    pub timeline_duration: f64,
}

/// Versioned session file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionFile {
    /// Schema version for migration.
    pub version: u32,
    /// The session data.
    pub session: SessionData,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl SessionFile {
    /// Snapshot a live store and bin into a persistable file.
    pub fn capture(store: &TimelineStore, bin: &MediaBin) -> Self {
        Self {
            version: CURRENT_VERSION,
            session: SessionData {
                bin: bin.clone(),
                clips: store.clips().to_vec(),
                current_time: store.current_time(),
                timeline_duration: store.timeline_duration(),
            },
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Rebuild a live store and bin from this file. Subscribers start empty;
    /// callers re-attach the compositor bridge afterwards.
    pub fn restore(self) -> (TimelineStore, MediaBin) {
        let SessionData {
            bin,
            clips,
            current_time,
            timeline_duration,
        } = self.session;
        (
            TimelineStore::from_parts(clips, timeline_duration, current_time),
            bin,
        )
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| FramecutError::Serialization(format!("Failed to serialize session: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| FramecutError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(FramecutError::Serialization(format!(
                "Session file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| FramecutError::Serialization(format!("Failed to parse session: {}", e)))
    }

    /// Save session to a file path.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Load session from a file path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 → v1: bare SessionData without the version wrapper
                if data.get("version").is_none() {
                    data = serde_json::json!({
                        "version": 1,
                        "session": data,
                        "app_version": "0.1.0",
                    });
                }
                version = 1;
            }
            _ => {
                return Err(FramecutError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
