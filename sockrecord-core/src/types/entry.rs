//! Cache entry and snapshot types.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::types::HandlePair;

/// Handles cached for one endpoint.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// Established handles
    pub handles: HandlePair,
    /// When the handles were established
    pub last_active_at: DateTime<Utc>,
    /// How long after `last_active_at` the handles are trusted
    pub valid_for: Duration,
}

impl CacheEntry {
    /// Creates an entry.
    pub fn new(handles: HandlePair, last_active_at: DateTime<Utc>, valid_for: Duration) -> Self {
        Self {
            handles,
            last_active_at,
            valid_for,
        }
    }

    /// Instant after which the handles are no longer trusted.
    ///
    /// `None` when the window reaches past the representable time range,
    /// meaning the entry never expires.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        TimeDelta::from_std(self.valid_for)
            .ok()
            .and_then(|d| self.last_active_at.checked_add_signed(d))
    }

    /// Serializable description of this entry.
    pub fn to_snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            runtime: self.handles.runtime().endpoint().to_string(),
            image: self.handles.image().endpoint().to_string(),
            last_active_at: self.last_active_at,
            valid_for: self.valid_for,
        }
    }
}

/// Persisted form of a [`CacheEntry`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    /// Endpoint of the runtime handle
    pub runtime: String,
    /// Endpoint of the image handle
    pub image: String,
    /// When the handles were established
    pub last_active_at: DateTime<Utc>,
    /// Validity window
    pub valid_for: Duration,
}

/// Persisted form of the whole cache.
///
/// `endpoints` keeps registration order and may hold duplicates or keys
/// without an entry; `entries` holds at most one record per key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Known endpoint keys, in registration order
    pub endpoints: Vec<String>,
    /// Per-endpoint entries
    pub entries: BTreeMap<String, EntrySnapshot>,
}

impl RecordSnapshot {
    /// Parses a snapshot previously written as JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Renders the snapshot as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
