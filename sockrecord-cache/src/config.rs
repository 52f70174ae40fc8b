use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sockrecord_core::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_SNAPSHOT_PATH, ENV_CONFIG_PATH, ENV_SNAPSHOT_PATH,
    EXPECTED_ENDPOINT_COUNT,
};

/// Where the cache reads its endpoint list and writes its snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// JSON array of pre-registered endpoint strings
    pub config_path: PathBuf,
    /// Destination of `save_service`
    pub snapshot_path: PathBuf,
    /// Capacity hint for the endpoint list
    pub expected_endpoints: usize,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            expected_endpoints: EXPECTED_ENDPOINT_COUNT,
        }
    }
}

impl RecordConfig {
    /// Default paths, overridden by `SOCKRECORD_CONFIG_PATH` and
    /// `SOCKRECORD_SNAPSHOT_PATH` when set.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            config_path: std::env::var_os(ENV_CONFIG_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.config_path),
            snapshot_path: std::env::var_os(ENV_SNAPSHOT_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            expected_endpoints: defaults.expected_endpoints,
        }
    }

    /// Sets the endpoint list location.
    pub fn with_config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = path.as_ref().to_path_buf();
        self
    }

    /// Sets the snapshot location.
    pub fn with_snapshot_path(mut self, path: impl AsRef<Path>) -> Self {
        self.snapshot_path = path.as_ref().to_path_buf();
        self
    }

    /// Both resources inside `dir`, using the default file names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::default()
            .with_config_path(dir.join("runtimeList.conf"))
            .with_snapshot_path(dir.join("tmpResult.json"))
    }
}
