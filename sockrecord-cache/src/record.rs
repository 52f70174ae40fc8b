//! Endpoint handle cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use sockrecord_core::clock::{Clock, SystemClock};
use sockrecord_core::error::{Result, SockRecordError};
use sockrecord_core::traits::ServiceConnector;
use sockrecord_core::types::{CacheEntry, HandlePair, RecordSnapshot};

use crate::config::RecordConfig;
use crate::validity::{is_valid, shift};

/// Cache of runtime/image handle pairs keyed by endpoint.
///
/// Entries are created on the first lookup of an endpoint and are never
/// evicted. A cached pair is only handed out when it is still trusted at
/// the caller's freshness horizon; otherwise the lookup fails and the entry
/// stays in place for a later, looser request.
///
/// # Concurrency
///
/// Mutating operations take `&mut self`. Use [`SharedServiceRecord`] when
/// several tasks share one cache.
///
/// [`SharedServiceRecord`]: crate::SharedServiceRecord
pub struct ServiceRecord<C> {
    /// Registered endpoint keys in registration order. May contain
    /// duplicates and keys without an entry.
    endpoints: Vec<String>,
    /// Endpoint → established handles
    entries: HashMap<String, CacheEntry>,
    config: RecordConfig,
    connector: C,
    clock: Arc<dyn Clock>,
    /// Why the endpoint list could not be loaded at construction, if it couldn't
    startup_error: Option<SockRecordError>,
    stats: RecordStats,
}

impl<C: ServiceConnector> ServiceRecord<C> {
    /// Creates an empty cache and loads the endpoint list on a best-effort basis.
    ///
    /// Never fails. A load failure is kept in [`startup_error`](Self::startup_error).
    pub async fn new(config: RecordConfig, connector: C) -> Self {
        Self::with_clock(config, connector, Arc::new(SystemClock)).await
    }

    /// Creates a cache with a custom time source.
    pub async fn with_clock(config: RecordConfig, connector: C, clock: Arc<dyn Clock>) -> Self {
        let mut record = Self {
            endpoints: Vec::with_capacity(config.expected_endpoints),
            entries: HashMap::with_capacity(config.expected_endpoints),
            config,
            connector,
            clock,
            startup_error: None,
            stats: RecordStats::default(),
        };

        if let Err(e) = record.load_config().await {
            debug!(error = %e, "Starting without pre-registered endpoints");
            record.startup_error = Some(e);
        }

        record
    }

    /// Replaces the endpoint list with the one stored at `config_path`.
    ///
    /// Returns the number of endpoints loaded. Entries are not touched;
    /// a listed endpoint is still dialed on its first lookup.
    #[instrument(skip(self), fields(path = %self.config.config_path.display()))]
    pub async fn load_config(&mut self) -> Result<usize> {
        let contents = fs::read(&self.config.config_path)
            .await
            .map_err(|source| SockRecordError::ConfigRead {
                path: self.config.config_path.clone(),
                source,
            })?;
        let endpoints: Vec<String> = serde_json::from_slice(&contents)
            .map_err(|e| SockRecordError::ConfigFormat(e.to_string()))?;

        let count = endpoints.len();
        self.endpoints = endpoints;
        debug!(count, "Loaded endpoint list");

        Ok(count)
    }

    /// Writes the current state as pretty-printed JSON to `snapshot_path`.
    ///
    /// The previous snapshot is replaced via a temporary sibling file
    /// (`<snapshot_path>.tmp`), which is removed again if the write fails.
    #[instrument(skip(self), fields(path = %self.config.snapshot_path.display()))]
    pub async fn save_service(&self) -> Result<()> {
        let snapshot = self.snapshot();
        let serialized = serde_json::to_vec_pretty(&snapshot)?;

        let path = &self.config.snapshot_path;
        let temp_path = temp_path_for(path);
        if let Err(e) = write_and_rename(&temp_path, path, &serialized).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        debug!(
            endpoints = snapshot.endpoints.len(),
            entries = snapshot.entries.len(),
            "Snapshot written"
        );
        Ok(())
    }

    /// Records handles for `endpoint`.
    ///
    /// Always appends `endpoint` to the endpoint list, even if it is already
    /// there, and overwrites any existing entry. Callers must already have
    /// decided that the endpoint is new or must be replaced.
    pub fn add(
        &mut self,
        endpoint: impl Into<String>,
        handles: HandlePair,
        active_at: DateTime<Utc>,
        valid_for: Duration,
    ) {
        let endpoint = endpoint.into();
        self.endpoints.push(endpoint.clone());
        self.entries
            .insert(endpoint, CacheEntry::new(handles, active_at, valid_for));
    }

    /// Returns handles for `runtime_endpoint`, dialing them on first use.
    ///
    /// - Both endpoints must be identical, otherwise `EndpointMismatch`.
    /// - Unknown endpoint: dials runtime then image with `required_freshness`
    ///   as the timeout and caches the pair with `required_freshness` as its
    ///   validity window. A dial failure is returned unchanged and nothing is cached.
    /// - Known endpoint: returns the cached pair if it is still trusted at
    ///   `now + required_freshness`, otherwise `StaleEntry`. A hit does not
    ///   refresh the entry's activity timestamp.
    #[instrument(skip(self))]
    pub async fn resolve_or_create(
        &mut self,
        runtime_endpoint: &str,
        image_endpoint: &str,
        required_freshness: Duration,
    ) -> Result<HandlePair> {
        if runtime_endpoint != image_endpoint {
            self.stats.mismatches += 1;
            return Err(SockRecordError::EndpointMismatch {
                runtime: runtime_endpoint.to_string(),
                image: image_endpoint.to_string(),
            });
        }
        let endpoint = runtime_endpoint;

        if let Some(entry) = self.entries.get(endpoint) {
            let now = self.clock.now();
            if !is_valid(entry.valid_for, required_freshness, entry.last_active_at, now) {
                self.stats.stale_rejections += 1;
                debug!(endpoint, "Cached handles too old for request");
                return Err(SockRecordError::StaleEntry {
                    endpoint: endpoint.to_string(),
                    deadline: entry.deadline().unwrap_or(DateTime::<Utc>::MAX_UTC),
                    expect_by: shift(now, required_freshness).unwrap_or(DateTime::<Utc>::MAX_UTC),
                });
            }

            self.stats.hits += 1;
            debug!(endpoint, "Reusing cached handles");
            return Ok(entry.handles.clone());
        }

        self.stats.misses += 1;
        let runtime = self
            .connector
            .connect_runtime(endpoint, required_freshness)
            .await?;
        let image = self
            .connector
            .connect_image(endpoint, required_freshness)
            .await?;

        let handles = HandlePair::new(runtime, image);
        let now = self.clock.now();
        self.add(endpoint, handles.clone(), now, required_freshness);
        self.stats.created += 1;
        debug!(endpoint, "Cached new handles");

        Ok(handles)
    }

    /// Point-in-time copy of the endpoint list and all entries.
    pub fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot {
            endpoints: self.endpoints.clone(),
            entries: self
                .entries
                .iter()
                .map(|(k, e)| (k.clone(), e.to_snapshot()))
                .collect(),
        }
    }

    /// Error raised while loading the endpoint list at construction.
    pub fn startup_error(&self) -> Option<&SockRecordError> {
        self.startup_error.as_ref()
    }

    /// Entry for `endpoint`, if handles were established for it.
    pub fn entry(&self, endpoint: &str) -> Option<&CacheEntry> {
        self.entries.get(endpoint)
    }

    /// Returns true if handles were established for `endpoint`.
    pub fn contains(&self, endpoint: &str) -> bool {
        self.entries.contains_key(endpoint)
    }

    /// Registered endpoints in registration order.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Number of endpoints with established handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no handles were established yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Paths this cache reads from and writes to.
    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    /// Lookup counters plus current sizes.
    pub fn stats(&self) -> RecordStats {
        RecordStats {
            registered_endpoints: self.endpoints.len(),
            entries: self.entries.len(),
            ..self.stats
        }
    }
}

/// `<path>.tmp`, keeping the original extension.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

async fn write_and_rename(temp_path: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(temp_path, path).await
}

/// Cache statistics.
///
/// Counters are diagnostics kept beside the cache, not part of its state:
/// they never appear in snapshots and never influence a lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordStats {
    /// Length of the endpoint list, duplicates included
    pub registered_endpoints: usize,
    /// Endpoints with established handles
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found no entry and dialed
    pub misses: u64,
    /// Entries created after successful dials
    pub created: u64,
    /// Lookups rejected because the entry was too old
    pub stale_rejections: u64,
    /// Lookups rejected before touching the cache because endpoints differed
    pub mismatches: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;
    use sockrecord_core::clock::ManualClock;
    use sockrecord_transport::MemoryConnector;
    use tempfile::{tempdir, TempDir};

    const SOCK: &str = "unix:///run/containerd/containerd.sock";
    const CRIO: &str = "unix:///var/run/crio/crio.sock";

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    struct Fixture {
        dir: TempDir,
        connector: Arc<MemoryConnector>,
        clock: Arc<ManualClock>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempdir().unwrap(),
                connector: Arc::new(MemoryConnector::new()),
                clock: Arc::new(ManualClock::new(t0())),
            }
        }

        fn config(&self) -> RecordConfig {
            RecordConfig::in_dir(self.dir.path())
        }

        async fn write_endpoint_list(&self, contents: &str) {
            fs::write(&self.config().config_path, contents).await.unwrap();
        }

        async fn record(&self) -> ServiceRecord<Arc<MemoryConnector>> {
            ServiceRecord::with_clock(self.config(), self.connector.clone(), self.clock.clone()).await
        }
    }

    #[tokio::test]
    async fn test_new_without_endpoint_list() {
        let fx = Fixture::new();
        let record = fx.record().await;

        assert!(record.is_empty());
        assert!(record.endpoints().is_empty());
        assert!(matches!(
            record.startup_error(),
            Some(SockRecordError::ConfigRead { .. })
        ));
    }

    #[tokio::test]
    async fn test_new_loads_endpoint_list() {
        let fx = Fixture::new();
        fx.write_endpoint_list(&format!(r#"["{}", "{}"]"#, SOCK, CRIO)).await;

        let record = fx.record().await;
        assert!(record.startup_error().is_none());
        assert_eq!(record.endpoints(), &[SOCK.to_string(), CRIO.to_string()]);
        // Listed endpoints get no entry until looked up
        assert!(record.is_empty());
        assert!(!record.contains(SOCK));
    }

    #[tokio::test]
    async fn test_malformed_endpoint_list() {
        let fx = Fixture::new();
        fx.write_endpoint_list(r#"{"endpoints": 3}"#).await;

        let mut record = fx.record().await;
        assert!(matches!(
            record.startup_error(),
            Some(SockRecordError::ConfigFormat(_))
        ));

        let err = record.load_config().await.unwrap_err();
        assert!(err.is_config_error());
        assert!(record.endpoints().is_empty());
    }

    #[tokio::test]
    async fn test_load_config_replaces_list() {
        let fx = Fixture::new();
        let mut record = fx.record().await;
        let err = record.load_config().await.unwrap_err();
        assert!(matches!(err, SockRecordError::ConfigRead { .. }));
        assert!(err.is_config_error());

        fx.write_endpoint_list(&format!(r#"["{}"]"#, CRIO)).await;
        assert_eq!(record.load_config().await.unwrap(), 1);
        assert_eq!(record.endpoints(), &[CRIO.to_string()]);
    }

    #[tokio::test]
    async fn test_endpoint_mismatch() {
        let fx = Fixture::new();
        let mut record = fx.record().await;

        let err = record
            .resolve_or_create(SOCK, CRIO, Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SockRecordError::EndpointMismatch { .. }));
        assert!(record.endpoints().is_empty());
        assert_eq!(fx.connector.runtime_dials(), 0);
        assert_eq!(fx.connector.image_dials(), 0);
    }

    #[tokio::test]
    async fn test_first_lookup_creates_entry() {
        let fx = Fixture::new();
        let mut record = fx.record().await;

        let handles = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(record.endpoints(), &[SOCK.to_string()]);
        assert_eq!(record.len(), 1);
        let entry = record.entry(SOCK).unwrap();
        assert_eq!(entry.last_active_at, t0());
        assert_eq!(entry.valid_for, Duration::from_secs(10));
        assert!(entry.handles.shares_handles_with(&handles));
        assert_eq!(handles.runtime().endpoint(), SOCK);
        assert_eq!(handles.image().endpoint(), SOCK);
        assert_eq!(fx.connector.runtime_dials(), 1);
        assert_eq!(fx.connector.image_dials(), 1);
    }

    #[tokio::test]
    async fn test_hit_respects_freshness_horizon() {
        let fx = Fixture::new();
        let mut record = fx.record().await;
        let created = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();

        fx.clock.advance(TimeDelta::seconds(4));

        // deadline t0+10s >= expect t0+9s
        let hit = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(hit.shares_handles_with(&created));

        // deadline t0+10s < expect t0+11s
        let err = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(7))
            .await
            .unwrap_err();
        match err {
            SockRecordError::StaleEntry {
                deadline, expect_by, ..
            } => {
                assert_eq!(deadline, t0() + TimeDelta::seconds(10));
                assert_eq!(expect_by, t0() + TimeDelta::seconds(11));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(fx.connector.runtime_dials(), 1);
    }

    #[tokio::test]
    async fn test_hit_does_not_refresh_entry() {
        let fx = Fixture::new();
        let mut record = fx.record().await;
        record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(30))
            .await
            .unwrap();

        for _ in 0..2 {
            fx.clock.advance(TimeDelta::seconds(3));
            record
                .resolve_or_create(SOCK, SOCK, Duration::from_secs(1))
                .await
                .unwrap();
            let entry = record.entry(SOCK).unwrap();
            assert_eq!(entry.last_active_at, t0());
            assert_eq!(entry.valid_for, Duration::from_secs(30));
        }
    }

    #[tokio::test]
    async fn test_stale_entry_is_kept() {
        let fx = Fixture::new();
        let mut record = fx.record().await;
        let created = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();

        fx.clock.advance(TimeDelta::seconds(8));
        let err = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(err.is_stale());

        let looser = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(1))
            .await
            .unwrap();
        assert!(looser.shares_handles_with(&created));
        assert_eq!(record.endpoints().len(), 1);
        assert_eq!(fx.connector.runtime_dials(), 1);
    }

    #[tokio::test]
    async fn test_failed_dial_leaves_no_trace() {
        let fx = Fixture::new();
        let mut record = fx.record().await;

        fx.connector.fail_image(SOCK);
        let err = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SockRecordError::Connection { .. }));
        assert!(record.endpoints().is_empty());
        assert!(record.is_empty());
        assert_eq!(fx.connector.runtime_dials(), 1);

        fx.connector.heal();
        fx.connector.fail_runtime(SOCK);
        assert!(record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .is_err());
        assert_eq!(fx.connector.image_dials(), 1);
        assert_eq!(record.snapshot(), RecordSnapshot::default());

        fx.connector.heal();
        record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(record.len(), 1);
    }

    #[tokio::test]
    async fn test_listed_endpoint_without_entry_is_dialed() {
        let fx = Fixture::new();
        fx.write_endpoint_list(&format!(r#"["{}"]"#, SOCK)).await;
        let mut record = fx.record().await;

        record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(fx.connector.runtime_dials(), 1);
        assert_eq!(record.endpoints(), &[SOCK.to_string(), SOCK.to_string()]);
        assert_eq!(record.len(), 1);
    }

    #[tokio::test]
    async fn test_add_duplicate_last_write_wins() {
        let fx = Fixture::new();
        let mut record = fx.record().await;

        let first = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();
        let second = {
            let other = Fixture::new();
            let mut scratch = other.record().await;
            scratch
                .resolve_or_create(SOCK, SOCK, Duration::from_secs(1))
                .await
                .unwrap()
        };

        let later = t0() + TimeDelta::seconds(60);
        record.add(SOCK, second.clone(), later, Duration::from_secs(99));

        assert_eq!(record.endpoints(), &[SOCK.to_string(), SOCK.to_string()]);
        assert_eq!(record.len(), 1);
        assert!(record.contains(SOCK));
        let entry = record.entry(SOCK).unwrap();
        assert!(entry.handles.shares_handles_with(&second));
        assert!(!entry.handles.shares_handles_with(&first));
        assert_eq!(entry.last_active_at, later);
        assert_eq!(entry.valid_for, Duration::from_secs(99));
    }

    #[tokio::test]
    async fn test_save_service_round_trip() {
        let fx = Fixture::new();
        let mut record = fx.record().await;

        record
            .resolve_or_create(CRIO, CRIO, Duration::from_secs(20))
            .await
            .unwrap();
        fx.clock.advance(TimeDelta::seconds(1));
        record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();

        record.save_service().await.unwrap();

        let path = &record.config().snapshot_path;
        let written = fs::read_to_string(path).await.unwrap();
        assert!(written.contains('\n'));
        assert!(!temp_path_for(path).exists());

        let parsed = RecordSnapshot::from_json(&written).unwrap();
        assert_eq!(parsed, record.snapshot());
        assert_eq!(parsed.endpoints, vec![CRIO.to_string(), SOCK.to_string()]);
        let sock = &parsed.entries[SOCK];
        assert_eq!(sock.runtime, SOCK);
        assert_eq!(sock.last_active_at, t0() + TimeDelta::seconds(1));
        assert_eq!(sock.valid_for, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_save_service_overwrites() {
        let fx = Fixture::new();
        let mut record = fx.record().await;

        record.save_service().await.unwrap();
        let empty = fs::read_to_string(&record.config().snapshot_path).await.unwrap();
        assert_eq!(RecordSnapshot::from_json(&empty).unwrap(), RecordSnapshot::default());

        record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();
        record.save_service().await.unwrap();
        let full = fs::read_to_string(&record.config().snapshot_path).await.unwrap();
        assert_eq!(RecordSnapshot::from_json(&full).unwrap().entries.len(), 1);
    }

    #[tokio::test]
    async fn test_save_service_io_error() {
        let fx = Fixture::new();
        let config = fx
            .config()
            .with_snapshot_path(fx.dir.path().join("missing").join("snap.json"));
        let record = ServiceRecord::with_clock(config, fx.connector.clone(), fx.clock.clone()).await;

        let err = record.save_service().await.unwrap_err();
        assert!(matches!(err, SockRecordError::Io(_)));
        assert!(err.is_persistence_error());
        assert!(!err.is_config_error());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let fx = Fixture::new();
        // A non-empty directory cannot be replaced by a file
        let target = fx.dir.path().join("snap.json");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), b"x").unwrap();

        let config = fx.config().with_snapshot_path(&target);
        let mut record =
            ServiceRecord::with_clock(config, fx.connector.clone(), fx.clock.clone()).await;
        record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();

        let err = record.save_service().await.unwrap_err();
        assert!(err.is_persistence_error());
        assert!(!fx.dir.path().join("snap.json.tmp").exists());
        assert!(target.join("keep").exists());

        // Repeated failures leave nothing behind either
        assert!(record.save_service().await.is_err());
        assert!(!fx.dir.path().join("snap.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_service_keeps_tmp_extension_target() {
        let fx = Fixture::new();
        let target = fx.dir.path().join("snapshot.tmp");
        let config = fx.config().with_snapshot_path(&target);
        let mut record =
            ServiceRecord::with_clock(config, fx.connector.clone(), fx.clock.clone()).await;
        record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(temp_path_for(&target), fx.dir.path().join("snapshot.tmp.tmp"));
        record.save_service().await.unwrap();

        let written = fs::read_to_string(&target).await.unwrap();
        assert_eq!(RecordSnapshot::from_json(&written).unwrap(), record.snapshot());
        assert!(!fx.dir.path().join("snapshot.tmp.tmp").exists());
    }

    #[test]
    fn test_temp_path_appends_suffix() {
        assert_eq!(
            temp_path_for(Path::new("/etc/kubernetes/tmpResult.json")),
            PathBuf::from("/etc/kubernetes/tmpResult.json.tmp")
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_differing_endpoints_never_touch_cache(
            (runtime, image) in ("[a-z:/.]{0,16}", "[a-z:/.]{0,16}")
                .prop_filter("endpoints must differ", |(a, b)| a != b),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let fx = Fixture::new();
                let mut record = fx.record().await;
                record
                    .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
                    .await
                    .unwrap();
                record
                    .resolve_or_create(CRIO, CRIO, Duration::from_secs(10))
                    .await
                    .unwrap();

                let before = record.snapshot();
                let dials = (fx.connector.runtime_dials(), fx.connector.image_dials());

                let err = record
                    .resolve_or_create(&runtime, &image, Duration::from_secs(1))
                    .await
                    .unwrap_err();
                assert!(matches!(err, SockRecordError::EndpointMismatch { .. }));
                assert_eq!(record.endpoints().len(), before.endpoints.len());
                assert_eq!(record.snapshot(), before);
                assert_eq!(
                    (fx.connector.runtime_dials(), fx.connector.image_dials()),
                    dials
                );
            });
        }
    }

    #[tokio::test]
    async fn test_stats() {
        let fx = Fixture::new();
        fx.write_endpoint_list(&format!(r#"["{}"]"#, CRIO)).await;
        let mut record = fx.record().await;

        record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(10))
            .await
            .unwrap();
        record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(1))
            .await
            .unwrap();
        let _ = record
            .resolve_or_create(SOCK, SOCK, Duration::from_secs(60))
            .await;
        let _ = record.resolve_or_create(SOCK, CRIO, Duration::from_secs(1)).await;

        let stats = record.stats();
        assert_eq!(stats.registered_endpoints, 2);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.created, 1);
        assert_eq!(stats.stale_rejections, 1);
        assert_eq!(stats.mismatches, 1);
    }
}
