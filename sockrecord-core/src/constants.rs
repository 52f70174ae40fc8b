//! Well-known locations and sizing hints.

// ═══════════════════════════════════════════════════════════════════════════════
// RESOURCE PATHS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default location of the pre-registered endpoint list (JSON array of strings).
pub const DEFAULT_CONFIG_PATH: &str = "/etc/kubernetes/runtimeList.conf";

/// Default location of the diagnostic snapshot written by `save_service`.
pub const DEFAULT_SNAPSHOT_PATH: &str = "/etc/kubernetes/tmpResult.json";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const ENV_CONFIG_PATH: &str = "SOCKRECORD_CONFIG_PATH";

/// Environment variable overriding [`DEFAULT_SNAPSHOT_PATH`].
pub const ENV_SNAPSHOT_PATH: &str = "SOCKRECORD_SNAPSHOT_PATH";

// ═══════════════════════════════════════════════════════════════════════════════
// SIZING
// ═══════════════════════════════════════════════════════════════════════════════

/// Expected number of distinct runtime endpoints on a node.
/// Only used as a capacity hint.
pub const EXPECTED_ENDPOINT_COUNT: usize = 3;

/// Default freshness requirement used by the CLI, in seconds.
pub const DEFAULT_FRESHNESS_SECS: u64 = 120;

// ═══════════════════════════════════════════════════════════════════════════════
// ENDPOINT SCHEMES
// ═══════════════════════════════════════════════════════════════════════════════

/// Scheme prefix for unix domain socket endpoints.
pub const UNIX_SCHEME: &str = "unix://";

/// Scheme prefix for TCP endpoints.
pub const TCP_SCHEME: &str = "tcp://";
