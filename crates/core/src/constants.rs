/// Constants used throughout the tiercache workspace
use std::time::Duration;

// Environment variable names
pub const TIERCACHE_LOG_VAR: &str = "TIERCACHE_LOG";
pub const TIERCACHE_CONFIG_VAR: &str = "TIERCACHE_CONFIG";
pub const TIERCACHE_MAX_ENTRIES_VAR: &str = "TIERCACHE_MAX_ENTRIES";
pub const TIERCACHE_DEFAULT_TTL_VAR: &str = "TIERCACHE_DEFAULT_TTL_SECS";
pub const TIERCACHE_EVICTION_POLICY_VAR: &str = "TIERCACHE_EVICTION_POLICY";
pub const TIERCACHE_STORAGE_PREFIX_VAR: &str = "TIERCACHE_STORAGE_PREFIX";
pub const TIERCACHE_STORAGE_DIR_VAR: &str = "TIERCACHE_STORAGE_DIR";
pub const TIERCACHE_MAX_CRITICAL_VAR: &str = "TIERCACHE_MAX_CRITICAL_ENTRIES";
pub const TIERCACHE_MIN_INTERVAL_VAR: &str = "TIERCACHE_MIN_INTERVAL_MS";
pub const TIERCACHE_GEO_PRECISION_VAR: &str = "TIERCACHE_GEO_PRECISION";
pub const TIERCACHE_GEO_TTL_VAR: &str = "TIERCACHE_GEO_TTL_SECS";
pub const TIERCACHE_NOMINATIM_URL_VAR: &str = "TIERCACHE_NOMINATIM_URL";
pub const TIERCACHE_USER_AGENT_VAR: &str = "TIERCACHE_USER_AGENT";

// Cache defaults
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_STORAGE_PREFIX: &str = "tiercache:";
pub const DEFAULT_EVICTION_POLICY: &str = "lru";
pub const NAMESPACE_SEPARATOR: char = ':';
pub const MAX_KEY_LENGTH: usize = 1024;

// Rate limiting defaults (Nominatim usage policy: one request per second)
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

// Geocoding defaults
pub const DEFAULT_GEO_NAMESPACE: &str = "geo";
pub const DEFAULT_GEO_PRECISION: u32 = 4;
pub const DEFAULT_GEO_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("tiercache/", env!("CARGO_PKG_VERSION"));
