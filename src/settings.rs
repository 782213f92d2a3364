//! Layered settings: defaults, then a JSON config file, then the environment

use serde_json::{Map, Value};
use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tiercache_cache::{CacheConfig, Priority};
use tiercache_core::constants::*;
use tiercache_core::{Error, Result};
use tiercache_geo::{GeoConfig, NominatimConfig};
use tiercache_utils::RateLimiterConfig;

/// Where the effective settings last came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    ConfigFile(PathBuf),
    /// Comma-separated names of the variables that were applied
    EnvironmentVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub cache: CacheConfig,
    /// Directory for the file-backed persistent tier; `None` keeps it in memory
    pub storage_dir: Option<PathBuf>,
    pub rate_limit: RateLimiterConfig,
    pub geo: GeoConfig,
    pub nominatim: NominatimConfig,
    pub source: ConfigSource,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            storage_dir: None,
            rate_limit: RateLimiterConfig::for_nominatim(),
            geo: GeoConfig::default(),
            nominatim: NominatimConfig::default(),
            source: ConfigSource::Default,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;
        self.geo.validate()?;
        Ok(())
    }
}

/// Settings loader that handles precedence
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from the default config file location and the environment
    pub fn load() -> Result<Settings> {
        let path = Self::config_file_path()?;
        Self::load_with_file(&path)
    }

    /// Load settings using an explicit config file path
    ///
    /// A missing file is not an error; the file layer is skipped.
    pub fn load_with_file(path: &Path) -> Result<Settings> {
        let mut settings = Settings::default();

        if Self::apply_config_file(&mut settings, path)? {
            settings.source = ConfigSource::ConfigFile(path.to_path_buf());
        }

        let applied = Self::apply_env(&mut settings)?;
        if !applied.is_empty() {
            settings.source = ConfigSource::EnvironmentVariable(applied.join(","));
        }

        settings.validate()?;
        tracing::debug!(source = ?settings.source, "Loaded settings");
        Ok(settings)
    }

    /// `$TIERCACHE_CONFIG`, else `tiercache/config.json` under the XDG config directory
    pub fn config_file_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(TIERCACHE_CONFIG_VAR) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config_home)
        } else {
            dirs::config_dir().ok_or_else(|| {
                Error::configuration(
                    "Could not determine config directory; set XDG_CONFIG_HOME or TIERCACHE_CONFIG",
                )
            })?
        };

        Ok(config_dir.join("tiercache").join("config.json"))
    }

    fn apply_config_file(settings: &mut Settings, path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_system(path, "read config file", e))?;
        let file: Value = serde_json::from_str(&content)
            .map_err(|e| Error::json(format!("invalid config file {}", path.display()), e))?;

        if let Some(cache) = file.get("cache").and_then(Value::as_object) {
            if let Some(max_entries) = u64_field(cache, "max_entries") {
                settings.cache.max_entries = narrow(max_entries, "cache.max_entries")?;
            }
            if let Some(ttl) = u64_field(cache, "default_ttl_secs") {
                settings.cache.default_ttl = Some(Duration::from_secs(ttl));
            }
            if let Some(policy) = str_field(cache, "eviction_policy") {
                settings.cache.eviction_policy = policy.to_string();
            }
            if let Some(prefix) = str_field(cache, "storage_prefix") {
                settings.cache.storage_prefix = prefix.to_string();
            }
            if let Some(limit) = u64_field(cache, "max_critical_entries") {
                settings.cache.max_critical_entries =
                    Some(narrow(limit, "cache.max_critical_entries")?);
            }
            if let Some(dir) = str_field(cache, "storage_dir") {
                settings.storage_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(rate_limit) = file.get("rate_limit").and_then(Value::as_object) {
            if let Some(ms) = u64_field(rate_limit, "min_interval_ms") {
                settings.rate_limit.min_interval = Duration::from_millis(ms);
            }
        }

        if let Some(geo) = file.get("geo").and_then(Value::as_object) {
            if let Some(namespace) = str_field(geo, "namespace") {
                settings.geo.namespace = namespace.to_string();
            }
            if let Some(precision) = u64_field(geo, "precision") {
                settings.geo.precision = narrow(precision, "geo.precision")?;
            }
            if let Some(ttl) = u64_field(geo, "ttl_secs") {
                settings.geo.ttl = Duration::from_secs(ttl);
            }
            if let Some(priority) = geo.get("priority") {
                settings.geo.priority = serde_json::from_value::<Priority>(priority.clone())
                    .map_err(|e| Error::json("geo.priority must be \"normal\" or \"critical\"", e))?;
            }
            if let Some(encrypt) = geo.get("encrypt").and_then(Value::as_bool) {
                settings.geo.encrypt = encrypt;
            }
        }

        if let Some(nominatim) = file.get("nominatim").and_then(Value::as_object) {
            if let Some(url) = str_field(nominatim, "base_url") {
                settings.nominatim.base_url = url.to_string();
            }
            if let Some(agent) = str_field(nominatim, "user_agent") {
                settings.nominatim.user_agent = agent.to_string();
            }
            if let Some(language) = str_field(nominatim, "accept_language") {
                settings.nominatim.accept_language = Some(language.to_string());
            }
            if let Some(zoom) = u64_field(nominatim, "zoom") {
                settings.nominatim.zoom = narrow(zoom, "nominatim.zoom")?;
            }
            if let Some(timeout) = u64_field(nominatim, "timeout_secs") {
                settings.nominatim.timeout = Duration::from_secs(timeout);
            }
        }

        tracing::debug!(path = %path.display(), "Applied config file");
        Ok(true)
    }

    /// Returns the names of the variables that were set
    fn apply_env(settings: &mut Settings) -> Result<Vec<&'static str>> {
        let mut applied = Vec::new();

        if let Some(max_entries) = env_value::<usize>(TIERCACHE_MAX_ENTRIES_VAR)? {
            settings.cache.max_entries = max_entries;
            applied.push(TIERCACHE_MAX_ENTRIES_VAR);
        }
        if let Some(ttl) = env_value::<u64>(TIERCACHE_DEFAULT_TTL_VAR)? {
            settings.cache.default_ttl = Some(Duration::from_secs(ttl));
            applied.push(TIERCACHE_DEFAULT_TTL_VAR);
        }
        if let Some(policy) = env_value::<String>(TIERCACHE_EVICTION_POLICY_VAR)? {
            settings.cache.eviction_policy = policy;
            applied.push(TIERCACHE_EVICTION_POLICY_VAR);
        }
        if let Some(prefix) = env_value::<String>(TIERCACHE_STORAGE_PREFIX_VAR)? {
            settings.cache.storage_prefix = prefix;
            applied.push(TIERCACHE_STORAGE_PREFIX_VAR);
        }
        if let Some(limit) = env_value::<usize>(TIERCACHE_MAX_CRITICAL_VAR)? {
            settings.cache.max_critical_entries = Some(limit);
            applied.push(TIERCACHE_MAX_CRITICAL_VAR);
        }
        if let Some(dir) = env_value::<PathBuf>(TIERCACHE_STORAGE_DIR_VAR)? {
            settings.storage_dir = Some(dir);
            applied.push(TIERCACHE_STORAGE_DIR_VAR);
        }
        if let Some(ms) = env_value::<u64>(TIERCACHE_MIN_INTERVAL_VAR)? {
            settings.rate_limit.min_interval = Duration::from_millis(ms);
            applied.push(TIERCACHE_MIN_INTERVAL_VAR);
        }
        if let Some(precision) = env_value::<u32>(TIERCACHE_GEO_PRECISION_VAR)? {
            settings.geo.precision = precision;
            applied.push(TIERCACHE_GEO_PRECISION_VAR);
        }
        if let Some(ttl) = env_value::<u64>(TIERCACHE_GEO_TTL_VAR)? {
            settings.geo.ttl = Duration::from_secs(ttl);
            applied.push(TIERCACHE_GEO_TTL_VAR);
        }
        if let Some(url) = env_value::<String>(TIERCACHE_NOMINATIM_URL_VAR)? {
            settings.nominatim.base_url = url;
            applied.push(TIERCACHE_NOMINATIM_URL_VAR);
        }
        if let Some(agent) = env_value::<String>(TIERCACHE_USER_AGENT_VAR)? {
            settings.nominatim.user_agent = agent;
            applied.push(TIERCACHE_USER_AGENT_VAR);
        }

        Ok(applied)
    }
}

fn u64_field(object: &Map<String, Value>, name: &str) -> Option<u64> {
    object.get(name).and_then(Value::as_u64)
}

/// Converts a config integer to its target width, rejecting values that do not fit
fn narrow<T: TryFrom<u64>>(value: u64, field: &str) -> Result<T> {
    T::try_from(value)
        .map_err(|_| Error::configuration(format!("{field} is out of range: {value}")))
}

fn str_field<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    object.get(name).and_then(Value::as_str)
}

fn env_value<T>(variable: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::environment(variable, format!("cannot parse '{raw}': {e}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            Err(Error::environment(variable, "value is not valid unicode"))
        }
    }
}
