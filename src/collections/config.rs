use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.mediacloud.org/api/v2";

/// Resolved settings for one invocation: defaults, overlaid by the optional
/// JSON config file, overlaid by environment variables. The API key only
/// ever comes from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub retries: usize,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            cache_ttl_secs: 300,
            retries: 0,
            api_key: None,
        }
    }
}

impl SyncConfig {
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("MEDIACLOUD_API_KEY is not set; every upstream call requires it")
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
struct PartialSyncConfig {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    cache_ttl_secs: Option<u64>,
    retries: Option<usize>,
}

fn apply_file_overlay(config: &mut SyncConfig, partial: PartialSyncConfig) {
    if let Some(api_url) = partial.api_url {
        config.api_url = api_url;
    }
    if let Some(secs) = partial.request_timeout_secs {
        config.request_timeout_secs = secs;
    }
    if let Some(secs) = partial.cache_ttl_secs {
        config.cache_ttl_secs = secs;
    }
    if let Some(retries) = partial.retries {
        config.retries = retries;
    }
}

fn env_non_empty(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env_non_empty(var) {
        Some(v) => v.parse::<u64>().ok().unwrap_or(fallback),
        None => fallback,
    }
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env_non_empty(var) {
        Some(v) => v.parse::<usize>().ok().unwrap_or(fallback),
        None => fallback,
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = env_non_empty("COLLSYNC_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(".collsync/config.json"))
}

pub fn load() -> Result<SyncConfig> {
    let mut config = SyncConfig::default();

    if let Some(path) = config_file_path()
        && path.is_file()
    {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let partial: PartialSyncConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        apply_file_overlay(&mut config, partial);
    }

    if let Some(api_url) = env_non_empty("MEDIACLOUD_API_URL") {
        config.api_url = api_url;
    }
    config.request_timeout_secs =
        env_or_u64("COLLSYNC_REQUEST_TIMEOUT_SECS", config.request_timeout_secs);
    config.cache_ttl_secs = env_or_u64("COLLSYNC_CACHE_TTL_SECS", config.cache_ttl_secs);
    config.retries = env_or_usize("COLLSYNC_RETRIES", config.retries);
    config.api_key = env_non_empty("MEDIACLOUD_API_KEY");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overlay_replaces_only_present_fields() {
        let mut config = SyncConfig::default();
        let partial: PartialSyncConfig =
            serde_json::from_str(r#"{"api_url": "https://indexer.test/v2", "retries": 3}"#)
                .expect("parse");

        apply_file_overlay(&mut config, partial);

        assert_eq!(config.api_url, "https://indexer.test/v2");
        assert_eq!(config.retries, 3);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.cache_ttl_secs, 300);
    }

    #[test]
    fn unknown_file_fields_are_ignored() {
        let partial: PartialSyncConfig =
            serde_json::from_str(r#"{"cache_ttl_secs": 10, "comment": "scratch"}"#).expect("parse");

        let mut config = SyncConfig::default();
        apply_file_overlay(&mut config, partial);

        assert_eq!(config.cache_ttl_secs, 10);
    }

    #[test]
    fn missing_api_key_is_a_terminal_config_error() {
        let config = SyncConfig::default();
        let err = config.require_api_key().expect_err("must fail");
        assert!(err.to_string().contains("MEDIACLOUD_API_KEY"));
    }
}
