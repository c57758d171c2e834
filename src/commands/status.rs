use anyhow::Result;
use std::env;

use crate::collections::cache::key_fingerprint;
use crate::collections::config;
use crate::commands::CommandReport;

include!(concat!(env!("OUT_DIR"), "/env_allowlist.rs"));

/// Report the resolved configuration and flag environment problems without
/// touching the network.
pub fn run() -> Result<CommandReport> {
    let config = config::load()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("api_url={}", config.api_url));
    match &config.api_key {
        Some(key) => report.detail(format!("api_key=set fingerprint={}", key_fingerprint(key))),
        None => report.issue("MEDIACLOUD_API_KEY is not set; every upstream call requires it"),
    }
    report.detail(format!(
        "request_timeout_secs={}",
        config.request_timeout_secs
    ));
    report.detail(format!("cache_ttl_secs={}", config.cache_ttl_secs));
    report.detail(format!("retries={}", config.retries));

    match config::config_file_path() {
        Some(path) if path.is_file() => report.detail(format!("config_file={}", path.display())),
        Some(path) => report.detail(format!(
            "config_file={} (absent, defaults in effect)",
            path.display()
        )),
        None => report.detail("config_file=<none>"),
    }

    for (name, _) in env::vars() {
        if name.starts_with("COLLSYNC_") && !GENERATED_ENV_ALLOWLIST.contains(&name.as_str()) {
            report.issue(format!("unrecognized environment variable: {name}"));
        }
    }

    Ok(report)
}
