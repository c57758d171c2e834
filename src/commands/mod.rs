pub mod details;
pub mod diff;
pub mod members;
pub mod push;
pub mod search;
pub mod sentence_stats;
pub mod sets;
pub mod status;

use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::collections::config::SyncConfig;
use crate::collections::member::MemberId;
use crate::error::UpstreamError;
use crate::mediacloud::client::MediaCloudClient;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
            data: None,
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }

    pub fn set_data(&mut self, data: serde_json::Value) {
        self.data = Some(data);
    }
}

/// Build the upstream client for the configured credential, failing before
/// any network traffic when the key is absent.
pub fn authed_client(config: &SyncConfig) -> Result<(MediaCloudClient, String)> {
    let api_key = config.require_api_key()?.to_string();
    let client =
        MediaCloudClient::new(config, &api_key).context("failed to build upstream client")?;
    Ok((client, api_key))
}

/// Retry a whole upstream operation, never an individual page: re-running
/// from the start is the only way to keep pagination state consistent.
/// Linear backoff, 250ms per completed attempt.
pub fn with_retries<T>(
    retries: usize,
    mut op: impl FnMut() -> Result<T, UpstreamError>,
) -> Result<T, UpstreamError> {
    let mut attempt = 0usize;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < retries => {
                warn!(attempt = attempt + 1, retries, %err, "upstream call failed, retrying");
                thread::sleep(Duration::from_millis(250 * (attempt as u64 + 1)));
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Parse a comma-separated id list into a set. Duplicates collapse; empty
/// segments (and a fully empty string) are allowed so a collection can be
/// cleared.
pub fn parse_member_ids(raw: &str) -> Result<BTreeSet<MemberId>> {
    let mut out = BTreeSet::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = part
            .parse::<MemberId>()
            .with_context(|| format!("invalid member id: {part}"))?;
        out.insert(id);
    }
    Ok(out)
}
