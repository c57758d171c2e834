use std::time::Duration;

use anyhow::Result;
use chrono::Utc;

use crate::collections::cache::{SnapshotCache, key_fingerprint};
use crate::collections::config;
use crate::collections::member::CollectionId;
use crate::commands::{CommandReport, authed_client, with_retries};

/// List the complete, sorted membership of each requested collection. A
/// collection repeated in the argument list is fetched once and served
/// from the snapshot cache afterwards.
pub fn run(collection_ids: &[CollectionId]) -> Result<CommandReport> {
    let config = config::load()?;
    let (client, api_key) = authed_client(&config)?;
    let fingerprint = key_fingerprint(&api_key);
    let mut cache = SnapshotCache::new(Duration::from_secs(config.cache_ttl_secs));

    let mut report = CommandReport::new("members");
    report.detail(format!("generated_at={}", Utc::now().to_rfc3339()));

    let mut payload = Vec::new();
    for &collection_id in collection_ids {
        let snapshot = with_retries(config.retries, || {
            cache.fetch_through(&fingerprint, &client, collection_id)
        })?;

        report.detail(format!(
            "collection {collection_id}: {} members",
            snapshot.len()
        ));
        for member in &snapshot.members {
            report.detail(format!("{}\t{}\t{}", member.id, member.name, member.url));
        }
        payload.push(snapshot);
    }

    report.set_data(serde_json::to_value(&payload)?);
    Ok(report)
}
