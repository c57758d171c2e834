use anyhow::{Context, Result};
use serde_json::json;

use crate::collections::config;
use crate::commands::{CommandReport, authed_client, with_retries};

/// Upstream caps collection listings at this many rows per tag set.
const COLLECTION_ROWS: usize = 100;

/// List the public collections of one tag set, sorted by label.
pub fn run(tag_set_id: u64) -> Result<CommandReport> {
    let config = config::load()?;
    let (client, _) = authed_client(&config)?;

    let tag_set = client
        .tag_set(tag_set_id)
        .with_context(|| format!("failed to load tag set {tag_set_id}"))?;
    let mut collections = with_retries(config.retries, || {
        client.list_collections(tag_set_id, COLLECTION_ROWS, true)
    })?;
    collections.sort_by(|a, b| a.display_label().cmp(b.display_label()));

    let mut report = CommandReport::new("sets");
    report.detail(format!(
        "tag_set={} ({})",
        tag_set.label.as_deref().unwrap_or(&tag_set.name),
        tag_set.tag_sets_id
    ));
    if let Some(description) = &tag_set.description {
        report.detail(format!("description={description}"));
    }
    report.detail(format!("collections={}", collections.len()));
    for collection in &collections {
        report.detail(format!("{}\t{}", collection.tags_id, collection.display_label()));
    }

    report.set_data(json!({
        "name": tag_set.label.as_deref().unwrap_or(&tag_set.name),
        "description": tag_set.description,
        "collections": collections,
    }));
    Ok(report)
}
