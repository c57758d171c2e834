use anyhow::{Context, Result};
use serde_json::json;

use crate::collections::config;
use crate::collections::member::CollectionId;
use crate::collections::pager::fetch_all_members;
use crate::commands::{CommandReport, authed_client, with_retries};

/// Collection metadata joined with its tag set and full membership.
pub fn run(collection_id: CollectionId) -> Result<CommandReport> {
    let config = config::load()?;
    let (client, _) = authed_client(&config)?;

    let tag = client
        .tag(collection_id)
        .with_context(|| format!("failed to load collection {collection_id}"))?;
    let tag_set = client
        .tag_set(tag.tag_sets_id)
        .with_context(|| format!("failed to load tag set {}", tag.tag_sets_id))?;
    let snapshot = with_retries(config.retries, || fetch_all_members(&client, collection_id))?;

    let mut report = CommandReport::new("details");
    report.detail(format!("collection={} ({})", tag.display_label(), tag.tags_id));
    if let Some(description) = &tag.description {
        report.detail(format!("description={description}"));
    }
    report.detail(format!(
        "tag_set={} ({})",
        tag_set.label.as_deref().unwrap_or(&tag_set.name),
        tag_set.tag_sets_id
    ));
    if let Some(is_static) = tag.is_static {
        report.detail(format!("static={is_static}"));
    }
    report.detail(format!("members={}", snapshot.len()));
    for member in &snapshot.members {
        report.detail(format!("{}\t{}\t{}", member.id, member.name, member.url));
    }

    report.set_data(json!({
        "collection": tag,
        "tag_set": tag_set,
        "members": snapshot.members,
    }));
    Ok(report)
}
