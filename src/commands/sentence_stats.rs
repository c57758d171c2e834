use anyhow::Result;

use crate::collections::config;
use crate::collections::member::CollectionId;
use crate::collections::sentences::{SENTENCE_SAMPLE_SIZE, source_sentence_stats};
use crate::commands::{CommandReport, authed_client, with_retries};

/// Per-source sentence counts over a random sample of the collection's
/// indexed sentences.
pub fn run(collection_id: CollectionId) -> Result<CommandReport> {
    let config = config::load()?;
    let (client, _) = authed_client(&config)?;

    let stats = with_retries(config.retries, || {
        source_sentence_stats(&client, &client, collection_id)
    })?;

    let mut report = CommandReport::new("sentence-stats");
    report.detail(format!("collection={collection_id}"));
    report.detail(format!("sample_size={SENTENCE_SAMPLE_SIZE}"));
    report.detail(format!("sources={}", stats.len()));
    for entry in &stats {
        report.detail(format!(
            "{}\t{}\t{}\t{:.4}",
            entry.member.id, entry.member.name, entry.sentence_count, entry.sample_share
        ));
    }

    report.set_data(serde_json::to_value(&stats)?);
    Ok(report)
}
