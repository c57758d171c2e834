use anyhow::Result;

use crate::collections::config;
use crate::collections::member::{CollectionId, Member};
use crate::commands::{CommandReport, authed_client, with_retries};

/// Search results are for interactive picking; keep them short.
const MAX_SOURCES: usize = 20;

/// Keyword search over media sources, optionally restricted to one
/// collection's members. A literal `*` keyword means "no name filter".
pub fn run(keyword: &str, collection: Option<CollectionId>) -> Result<CommandReport> {
    let config = config::load()?;
    let (client, _) = authed_client(&config)?;

    let cleaned = match keyword {
        "*" => None,
        other => Some(other),
    };
    let results = with_retries(config.retries, || {
        client.media_search(cleaned, collection, MAX_SOURCES)
    })?;
    let sources: Vec<Member> = results.into_iter().map(Member::from).collect();

    let mut report = CommandReport::new("search");
    report.detail(format!("matches={}", sources.len()));
    for member in &sources {
        report.detail(format!("{}\t{}\t{}", member.id, member.name, member.url));
    }

    report.set_data(serde_json::to_value(&sources)?);
    Ok(report)
}
