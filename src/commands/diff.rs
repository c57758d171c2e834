use anyhow::Result;

use crate::collections::config;
use crate::collections::member::CollectionId;
use crate::collections::reconcile::{TagOp, reconcile};
use crate::commands::{CommandReport, authed_client, parse_member_ids, with_retries};

/// Dry-run reconciliation: show the operations that would converge the
/// collection to the given member set, without writing anything.
pub fn run(collection_id: CollectionId, sources_raw: &str) -> Result<CommandReport> {
    let desired = parse_member_ids(sources_raw)?;
    let config = config::load()?;
    let (client, _) = authed_client(&config)?;

    let ops = with_retries(config.retries, || {
        reconcile(&client, collection_id, &desired)
    })?;

    let mut report = CommandReport::new("diff");
    if ops.is_empty() {
        report.detail(format!(
            "collection {collection_id} already matches the requested membership"
        ));
    } else {
        for op in &ops {
            match op {
                TagOp::Remove(id) => report.detail(format!("remove\t{id}")),
                TagOp::Add(id) => report.detail(format!("add\t{id}")),
            }
        }
        let removals = ops
            .iter()
            .filter(|op| matches!(op, TagOp::Remove(_)))
            .count();
        report.detail(format!(
            "{} operations ({} removals, {} additions)",
            ops.len(),
            removals,
            ops.len() - removals
        ));
        report.detail(
            "computed from a point-in-time snapshot; concurrent edits can make it stale"
                .to_string(),
        );
    }

    report.set_data(serde_json::to_value(&ops)?);
    Ok(report)
}
