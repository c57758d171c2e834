use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};

use crate::collections::config;
use crate::collections::member::CollectionId;
use crate::collections::reconcile::{TagOp, membership_ops, reconcile};
use crate::commands::{CommandReport, authed_client, parse_member_ids, with_retries};
use crate::mediacloud::client::MediaCloudClient;
use crate::mediacloud::types::{MediaTagWrite, TagWrite};

#[derive(Debug, Clone)]
pub struct PushOptions {
    pub collection_id: Option<CollectionId>,
    pub create: bool,
    pub tag_set: Option<u64>,
    pub sources: String,
    pub name: String,
    pub description: String,
    pub is_static: bool,
    pub show_on_stories: bool,
    pub show_on_media: bool,
}

impl PushOptions {
    fn tag_write(&self, tags_id: Option<u64>, tag_sets_id: Option<u64>) -> TagWrite {
        TagWrite {
            tags_id,
            tag_sets_id,
            tag: self.name.clone(),
            label: self.name.clone(),
            description: self.description.clone(),
            is_static: self.is_static,
            show_on_stories: self.show_on_stories,
            show_on_media: self.show_on_media,
        }
    }
}

/// Create or update a collection, then converge its membership.
///
/// Tag metadata writes are submitted exactly once: creation is not
/// idempotent, so the retry budget only covers reads and the membership
/// batch, whose add/remove entries are safe to replay.
pub fn run(opts: &PushOptions) -> Result<CommandReport> {
    let desired = parse_member_ids(&opts.sources)?;
    if opts.create && opts.collection_id.is_some() {
        bail!("--create starts a new collection; drop the collection id");
    }
    if opts.create && opts.tag_set.is_none() {
        bail!("--create requires --tag-set");
    }

    let config = config::load()?;
    let (client, _) = authed_client(&config)?;
    let mut report = CommandReport::new("push");

    let (collection_id, ops) = if opts.create {
        let tag = client
            .create_tag(&opts.tag_write(None, opts.tag_set))
            .context("failed to create collection")?;
        report.detail(format!(
            "created collection {} ({}) in tag set {}",
            tag.display_label(),
            tag.tags_id,
            tag.tag_sets_id
        ));
        (tag.tags_id, membership_ops(&BTreeSet::new(), &desired))
    } else {
        let Some(collection_id) = opts.collection_id else {
            bail!("a collection id is required unless --create is given");
        };
        let tag = client
            .update_tag(&opts.tag_write(Some(collection_id), None))
            .with_context(|| format!("failed to update collection {collection_id}"))?;
        report.detail(format!(
            "updated collection {} ({})",
            tag.display_label(),
            tag.tags_id
        ));
        let ops = with_retries(config.retries, || {
            reconcile(&client, collection_id, &desired)
        })?;
        (collection_id, ops)
    };

    submit_batch(&client, config.retries, collection_id, &ops, &mut report)?;
    report.set_data(serde_json::to_value(&ops)?);
    Ok(report)
}

fn submit_batch(
    client: &MediaCloudClient,
    retries: usize,
    collection_id: CollectionId,
    ops: &[TagOp],
    report: &mut CommandReport,
) -> Result<()> {
    if ops.is_empty() {
        report.detail("membership already converged; no batch submitted");
        return Ok(());
    }

    let writes: Vec<MediaTagWrite> = ops
        .iter()
        .map(|op| MediaTagWrite::from_op(*op, collection_id))
        .collect();
    with_retries(retries, || client.put_media_tags(&writes))
        .with_context(|| format!("failed to submit membership batch for {collection_id}"))?;

    let removals = ops
        .iter()
        .filter(|op| matches!(op, TagOp::Remove(_)))
        .count();
    report.detail(format!(
        "submitted {} operations ({} removals, {} additions)",
        ops.len(),
        removals,
        ops.len() - removals
    ));
    Ok(())
}
