use std::collections::BTreeMap;

use serde::Serialize;

use crate::collections::member::{CollectionId, Member, MemberId};
use crate::collections::pager::{MembershipSource, fetch_all_members};
use crate::error::UpstreamError;

/// How many randomly sampled sentences the per-source counts are drawn from.
pub const SENTENCE_SAMPLE_SIZE: usize = 2000;

/// Upstream capability: media-source ids of a random sentence sample drawn
/// from everything indexed under `collection_id`.
pub trait SentenceSample {
    fn sample_sentence_media_ids(
        &self,
        collection_id: CollectionId,
        rows: usize,
    ) -> Result<Vec<MemberId>, UpstreamError>;
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceSentenceStats {
    #[serde(flatten)]
    pub member: Member,
    pub sentence_count: u64,
    /// Fraction of the full sample size attributed to this source.
    pub sample_share: f64,
}

/// Join a collection's membership with a random sentence sample, yielding
/// one count per member in membership order. Sampled sentences attributed
/// to a source no longer in the collection are dropped rather than counted.
pub fn source_sentence_stats(
    members: &impl MembershipSource,
    sentences: &impl SentenceSample,
    collection_id: CollectionId,
) -> Result<Vec<SourceSentenceStats>, UpstreamError> {
    let snapshot = fetch_all_members(members, collection_id)?;
    let sample = sentences.sample_sentence_media_ids(collection_id, SENTENCE_SAMPLE_SIZE)?;

    let mut counts: BTreeMap<MemberId, u64> = snapshot.members.iter().map(|m| (m.id, 0)).collect();
    for media_id in sample {
        if let Some(count) = counts.get_mut(&media_id) {
            *count += 1;
        }
    }

    Ok(snapshot
        .members
        .into_iter()
        .map(|member| {
            let sentence_count = counts.get(&member.id).copied().unwrap_or(0);
            SourceSentenceStats {
                sample_share: sentence_count as f64 / SENTENCE_SAMPLE_SIZE as f64,
                sentence_count,
                member,
            }
        })
        .collect())
}
