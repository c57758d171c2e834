use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Upstream-assigned, stable identifier of a media source.
pub type MemberId = u64;

/// Identifier of a tagged collection in the upstream service.
pub type CollectionId = u64;

/// One media source belonging to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub url: String,
}

/// The complete membership of one collection at one point in time,
/// sorted ascending by name, ties broken by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipSnapshot {
    pub collection_id: CollectionId,
    pub members: Vec<Member>,
}

impl MembershipSnapshot {
    pub fn ids(&self) -> BTreeSet<MemberId> {
        self.members.iter().map(|m| m.id).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
