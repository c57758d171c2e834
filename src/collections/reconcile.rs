use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::collections::member::{CollectionId, MemberId};
use crate::collections::pager::{MembershipSource, fetch_all_members};
use crate::error::UpstreamError;

/// One membership write against the upstream tagging API. The upstream
/// treats a batch of these as unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "member_id", rename_all = "lowercase")]
pub enum TagOp {
    Add(MemberId),
    Remove(MemberId),
}

/// The minimal operation list converging `current` to `desired`: removals
/// for members only in `current`, then additions for members only in
/// `desired`. A member in both sets never produces an operation.
pub fn membership_ops(current: &BTreeSet<MemberId>, desired: &BTreeSet<MemberId>) -> Vec<TagOp> {
    let mut ops: Vec<TagOp> = current
        .difference(desired)
        .map(|id| TagOp::Remove(*id))
        .collect();
    ops.extend(desired.difference(current).map(|id| TagOp::Add(*id)));
    ops
}

/// Compute the operations that converge the live membership of
/// `collection_id` to `desired`.
///
/// Reads a fresh snapshot via [`fetch_all_members`]; never writes.
/// Applying the returned batch and reconciling again yields an empty list,
/// provided nothing else mutated the collection in between. That window is
/// unguarded: the snapshot carries no version token, so a concurrent
/// writer can make the computed batch stale.
pub fn reconcile(
    source: &impl MembershipSource,
    collection_id: CollectionId,
    desired: &BTreeSet<MemberId>,
) -> Result<Vec<TagOp>, UpstreamError> {
    let current = fetch_all_members(source, collection_id)?.ids();
    let ops = membership_ops(&current, desired);
    debug!(
        collection_id,
        current = current.len(),
        desired = desired.len(),
        ops = ops.len(),
        "reconciled membership"
    );
    Ok(ops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::member::Member;
    use crate::collections::pager::tests::{FakeSource, member};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    fn ids(raw: &[MemberId]) -> BTreeSet<MemberId> {
        raw.iter().copied().collect()
    }

    #[test]
    fn matching_membership_is_a_no_op() {
        let source = FakeSource {
            members: vec![member(1, "a"), member(2, "b"), member(3, "c")],
        };

        let ops = reconcile(&source, 5, &ids(&[1, 2, 3])).expect("reconcile");

        assert!(ops.is_empty());
    }

    #[test]
    fn overlap_produces_only_the_outstanding_ops() {
        let source = FakeSource {
            members: vec![member(1, "a"), member(2, "b"), member(3, "c")],
        };

        let ops = reconcile(&source, 5, &ids(&[2, 3, 4])).expect("reconcile");

        assert_eq!(ops, vec![TagOp::Remove(1), TagOp::Add(4)]);
    }

    #[test]
    fn removals_come_before_additions() {
        let ops = membership_ops(&ids(&[1, 2]), &ids(&[3, 4]));

        assert_eq!(
            ops,
            vec![
                TagOp::Remove(1),
                TagOp::Remove(2),
                TagOp::Add(3),
                TagOp::Add(4),
            ]
        );
    }

    #[test]
    fn add_and_remove_sets_never_intersect() {
        let current = ids(&[1, 2, 3, 10, 11]);
        let desired = ids(&[2, 3, 4, 11, 12]);

        let ops = membership_ops(&current, &desired);

        let added: BTreeSet<MemberId> = ops
            .iter()
            .filter_map(|op| match op {
                TagOp::Add(id) => Some(*id),
                TagOp::Remove(_) => None,
            })
            .collect();
        let removed: BTreeSet<MemberId> = ops
            .iter()
            .filter_map(|op| match op {
                TagOp::Remove(id) => Some(*id),
                TagOp::Add(_) => None,
            })
            .collect();
        assert!(added.is_disjoint(&removed));
        assert_eq!(ops.len(), added.len() + removed.len());
    }

    /// Upstream stand-in whose membership the test can mutate by applying
    /// an operation batch, for exercising reconcile-apply-reconcile.
    struct MutableSource {
        members: RefCell<BTreeMap<MemberId, Member>>,
    }

    impl MutableSource {
        fn with_ids(raw: &[MemberId]) -> Self {
            let members = raw
                .iter()
                .map(|&id| (id, member(id, &format!("source {id}"))))
                .collect();
            Self {
                members: RefCell::new(members),
            }
        }

        fn apply(&self, ops: &[TagOp]) {
            let mut members = self.members.borrow_mut();
            for op in ops {
                match op {
                    TagOp::Add(id) => {
                        members.insert(*id, member(*id, &format!("source {id}")));
                    }
                    TagOp::Remove(id) => {
                        members.remove(id);
                    }
                }
            }
        }
    }

    impl MembershipSource for MutableSource {
        fn list_members_page(
            &self,
            _collection_id: crate::collections::member::CollectionId,
            after_id: MemberId,
            page_size: usize,
        ) -> Result<Vec<Member>, UpstreamError> {
            let page: Vec<Member> = self
                .members
                .borrow()
                .range(after_id + 1..)
                .take(page_size)
                .map(|(_, m)| m.clone())
                .collect();
            Ok(page)
        }
    }

    #[test]
    fn applying_the_batch_makes_the_next_reconcile_empty() {
        let source = MutableSource::with_ids(&[1, 2, 3]);
        let desired = ids(&[2, 3, 4]);

        let first = reconcile(&source, 5, &desired).expect("first reconcile");
        assert_eq!(first.len(), 2);
        source.apply(&first);

        let second = reconcile(&source, 5, &desired).expect("second reconcile");
        assert!(second.is_empty());
    }
}
