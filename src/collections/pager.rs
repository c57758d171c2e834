use std::collections::BTreeMap;

use tracing::debug;

use crate::collections::member::{CollectionId, Member, MemberId, MembershipSnapshot};
use crate::error::UpstreamError;

/// The upstream only hands out bounded pages; this is its cap.
pub const PAGE_SIZE: usize = 100;

/// The one upstream capability membership reads depend on: a page of
/// members of `collection_id` whose ids are strictly greater than
/// `after_id`, in arbitrary order, at most `page_size` long.
pub trait MembershipSource {
    fn list_members_page(
        &self,
        collection_id: CollectionId,
        after_id: MemberId,
        page_size: usize,
    ) -> Result<Vec<Member>, UpstreamError>;
}

/// Fetch every member of `collection_id` by walking the cursor-paginated
/// listing to exhaustion.
///
/// The cursor starts at 0 and advances to the id of the last member of each
/// non-empty page; an empty page ends the walk. Termination rests on the
/// upstream contract that a page for cursor X contains only ids > X.
/// Individual pages carry no global name order, so sorting happens once,
/// after the last page. A member id seen on two pages (a cursor-window
/// shift upstream) is collapsed to its last occurrence.
pub fn fetch_all_members(
    source: &impl MembershipSource,
    collection_id: CollectionId,
) -> Result<MembershipSnapshot, UpstreamError> {
    let mut collected: Vec<Member> = Vec::new();
    let mut after_id: MemberId = 0;

    loop {
        let page = source.list_members_page(collection_id, after_id, PAGE_SIZE)?;
        let Some(last) = page.last() else {
            break;
        };
        debug!(collection_id, after_id, page_len = page.len(), "fetched membership page");
        after_id = last.id;
        collected.extend(page);
    }

    let mut by_id: BTreeMap<MemberId, Member> = BTreeMap::new();
    for member in collected {
        let id = member.id;
        if by_id.insert(id, member).is_some() {
            debug!(collection_id, member_id = id, "member repeated across pages, keeping last");
        }
    }

    let mut members: Vec<Member> = by_id.into_values().collect();
    members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    Ok(MembershipSnapshot {
        collection_id,
        members,
    })
}
