use std::collections::HashMap;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::collections::member::{CollectionId, MembershipSnapshot};
use crate::collections::pager::{MembershipSource, fetch_all_members};
use crate::error::UpstreamError;

/// Short, non-reversible handle for an upstream API key, safe to use in
/// cache keys and diagnostics.
pub fn key_fingerprint(api_key: &str) -> String {
    let digest = Sha256::digest(api_key.as_bytes());
    digest.iter().take(6).map(|b| format!("{b:02x}")).collect()
}

struct CacheEntry {
    snapshot: MembershipSnapshot,
    stored_at: Instant,
}

/// TTL-bounded memoization of membership snapshots, keyed by
/// (credential fingerprint, collection id). Owned by whatever layer calls
/// the pager; the pager and reconciler themselves never see it, so
/// reconciliation always reads live membership.
pub struct SnapshotCache {
    ttl: Duration,
    entries: HashMap<(String, CollectionId), CacheEntry>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, fingerprint: &str, collection_id: CollectionId) -> Option<MembershipSnapshot> {
        let entry = self
            .entries
            .get(&(fingerprint.to_string(), collection_id))?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.snapshot.clone())
    }

    pub fn put(&mut self, fingerprint: &str, snapshot: MembershipSnapshot) {
        self.entries.insert(
            (fingerprint.to_string(), snapshot.collection_id),
            CacheEntry {
                snapshot,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every credential's entry for `collection_id`, e.g. after a
    /// membership write.
    pub fn invalidate(&mut self, collection_id: CollectionId) {
        self.entries.retain(|(_, cid), _| *cid != collection_id);
    }

    /// Serve from cache when fresh, otherwise fetch, store, and return.
    pub fn fetch_through(
        &mut self,
        fingerprint: &str,
        source: &impl MembershipSource,
        collection_id: CollectionId,
    ) -> Result<MembershipSnapshot, UpstreamError> {
        if let Some(snapshot) = self.get(fingerprint, collection_id) {
            debug!(collection_id, "membership snapshot served from cache");
            return Ok(snapshot);
        }
        let snapshot = fetch_all_members(source, collection_id)?;
        self.put(fingerprint, snapshot.clone());
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::pager::tests::{FakeSource, member};

    fn snapshot(collection_id: CollectionId, n: u64) -> MembershipSnapshot {
        MembershipSnapshot {
            collection_id,
            members: (1..=n).map(|id| member(id, &format!("source {id}"))).collect(),
        }
    }

    #[test]
    fn fresh_entries_are_served_per_credential() {
        let mut cache = SnapshotCache::new(Duration::from_secs(60));
        cache.put("aaaa", snapshot(1, 3));

        assert_eq!(cache.get("aaaa", 1).map(|s| s.len()), Some(3));
        assert!(cache.get("bbbb", 1).is_none(), "other credentials miss");
        assert!(cache.get("aaaa", 2).is_none(), "other collections miss");
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let mut cache = SnapshotCache::new(Duration::ZERO);
        cache.put("aaaa", snapshot(1, 3));

        assert!(cache.get("aaaa", 1).is_none());
    }

    #[test]
    fn invalidate_drops_the_collection_for_every_credential() {
        let mut cache = SnapshotCache::new(Duration::from_secs(60));
        cache.put("aaaa", snapshot(1, 3));
        cache.put("bbbb", snapshot(1, 2));
        cache.put("aaaa", snapshot(2, 1));

        cache.invalidate(1);

        assert!(cache.get("aaaa", 1).is_none());
        assert!(cache.get("bbbb", 1).is_none());
        assert_eq!(cache.get("aaaa", 2).map(|s| s.len()), Some(1));
    }

    #[test]
    fn fetch_through_hits_upstream_once_within_ttl() {
        let mut cache = SnapshotCache::new(Duration::from_secs(60));
        let source = FakeSource {
            members: vec![member(1, "a"), member(2, "b")],
        };

        let first = cache.fetch_through("aaaa", &source, 9).expect("first fetch");
        assert_eq!(first.len(), 2);

        // A cached snapshot survives upstream mutation until expiry.
        let source = FakeSource { members: Vec::new() };
        let second = cache.fetch_through("aaaa", &source, 9).expect("second fetch");
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn fingerprint_is_stable_and_key_free() {
        let fp = key_fingerprint("my-secret-key");
        assert_eq!(fp, key_fingerprint("my-secret-key"));
        assert_eq!(fp.len(), 12);
        assert!(!fp.contains("secret"));
        assert_ne!(fp, key_fingerprint("other-key"));
    }
}
