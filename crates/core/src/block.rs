//! Immutable, self-digesting blocks.

use crate::hash::{hash, Hash};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Entry recorded in the genesis block.
pub const GENESIS_MARKER: &str = "Genesis Block";

/// Creator identifier used when no account owner triggered the block.
pub const SYSTEM_CREATOR: &str = "SYSTEM";

/// The fields covered by a block digest, in hashing order.
#[derive(Serialize)]
struct DigestInput<'a> {
    previous_digest: &'a Hash,
    created_at: u64,
    creator_id: &'a str,
    entries: &'a [String],
}

impl DigestInput<'_> {
    fn digest(&self) -> Hash {
        let encoded = bincode::serialize(self).expect("serialization should not fail");
        hash(&encoded)
    }
}

/// One mining event: the log of what happened, linked to its predecessor.
///
/// Fields are private and there are no setters. The digest is computed once in
/// [`Block::new`]; a block obtained any other way (e.g. deserialized) keeps the
/// digest it carried, and [`Block::verify`] tells whether it still matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    previous_digest: Hash,
    created_at: u64,
    creator_id: String,
    entries: Vec<String>,
    digest: Hash,
}

impl Block {
    /// Build a block and seal it with its digest.
    pub fn new(
        previous_digest: Hash,
        created_at: u64,
        creator_id: impl Into<String>,
        entries: Vec<String>,
    ) -> Self {
        let creator_id = creator_id.into();
        let digest = DigestInput {
            previous_digest: &previous_digest,
            created_at,
            creator_id: &creator_id,
            entries: &entries,
        }
        .digest();

        Self {
            previous_digest,
            created_at,
            creator_id,
            entries,
            digest,
        }
    }

    /// Create the genesis block.
    pub fn genesis(creator_id: impl Into<String>, created_at: u64) -> Self {
        Self::new(
            Hash::ZERO,
            created_at,
            creator_id,
            vec![GENESIS_MARKER.to_string()],
        )
    }

    /// Get the current Unix timestamp.
    pub fn current_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    /// Get the digest of the previous block.
    pub fn previous_digest(&self) -> &Hash {
        &self.previous_digest
    }

    /// Get the creation time in Unix seconds.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Get the identifier of whoever triggered mining.
    pub fn creator_id(&self) -> &str {
        &self.creator_id
    }

    /// Get the entries in the order they were applied.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The digest stored at construction.
    pub fn digest(&self) -> &Hash {
        &self.digest
    }

    /// Get the number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Recompute the digest from the current contents.
    pub fn compute_digest(&self) -> Hash {
        DigestInput {
            previous_digest: &self.previous_digest,
            created_at: self.created_at,
            creator_id: &self.creator_id,
            entries: &self.entries,
        }
        .digest()
    }

    /// Whether the stored digest matches the contents.
    pub fn verify(&self) -> bool {
        self.compute_digest() == self.digest
    }

    /// Check if this block has the shape of a genesis block: no predecessor
    /// and the genesis marker as its only entry.
    pub fn is_genesis(&self) -> bool {
        self.previous_digest.is_zero() && self.entries == [GENESIS_MARKER]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Block {
        Block::new(
            hash(b"parent"),
            1_700_000_000,
            "r1",
            entries(&["Zakat Collection: 25.00 collected", "A (r1) → B (r2): 200.00"]),
        )
    }

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis(SYSTEM_CREATOR, 42);
        assert!(genesis.is_genesis());
        assert_eq!(genesis.previous_digest(), &Hash::ZERO);
        assert_eq!(genesis.entries(), &[GENESIS_MARKER.to_string()]);
        assert_eq!(genesis.creator_id(), "SYSTEM");
        assert!(genesis.verify());
        assert_eq!(genesis.entry_count(), 1);
    }

    #[test]
    fn test_genesis_requires_marker() {
        let unmarked = Block::new(Hash::ZERO, 42, SYSTEM_CREATOR, entries(&["A (r1): 1.00"]));
        assert!(!unmarked.is_genesis());

        let linked = Block::new(hash(b"parent"), 42, SYSTEM_CREATOR, entries(&[GENESIS_MARKER]));
        assert!(!linked.is_genesis());
    }

    #[test]
    fn test_digest_deterministic() {
        let a = sample();
        let b = sample();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.compute_digest(), a.compute_digest());
        assert!(a.verify());
    }

    #[test]
    fn test_digest_sensitive_to_every_field() {
        let base = sample();
        let e = base.entries().to_vec();

        let changed = [
            Block::new(hash(b"other"), base.created_at(), "r1", e.clone()),
            Block::new(*base.previous_digest(), base.created_at() + 1, "r1", e.clone()),
            Block::new(*base.previous_digest(), base.created_at(), "r2", e.clone()),
            Block::new(
                *base.previous_digest(),
                base.created_at(),
                "r1",
                entries(&["Zakat Collection: 25.00 collected"]),
            ),
        ];
        for block in &changed {
            assert_ne!(block.digest(), base.digest());
        }
    }

    #[test]
    fn test_digest_sensitive_to_entry_order() {
        let base = sample();
        let mut reversed = base.entries().to_vec();
        reversed.reverse();
        let swapped = Block::new(*base.previous_digest(), base.created_at(), "r1", reversed);
        assert_ne!(swapped.digest(), base.digest());
    }

    #[test]
    fn test_entry_boundaries_are_significant() {
        let a = Block::new(Hash::ZERO, 1, "r1", entries(&["ab", "c"]));
        let b = Block::new(Hash::ZERO, 1, "r1", entries(&["a", "bc"]));
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_tampered_block_fails_verification() {
        let block = sample();
        let mut value = serde_json::to_value(&block).unwrap();
        value["entries"][1] = serde_json::json!("A (r1) → B (r2): 9999.00");
        let tampered: Block = serde_json::from_value(value).unwrap();

        assert_eq!(tampered.digest(), block.digest());
        assert!(!tampered.verify());
    }
}
