//! Append-only chain of hash-linked blocks.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use zakatchain_core::{Block, Hash, SYSTEM_CREATOR};

/// Errors that can occur when building or extending a chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("nothing to record: a block needs at least one entry")]
    EmptyBatch,

    #[error("genesis block not found")]
    MissingGenesis,
}

pub type Result<T> = std::result::Result<T, ChainError>;

/// What is wrong with the first invalid block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityFault {
    /// The stored digest does not match the block's contents.
    DigestMismatch,
    /// `previous_digest` does not match the predecessor's digest.
    BrokenLink,
    /// Block 0 lacks the zero predecessor or the genesis marker entry.
    BadGenesis,
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::DigestMismatch => "stored digest does not match block contents",
            Self::BrokenLink => "previous digest does not match predecessor",
            Self::BadGenesis => "first block is not a genesis block",
        };
        f.write_str(msg)
    }
}

/// Error form of a failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("chain integrity violated at block {index}: {fault}")]
pub struct ChainIntegrityError {
    pub index: usize,
    pub fault: IntegrityFault,
}

/// Verdict of [`Chain::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub first_invalid_index: Option<usize>,
    pub fault: Option<IntegrityFault>,
}

impl ValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            first_invalid_index: None,
            fault: None,
        }
    }

    fn failed(index: usize, fault: IntegrityFault) -> Self {
        Self {
            valid: false,
            first_invalid_index: Some(index),
            fault: Some(fault),
        }
    }

    pub fn into_result(self) -> std::result::Result<(), ChainIntegrityError> {
        match (self.first_invalid_index, self.fault) {
            (Some(index), Some(fault)) => Err(ChainIntegrityError { index, fault }),
            _ => Ok(()),
        }
    }
}

/// Ordered, append-only sequence of blocks starting at a genesis block.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// A chain holding only a genesis block created by the system.
    pub fn new() -> Self {
        Self::with_genesis(SYSTEM_CREATOR, Block::current_timestamp())
    }

    /// A chain holding only a genesis block by `creator_id` at `now`.
    pub fn with_genesis(creator_id: &str, now: u64) -> Self {
        Self {
            blocks: vec![Block::genesis(creator_id, now)],
        }
    }

    /// Rebuild a chain from previously exported blocks.
    ///
    /// No validation happens here; call [`Chain::validate`] on the result.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self> {
        if blocks.is_empty() {
            return Err(ChainError::MissingGenesis);
        }
        Ok(Self { blocks })
    }

    /// Seal `entries` into a new block linked to the current tail.
    pub fn append(&mut self, entries: Vec<String>, creator_id: &str, now: u64) -> Result<&Block> {
        if entries.is_empty() {
            return Err(ChainError::EmptyBatch);
        }
        let block = Block::new(*self.tail().digest(), now, creator_id, entries);
        self.blocks.push(block);
        Ok(self.tail())
    }

    /// Get the latest block.
    pub fn tail(&self) -> &Block {
        // Every constructor guarantees at least the genesis block.
        &self.blocks[self.blocks.len() - 1]
    }

    /// Get the first block.
    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// Get the number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; a chain holds at least its genesis block.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get a block by index.
    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    /// Iterate over blocks from genesis to tail.
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Get all blocks as a slice.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Check if the whole chain validates.
    pub fn is_valid(&self) -> bool {
        self.validate().valid
    }

    /// Walk from genesis forward and report the first block that fails its
    /// checks. Block 0 must be a genesis block; every later block must link
    /// to its predecessor.
    pub fn validate(&self) -> ValidationResult {
        let mut previous: Option<&Block> = None;

        for (index, block) in self.blocks.iter().enumerate() {
            if !block.verify() {
                return ValidationResult::failed(index, IntegrityFault::DigestMismatch);
            }
            match previous {
                None if !block.is_genesis() => {
                    return ValidationResult::failed(index, IntegrityFault::BadGenesis);
                }
                Some(prev) if block.previous_digest() != prev.digest() => {
                    return ValidationResult::failed(index, IntegrityFault::BrokenLink);
                }
                _ => {}
            }
            previous = Some(block);
        }

        ValidationResult::ok()
    }

    /// Digest of the latest block.
    pub fn tip_digest(&self) -> Hash {
        *self.tail().digest()
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zakatchain_core::GENESIS_MARKER;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn chain_of(n: usize) -> Chain {
        let mut chain = Chain::with_genesis(SYSTEM_CREATOR, 1_000);
        for i in 0..n {
            chain
                .append(vec![format!("A (r1) → B (r2): {}.00", i + 1)], "r1", 1_001 + i as u64)
                .unwrap();
        }
        chain
    }

    /// Export the chain, let `edit` change the JSON, and import it again.
    fn tampered(chain: &Chain, edit: impl FnOnce(&mut serde_json::Value)) -> Chain {
        let mut value = serde_json::to_value(chain.blocks()).unwrap();
        edit(&mut value);
        let blocks: Vec<Block> = serde_json::from_value(value).unwrap();
        Chain::from_blocks(blocks).unwrap()
    }

    #[test]
    fn test_genesis_only_chain() {
        let chain = Chain::new();
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());
        assert!(chain.is_valid());
        assert!(chain.tail().is_genesis());
        assert_eq!(chain.genesis().entries(), &[GENESIS_MARKER.to_string()]);
        assert_eq!(chain.genesis().creator_id(), SYSTEM_CREATOR);
    }

    #[test]
    fn test_append_links_to_tail() {
        let mut chain = Chain::new();
        let genesis_digest = chain.tip_digest();

        let block = chain.append(entries(&["x"]), "r1", 5).unwrap().clone();

        assert_eq!(block.previous_digest(), &genesis_digest);
        assert_eq!(block.creator_id(), "r1");
        assert_eq!(block.created_at(), 5);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.tail(), &block);
    }

    #[test]
    fn test_append_empty_batch_rejected() {
        let mut chain = Chain::new();
        assert_eq!(chain.append(vec![], "r1", 5), Err(ChainError::EmptyBatch));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_appended_chain_is_valid() {
        let chain = chain_of(5);
        assert_eq!(chain.len(), 6);
        let result = chain.validate();
        assert!(result.valid);
        assert_eq!(result.first_invalid_index, None);
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn test_tampered_entries_detected() {
        let chain = chain_of(3);
        let broken = tampered(&chain, |v| {
            v[1]["entries"][0] = serde_json::json!("A (r1) → B (r2): 1000000.00");
        });

        let result = broken.validate();
        assert!(!result.valid);
        assert_eq!(result.first_invalid_index, Some(1));
        assert_eq!(result.fault, Some(IntegrityFault::DigestMismatch));
        assert_eq!(
            result.into_result(),
            Err(ChainIntegrityError {
                index: 1,
                fault: IntegrityFault::DigestMismatch,
            })
        );
    }

    #[test]
    fn test_tampered_digest_detected() {
        let chain = chain_of(3);
        let forged = zakatchain_core::hash(b"forged").to_string();
        let broken = tampered(&chain, |v| v[2]["digest"] = serde_json::json!(forged));

        let result = broken.validate();
        assert_eq!(result.first_invalid_index, Some(2));
        assert_eq!(result.fault, Some(IntegrityFault::DigestMismatch));
    }

    #[test]
    fn test_resealed_block_breaks_link() {
        // Rewriting a block and recomputing its digest still breaks its successor.
        let chain = chain_of(3);
        let original = chain.get(1).unwrap();
        let resealed = Block::new(
            *original.previous_digest(),
            original.created_at(),
            original.creator_id(),
            entries(&["rewritten history"]),
        );
        let mut blocks = chain.blocks().to_vec();
        blocks[1] = resealed;
        let broken = Chain::from_blocks(blocks).unwrap();

        let result = broken.validate();
        assert_eq!(result.first_invalid_index, Some(2));
        assert_eq!(result.fault, Some(IntegrityFault::BrokenLink));
    }

    #[test]
    fn test_reordered_blocks_detected() {
        let chain = chain_of(3);
        let mut blocks = chain.blocks().to_vec();
        blocks.swap(1, 2);
        let result = Chain::from_blocks(blocks).unwrap().validate();
        assert_eq!(result.first_invalid_index, Some(1));
        assert_eq!(result.fault, Some(IntegrityFault::BrokenLink));
    }

    #[test]
    fn test_bad_genesis_detected() {
        let chain = chain_of(2);
        let blocks = chain.blocks()[1..].to_vec();
        let result = Chain::from_blocks(blocks).unwrap().validate();
        assert_eq!(result.first_invalid_index, Some(0));
        assert_eq!(result.fault, Some(IntegrityFault::BadGenesis));
    }

    #[test]
    fn test_resealed_genesis_without_marker_detected() {
        let chain = chain_of(2);
        let genesis = chain.genesis();
        let forged = Block::new(
            *genesis.previous_digest(),
            genesis.created_at(),
            genesis.creator_id(),
            entries(&["A (r1): 1000000.00"]),
        );
        let mut blocks = chain.blocks().to_vec();
        blocks[0] = forged;

        let result = Chain::from_blocks(blocks).unwrap().validate();
        assert_eq!(result.first_invalid_index, Some(0));
        assert_eq!(result.fault, Some(IntegrityFault::BadGenesis));
    }

    #[test]
    fn test_from_blocks_requires_genesis() {
        assert!(matches!(
            Chain::from_blocks(vec![]),
            Err(ChainError::MissingGenesis)
        ));
    }

    #[test]
    fn test_iteration_order() {
        let chain = chain_of(2);
        let times: Vec<u64> = chain.iter().map(|b| b.created_at()).collect();
        assert_eq!(times, [1_000, 1_001, 1_002]);
        assert_eq!((&chain).into_iter().count(), 3);
    }
}
