//! Mining pipeline: turns the pending batch into a block.
//!
//! One mining attempt runs `Idle → Assessing → Applying → Committing → Done`.
//! Account balances are snapshotted before the levy is assessed; if any step
//! after that fails the snapshot is restored, the pending queue is left as it
//! was and no block is appended.

use crate::accounts::{AccountError, AccountStore};
use crate::chain::{Chain, ChainError};
use crate::levy::{LevyAssessment, LevyPolicy, TaxEngine};
use crate::pending::PendingQueue;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use zakatchain_core::{Hash, PendingTransfer, SYSTEM_CREATOR};

/// Errors that can occur while mining.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiningError {
    #[error("no pending transfers to mine")]
    EmptyBatch,

    #[error("pending transfer {index} ({transfer}) rejected: {source}")]
    TransferRejected {
        /// Zero-based position in the pending queue.
        index: usize,
        transfer: PendingTransfer,
        #[source]
        source: AccountError,
    },

    #[error("levy assessment failed: {0}")]
    Levy(#[source] AccountError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

pub type Result<T> = std::result::Result<T, MiningError>;

/// Stage of a mining attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningStage {
    Idle,
    Assessing,
    Applying,
    Committing,
    Done,
    Aborted,
}

/// Chooses the identifier recorded as a block's creator.
pub trait CreatorPolicy {
    fn select(&self, batch: &[PendingTransfer], accounts: &AccountStore) -> String;
}

/// Owner of the first transfer's sender, or [`SYSTEM_CREATOR`] if there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstSenderOwner;

impl CreatorPolicy for FirstSenderOwner {
    fn select(&self, batch: &[PendingTransfer], accounts: &AccountStore) -> String {
        batch
            .first()
            .and_then(|t| accounts.get(&t.sender))
            .map(|a| a.owner_id.clone())
            .unwrap_or_else(|| SYSTEM_CREATOR.to_string())
    }
}

/// Always the same identifier.
#[derive(Debug, Clone)]
pub struct FixedCreator(pub String);

impl CreatorPolicy for FixedCreator {
    fn select(&self, _batch: &[PendingTransfer], _accounts: &AccountStore) -> String {
        self.0.clone()
    }
}

/// What a successful mining attempt produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    /// Position of the new block in the chain.
    pub index: usize,
    pub digest: Hash,
    pub previous_digest: Hash,
    pub creator_id: String,
    pub created_at: u64,
    pub levy: LevyAssessment,
    pub transfers_applied: usize,
    pub entries: Vec<String>,
}

/// A single mining attempt over borrowed ledger state.
pub struct MiningPipeline<'a> {
    accounts: &'a mut AccountStore,
    chain: &'a mut Chain,
    pending: &'a mut PendingQueue,
    levy: &'a LevyPolicy,
    creator: &'a dyn CreatorPolicy,
    stage: MiningStage,
}

impl<'a> MiningPipeline<'a> {
    /// Create a pipeline in the `Idle` stage.
    pub fn new(
        accounts: &'a mut AccountStore,
        chain: &'a mut Chain,
        pending: &'a mut PendingQueue,
        levy: &'a LevyPolicy,
        creator: &'a dyn CreatorPolicy,
    ) -> Self {
        Self {
            accounts,
            chain,
            pending,
            levy,
            creator,
            stage: MiningStage::Idle,
        }
    }

    /// Get the current stage.
    pub fn stage(&self) -> MiningStage {
        self.stage
    }

    /// Mine the pending batch into a block stamped with `now`.
    pub fn run(&mut self, now: u64) -> Result<BlockSummary> {
        if self.pending.is_empty() {
            return Err(MiningError::EmptyBatch);
        }

        let snapshot = self.accounts.snapshot();
        match self.execute(now) {
            Ok(summary) => {
                self.pending.clear();
                self.advance(MiningStage::Done);
                info!(
                    index = summary.index,
                    digest = %summary.digest,
                    creator = %summary.creator_id,
                    transfers = summary.transfers_applied,
                    levy = %summary.levy.total,
                    "block committed"
                );
                Ok(summary)
            }
            Err(e) => {
                self.accounts.restore(snapshot);
                self.advance(MiningStage::Aborted);
                warn!(error = %e, "mining aborted, balances restored");
                Err(e)
            }
        }
    }

    fn execute(&mut self, now: u64) -> Result<BlockSummary> {
        let creator_id = self.creator.select(self.pending.as_slice(), self.accounts);

        self.advance(MiningStage::Assessing);
        let levy = TaxEngine::assess(self.accounts, self.levy).map_err(MiningError::Levy)?;
        let mut entries = levy.entries();

        self.advance(MiningStage::Applying);
        let batch = self.pending.as_slice();
        let mut records = Vec::with_capacity(batch.len());
        for (index, transfer) in batch.iter().enumerate() {
            let rejected = |source| MiningError::TransferRejected {
                index,
                transfer: transfer.clone(),
                source,
            };
            self.accounts
                .apply_transfer(&transfer.sender, &transfer.receiver, transfer.amount)
                .map_err(rejected)?;
            records.push(transfer_record(self.accounts, transfer).map_err(rejected)?);
        }

        self.advance(MiningStage::Committing);
        let transfers_applied = records.len();
        entries.extend(records);
        let index = self.chain.len();
        let block = self.chain.append(entries, &creator_id, now)?;

        Ok(BlockSummary {
            index,
            digest: *block.digest(),
            previous_digest: *block.previous_digest(),
            creator_id,
            created_at: block.created_at(),
            levy,
            transfers_applied,
            entries: block.entries().to_vec(),
        })
    }

    fn advance(&mut self, next: MiningStage) {
        debug!(from = ?self.stage, to = ?next, "mining stage");
        self.stage = next;
    }
}

/// `sender (owner) → receiver (owner): amount`
fn transfer_record(
    accounts: &AccountStore,
    transfer: &PendingTransfer,
) -> std::result::Result<String, AccountError> {
    Ok(format!(
        "{} → {}: {}",
        accounts.label_of(&transfer.sender)?,
        accounts.label_of(&transfer.receiver)?,
        transfer.amount
    ))
}
