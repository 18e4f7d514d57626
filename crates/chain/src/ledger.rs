//! Ledger session: the single owner of chain, accounts and pending queue.
//!
//! Front-ends hold one [`LedgerContext`] and call into it; nothing else keeps
//! ledger state. Mutating calls take `&mut self`, so a multi-threaded host has
//! to serialize them (e.g. behind one `Mutex<LedgerContext>`), which keeps a
//! mining attempt invisible until it has fully committed or fully rolled back.

use crate::accounts::{AccountError, AccountStore};
use crate::chain::{Chain, ValidationResult};
use crate::config::{ConfigError, LedgerConfig};
use crate::levy::TaxEngine;
use crate::pending::{PendingError, PendingQueue};
use crate::pipeline::{BlockSummary, CreatorPolicy, FirstSenderOwner, MiningError, MiningPipeline};
use thiserror::Error;
use tracing::{debug, info};
use zakatchain_core::{Amount, Block, Hash, PendingTransfer};

/// Errors that can occur when submitting a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Pending(#[from] PendingError),
}

/// Ledger statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStats {
    pub accounts: usize,
    pub blocks: usize,
    pub pending_transfers: usize,
    pub pending_capacity: usize,
    /// Sum of all balances; `None` if it overflows an [`Amount`].
    pub total_balance: Option<Amount>,
    /// Levy that would be collected if a block were mined now; `None` if it
    /// overflows an [`Amount`].
    pub levy_due: Option<Amount>,
    pub latest_digest: Hash,
    pub latest_creator: String,
    pub latest_timestamp: u64,
}

/// One ledger session.
pub struct LedgerContext {
    config: LedgerConfig,
    chain: Chain,
    accounts: AccountStore,
    pending: PendingQueue,
    creator_policy: Box<dyn CreatorPolicy + Send + Sync>,
}

impl LedgerContext {
    /// Create a ledger with a fresh genesis block.
    pub fn new(config: LedgerConfig) -> Result<Self, ConfigError> {
        Self::with_genesis_time(config, Block::current_timestamp())
    }

    pub fn with_genesis_time(config: LedgerConfig, now: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let chain = Chain::with_genesis(&config.genesis_creator, now);
        let pending = PendingQueue::with_capacity(config.max_pending);
        Ok(Self {
            config,
            chain,
            accounts: AccountStore::new(),
            pending,
            creator_policy: Box::new(FirstSenderOwner),
        })
    }

    /// Replace the rule that picks each block's creator.
    pub fn with_creator_policy(mut self, policy: impl CreatorPolicy + Send + Sync + 'static) -> Self {
        self.creator_policy = Box::new(policy);
        self
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn create_account(
        &mut self,
        name: &str,
        owner_id: &str,
        initial_balance: Amount,
    ) -> Result<(), AccountError> {
        self.accounts.create_account(name, owner_id, initial_balance)?;
        info!(account = name.trim(), owner = owner_id.trim(), balance = %initial_balance, "account created");
        Ok(())
    }

    /// Queue a transfer for the next block. Balances are not touched.
    pub fn submit_transfer(
        &mut self,
        sender: &str,
        receiver: &str,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let (sender, receiver) = (sender.trim(), receiver.trim());
        self.accounts.check_transfer(sender, receiver, amount)?;
        self.pending
            .push(PendingTransfer::new(sender, receiver, amount))?;
        debug!(sender, receiver, amount = %amount, queued = self.pending.len(), "transfer queued");
        Ok(())
    }

    /// Mine the pending batch into a new block stamped with the current time.
    pub fn mine(&mut self) -> Result<BlockSummary, MiningError> {
        self.mine_at(Block::current_timestamp())
    }

    /// Mine the pending batch into a block stamped with `now`.
    pub fn mine_at(&mut self, now: u64) -> Result<BlockSummary, MiningError> {
        MiningPipeline::new(
            &mut self.accounts,
            &mut self.chain,
            &mut self.pending,
            &self.config.levy,
            self.creator_policy.as_ref(),
        )
        .run(now)
    }

    /// Check every block's digest and link.
    pub fn validate_chain(&self) -> ValidationResult {
        self.chain.validate()
    }

    /// Get the chain.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Get the account store.
    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Get the queued transfers in submission order.
    pub fn pending(&self) -> &[PendingTransfer] {
        self.pending.as_slice()
    }

    /// Drop every queued transfer and return them.
    pub fn discard_pending(&mut self) -> Vec<PendingTransfer> {
        let dropped = self.pending.drain();
        if !dropped.is_empty() {
            info!(count = dropped.len(), "pending transfers discarded");
        }
        dropped
    }

    /// Levy owed by one account if a block were mined now.
    pub fn levy_due(&self, name: &str) -> Result<Amount, AccountError> {
        Ok(self.config.levy.due(self.accounts.balance_of(name)?))
    }

    /// Get ledger statistics.
    pub fn stats(&self) -> LedgerStats {
        let tail = self.chain.tail();
        LedgerStats {
            accounts: self.accounts.len(),
            blocks: self.chain.len(),
            pending_transfers: self.pending.len(),
            pending_capacity: self.pending.capacity(),
            total_balance: self.accounts.total_balance(),
            levy_due: TaxEngine::preview(&self.accounts, &self.config.levy),
            latest_digest: *tail.digest(),
            latest_creator: tail.creator_id().to_string(),
            latest_timestamp: tail.created_at(),
        }
    }
}
