//! Ledger orchestration for zakatchain.
//!
//! This crate brings the core primitives together into a working ledger:
//! - **Chain**: append-only, hash-linked blocks with integrity validation
//! - **Accounts**: the single place balances change
//! - **Levy**: periodic zakat assessment on qualifying balances
//! - **Pending**: the queue of transfers awaiting the next block
//! - **Pipeline**: all-or-nothing mining of the pending batch
//! - **Ledger**: the session object front-ends talk to
//!
//! # Example
//!
//! ```rust
//! use zakatchain_chain::{LedgerConfig, LedgerContext};
//! use zakatchain_core::Amount;
//!
//! let mut ledger = LedgerContext::new(LedgerConfig::default()).unwrap();
//! ledger.create_account("A", "r1", Amount::from_units(1000)).unwrap();
//! ledger.create_account("B", "r2", Amount::from_units(500)).unwrap();
//!
//! ledger.submit_transfer("A", "B", Amount::from_units(200)).unwrap();
//! let block = ledger.mine().unwrap();
//!
//! assert_eq!(block.index, 1);
//! assert_eq!(ledger.accounts().balance_of("A").unwrap(), Amount::from_units(775));
//! assert!(ledger.validate_chain().valid);
//! ```

pub mod accounts;
pub mod chain;
pub mod config;
pub mod ledger;
pub mod levy;
pub mod pending;
pub mod pipeline;

// Re-export commonly used types
pub use accounts::{AccountError, AccountSnapshot, AccountStore};
pub use chain::{Chain, ChainError, ChainIntegrityError, IntegrityFault, ValidationResult};
pub use config::{ConfigError, LedgerConfig};
pub use ledger::{LedgerContext, LedgerStats, TransferError};
pub use levy::{LevyAssessment, LevyDetail, LevyPolicy, TaxEngine, LEVY_TOTAL};
pub use pending::{PendingError, PendingQueue};
pub use pipeline::{
    BlockSummary, CreatorPolicy, FirstSenderOwner, FixedCreator, MiningError, MiningPipeline,
    MiningStage,
};
