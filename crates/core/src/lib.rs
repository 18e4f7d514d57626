//! Core ledger primitives for zakatchain.
//!
//! This crate provides the value types shared by the ledger engine and its
//! front-ends:
//! - Blake3 digests
//! - Fixed-point amounts
//! - Accounts and pending transfers
//! - Immutable, self-digesting blocks

pub mod account;
pub mod amount;
pub mod block;
pub mod hash;
pub mod transfer;

// Re-export commonly used types at the crate root
pub use account::Account;
pub use amount::{Amount, AmountError};
pub use block::{Block, GENESIS_MARKER, SYSTEM_CREATOR};
pub use hash::{hash, Hash};
pub use transfer::PendingTransfer;
