//! Pending transfers awaiting the next mining event.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transfer queued for the next block.
///
/// Holding a `PendingTransfer` says nothing about whether it can still be
/// applied; balances are re-checked when the batch is mined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransfer {
    pub sender: String,
    pub receiver: String,
    pub amount: Amount,
}

impl PendingTransfer {
    /// Create a new pending transfer.
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: Amount) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}

impl fmt::Display for PendingTransfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: {}", self.sender, self.receiver, self.amount)
    }
}
