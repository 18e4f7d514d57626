//! Account state representation.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// A named account holding a balance on behalf of an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account name.
    pub name: String,
    /// Identifier of the person or entity owning the account (e.g. a roll number).
    pub owner_id: String,
    /// Current balance.
    pub balance: Amount,
}

impl Account {
    /// Create a new account.
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>, balance: Amount) -> Self {
        Self {
            name: name.into(),
            owner_id: owner_id.into(),
            balance,
        }
    }

    /// Add to the balance. Returns false (and leaves the balance alone) on overflow.
    pub fn credit(&mut self, amount: Amount) -> bool {
        match self.balance.checked_add(amount) {
            Some(balance) => {
                self.balance = balance;
                true
            }
            None => false,
        }
    }

    /// Subtract from the balance.
    /// Returns true if successful, false if insufficient balance.
    pub fn debit(&mut self, amount: Amount) -> bool {
        match self.balance.checked_sub(amount) {
            Some(balance) => {
                self.balance = balance;
                true
            }
            None => false,
        }
    }

    /// Check if the account can cover `amount`.
    pub fn has_balance(&self, amount: Amount) -> bool {
        self.balance >= amount
    }

    /// `name (owner)` label used in block entries.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.owner_id)
    }
}
