//! Account store: the only place balances change.

use std::collections::BTreeMap;
use thiserror::Error;
use zakatchain_core::{Account, Amount};

/// Errors that can occur during account operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("account already exists: {0}")]
    DuplicateAccount(String),

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("insufficient balance in {account} (required {required}, available {available})")]
    InsufficientBalance {
        account: String,
        required: Amount,
        available: Amount,
    },

    #[error("sender and receiver cannot be the same account: {0}")]
    SelfTransfer(String),

    #[error("account name cannot be empty")]
    InvalidName,

    #[error("owner identifier cannot be empty")]
    InvalidOwner,

    #[error("amount overflow in {0}")]
    Overflow(String),
}

pub type Result<T> = std::result::Result<T, AccountError>;

/// A point-in-time copy of every account, used to undo a failed mining attempt.
#[derive(Debug, Clone)]
pub struct AccountSnapshot(BTreeMap<String, Account>);

/// Accounts keyed by name.
///
/// Iteration is always in name order, so anything derived from walking the
/// store (levy details, listings) is reproducible. Names are trimmed on
/// creation and on every lookup.
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: BTreeMap<String, Account>,
}

impl AccountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check if there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Check if an account exists.
    pub fn contains(&self, name: &str) -> bool {
        self.accounts.contains_key(name.trim())
    }

    /// Get an account by name.
    pub fn get(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name.trim())
    }

    /// Accounts in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Create a new account.
    pub fn create_account(&mut self, name: &str, owner_id: &str, initial_balance: Amount) -> Result<()> {
        let name = name.trim();
        let owner_id = owner_id.trim();
        if name.is_empty() {
            return Err(AccountError::InvalidName);
        }
        if owner_id.is_empty() {
            return Err(AccountError::InvalidOwner);
        }
        if self.contains(name) {
            return Err(AccountError::DuplicateAccount(name.to_string()));
        }

        self.accounts.insert(
            name.to_string(),
            Account::new(name, owner_id, initial_balance),
        );
        Ok(())
    }

    /// Get the balance of an account.
    pub fn balance_of(&self, name: &str) -> Result<Amount> {
        self.account(name).map(|a| a.balance)
    }

    /// Get the owner identifier of an account.
    pub fn owner_of(&self, name: &str) -> Result<&str> {
        self.account(name).map(|a| a.owner_id.as_str())
    }

    /// `name (owner)` of an account, as written into block entries.
    pub fn label_of(&self, name: &str) -> Result<String> {
        self.account(name).map(Account::label)
    }

    /// Sum of all balances, or `None` if it does not fit in an [`Amount`].
    pub fn total_balance(&self) -> Option<Amount> {
        Amount::checked_sum(self.iter().map(|a| a.balance))
    }

    /// Check that a transfer could be applied right now, without applying it.
    pub fn check_transfer(&self, sender: &str, receiver: &str, amount: Amount) -> Result<()> {
        let (sender, receiver) = (sender.trim(), receiver.trim());
        if amount.is_zero() {
            return Err(AccountError::InvalidAmount);
        }
        let from = self.account(sender)?;
        let to = self.account(receiver)?;
        if sender == receiver {
            return Err(AccountError::SelfTransfer(sender.to_string()));
        }
        if !from.has_balance(amount) {
            return Err(AccountError::InsufficientBalance {
                account: sender.to_string(),
                required: amount,
                available: from.balance,
            });
        }
        if to.balance.checked_add(amount).is_none() {
            return Err(AccountError::Overflow(receiver.to_string()));
        }
        Ok(())
    }

    /// Move `amount` from `sender` to `receiver`.
    ///
    /// Every check runs before either balance is touched, so the store is left
    /// unchanged on error.
    pub fn apply_transfer(&mut self, sender: &str, receiver: &str, amount: Amount) -> Result<()> {
        self.check_transfer(sender, receiver, amount)?;

        let (sender, receiver) = (sender.trim(), receiver.trim());
        let debited = self.account_mut(sender)?.debit(amount);
        let credited = self.account_mut(receiver)?.credit(amount);
        debug_assert!(debited && credited, "transfer pre-checks passed");
        Ok(())
    }

    /// Deduct a levy from an account.
    pub fn apply_levy(&mut self, name: &str, amount: Amount) -> Result<()> {
        let account = self.account_mut(name)?;
        if !account.debit(amount) {
            return Err(AccountError::InsufficientBalance {
                account: name.to_string(),
                required: amount,
                available: account.balance,
            });
        }
        Ok(())
    }

    /// Copy every account so a failed batch can be undone.
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot(self.accounts.clone())
    }

    /// Put back the accounts captured by [`AccountStore::snapshot`].
    pub fn restore(&mut self, snapshot: AccountSnapshot) {
        self.accounts = snapshot.0;
    }

    fn account(&self, name: &str) -> Result<&Account> {
        let name = name.trim();
        self.accounts
            .get(name)
            .ok_or_else(|| AccountError::UnknownAccount(name.to_string()))
    }

    fn account_mut(&mut self, name: &str) -> Result<&mut Account> {
        let name = name.trim();
        self.accounts
            .get_mut(name)
            .ok_or_else(|| AccountError::UnknownAccount(name.to_string()))
    }
}
