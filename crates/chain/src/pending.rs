//! Pending transfer queue.
//!
//! Holds submitted transfers in submission order until the next block is mined
//! or the batch is discarded.

use thiserror::Error;
use zakatchain_core::PendingTransfer;

/// Errors that can occur during queue operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PendingError {
    #[error("pending queue is full (capacity: {0})")]
    QueueFull(usize),
}

pub type Result<T> = std::result::Result<T, PendingError>;

/// Default maximum number of queued transfers.
pub const DEFAULT_MAX_PENDING: usize = 1_000;

/// Ordered queue of transfers awaiting mining.
#[derive(Debug, Clone)]
pub struct PendingQueue {
    capacity: usize,
    transfers: Vec<PendingTransfer>,
}

impl PendingQueue {
    /// Create a queue with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_PENDING)
    }

    /// Create a queue holding at most `capacity` transfers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transfers: Vec::new(),
        }
    }

    /// Get the number of queued transfers.
    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Get the maximum number of queued transfers.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Transfers in submission order.
    pub fn as_slice(&self) -> &[PendingTransfer] {
        &self.transfers
    }

    /// Add a transfer to the back of the queue.
    pub fn push(&mut self, transfer: PendingTransfer) -> Result<()> {
        if self.transfers.len() >= self.capacity {
            return Err(PendingError::QueueFull(self.capacity));
        }
        self.transfers.push(transfer);
        Ok(())
    }

    /// Remove and return every queued transfer.
    pub fn drain(&mut self) -> Vec<PendingTransfer> {
        std::mem::take(&mut self.transfers)
    }

    pub fn clear(&mut self) {
        self.transfers.clear();
    }
}

impl Default for PendingQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zakatchain_core::Amount;

    fn tx(amount: u64) -> PendingTransfer {
        PendingTransfer::new("A", "B", Amount::from_units(amount))
    }

    #[test]
    fn test_preserves_submission_order() {
        let mut queue = PendingQueue::new();
        queue.push(tx(3)).unwrap();
        queue.push(tx(1)).unwrap();
        queue.push(tx(2)).unwrap();

        let amounts: Vec<_> = queue.as_slice().iter().map(|t| t.amount).collect();
        assert_eq!(
            amounts,
            [Amount::from_units(3), Amount::from_units(1), Amount::from_units(2)]
        );
    }

    #[test]
    fn test_identical_transfers_allowed() {
        let mut queue = PendingQueue::new();
        queue.push(tx(5)).unwrap();
        queue.push(tx(5)).unwrap();
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_capacity_limit() {
        let mut queue = PendingQueue::with_capacity(2);
        queue.push(tx(1)).unwrap();
        queue.push(tx(2)).unwrap();
        assert_eq!(queue.capacity(), 2);
        assert_eq!(queue.push(tx(3)), Err(PendingError::QueueFull(2)));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_drain_and_clear() {
        let mut queue = PendingQueue::new();
        queue.push(tx(1)).unwrap();
        queue.push(tx(2)).unwrap();

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());

        queue.push(tx(9)).unwrap();
        queue.clear();
        assert!(queue.is_empty());
    }
}
