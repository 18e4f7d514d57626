//! Ledger configuration.

use crate::levy::LevyPolicy;
use crate::pending::DEFAULT_MAX_PENDING;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zakatchain_core::SYSTEM_CREATOR;

/// Errors reported by [`LedgerConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("levy rate must be at most 10000 basis points, got {0}")]
    RateOutOfRange(u32),

    #[error("pending queue capacity must be greater than zero")]
    ZeroCapacity,

    #[error("genesis creator identifier cannot be empty")]
    EmptyCreator,
}

/// Ledger configuration.
///
/// Every field has a default, so a partial JSON document such as
/// `{"levy": {"threshold": 10000}}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Levy rate and threshold.
    pub levy: LevyPolicy,
    /// Maximum number of pending transfers.
    pub max_pending: usize,
    /// Creator identifier recorded on the genesis block.
    pub genesis_creator: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            levy: LevyPolicy::default(),
            max_pending: DEFAULT_MAX_PENDING,
            genesis_creator: SYSTEM_CREATOR.to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.levy.is_valid_rate() {
            return Err(ConfigError::RateOutOfRange(self.levy.rate_bps));
        }
        if self.max_pending == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.genesis_creator.trim().is_empty() {
            return Err(ConfigError::EmptyCreator);
        }
        Ok(())
    }
}
