//! Periodic levy ("zakat") assessment.
//!
//! At every mining event each account whose balance is at or above the
//! threshold pays `rate_bps / 10_000` of its balance, rounded down to the cent.

use crate::accounts::{AccountError, AccountStore, Result};
use serde::{Deserialize, Serialize};
use zakatchain_core::amount::BPS_DENOMINATOR;
use zakatchain_core::Amount;

/// Name reported by [`AccountError::Overflow`] when the levy total overflows.
pub const LEVY_TOTAL: &str = "levy total";

/// Levy rate and qualification threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevyPolicy {
    /// Whether the levy is assessed at all.
    pub enabled: bool,
    /// Rate in basis points (250 = 2.5%).
    pub rate_bps: u32,
    /// Minimum balance for an account to qualify.
    pub threshold: Amount,
}

impl Default for LevyPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            rate_bps: 250,
            threshold: Amount::from_units(1000),
        }
    }
}

impl LevyPolicy {
    /// Create an enabled policy.
    pub fn new(rate_bps: u32, threshold: Amount) -> Self {
        Self {
            enabled: true,
            rate_bps,
            threshold,
        }
    }

    /// Create a policy that never levies.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Check if `balance` is subject to the levy.
    pub fn qualifies(&self, balance: Amount) -> bool {
        self.enabled && balance >= self.threshold
    }

    /// Levy owed on `balance` if assessed now.
    pub fn due(&self, balance: Amount) -> Amount {
        if self.qualifies(balance) {
            balance.portion_bps(self.rate_bps)
        } else {
            Amount::ZERO
        }
    }

    /// Rate as a percentage string, e.g. `2.5%`.
    pub fn rate_percent(&self) -> String {
        let pct = format!("{:.2}", f64::from(self.rate_bps) / 100.0);
        format!("{}%", pct.trim_end_matches('0').trim_end_matches('.'))
    }

    /// Check that the rate is at most 100%.
    pub fn is_valid_rate(&self) -> bool {
        u64::from(self.rate_bps) <= BPS_DENOMINATOR
    }
}

/// Levy taken from a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyDetail {
    pub account: String,
    pub owner_id: String,
    pub amount: Amount,
}

/// Outcome of one assessment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevyAssessment {
    pub total: Amount,
    /// Per-account detail in account-name order.
    pub details: Vec<LevyDetail>,
}

impl LevyAssessment {
    /// Check if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.total.is_zero()
    }

    /// Block entries describing this assessment: a summary line, then one
    /// line per account. Empty when nothing was collected.
    pub fn entries(&self) -> Vec<String> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut entries = Vec::with_capacity(self.details.len() + 1);
        entries.push(format!("Zakat Collection: {} collected", self.total));
        entries.extend(
            self.details
                .iter()
                .map(|d| format!("{} ({}): {}", d.account, d.owner_id, d.amount)),
        );
        entries
    }
}

/// Stateless levy calculator.
pub struct TaxEngine;

impl TaxEngine {
    /// Levy every qualifying account in `accounts`.
    ///
    /// On error the store may be partially levied; callers that need
    /// all-or-nothing behaviour take a snapshot first.
    pub fn assess(accounts: &mut AccountStore, policy: &LevyPolicy) -> Result<LevyAssessment> {
        if !policy.enabled {
            return Ok(LevyAssessment::default());
        }

        let details: Vec<LevyDetail> = accounts
            .iter()
            .filter_map(|account| {
                let amount = policy.due(account.balance);
                (!amount.is_zero()).then(|| LevyDetail {
                    account: account.name.clone(),
                    owner_id: account.owner_id.clone(),
                    amount,
                })
            })
            .collect();

        let total = Amount::checked_sum(details.iter().map(|d| d.amount))
            .ok_or_else(|| AccountError::Overflow(LEVY_TOTAL.to_string()))?;
        for detail in &details {
            accounts.apply_levy(&detail.account, detail.amount)?;
        }

        Ok(LevyAssessment { total, details })
    }

    /// Total levy that would be collected right now, without mutating anything.
    /// `None` if the total does not fit in an [`Amount`].
    pub fn preview(accounts: &AccountStore, policy: &LevyPolicy) -> Option<Amount> {
        Amount::checked_sum(accounts.iter().map(|a| policy.due(a.balance)))
    }
}
