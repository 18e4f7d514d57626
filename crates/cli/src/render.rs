//! Terminal rendering of ledger state.

use chrono::DateTime;
use colored::Colorize;
use zakatchain_chain::{BlockSummary, LedgerContext, ValidationResult};
use zakatchain_core::Amount;

/// Block timestamps as UTC wall-clock time.
pub fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

pub fn success(msg: &str) {
    println!("{}  {}", "✓".green().bold(), msg);
}

pub fn failure(msg: &str) {
    println!("{}  {}", "✗".red().bold(), msg.red());
}

pub fn print_accounts(ledger: &LedgerContext) {
    println!();
    println!("{}", "Account Balances:".bold().cyan());
    println!();

    if ledger.accounts().is_empty() {
        println!("  {}", "No accounts found.".yellow());
        println!();
        return;
    }

    println!(
        "  {:<20} {:<12} {:>15} {:>12}",
        "Account", "Owner", "Balance", "Zakat Due"
    );
    println!("  {}", "-".repeat(62).bright_black());

    let levy = &ledger.config().levy;
    for account in ledger.accounts().iter() {
        let due = levy.due(account.balance);
        let due = if due.is_zero() {
            "N/A".to_string()
        } else {
            due.to_string()
        };
        println!(
            "  {:<20} {:<12} {:>15} {:>12}",
            account.name.bright_yellow(),
            account.owner_id,
            account.balance.to_string().bright_cyan(),
            due
        );
    }

    let stats = ledger.stats();
    println!("  {}", "-".repeat(62).bright_black());
    println!(
        "  {:<33} {:>15} {:>12}",
        "TOTAL".bold(),
        total(stats.total_balance),
        total(stats.levy_due)
    );
    println!();
}

pub fn print_pending(ledger: &LedgerContext) {
    println!();
    println!("{}", "Pending Transfers:".bold().cyan());
    println!();

    if ledger.pending().is_empty() {
        println!("  {}", "No pending transfers.".yellow());
    }
    for (i, tx) in ledger.pending().iter().enumerate() {
        let owner = |name: &str| ledger.accounts().owner_of(name).unwrap_or("?").to_string();
        println!(
            "  {} {} ({}) → {} ({}): {}",
            format!("{}.", i + 1).bright_black(),
            tx.sender.bright_yellow(),
            owner(&tx.sender),
            tx.receiver.bright_yellow(),
            owner(&tx.receiver),
            tx.amount.to_string().bright_cyan()
        );
    }
    println!();
}

pub fn print_mined(summary: &BlockSummary) {
    println!();
    success(&format!(
        "Block #{} mined by {}",
        summary.index,
        summary.creator_id.bright_yellow()
    ));
    println!("    Hash:       {}", summary.digest.to_string().bright_black());
    if !summary.levy.is_empty() {
        println!(
            "    Zakat:      {}",
            summary.levy.total.to_string().bright_cyan()
        );
        for detail in &summary.levy.details {
            println!(
                "      - {} ({}): {}",
                detail.account, detail.owner_id, detail.amount
            );
        }
    }
    println!("    Transfers:  {}", summary.transfers_applied);
    println!();
}

pub fn print_chain(ledger: &LedgerContext) {
    let chain = ledger.chain();
    println!();
    println!(
        "{} {}",
        "Blockchain Explorer:".bold().cyan(),
        format!("({} blocks)", chain.len()).bright_black()
    );
    println!();

    for (i, block) in chain.iter().enumerate() {
        println!("  {}", format!("Block #{}", i).bold());
        println!("    Hash:          {}", block.digest().to_string().bright_yellow());
        println!(
            "    Previous Hash: {}",
            block.previous_digest().to_string().bright_black()
        );
        println!("    Timestamp:     {}", format_timestamp(block.created_at()));
        println!("    Creator:       {}", block.creator_id());
        println!("    Entries ({}):", block.entry_count());
        for entry in block.entries() {
            println!("      • {}", entry);
        }
        println!();
    }
}

pub fn print_validation(result: &ValidationResult) {
    println!();
    match result.into_result() {
        Ok(()) => {
            success(&"Blockchain is VALID".bold().to_string());
            println!("    All digests match their blocks");
            println!("    All links are intact");
        }
        Err(e) => failure(&format!("Blockchain validation FAILED: {}", e)),
    }
    println!();
}

pub fn print_stats(ledger: &LedgerContext) {
    let stats = ledger.stats();
    let levy = &ledger.config().levy;

    println!();
    println!("{}", "System Statistics:".bold().cyan());
    println!();
    println!("  Total Accounts:       {}", stats.accounts);
    println!("  Total Blocks:         {}", stats.blocks);
    println!(
        "  Pending Transfers:    {} / {}",
        stats.pending_transfers, stats.pending_capacity
    );
    println!(
        "  Total Balance:        {}",
        total(stats.total_balance).bright_cyan()
    );
    println!(
        "  Total Zakat Due:      {}",
        total(stats.levy_due).bright_cyan()
    );
    println!(
        "  Zakat Policy:         {} on balances >= {}{}",
        levy.rate_percent(),
        levy.threshold,
        if levy.enabled { "" } else { " (disabled)" }
    );
    println!(
        "  Latest Block:         {}",
        stats.latest_digest.short(16).bright_yellow()
    );
    println!(
        "  Latest Block Time:    {}",
        format_timestamp(stats.latest_timestamp)
    );
    println!("  Latest Block Creator: {}", stats.latest_creator);
    println!();
}

/// A sum that may have overflowed.
pub fn total(sum: Option<Amount>) -> String {
    sum.map_or_else(|| "overflow".to_string(), |amount| amount.to_string())
}

/// Dimmed balance shown next to account choices in prompts.
pub fn balance_hint(balance: Amount) -> String {
    format!("Balance: {}", balance).bright_black().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_total() {
        assert_eq!(total(Some(Amount::from_cents(150))), "1.50");
        assert_eq!(total(None), "overflow");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(u64::MAX), u64::MAX.to_string());
    }
}
