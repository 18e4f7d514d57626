//! Scripted demo session.

use crate::render;
use anyhow::{Context, Result};
use colored::Colorize;
use zakatchain_chain::LedgerContext;
use zakatchain_core::Amount;

pub fn run(mut ledger: LedgerContext) -> Result<()> {
    println!("{}", "Running zakatchain demo...".bold().cyan());

    ledger
        .create_account("A", "r1", Amount::from_units(1000))
        .context("Failed to create account A")?;
    ledger
        .create_account("B", "r2", Amount::from_units(500))
        .context("Failed to create account B")?;
    render::print_accounts(&ledger);

    ledger
        .submit_transfer("A", "B", Amount::from_units(200))
        .context("Failed to queue A → B")?;
    render::print_pending(&ledger);

    let summary = ledger.mine().context("Failed to mine block")?;
    render::print_mined(&summary);

    // B holds 700 now; the second transfer overdraws it once the first is applied.
    ledger
        .submit_transfer("B", "A", Amount::from_units(400))
        .context("Failed to queue B → A")?;
    ledger
        .submit_transfer("B", "A", Amount::from_units(400))
        .context("Failed to queue B → A")?;
    match ledger.mine() {
        Ok(_) => render::failure("Overdrawing batch was unexpectedly mined"),
        Err(e) => {
            render::success(&format!("Batch rejected as a whole: {}", e));
            let dropped = ledger.discard_pending();
            println!("    Discarded {} pending transfer(s)", dropped.len());
        }
    }

    render::print_accounts(&ledger);
    render::print_chain(&ledger);
    render::print_validation(&ledger.validate_chain());
    render::print_stats(&ledger);
    Ok(())
}
