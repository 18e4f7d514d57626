//! Interactive menu session.

use crate::render;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use zakatchain_chain::LedgerContext;
use zakatchain_core::Amount;

pub fn run(ledger: LedgerContext) -> Result<()> {
    let stdin = io::stdin();
    let mut session = Session::new(ledger, stdin.lock());
    session.run()
}

enum Flow {
    Continue,
    Exit,
}

struct Session<R> {
    ledger: LedgerContext,
    input: R,
}

impl<R: BufRead> Session<R> {
    fn new(ledger: LedgerContext, input: R) -> Self {
        Self { ledger, input }
    }

    fn run(&mut self) -> Result<()> {
        print_banner();
        loop {
            print_menu();
            let Some(choice) = self.prompt("Enter your choice")? else {
                break;
            };
            match self.dispatch(choice.trim())? {
                Flow::Continue => {}
                Flow::Exit => break,
            }
        }
        println!();
        println!("{}", "Goodbye.".bright_black());
        Ok(())
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "1" => self.create_account()?,
            "2" => render::print_accounts(&self.ledger),
            "3" => self.create_transfer()?,
            "4" => render::print_pending(&self.ledger),
            "5" => self.mine(),
            "6" => render::print_chain(&self.ledger),
            "7" => render::print_validation(&self.ledger.validate_chain()),
            "8" => render::print_stats(&self.ledger),
            "9" => self.discard_pending(),
            "0" | "q" | "quit" | "exit" => return Ok(Flow::Exit),
            "" => {}
            other => render::failure(&format!("Invalid choice: {}", other)),
        }
        Ok(Flow::Continue)
    }

    /// Read one trimmed line. `None` on end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        print!("{}: ", label.bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_amount(&mut self, label: &str) -> Result<Option<Amount>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match raw.parse::<Amount>() {
            Ok(amount) => Ok(Some(amount)),
            Err(e) => {
                render::failure(&format!("Invalid amount: {}", e));
                Ok(None)
            }
        }
    }

    /// Accept either a list number or an account name.
    fn prompt_account(&mut self, label: &str) -> Result<Option<String>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        let by_index = raw
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.ledger.accounts().iter().nth(i))
            .map(|a| a.name.clone());
        Ok(Some(by_index.unwrap_or(raw)))
    }

    fn create_account(&mut self) -> Result<()> {
        println!();
        println!("{}", "Create Account".bold().cyan());

        let Some(name) = self.prompt("Account name")? else {
            return Ok(());
        };
        let Some(owner) = self.prompt("Owner id (roll number)")? else {
            return Ok(());
        };
        let Some(balance) = self.prompt_amount("Initial balance")? else {
            return Ok(());
        };

        match self.ledger.create_account(&name, &owner, balance) {
            Ok(()) => render::success(&format!(
                "Account '{}' created for {} with balance {}",
                name.trim(),
                owner.trim(),
                balance
            )),
            Err(e) => render::failure(&e.to_string()),
        }
        Ok(())
    }

    fn create_transfer(&mut self) -> Result<()> {
        println!();
        println!("{}", "Create Transfer".bold().cyan());

        if self.ledger.accounts().len() < 2 {
            render::failure("Need at least 2 accounts to create a transfer");
            return Ok(());
        }
        for (i, account) in self.ledger.accounts().iter().enumerate() {
            println!(
                "  {} {} ({})  {}",
                format!("{}.", i + 1).bright_black(),
                account.name.bright_yellow(),
                account.owner_id,
                render::balance_hint(account.balance)
            );
        }

        let Some(sender) = self.prompt_account("Sender (number or name)")? else {
            return Ok(());
        };
        let Some(receiver) = self.prompt_account("Receiver (number or name)")? else {
            return Ok(());
        };
        let Some(amount) = self.prompt_amount("Amount")? else {
            return Ok(());
        };

        match self.ledger.submit_transfer(&sender, &receiver, amount) {
            Ok(()) => render::success(&format!(
                "Transfer queued: {} → {}: {}",
                sender, receiver, amount
            )),
            Err(e) => render::failure(&e.to_string()),
        }
        Ok(())
    }

    fn mine(&mut self) {
        match self.ledger.mine() {
            Ok(summary) => render::print_mined(&summary),
            Err(e) => render::failure(&format!("Mining failed: {}", e)),
        }
    }

    fn discard_pending(&mut self) {
        let dropped = self.ledger.discard_pending();
        render::success(&format!("Discarded {} pending transfer(s)", dropped.len()));
    }
}

fn print_banner() {
    println!("{}", "=".repeat(60).bright_black());
    println!("{}", "          zakatchain: mini ledger with zakat".bold().cyan());
    println!("{}", "=".repeat(60).bright_black());
}

fn print_menu() {
    println!();
    println!("{}", "Main Menu".bold());
    println!("  1. Create Account");
    println!("  2. View Accounts");
    println!("  3. Create Transfer");
    println!("  4. View Pending Transfers");
    println!("  5. Mine Block");
    println!("  6. View Blockchain");
    println!("  7. Validate Blockchain");
    println!("  8. System Statistics");
    println!("  9. Discard Pending Transfers");
    println!("  0. Exit");
}
