//! CLI commands module.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use zakatchain_chain::{LedgerConfig, LedgerContext};
use zakatchain_core::Amount;

mod demo;
mod repl;

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive ledger session (default)
    Repl,
    /// Run a scripted session and print the resulting chain
    Demo,
}

/// Ledger settings shared by every command.
#[derive(Args, Debug, Default)]
pub struct LedgerArgs {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Minimum balance that owes zakat (e.g. 1000 or 100.50)
    #[arg(long, global = true)]
    threshold: Option<Amount>,

    /// Zakat rate in basis points (250 = 2.5%)
    #[arg(long, global = true)]
    rate_bps: Option<u32>,

    /// Creator identifier recorded on the genesis block
    #[arg(long, global = true)]
    genesis_creator: Option<String>,
}

pub fn run(cmd: Commands, args: LedgerArgs) -> Result<()> {
    let config = load_config(&args)?;
    debug!(?config, "ledger configuration loaded");
    let ledger = LedgerContext::new(config).context("Invalid ledger configuration")?;

    match cmd {
        Commands::Repl => repl::run(ledger),
        Commands::Demo => demo::run(ledger),
    }
}

/// Build the ledger configuration: file first, then command-line overrides.
fn load_config(args: &LedgerArgs) -> Result<LedgerConfig> {
    let mut config = match &args.config {
        Some(path) => read_config_file(path)?,
        None => LedgerConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.levy.threshold = threshold;
    }
    if let Some(rate_bps) = args.rate_bps {
        config.levy.rate_bps = rate_bps;
    }
    if let Some(creator) = &args.genesis_creator {
        config.genesis_creator = creator.clone();
    }

    config.validate().context("Invalid ledger configuration")?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<LedgerConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(&LedgerArgs::default()).unwrap();
        assert_eq!(config, LedgerConfig::default());
    }

    #[test]
    fn test_file_then_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"levy": {{"rate_bps": 500, "threshold": 10000}}, "genesis_creator": "2023"}}"#
        )
        .unwrap();

        let args = LedgerArgs {
            config: Some(file.path().to_path_buf()),
            rate_bps: Some(250),
            ..LedgerArgs::default()
        };
        let config = load_config(&args).unwrap();

        assert_eq!(config.levy.rate_bps, 250);
        assert_eq!(config.levy.threshold, Amount::from_units(100));
        assert_eq!(config.genesis_creator, "2023");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = LedgerArgs {
            config: Some(dir.path().join("nope.json")),
            ..LedgerArgs::default()
        };
        let err = load_config(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_out_of_range_rate_rejected() {
        let args = LedgerArgs {
            rate_bps: Some(20_000),
            ..LedgerArgs::default()
        };
        assert!(load_config(&args).is_err());
    }
}
