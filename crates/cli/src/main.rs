//! zakatchain CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "zakatchain")]
#[command(about = "A tamper-evident ledger with a periodic zakat levy", long_about = None)]
struct Cli {
    #[command(flatten)]
    ledger: commands::LedgerArgs,

    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(commands::Commands::Repl);
    if let Err(e) = commands::run(command, cli.ledger) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
