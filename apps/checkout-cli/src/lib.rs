//! # checkout-cli Library
//!
//! Argument parsing, settings loading and command dispatch for the
//! `checkout` binary.
//!
//! ## Module Organization
//! ```text
//! checkout_cli/
//! ├── lib.rs          ◄─── You are here (CLI definition & run)
//! ├── config.rs       ◄─── store.toml loading + CHECKOUT_* overrides
//! ├── commands/
//! │   ├── mod.rs      ◄─── Snapshot file reading
//! │   ├── quote.rs    ◄─── `checkout quote`
//! │   └── config.rs   ◄─── `checkout config`
//! └── error.rs        ◄─── CliError
//! ```
//!
//! ## Usage
//! ```text
//! checkout quote --cart cart.json
//! checkout quote --cart cart.json --pickup --points 620
//! checkout quote --cart cart.json --code SAVE10 --codes codes.json --json
//! checkout --config ./store.toml config
//! checkout config --path
//! ```

pub mod commands;
pub mod config;
pub mod error;

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::config::ConfigArgs;
use commands::quote::QuoteArgs;
use config::StoreConfig;
use error::CliResult;

/// Star Café order total calculator.
#[derive(Debug, Parser)]
#[command(name = "checkout", version, about)]
pub struct Cli {
    /// Store settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compose an order total from a cart snapshot
    Quote(QuoteArgs),
    /// Print the effective store settings
    Config(ConfigArgs),
}

/// Runs a parsed command line against stdout.
pub fn run(cli: Cli) -> CliResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(cli, &mut out)
}

/// Runs a parsed command line, writing command output to `out`.
pub fn run_with(cli: Cli, out: &mut impl Write) -> CliResult<()> {
    // `config --path` must work even when the settings file does not load.
    if let Command::Config(ConfigArgs { path: true }) = &cli.command {
        return commands::config::print_path(cli.config.as_deref(), out);
    }

    let config = StoreConfig::load(cli.config)?;
    info!(
        currency = %config.store.currency_code,
        shipping = config.shipping.is_some(),
        tax = config.tax.is_some(),
        "Store settings loaded"
    );

    match &cli.command {
        Command::Quote(args) => {
            commands::quote::execute(args, &config, Utc::now(), out)?;
        }
        Command::Config(_) => commands::config::execute(&config, out)?,
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so `--json` output stays machine-readable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=checkout_core=trace` - Trace the calculation only
/// - Default: INFO, DEBUG for the `checkout*` crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,checkout=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_quote() {
        let cli = Cli::try_parse_from([
            "checkout", "quote", "--cart", "cart.json", "--pickup", "--code", "SAVE10",
            "--codes", "codes.json", "--points", "40", "--json",
        ])
        .unwrap();

        let Command::Quote(args) = cli.command else {
            panic!("expected quote");
        };
        assert_eq!(args.cart, PathBuf::from("cart.json"));
        assert!(args.pickup);
        assert_eq!(args.code.as_deref(), Some("SAVE10"));
        assert_eq!(args.points, Some(40));
        assert!(args.json);
    }

    #[test]
    fn test_code_requires_registry() {
        let result = Cli::try_parse_from(["checkout", "quote", "--cart", "c.json", "--code", "X"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["checkout", "config", "--config", "store.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("store.toml")));
        assert!(matches!(cli.command, Command::Config(_)));
    }

    #[test]
    fn test_config_path_ignores_broken_settings() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("store.toml");
        std::fs::write(&broken, "[store\ncurrency_code = ").unwrap();
        let broken_arg = broken.to_str().unwrap();

        let mut out = Vec::new();
        let cli = Cli::try_parse_from(["checkout", "--config", broken_arg, "config", "--path"])
            .unwrap();
        run_with(cli, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), broken_arg);

        // Printing the settings still reports the parse failure
        let cli = Cli::try_parse_from(["checkout", "--config", broken_arg, "config"]).unwrap();
        assert!(matches!(
            run_with(cli, &mut Vec::new()),
            Err(error::CliError::ConfigParse(_))
        ));
    }
}
