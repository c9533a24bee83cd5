//! # checkout
//!
//! Entry point. The actual setup is in lib.rs for testability.

use clap::Parser;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    checkout_cli::init_tracing();

    let cli = checkout_cli::Cli::parse();
    match checkout_cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "checkout failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
