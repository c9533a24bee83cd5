//! # Config Command
//!
//! Prints the effective store settings (file plus environment overrides),
//! or just where they are read from.

use clap::Args;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::CliResult;

#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Print the settings file location instead
    #[arg(long)]
    pub path: bool,
}

/// Prints the effective settings as TOML.
pub fn execute(config: &StoreConfig, out: &mut impl Write) -> CliResult<()> {
    debug!("config command");
    write!(out, "{}", config.to_toml()?)?;
    Ok(())
}

/// Prints the settings file location without reading the file.
///
/// An explicit `--config` path wins over the platform default.
pub fn print_path(explicit: Option<&Path>, out: &mut impl Write) -> CliResult<()> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(StoreConfig::default_config_path);

    match path {
        Some(path) => writeln!(out, "{}", path.display())?,
        None => writeln!(out, "(no config directory on this platform)")?,
    }
    Ok(())
}
