//! # CLI Commands
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports, snapshot reading)
//! ├── quote.rs    ◄─── Compose and print an order total
//! └── config.rs   ◄─── Print the effective store settings
//! ```
//!
//! Every command writes to a caller-supplied `Write` so tests can capture
//! the output.

pub mod config;
pub mod quote;

use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Reads a JSON snapshot file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    debug!(?path, "Reading snapshot");
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Snapshot {
        path: path.to_path_buf(),
        source,
    })
}
