//! # CLI Error Type
//!
//! Everything that can stop a quote before the core gets to run.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.toml unreadable / malformed ──► Io / ConfigParse / InvalidConfig │
//! │  cart.json, codes.json unreadable  ──► Io / Snapshot                    │
//! │  malformed discount code           ──► Validation                       │
//! │  discount lifecycle misuse         ──► Core                             │
//! │                                                                         │
//! │  Bad prices and missing policies are NOT errors here: the core          │
//! │  recovers and reports them on the OrderTotal.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use checkout_core::{CoreError, DiscountError, ValidationError};
use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Cannot render settings: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<DiscountError> for CliError {
    fn from(error: DiscountError) -> Self {
        CliError::Core(error.into())
    }
}

/// Convenience type alias for Results with CliError.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = CliError::Io {
            path: PathBuf::from("cart.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "Cannot read cart.json: no such file");
    }

    #[test]
    fn test_discount_error_wraps_as_core() {
        let err: CliError = DiscountError::InvalidTransition {
            action: "dismiss",
            state: "applied",
        }
        .into();
        assert!(matches!(err, CliError::Core(CoreError::Discount(_))));
        assert_eq!(err.to_string(), "cannot dismiss while discount is applied");
    }
}
