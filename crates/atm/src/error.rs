//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading a [`TellerConfig`](crate::TellerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or field types.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// The bank secret contains something other than ASCII digits.
	#[error("invalid PIN secret: {0:?} (expected ASCII digits only)")]
	InvalidPin(String),

	/// The keypad PIN length cannot produce the bank secret.
	#[error("invalid PIN length {length} (bank secret has {expected} digits)")]
	InvalidPinLength {
		/// Configured keypad PIN length.
		length: usize,
		/// Digits in the bank secret.
		expected: usize,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
