//! TOML configuration for the teller actors.
//!
//! ```toml
//! [bank]
//! opening_balance = 199
//! pin = "1937"
//!
//! [atm]
//! account = "acc1234"
//! pin_length = 4
//! withdraw_amount = 50
//! ```
//!
//! Every field is optional and falls back to the values above.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TellerConfig {
	pub bank: BankConfig,
	pub atm: AtmConfig,
}

/// Bank ledger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BankConfig {
	/// Balance the ledger starts with.
	pub opening_balance: u64,
	/// PIN accepted by verification.
	pub pin: String,
}

impl Default for BankConfig {
	fn default() -> Self {
		Self {
			opening_balance: 199,
			pin: "1937".to_owned(),
		}
	}
}

/// ATM session and keypad settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtmConfig {
	/// Account reported when a card is inserted from the keypad.
	pub account: String,
	/// Digits collected before the PIN is sent for verification.
	pub pin_length: usize,
	/// Amount requested by the keypad's withdraw key.
	pub withdraw_amount: u64,
}

impl Default for AtmConfig {
	fn default() -> Self {
		Self {
			account: "acc1234".to_owned(),
			pin_length: 4,
			withdraw_amount: 50,
		}
	}
}

impl TellerConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), "config.loaded");
		Ok(config)
	}

	/// Checks cross-field constraints.
	pub fn validate(&self) -> Result<()> {
		let pin = &self.bank.pin;
		if pin.is_empty() || !pin.chars().all(|c| c.is_ascii_digit()) {
			return Err(ConfigError::InvalidPin(pin.clone()));
		}
		if self.atm.pin_length != pin.len() {
			return Err(ConfigError::InvalidPinLength {
				length: self.atm.pin_length,
				expected: pin.len(),
			});
		}
		Ok(())
	}
}
