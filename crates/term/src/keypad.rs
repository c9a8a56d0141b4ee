//! Keyboard bindings for the ATM keypad.

use std::io::{self, BufRead};

use teller_atm::AtmConfig;
use teller_atm::messages::{AtmMessage, BalancePressed, CancelPressed, CardInserted, ClearLastPressed, DigitPressed, WithdrawPressed};
use teller_worker::Sender;

/// Effect of a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
	/// Deliver this input to the ATM.
	Input(AtmMessage),
	/// Stop reading input.
	Quit,
}

/// Maps characters to keypad events.
///
/// `0`-`9` digits, `b` balance, `c` cancel, `w` withdraw, `l` clear last
/// digit, `i` insert card, `q` quit. Letters are case-insensitive.
#[derive(Debug, Clone)]
pub struct Keymap {
	account: String,
	withdraw_amount: u64,
}

impl Keymap {
	pub fn new(config: &AtmConfig) -> Self {
		Self {
			account: config.account.clone(),
			withdraw_amount: config.withdraw_amount,
		}
	}

	pub fn lookup(&self, key: char) -> Option<Key> {
		let input: AtmMessage = match key.to_ascii_lowercase() {
			digit @ '0'..='9' => DigitPressed { digit }.into(),
			'b' => BalancePressed.into(),
			'c' => CancelPressed.into(),
			'w' => WithdrawPressed {
				amount: self.withdraw_amount,
			}
			.into(),
			'l' => ClearLastPressed.into(),
			'i' => CardInserted {
				account: self.account.clone(),
			}
			.into(),
			'q' => return Some(Key::Quit),
			_ => return None,
		};
		Some(Key::Input(input))
	}
}

/// Feeds `input` to `keypad` until a quit key or end of input, calling
/// `settle` after every key delivered.
pub fn drive(input: impl BufRead, keymap: &Keymap, keypad: &Sender<AtmMessage>, mut settle: impl FnMut()) -> io::Result<()> {
	for line in input.lines() {
		for key in line?.chars() {
			match keymap.lookup(key) {
				Some(Key::Input(msg)) => {
					keypad.send(msg);
					settle();
				}
				Some(Key::Quit) => {
					tracing::debug!("keypad.quit");
					return Ok(());
				}
				None if key.is_whitespace() => {}
				None => tracing::debug!(%key, "keypad.unbound"),
			}
		}
	}
	tracing::debug!("keypad.eof");
	Ok(())
}
