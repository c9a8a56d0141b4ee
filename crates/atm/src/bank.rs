//! Bank ledger actor.

use teller_worker::{Actor, Closed, Receiver, Sender};

use crate::config::BankConfig;
use crate::messages::{
	Balance, BankMessage, CancelWithdrawal, GetBalance, PinIncorrect, PinVerified, VerifyPin, WithdrawDenied, WithdrawOk, WithdrawRequest,
	WithdrawalProcessed,
};

/// Account balance plus the PIN secret.
///
/// Owned by exactly one [`BankActor`]. It processes one message at a time,
/// which makes the check-then-debit in [`Ledger::withdraw`] atomic with
/// respect to every other ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
	balance: u64,
	pin: String,
}

impl Ledger {
	/// Creates a ledger holding `balance`.
	pub fn new(balance: u64, pin: impl Into<String>) -> Self {
		Self { balance, pin: pin.into() }
	}

	/// Current balance.
	pub fn balance(&self) -> u64 {
		self.balance
	}

	/// Returns true when `pin` is the secret. Never touches the balance.
	pub fn verify_pin(&self, pin: &str) -> bool {
		self.pin == pin
	}

	/// Debits `amount` if funds allow. Returns whether the debit happened.
	pub fn withdraw(&mut self, amount: u64) -> bool {
		match self.balance.checked_sub(amount) {
			Some(rest) => {
				self.balance = rest;
				true
			}
			None => false,
		}
	}
}

impl From<&BankConfig> for Ledger {
	fn from(config: &BankConfig) -> Self {
		Self::new(config.opening_balance, config.pin.clone())
	}
}

/// Actor answering PIN checks, withdrawals and balance queries.
#[derive(Debug)]
pub struct BankActor {
	incoming: Receiver<BankMessage>,
	ledger: Ledger,
}

impl BankActor {
	/// Creates a bank actor around `ledger`.
	pub fn new(ledger: Ledger) -> Self {
		Self {
			incoming: Receiver::new(),
			ledger,
		}
	}

	/// Read-only view of the ledger, for inspection once the actor has stopped.
	pub fn ledger(&self) -> &Ledger {
		&self.ledger
	}

	/// Handles exactly one bank message.
	pub fn serve_one(&mut self) -> Result<(), Closed> {
		self.incoming
			.wait()
			.handle(|msg: VerifyPin, ledger: &mut Ledger| {
				let ok = ledger.verify_pin(&msg.pin);
				tracing::debug!(account = %msg.account, ok, "bank.verify_pin");
				if ok {
					msg.reply_to.send(PinVerified);
				} else {
					msg.reply_to.send(PinIncorrect);
				}
			})
			.handle(|msg: WithdrawRequest, ledger| {
				let ok = ledger.withdraw(msg.amount);
				tracing::debug!(account = %msg.account, amount = msg.amount, balance = ledger.balance(), ok, "bank.withdraw");
				if ok {
					msg.reply_to.send(WithdrawOk);
				} else {
					msg.reply_to.send(WithdrawDenied);
				}
			})
			.handle(|msg: GetBalance, ledger| {
				tracing::debug!(account = %msg.account, balance = ledger.balance(), "bank.get_balance");
				msg.reply_to.send(Balance { amount: ledger.balance() });
			})
			.handle(|msg: WithdrawalProcessed, _| {
				tracing::trace!(account = %msg.account, amount = msg.amount, "bank.withdrawal_processed");
			})
			.handle(|msg: CancelWithdrawal, _| {
				tracing::trace!(account = %msg.account, amount = msg.amount, "bank.cancel_withdrawal");
			})
			.receive(&mut self.ledger)
	}
}

impl Default for BankActor {
	fn default() -> Self {
		Self::new(Ledger::from(&BankConfig::default()))
	}
}

impl Actor for BankActor {
	type Message = BankMessage;

	fn sender(&self) -> Sender<BankMessage> {
		self.incoming.sender()
	}

	fn run(&mut self) {
		while self.serve_one().is_ok() {}
		tracing::debug!(balance = self.ledger.balance(), "bank.closed");
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;
	use teller_worker::Receiver;

	use super::*;
	use crate::messages::AtmMessage;

	fn reply_of(bank: &mut BankActor, inbox: &Receiver<AtmMessage>) -> AtmMessage {
		bank.serve_one().unwrap();
		inbox.wait().handle_any(|msg, _: &mut ()| msg).receive(&mut ()).unwrap()
	}

	#[test]
	fn correct_pin_is_verified() {
		let mut bank = BankActor::default();
		let inbox = Receiver::new();
		bank.sender().send(VerifyPin {
			account: "A1".into(),
			pin: "1937".into(),
			reply_to: inbox.sender(),
		});
		assert_eq!(reply_of(&mut bank, &inbox), AtmMessage::PinVerified(PinVerified));
		assert_eq!(bank.ledger().balance(), 199);
	}

	#[test]
	fn wrong_pin_is_rejected() {
		let mut bank = BankActor::default();
		let inbox = Receiver::new();
		bank.sender().send(VerifyPin {
			account: "A1".into(),
			pin: "1111".into(),
			reply_to: inbox.sender(),
		});
		assert_eq!(reply_of(&mut bank, &inbox), AtmMessage::PinIncorrect(PinIncorrect));
		assert_eq!(bank.ledger().balance(), 199);
	}

	#[test]
	fn withdraw_debits_and_balance_reports() {
		let mut bank = BankActor::default();
		let inbox = Receiver::new();
		let tx = bank.sender();

		tx.send(WithdrawRequest {
			account: "A1".into(),
			amount: 50,
			reply_to: inbox.sender(),
		});
		assert_eq!(reply_of(&mut bank, &inbox), AtmMessage::WithdrawOk(WithdrawOk));

		tx.send(GetBalance {
			account: "A1".into(),
			reply_to: inbox.sender(),
		});
		assert_eq!(reply_of(&mut bank, &inbox), AtmMessage::Balance(Balance { amount: 149 }));

		tx.send(WithdrawRequest {
			account: "A1".into(),
			amount: 1000,
			reply_to: inbox.sender(),
		});
		assert_eq!(reply_of(&mut bank, &inbox), AtmMessage::WithdrawDenied(WithdrawDenied));
		assert_eq!(bank.ledger().balance(), 149);
	}

	#[test]
	fn acknowledgements_leave_ledger_untouched() {
		let mut bank = BankActor::default();
		let tx = bank.sender();
		tx.send(WithdrawalProcessed {
			account: "A1".into(),
			amount: 50,
		});
		tx.send(CancelWithdrawal {
			account: "A1".into(),
			amount: 50,
		});
		bank.serve_one().unwrap();
		bank.serve_one().unwrap();
		assert_eq!(bank.ledger(), &Ledger::new(199, "1937"));
	}

	#[test]
	fn null_reply_address_is_tolerated() {
		let mut bank = BankActor::default();
		bank.sender().send(WithdrawRequest {
			account: "A1".into(),
			amount: 9,
			reply_to: Sender::null(),
		});
		bank.serve_one().unwrap();
		assert_eq!(bank.ledger().balance(), 190);
	}

	#[test]
	fn close_ends_run_loop() {
		let mut bank = BankActor::default();
		let tx = bank.sender();
		tx.send(WithdrawRequest {
			account: "A1".into(),
			amount: 99,
			reply_to: Sender::null(),
		});
		tx.close();

		bank.run();
		assert_eq!(bank.ledger().balance(), 100);
	}

	proptest! {
		#[test]
		fn ledger_never_goes_negative(opening in 0u64..10_000, amounts in prop::collection::vec(0u64..3_000, 0..50)) {
			let mut ledger = Ledger::new(opening, "1937");
			for amount in amounts {
				let before = ledger.balance();
				let accepted = ledger.withdraw(amount);
				prop_assert_eq!(accepted, amount <= before);
				if accepted {
					prop_assert_eq!(ledger.balance(), before - amount);
				} else {
					prop_assert_eq!(ledger.balance(), before);
				}
			}
		}

		#[test]
		fn pin_check_accepts_only_the_secret(pin in "[0-9]{4}") {
			let ledger = Ledger::new(199, "1937");
			prop_assert_eq!(ledger.verify_pin(&pin), pin == "1937");
			prop_assert_eq!(ledger.balance(), 199);
		}
	}
}
