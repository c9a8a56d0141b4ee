//! ATM session state machine.
//!
//! The session is a classical FSM: an [`AtmState`] tag plus one state function
//! per tag. Every state function performs exactly one selective receive, so a
//! message the current state does not list is dropped (including a cancel
//! that arrives while a state is not listening for it).
//!
//! | State | Entry | Accepts |
//! |---|---|---|
//! | `WaitingForCard` | enter-card prompt | card inserted |
//! | `GettingPin` | | digit, clear-last, cancel |
//! | `VerifyingPin` | | pin verified, pin incorrect, cancel |
//! | `WaitingForAction` | options prompt | withdraw, balance, cancel |
//! | `ProcessingWithdrawal` | | withdraw ok, withdraw denied, cancel |
//! | `ProcessingBalance` | | balance, cancel |
//! | `Done` | eject card | (always moves to `WaitingForCard`) |

use std::fmt;

use teller_worker::{Actor, Closed, Receiver, Sender};

use crate::config::AtmConfig;
use crate::messages::{
	AtmMessage, Balance, BalancePressed, BankMessage, CancelPressed, CancelWithdrawal, CardInserted, ClearLastPressed, DigitPressed, DisplayBalance,
	DisplayEnterCard, DisplayEnterPin, DisplayInsufficientFunds, DisplayMessage, DisplayPinIncorrect, DisplayWithdrawalCancelled,
	DisplayWithdrawalOptions, EjectCard, GetBalance, IssueMoney, PinIncorrect, PinVerified, SessionEvent, StateEntered, VerifyPin, WithdrawDenied,
	WithdrawOk, WithdrawPressed, WithdrawRequest, WithdrawalProcessed,
};

/// Session states. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtmState {
	WaitingForCard,
	GettingPin,
	VerifyingPin,
	WaitingForAction,
	ProcessingWithdrawal,
	ProcessingBalance,
	Done,
}

impl AtmState {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::WaitingForCard => "wait-for-card",
			Self::GettingPin => "get-pin",
			Self::VerifyingPin => "verify-pin",
			Self::WaitingForAction => "wait-for-action",
			Self::ProcessingWithdrawal => "process-withdrawal",
			Self::ProcessingBalance => "process-balance",
			Self::Done => "done",
		}
	}

	/// True for states blocked on keypad input rather than on a bank reply.
	pub const fn awaits_keypad(self) -> bool {
		matches!(self, Self::WaitingForCard | Self::GettingPin | Self::WaitingForAction)
	}
}

impl fmt::Display for AtmState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Session-scoped fields plus the outgoing endpoints handlers talk to.
#[derive(Debug)]
struct Session {
	bank: Sender<BankMessage>,
	display: Sender<DisplayMessage>,
	reply_to: Sender<AtmMessage>,
	pin_length: usize,
	account: String,
	pin: String,
	withdrawal_amount: u64,
}

impl Session {
	fn reset(&mut self) {
		self.account.clear();
		self.pin.clear();
		self.withdrawal_amount = 0;
	}
}

/// ATM session actor.
#[derive(Debug)]
pub struct AtmActor {
	incoming: Receiver<AtmMessage>,
	state: AtmState,
	session: Session,
	observer: Sender<SessionEvent>,
}

impl AtmActor {
	/// Creates a session in [`AtmState::WaitingForCard`] that talks to `bank`
	/// and `display`.
	pub fn new(bank: Sender<BankMessage>, display: Sender<DisplayMessage>, config: &AtmConfig) -> Self {
		let incoming = Receiver::new();
		let reply_to = incoming.sender();
		Self {
			incoming,
			state: AtmState::WaitingForCard,
			session: Session {
				bank,
				display,
				reply_to,
				pin_length: config.pin_length,
				account: String::new(),
				pin: String::new(),
				withdrawal_amount: 0,
			},
			observer: Sender::null(),
		}
	}

	/// Reports every state the session enters to `observer`.
	#[must_use]
	pub fn with_observer(mut self, observer: Sender<SessionEvent>) -> Self {
		self.observer = observer;
		self
	}

	/// Current state.
	pub fn state(&self) -> AtmState {
		self.state
	}

	/// Runs the current state's body once and applies its transition.
	pub fn step(&mut self) -> Result<AtmState, Closed> {
		let next = match self.state {
			AtmState::WaitingForCard => self.waiting_for_card()?,
			AtmState::GettingPin => self.getting_pin()?,
			AtmState::VerifyingPin => self.verifying_pin()?,
			AtmState::WaitingForAction => self.waiting_for_action()?,
			AtmState::ProcessingWithdrawal => self.processing_withdrawal()?,
			AtmState::ProcessingBalance => self.processing_balance()?,
			AtmState::Done => self.done_processing(),
		};
		if next != self.state {
			tracing::debug!(from = %self.state, to = %next, "atm.transition");
			self.state = next;
			self.observer.send(StateEntered { state: next });
		}
		Ok(next)
	}

	fn waiting_for_card(&mut self) -> Result<AtmState, Closed> {
		self.session.display.send(DisplayEnterCard);
		self.incoming
			.wait()
			.handle(|msg: CardInserted, session: &mut Session| {
				session.account = msg.account;
				session.pin.clear();
				session.display.send(DisplayEnterPin);
				AtmState::GettingPin
			})
			.receive(&mut self.session)
	}

	fn getting_pin(&mut self) -> Result<AtmState, Closed> {
		self.incoming
			.wait()
			.handle(|msg: DigitPressed, session: &mut Session| {
				session.pin.push(msg.digit);
				if session.pin.chars().count() < session.pin_length {
					return AtmState::GettingPin;
				}
				session.bank.send(VerifyPin {
					account: session.account.clone(),
					pin: session.pin.clone(),
					reply_to: session.reply_to.clone(),
				});
				AtmState::VerifyingPin
			})
			.handle(|_: ClearLastPressed, session| {
				session.pin.pop();
				AtmState::GettingPin
			})
			.handle(|_: CancelPressed, _| AtmState::Done)
			.receive(&mut self.session)
	}

	fn verifying_pin(&mut self) -> Result<AtmState, Closed> {
		self.incoming
			.wait()
			.handle(|_: PinVerified, _: &mut Session| AtmState::WaitingForAction)
			.handle(|_: PinIncorrect, session| {
				session.display.send(DisplayPinIncorrect);
				AtmState::Done
			})
			.handle(|_: CancelPressed, _| AtmState::Done)
			.receive(&mut self.session)
	}

	fn waiting_for_action(&mut self) -> Result<AtmState, Closed> {
		self.session.display.send(DisplayWithdrawalOptions);
		self.incoming
			.wait()
			.handle(|msg: WithdrawPressed, session: &mut Session| {
				session.withdrawal_amount = msg.amount;
				session.bank.send(WithdrawRequest {
					account: session.account.clone(),
					amount: msg.amount,
					reply_to: session.reply_to.clone(),
				});
				AtmState::ProcessingWithdrawal
			})
			.handle(|_: BalancePressed, session| {
				session.bank.send(GetBalance {
					account: session.account.clone(),
					reply_to: session.reply_to.clone(),
				});
				AtmState::ProcessingBalance
			})
			.handle(|_: CancelPressed, _| AtmState::Done)
			.receive(&mut self.session)
	}

	fn processing_withdrawal(&mut self) -> Result<AtmState, Closed> {
		self.incoming
			.wait()
			.handle(|_: WithdrawOk, session: &mut Session| {
				session.display.send(IssueMoney {
					amount: session.withdrawal_amount,
				});
				session.bank.send(WithdrawalProcessed {
					account: session.account.clone(),
					amount: session.withdrawal_amount,
				});
				AtmState::Done
			})
			.handle(|_: WithdrawDenied, session| {
				session.display.send(DisplayInsufficientFunds);
				AtmState::Done
			})
			.handle(|_: CancelPressed, session| {
				session.bank.send(CancelWithdrawal {
					account: session.account.clone(),
					amount: session.withdrawal_amount,
				});
				session.display.send(DisplayWithdrawalCancelled);
				AtmState::Done
			})
			.receive(&mut self.session)
	}

	fn processing_balance(&mut self) -> Result<AtmState, Closed> {
		self.incoming
			.wait()
			.handle(|msg: Balance, session: &mut Session| {
				session.display.send(DisplayBalance { amount: msg.amount });
				AtmState::WaitingForAction
			})
			.handle(|_: CancelPressed, _| AtmState::Done)
			.receive(&mut self.session)
	}

	fn done_processing(&mut self) -> AtmState {
		self.session.display.send(EjectCard);
		self.session.reset();
		AtmState::WaitingForCard
	}
}

impl Actor for AtmActor {
	type Message = AtmMessage;

	fn sender(&self) -> Sender<AtmMessage> {
		self.incoming.sender()
	}

	fn run(&mut self) {
		self.observer.send(StateEntered { state: self.state });
		while self.step().is_ok() {}
		tracing::debug!(state = %self.state, "atm.closed");
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use teller_worker::Receiver;

	use super::*;

	struct Rig {
		atm: AtmActor,
		bank: Receiver<BankMessage>,
		display: Receiver<DisplayMessage>,
	}

	impl Rig {
		fn new() -> Self {
			let bank = Receiver::new();
			let display = Receiver::new();
			let atm = AtmActor::new(bank.sender(), display.sender(), &AtmConfig::default());
			Self { atm, bank, display }
		}

		fn input(&self, msg: impl Into<AtmMessage>) {
			self.atm.sender().send(msg);
		}

		fn step(&mut self) -> AtmState {
			self.atm.step().unwrap()
		}

		fn next_display(&self) -> DisplayMessage {
			self.display.wait().handle_any(|msg, _: &mut ()| msg).receive(&mut ()).unwrap()
		}

		fn next_bank(&self) -> BankMessage {
			self.bank.wait().handle_any(|msg, _: &mut ()| msg).receive(&mut ()).unwrap()
		}

		fn insert_card_and_pin(&mut self, pin: &str) {
			self.input(CardInserted { account: "A1".into() });
			assert_eq!(self.step(), AtmState::GettingPin);
			for digit in pin.chars() {
				self.input(DigitPressed { digit });
			}
			for _ in 1..pin.len() {
				assert_eq!(self.step(), AtmState::GettingPin);
			}
			assert_eq!(self.step(), AtmState::VerifyingPin);
			assert_eq!(self.next_display(), DisplayMessage::DisplayEnterCard(DisplayEnterCard));
			assert_eq!(self.next_display(), DisplayMessage::DisplayEnterPin(DisplayEnterPin));
		}
	}

	#[test]
	fn waiting_for_card_ignores_everything_else() {
		let mut rig = Rig::new();
		rig.input(DigitPressed { digit: '1' });
		rig.input(CancelPressed);
		rig.input(WithdrawOk);
		rig.input(CardInserted { account: "A1".into() });

		assert_eq!(rig.step(), AtmState::GettingPin);
		assert_eq!(rig.atm.incoming.pending(), 0);
		assert_eq!(rig.atm.session.account, "A1");
		assert!(rig.atm.session.pin.is_empty());
	}

	#[test]
	fn full_pin_is_sent_for_verification() {
		let mut rig = Rig::new();
		rig.insert_card_and_pin("1937");

		assert_eq!(
			rig.next_bank(),
			BankMessage::VerifyPin(VerifyPin {
				account: "A1".into(),
				pin: "1937".into(),
				reply_to: rig.atm.sender(),
			})
		);
	}

	#[test]
	fn clear_last_removes_one_digit() {
		let mut rig = Rig::new();
		rig.input(CardInserted { account: "A1".into() });
		rig.step();

		rig.input(ClearLastPressed);
		assert_eq!(rig.step(), AtmState::GettingPin);
		assert_eq!(rig.atm.session.pin, "");

		for digit in ['1', '2'] {
			rig.input(DigitPressed { digit });
			rig.step();
		}
		rig.input(ClearLastPressed);
		assert_eq!(rig.step(), AtmState::GettingPin);
		assert_eq!(rig.atm.session.pin, "1");
	}

	#[test]
	fn pin_incorrect_ejects_card() {
		let mut rig = Rig::new();
		rig.insert_card_and_pin("1111");
		rig.input(PinIncorrect);

		assert_eq!(rig.step(), AtmState::Done);
		assert_eq!(rig.step(), AtmState::WaitingForCard);
		assert_eq!(rig.next_display(), DisplayMessage::DisplayPinIncorrect(DisplayPinIncorrect));
		assert_eq!(rig.next_display(), DisplayMessage::EjectCard(EjectCard));
		assert!(rig.atm.session.account.is_empty());
	}

	#[test]
	fn cancel_during_withdrawal_notifies_bank_and_display() {
		let mut rig = Rig::new();
		rig.insert_card_and_pin("1937");
		rig.input(PinVerified);
		assert_eq!(rig.step(), AtmState::WaitingForAction);

		rig.input(WithdrawPressed { amount: 50 });
		assert_eq!(rig.step(), AtmState::ProcessingWithdrawal);
		rig.input(CancelPressed);
		assert_eq!(rig.step(), AtmState::Done);

		let _verify = rig.next_bank();
		assert!(matches!(rig.next_bank(), BankMessage::WithdrawRequest(WithdrawRequest { amount: 50, .. })));
		assert_eq!(
			rig.next_bank(),
			BankMessage::CancelWithdrawal(CancelWithdrawal {
				account: "A1".into(),
				amount: 50,
			})
		);
		assert_eq!(
			rig.next_display(),
			DisplayMessage::DisplayWithdrawalOptions(DisplayWithdrawalOptions)
		);
		assert_eq!(
			rig.next_display(),
			DisplayMessage::DisplayWithdrawalCancelled(DisplayWithdrawalCancelled)
		);
	}

	#[test]
	fn balance_returns_to_action_menu() {
		let mut rig = Rig::new();
		rig.insert_card_and_pin("1937");
		rig.input(PinVerified);
		rig.step();

		rig.input(BalancePressed);
		assert_eq!(rig.step(), AtmState::ProcessingBalance);
		rig.input(Balance { amount: 149 });
		assert_eq!(rig.step(), AtmState::WaitingForAction);

		assert_eq!(rig.next_display(), DisplayMessage::DisplayWithdrawalOptions(DisplayWithdrawalOptions));
		assert_eq!(rig.next_display(), DisplayMessage::DisplayBalance(DisplayBalance { amount: 149 }));
	}

	#[test]
	fn cancel_while_verifying_is_honoured() {
		let mut rig = Rig::new();
		rig.insert_card_and_pin("1937");
		rig.input(CancelPressed);
		assert_eq!(rig.step(), AtmState::Done);
	}

	#[test]
	fn cancel_while_entering_pin_discards_digits() {
		let mut rig = Rig::new();
		rig.input(CardInserted { account: "A1".into() });
		assert_eq!(rig.step(), AtmState::GettingPin);
		rig.input(DigitPressed { digit: '1' });
		assert_eq!(rig.step(), AtmState::GettingPin);
		assert_eq!(rig.atm.session.pin, "1");

		rig.input(CancelPressed);
		assert_eq!(rig.step(), AtmState::Done);
		assert_eq!(rig.step(), AtmState::WaitingForCard);
		assert!(rig.atm.session.pin.is_empty());
		assert!(rig.atm.session.account.is_empty());

		assert_eq!(rig.next_display(), DisplayMessage::DisplayEnterCard(DisplayEnterCard));
		assert_eq!(rig.next_display(), DisplayMessage::DisplayEnterPin(DisplayEnterPin));
		assert_eq!(rig.next_display(), DisplayMessage::EjectCard(EjectCard));
		assert_eq!(rig.bank.pending(), 0);
	}

	#[test]
	fn cancel_while_balance_pending_skips_balance_display() {
		let mut rig = Rig::new();
		rig.insert_card_and_pin("1937");
		rig.input(PinVerified);
		assert_eq!(rig.step(), AtmState::WaitingForAction);

		rig.input(BalancePressed);
		assert_eq!(rig.step(), AtmState::ProcessingBalance);
		rig.input(CancelPressed);
		assert_eq!(rig.step(), AtmState::Done);
		assert_eq!(rig.step(), AtmState::WaitingForCard);

		assert_eq!(rig.next_display(), DisplayMessage::DisplayWithdrawalOptions(DisplayWithdrawalOptions));
		assert_eq!(rig.next_display(), DisplayMessage::EjectCard(EjectCard));
		assert_eq!(rig.display.pending(), 0);

		let _verify = rig.next_bank();
		assert!(matches!(rig.next_bank(), BankMessage::GetBalance(_)));
		assert_eq!(rig.bank.pending(), 0);
	}

	#[test]
	fn keypad_states_are_the_user_facing_ones() {
		let keypad: Vec<AtmState> = [
			AtmState::WaitingForCard,
			AtmState::GettingPin,
			AtmState::VerifyingPin,
			AtmState::WaitingForAction,
			AtmState::ProcessingWithdrawal,
			AtmState::ProcessingBalance,
			AtmState::Done,
		]
		.into_iter()
		.filter(|state| state.awaits_keypad())
		.collect();
		assert_eq!(keypad, [AtmState::WaitingForCard, AtmState::GettingPin, AtmState::WaitingForAction]);
	}

	#[test]
	fn close_stops_without_transition() {
		let mut rig = Rig::new();
		rig.atm.sender().close();
		assert_eq!(rig.atm.step(), Err(Closed));
		assert_eq!(rig.atm.state(), AtmState::WaitingForCard);
	}

	#[test]
	fn state_names_are_stable() {
		assert_eq!(AtmState::WaitingForCard.to_string(), "wait-for-card");
		assert_eq!(AtmState::ProcessingWithdrawal.as_str(), "process-withdrawal");
	}
}
