//! Message catalogue.
//!
//! Every message kind is its own struct. The kinds each actor accepts are
//! gathered into one mailbox enum per actor.

use teller_worker::{Sender, messages};

use crate::session::AtmState;

/// Reply address carried by bank requests.
pub type ReplyTo = Sender<AtmMessage>;

// ── Keypad input (into the ATM) ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInserted {
	pub account: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitPressed {
	pub digit: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearLastPressed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelPressed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawPressed {
	pub amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalancePressed;

// ── Bank replies (into the ATM) ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinVerified;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinIncorrect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawOk;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawDenied;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
	pub amount: u64,
}

// ── Requests and notifications to the bank ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPin {
	pub account: String,
	pub pin: String,
	pub reply_to: ReplyTo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawRequest {
	pub account: String,
	pub amount: u64,
	pub reply_to: ReplyTo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBalance {
	pub account: String,
	pub reply_to: ReplyTo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalProcessed {
	pub account: String,
	pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelWithdrawal {
	pub account: String,
	pub amount: u64,
}

// ── Display notifications ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayEnterCard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayEnterPin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWithdrawalOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBalance {
	pub amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInsufficientFunds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWithdrawalCancelled;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPinIncorrect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueMoney {
	pub amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EjectCard;

// ── Session observation ──

/// Emitted each time the ATM session enters a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEntered {
	pub state: AtmState,
}

messages! {
	/// Everything the ATM session mailbox accepts.
	#[derive(Debug, Clone, PartialEq, Eq)]
	pub enum AtmMessage {
		CardInserted,
		DigitPressed,
		ClearLastPressed,
		CancelPressed,
		WithdrawPressed,
		BalancePressed,
		PinVerified,
		PinIncorrect,
		WithdrawOk,
		WithdrawDenied,
		Balance,
	}
}

messages! {
	/// Everything the bank mailbox accepts.
	#[derive(Debug, Clone, PartialEq, Eq)]
	pub enum BankMessage {
		VerifyPin,
		WithdrawRequest,
		GetBalance,
		WithdrawalProcessed,
		CancelWithdrawal,
	}
}

messages! {
	/// Everything the display sink accepts.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub enum DisplayMessage {
		DisplayEnterCard,
		DisplayEnterPin,
		DisplayWithdrawalOptions,
		DisplayBalance,
		DisplayInsufficientFunds,
		DisplayWithdrawalCancelled,
		DisplayPinIncorrect,
		IssueMoney,
		EjectCard,
	}
}

messages! {
	/// Session progress reported to an optional observer.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub enum SessionEvent {
		StateEntered,
	}
}
