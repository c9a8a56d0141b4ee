use std::io::Write;

use teller_worker::{ActorError, ActorHandle, Sender, spawn_actor};

use crate::bank::{BankActor, Ledger};
use crate::config::TellerConfig;
use crate::display::DisplayActor;
use crate::messages::{AtmMessage, SessionEvent};
use crate::session::{AtmActor, AtmState};

/// The three teller actors running on their own threads.
pub struct Teller<W: Write + Send + 'static> {
	atm: ActorHandle<AtmActor>,
	bank: ActorHandle<BankActor>,
	display: ActorHandle<DisplayActor<W>>,
}

/// Final actor state collected by [`Teller::shutdown`].
#[derive(Debug)]
pub struct TellerReport<W> {
	/// State the session was waiting in when it was closed.
	pub atm_state: AtmState,
	/// Ledger as the bank left it.
	pub ledger: Ledger,
	/// The display's writer.
	pub output: W,
}

impl<W: Write + Send + 'static> Teller<W> {
	/// Starts bank, display and ATM actors wired to each other.
	pub fn spawn(config: &TellerConfig, out: W) -> Result<Self, ActorError> {
		Self::spawn_observed(config, out, Sender::null())
	}

	/// Like [`Teller::spawn`], reporting session state changes to `observer`.
	pub fn spawn_observed(config: &TellerConfig, out: W, observer: Sender<SessionEvent>) -> Result<Self, ActorError> {
		let bank = spawn_actor("teller-bank", BankActor::new(Ledger::from(&config.bank)))?;
		let display = match spawn_actor("teller-display", DisplayActor::new(out, &config.atm)) {
			Ok(display) => display,
			Err(error) => {
				let _ = bank.shutdown();
				return Err(error);
			}
		};
		let atm = AtmActor::new(bank.sender(), display.sender(), &config.atm).with_observer(observer);
		let atm = match spawn_actor("teller-atm", atm) {
			Ok(atm) => atm,
			Err(error) => {
				let _ = bank.shutdown();
				let _ = display.shutdown();
				return Err(error);
			}
		};
		tracing::info!(balance = config.bank.opening_balance, "teller.started");
		Ok(Self { atm, bank, display })
	}

	/// Sender for keypad input into the ATM session.
	pub fn keypad(&self) -> Sender<AtmMessage> {
		self.atm.sender()
	}

	/// Closes the ATM, then the bank, then the display, and joins all three.
	pub fn shutdown(self) -> Result<TellerReport<W>, ActorError> {
		let atm = self.atm.shutdown();
		let bank = self.bank.shutdown();
		let display = self.display.shutdown();
		let report = TellerReport {
			atm_state: atm?.state(),
			ledger: bank?.ledger().clone(),
			output: display?.into_inner(),
		};
		tracing::info!(balance = report.ledger.balance(), "teller.stopped");
		Ok(report)
	}
}
