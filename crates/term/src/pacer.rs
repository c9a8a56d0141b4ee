//! Keeps scripted keypad input in step with the ATM session.
//!
//! The session drops input it is not listening for, so a key sent while the
//! ATM waits on the bank is lost. The pacer follows reported state changes
//! and holds the next key back until the session is idle at the keypad.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use teller_atm::AtmState;
use teller_atm::messages::{SessionEvent, StateEntered};
use teller_worker::{Actor, ActorError, ActorHandle, Receiver, Sender, spawn_actor};

/// How long the session must stay unchanged before it counts as idle.
pub const QUIET: Duration = Duration::from_millis(50);

/// Forwards session state changes onto a std channel.
struct StateFeed {
	incoming: Receiver<SessionEvent>,
	out: mpsc::Sender<AtmState>,
}

impl Actor for StateFeed {
	type Message = SessionEvent;

	fn sender(&self) -> Sender<SessionEvent> {
		self.incoming.sender()
	}

	fn run(&mut self) {
		while self
			.incoming
			.wait()
			.handle(|msg: StateEntered, out: &mut mpsc::Sender<AtmState>| {
				let _ = out.send(msg.state);
			})
			.receive(&mut self.out)
			.is_ok()
		{}
	}
}

pub struct Pacer {
	feed: ActorHandle<StateFeed>,
	states: mpsc::Receiver<AtmState>,
	state: AtmState,
	quiet: Duration,
}

impl Pacer {
	pub fn spawn(quiet: Duration) -> Result<Self, ActorError> {
		let (out, states) = mpsc::channel();
		let feed = spawn_actor(
			"teller-pacer",
			StateFeed {
				incoming: Receiver::new(),
				out,
			},
		)?;
		Ok(Self {
			feed,
			states,
			state: AtmState::WaitingForCard,
			quiet,
		})
	}

	/// Observer endpoint to hand to the ATM session.
	pub fn observer(&self) -> Sender<SessionEvent> {
		self.feed.sender()
	}

	/// Last state the session reported.
	pub fn state(&self) -> AtmState {
		self.state
	}

	/// Blocks until the session waits on the keypad and has been quiet for
	/// the configured interval. Returns at once if the session is gone.
	pub fn settle(&mut self) {
		loop {
			match self.states.recv_timeout(self.quiet) {
				Ok(state) => self.state = state,
				Err(RecvTimeoutError::Timeout) if self.state.awaits_keypad() => return,
				Err(RecvTimeoutError::Timeout) => {
					tracing::trace!(state = %self.state, "pacer.awaiting_bank");
				}
				Err(RecvTimeoutError::Disconnected) => return,
			}
		}
	}

	pub fn shutdown(self) -> Result<(), ActorError> {
		self.feed.shutdown().map(drop)
	}
}
