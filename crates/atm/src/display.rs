//! Text display sink.

use std::io::Write;

use teller_worker::{Actor, Closed, Receiver, Sender};

use crate::config::AtmConfig;
use crate::messages::{
	DisplayBalance, DisplayEnterCard, DisplayEnterPin, DisplayInsufficientFunds, DisplayMessage, DisplayPinIncorrect, DisplayWithdrawalCancelled,
	DisplayWithdrawalOptions, EjectCard, IssueMoney,
};

struct Screen<W> {
	out: W,
	withdraw_amount: u64,
}

impl<W: Write> Screen<W> {
	fn show(&mut self, lines: &[&str]) {
		for line in lines {
			if let Err(error) = writeln!(self.out, "{line}") {
				tracing::warn!(%error, "display.write_failed");
				return;
			}
		}
		if let Err(error) = self.out.flush() {
			tracing::warn!(%error, "display.flush_failed");
		}
	}
}

/// Renders display notifications as lines of text on `W`.
///
/// Fire-and-forget: the sink never replies. Write failures are logged and
/// otherwise ignored.
pub struct DisplayActor<W> {
	incoming: Receiver<DisplayMessage>,
	screen: Screen<W>,
}

impl<W: Write> DisplayActor<W> {
	/// Creates a sink writing to `out`. The withdraw prompt advertises the
	/// keypad's configured amount.
	pub fn new(out: W, config: &AtmConfig) -> Self {
		Self {
			incoming: Receiver::new(),
			screen: Screen {
				out,
				withdraw_amount: config.withdraw_amount,
			},
		}
	}

	/// Returns the writer, consuming the sink.
	pub fn into_inner(self) -> W {
		self.screen.out
	}

	/// Renders exactly one notification.
	pub fn show_one(&mut self) -> Result<(), Closed> {
		self.incoming
			.wait()
			.handle(|msg: IssueMoney, screen: &mut Screen<W>| screen.show(&[format!("Issuing {}", msg.amount).as_str()]))
			.handle(|_: DisplayInsufficientFunds, screen| screen.show(&["Insufficient funds"]))
			.handle(|_: DisplayEnterPin, screen| screen.show(&["Please enter your PIN (0-9)"]))
			.handle(|_: DisplayEnterCard, screen| screen.show(&["Please enter your card (I)"]))
			.handle(|msg: DisplayBalance, screen| screen.show(&[format!("The balance of your account is {}", msg.amount).as_str()]))
			.handle(|_: DisplayWithdrawalOptions, screen| {
				let withdraw = format!("Withdraw {}? (w)", screen.withdraw_amount);
				screen.show(&[withdraw.as_str(), "Display Balance? (b)", "Cancel? (c)"]);
			})
			.handle(|_: DisplayWithdrawalCancelled, screen| screen.show(&["Withdrawal cancelled"]))
			.handle(|_: DisplayPinIncorrect, screen| screen.show(&["PIN incorrect"]))
			.handle(|_: EjectCard, screen| screen.show(&["Ejecting card"]))
			.receive(&mut self.screen)
	}
}

impl<W: Write + Send + 'static> Actor for DisplayActor<W> {
	type Message = DisplayMessage;

	fn sender(&self) -> Sender<DisplayMessage> {
		self.incoming.sender()
	}

	fn run(&mut self) {
		while self.show_one().is_ok() {}
	}
}
