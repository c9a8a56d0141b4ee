use std::any::Any;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::endpoint::Sender;
use crate::message::Message;
use crate::spawn::spawn_named_thread;

/// An independently scheduled unit owning private state and one mailbox.
pub trait Actor: Send + Sized + 'static {
	/// Mailbox message enum.
	type Message: Message;

	/// Returns a sender bound to this actor's mailbox.
	fn sender(&self) -> Sender<Self::Message>;

	/// Runs the receive loop until the mailbox delivers its close signal.
	fn run(&mut self);
}

/// Actor lifecycle failures.
#[derive(Debug, Error)]
pub enum ActorError {
	/// The OS refused to start the actor thread.
	#[error("failed to spawn actor thread '{name}': {source}")]
	Spawn {
		name: String,
		#[source]
		source: std::io::Error,
	},
	/// The actor loop panicked instead of returning.
	#[error("actor '{name}' panicked: {message}")]
	Panicked { name: String, message: String },
}

/// Handle to an actor running on its own thread.
///
/// Joining hands the actor back so its final state can be inspected.
#[derive(Debug)]
pub struct ActorHandle<A: Actor> {
	name: String,
	sender: Sender<A::Message>,
	thread: JoinHandle<A>,
}

impl<A: Actor> ActorHandle<A> {
	/// Returns the actor (and thread) name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns a sender bound to the actor's mailbox.
	pub fn sender(&self) -> Sender<A::Message> {
		self.sender.clone()
	}

	/// Sends the close signal and waits for the loop to exit.
	pub fn shutdown(self) -> Result<A, ActorError> {
		tracing::debug!(actor = %self.name, "actor.shutdown");
		self.sender.close();
		self.join()
	}

	/// Waits for the loop to exit on its own.
	pub fn join(self) -> Result<A, ActorError> {
		let Self { name, thread, .. } = self;
		thread.join().map_err(|payload| {
			let message = panic_message(payload);
			tracing::warn!(actor = %name, %message, "actor.panicked");
			ActorError::Panicked { name, message }
		})
	}
}

/// Starts `actor` on a dedicated named thread.
pub fn spawn_actor<A: Actor>(name: impl Into<String>, mut actor: A) -> Result<ActorHandle<A>, ActorError> {
	let name = name.into();
	let sender = actor.sender();
	let thread_name = name.clone();
	let thread = spawn_named_thread(name.clone(), move || {
		tracing::info!(actor = %thread_name, "actor.started");
		actor.run();
		tracing::info!(actor = %thread_name, "actor.stopped");
		actor
	})
	.map_err(|source| ActorError::Spawn { name: name.clone(), source })?;

	Ok(ActorHandle { name, sender, thread })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
	match payload.downcast::<&'static str>() {
		Ok(msg) => (*msg).to_owned(),
		Err(payload) => match payload.downcast::<String>() {
			Ok(msg) => *msg,
			Err(_) => "non-string panic payload".to_owned(),
		},
	}
}

#[cfg(test)]
mod tests {
	use std::panic;

	use super::*;
	use crate::Receiver;

	#[derive(Debug)]
	struct Add(u64);
	#[derive(Debug)]
	struct Explode;

	crate::messages! {
		#[derive(Debug)]
		enum CounterMsg { Add, Explode }
	}

	#[derive(Debug, Default)]
	struct Counter {
		incoming: Receiver<CounterMsg>,
		total: u64,
	}

	impl Actor for Counter {
		type Message = CounterMsg;

		fn sender(&self) -> Sender<CounterMsg> {
			self.incoming.sender()
		}

		fn run(&mut self) {
			loop {
				let step = self
					.incoming
					.wait()
					.handle(|Add(n): Add, total: &mut u64| *total += n)
					.handle(|_: Explode, _: &mut u64| panic!("boom-{}", "string"))
					.receive(&mut self.total);
				if step.is_err() {
					return;
				}
			}
		}
	}

	#[test]
	fn shutdown_returns_final_state() {
		let handle = spawn_actor("counter", Counter::default()).unwrap();
		assert_eq!(handle.name(), "counter");
		let tx = handle.sender();
		tx.send(Add(2));
		tx.send(Add(40));

		let counter = handle.shutdown().unwrap();
		assert_eq!(counter.total, 42);
	}

	#[test]
	fn panicking_loop_is_reported_with_message() {
		let handle = spawn_actor("counter-panics", Counter::default()).unwrap();
		handle.sender().send(Explode);

		let err = handle.join().unwrap_err();
		match err {
			ActorError::Panicked { name, message } => {
				assert_eq!(name, "counter-panics");
				assert!(message.contains("boom-string"), "expected 'boom-string', got: {message}");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn extracts_static_str_payload() {
		let payload = panic::catch_unwind(|| panic!("boom-str")).unwrap_err();
		assert_eq!(panic_message(payload), "boom-str");
	}

	#[test]
	fn opaque_payload_gets_placeholder() {
		let payload = panic::catch_unwind(|| panic::panic_any(7u8)).unwrap_err();
		assert_eq!(panic_message(payload), "non-string panic payload");
	}
}
