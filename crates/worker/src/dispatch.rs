//! Selective receive.
//!
//! A receive starts empty from [`crate::Receiver::wait`], gains typed arms via
//! [`Dispatcher::handle`] / [`Select::handle`], and runs once via
//! [`Select::receive`]:
//!
//! ```text
//! loop {
//!     pop the oldest envelope (blocking)
//!     close signal     => return Err(Closed)
//!     first arm match  => run its handler, return Ok(result)
//!     no arm matches   => drop the message, keep waiting
//! }
//! ```
//!
//! Dropped messages are gone for good; they are not requeued for a later
//! receive. Only [`Select`] can receive, so a chain with zero arms does not
//! compile.

use thiserror::Error;

use crate::mailbox::{Envelope, Mailbox};
use crate::message::{Extract, Message};

/// The mailbox delivered its close signal while a receive was waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("mailbox closed")]
pub struct Closed;

type Arm<'h, M, C, R> = Box<dyn FnMut(M, &mut C) -> Result<R, M> + 'h>;

/// Empty selective-receive chain. Register at least one arm to receive.
#[must_use = "a dispatcher does nothing until an arm is registered and `receive` is called"]
pub struct Dispatcher<'r, M> {
	mailbox: &'r Mailbox<M>,
}

impl<'r, M: Message> Dispatcher<'r, M> {
	pub(crate) fn new(mailbox: &'r Mailbox<M>) -> Self {
		Self { mailbox }
	}

	/// Registers the first arm: messages of kind `T` run `handler`.
	pub fn handle<'h, T, C, R, F>(self, handler: F) -> Select<'r, 'h, M, C, R>
	where
		T: Extract<M>,
		F: FnMut(T, &mut C) -> R + 'h,
	{
		Select {
			mailbox: self.mailbox,
			arms: Vec::new(),
		}
		.handle(handler)
	}

	/// Registers a catch-all first arm that accepts every message.
	pub fn handle_any<'h, C, R, F>(self, handler: F) -> Select<'r, 'h, M, C, R>
	where
		F: FnMut(M, &mut C) -> R + 'h,
	{
		Select {
			mailbox: self.mailbox,
			arms: Vec::new(),
		}
		.handle_any(handler)
	}
}

/// Selective-receive chain with at least one arm.
///
/// Handlers get exclusive access to a caller-supplied context `C` (normally
/// the actor's private state) and all return the same `R`.
#[must_use = "a selective receive only runs when `receive` is called"]
pub struct Select<'r, 'h, M, C, R> {
	mailbox: &'r Mailbox<M>,
	arms: Vec<Arm<'h, M, C, R>>,
}

impl<'r, 'h, M: Message, C, R> Select<'r, 'h, M, C, R> {
	/// Appends an arm for kind `T`. Earlier arms win ties.
	pub fn handle<T, F>(mut self, mut handler: F) -> Self
	where
		T: Extract<M>,
		F: FnMut(T, &mut C) -> R + 'h,
	{
		self.arms.push(Box::new(move |message: M, context: &mut C| -> Result<R, M> {
			T::extract(message).map(|payload| handler(payload, context))
		}));
		self
	}

	/// Appends a catch-all arm.
	pub fn handle_any<F>(mut self, mut handler: F) -> Self
	where
		F: FnMut(M, &mut C) -> R + 'h,
	{
		self.arms.push(Box::new(move |message: M, context: &mut C| -> Result<R, M> { Ok(handler(message, context)) }));
		self
	}

	/// Returns the number of registered arms.
	pub fn arms(&self) -> usize {
		self.arms.len()
	}

	/// Blocks until a message matches one of the arms and returns its handler's
	/// result.
	///
	/// Non-matching messages are discarded. Returns [`Closed`] without running
	/// any handler once the close signal is popped.
	pub fn receive(mut self, context: &mut C) -> Result<R, Closed> {
		loop {
			let mut message = match self.mailbox.pop() {
				Envelope::Message(message) => message,
				Envelope::Close => {
					tracing::trace!("select.closed");
					return Err(Closed);
				}
			};
			let kind = message.kind();
			for arm in &mut self.arms {
				match arm(message, &mut *context) {
					Ok(result) => {
						tracing::trace!(kind, "select.matched");
						return Ok(result);
					}
					Err(unmatched) => message = unmatched,
				}
			}
			tracing::trace!(kind, "select.discarded");
		}
	}
}
