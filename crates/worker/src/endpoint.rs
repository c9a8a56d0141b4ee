use std::fmt;
use std::sync::{Arc, Weak};

use crate::dispatch::Dispatcher;
use crate::mailbox::{Envelope, Mailbox};
use crate::message::Message;

/// Non-owning handle that pushes messages into one actor's mailbox.
///
/// A sender never keeps the mailbox alive. Sending through a null sender, or
/// through one whose [`Receiver`] has been dropped, does nothing.
pub struct Sender<M> {
	target: Weak<Mailbox<M>>,
}

impl<M> Clone for Sender<M> {
	fn clone(&self) -> Self {
		Self {
			target: Weak::clone(&self.target),
		}
	}
}

impl<M> Default for Sender<M> {
	fn default() -> Self {
		Self::null()
	}
}

impl<M> PartialEq for Sender<M> {
	fn eq(&self, other: &Self) -> bool {
		Weak::ptr_eq(&self.target, &other.target)
	}
}

impl<M> Eq for Sender<M> {}

impl<M> fmt::Debug for Sender<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Sender").field("bound", &self.is_bound()).finish()
	}
}

impl<M> Sender<M> {
	/// Returns a sender bound to nothing.
	pub const fn null() -> Self {
		Self { target: Weak::new() }
	}

	/// Returns true while the target mailbox still exists.
	pub fn is_bound(&self) -> bool {
		self.target.strong_count() > 0
	}

	/// Pushes the reserved close signal, ending the receiving actor's loop.
	pub fn close(&self) {
		if let Some(mailbox) = self.target.upgrade() {
			tracing::trace!("mailbox.close");
			mailbox.push(Envelope::Close);
		}
	}
}

impl<M: Message> Sender<M> {
	/// Pushes one message. No-op when the sender is unbound.
	pub fn send(&self, message: impl Into<M>) {
		let Some(mailbox) = self.target.upgrade() else {
			return;
		};
		let message = message.into();
		tracing::trace!(kind = message.kind(), "mailbox.send");
		mailbox.push(Envelope::Message(message));
	}
}

/// Owning end of an actor mailbox.
///
/// There is exactly one receiver per mailbox; it is the only consumer.
pub struct Receiver<M> {
	mailbox: Arc<Mailbox<M>>,
}

impl<M> Default for Receiver<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M> fmt::Debug for Receiver<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Receiver").field("pending", &self.mailbox.len()).finish()
	}
}

impl<M> Receiver<M> {
	/// Creates a receiver with a fresh, empty mailbox.
	pub fn new() -> Self {
		Self {
			mailbox: Arc::new(Mailbox::new()),
		}
	}

	/// Returns a sender bound to this receiver's mailbox.
	pub fn sender(&self) -> Sender<M> {
		Sender {
			target: Arc::downgrade(&self.mailbox),
		}
	}

	/// Returns the number of queued entries.
	pub fn pending(&self) -> usize {
		self.mailbox.len()
	}
}

impl<M: Message> Receiver<M> {
	/// Starts an empty selective-receive chain on this mailbox.
	pub fn wait(&self) -> Dispatcher<'_, M> {
		Dispatcher::new(&self.mailbox)
	}
}
