use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

/// One queued mailbox entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<M> {
	/// User message.
	Message(M),
	/// Reserved control signal that ends the owning actor's loop.
	Close,
}

/// Unbounded FIFO mailbox with blocking pop.
///
/// Any number of producers may push concurrently. Actors built on top of it
/// assume a single consumer (the owning [`crate::Receiver`]).
pub struct Mailbox<M> {
	queue: Mutex<VecDeque<Envelope<M>>>,
	ready: Condvar,
}

impl<M> Default for Mailbox<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M> Mailbox<M> {
	/// Creates an empty mailbox.
	pub fn new() -> Self {
		Self {
			queue: Mutex::new(VecDeque::new()),
			ready: Condvar::new(),
		}
	}

	/// Appends one entry and wakes a blocked consumer. Never fails.
	pub fn push(&self, envelope: Envelope<M>) {
		let mut queue = self.queue.lock();
		queue.push_back(envelope);
		drop(queue);
		self.ready.notify_one();
	}

	/// Removes the oldest entry, blocking while the mailbox is empty.
	///
	/// The lock is released while waiting. There is no timeout.
	pub fn pop(&self) -> Envelope<M> {
		let mut queue = self.queue.lock();
		loop {
			if let Some(envelope) = queue.pop_front() {
				return envelope;
			}
			self.ready.wait(&mut queue);
		}
	}

	/// Returns current queue length.
	pub fn len(&self) -> usize {
		self.queue.lock().len()
	}

	/// Returns true when nothing is queued.
	pub fn is_empty(&self) -> bool {
		self.queue.lock().is_empty()
	}
}
