//! Thread-backed actor runtime primitives.
//!
//! Every actor owns a [`Receiver`] and runs its loop on a dedicated OS thread.
//! Other actors talk to it through cheap [`Sender`] handles. Actors consume
//! their mailbox with selective receive: [`Receiver::wait`] starts a chain of
//! typed handlers and [`Select::receive`] blocks until one of them matches,
//! discarding everything else that arrives in the meantime.

mod actor;
mod dispatch;
mod endpoint;
mod mailbox;
mod message;
mod spawn;

pub use actor::{Actor, ActorError, ActorHandle, spawn_actor};
pub use dispatch::{Closed, Dispatcher, Select};
pub use endpoint::{Receiver, Sender};
pub use mailbox::{Envelope, Mailbox};
pub use message::{Extract, Message};
pub use spawn::spawn_named_thread;
