//! ATM simulation built from three cooperating actors.
//!
//! * [`AtmActor`]: the session state machine fed by keypad input.
//! * [`BankActor`]: owns the account balance and answers ATM requests.
//! * [`DisplayActor`]: renders one-way notifications as text.
//!
//! [`Teller`] wires them together on their own threads.

pub mod bank;
pub mod config;
pub mod display;
pub mod error;
pub mod messages;
pub mod session;
mod system;

pub use bank::{BankActor, Ledger};
pub use config::{AtmConfig, BankConfig, TellerConfig};
pub use display::DisplayActor;
pub use error::ConfigError;
pub use session::{AtmActor, AtmState};
pub use system::{Teller, TellerReport};
