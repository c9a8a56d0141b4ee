//! `teller` binary.
//!
//! Runs the ATM, bank and display actors and feeds them keystrokes from
//! stdin, one key at a time once the session is ready for it. Display
//! output goes to stdout, logs to stderr.

mod cli;
mod keypad;
mod pacer;

use std::io;

use anyhow::Context;
use clap::Parser;
use teller_atm::{Teller, TellerConfig};
use tracing::info;

use crate::cli::Cli;
use crate::keypad::Keymap;
use crate::pacer::Pacer;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_writer(io::stderr)
		.with_max_level(cli.log_level())
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = match &cli.config {
		Some(path) => TellerConfig::load(path).with_context(|| format!("loading config from {}", path.display()))?,
		None => TellerConfig::default(),
	};

	let mut pacer = Pacer::spawn(pacer::QUIET).context("starting session pacer")?;
	let teller = Teller::spawn_observed(&config, io::stdout(), pacer.observer()).context("starting teller actors")?;
	info!(account = %config.atm.account, "Starting teller");

	let keymap = Keymap::new(&config.atm);
	let input = keypad::drive(io::stdin().lock(), &keymap, &teller.keypad(), || pacer.settle());
	info!(state = %pacer.state(), "Keypad input ended");

	teller.shutdown().context("stopping teller actors")?;
	pacer.shutdown().context("stopping session pacer")?;
	input.context("reading keypad input")
}
