use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "teller")]
#[command(about = "ATM simulation driven from the keyboard")]
#[command(version)]
pub struct Cli {
	/// TOML configuration file (built-in defaults if omitted)
	#[arg(short, long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,
}

impl Cli {
	pub fn log_level(&self) -> tracing::Level {
		if self.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO }
	}
}
