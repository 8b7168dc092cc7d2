#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;
mod error;

#[derive(Parser)]
#[command(name = "awdload", about = "AWD scene inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print header fields and block statistics.
	Info(cmd::info::Args),
	/// List raw blocks in stream order.
	Blocks(cmd::blocks::Args),
	/// Load the scene graph and print its node tree.
	Scene(cmd::scene::Args),
}

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> error::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Blocks(args) => cmd::blocks::run(args),
		Commands::Scene(args) => cmd::scene::run(args),
	}
}
