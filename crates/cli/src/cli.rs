use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::styles::cli_styles;

/// Root CLI for kgw.
#[derive(Parser, Debug)]
#[command(name = "kgw")]
#[command(about = "Pick and attach to kernels on remote kernel gateways")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v picker stages, -vv transport)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Gateway config file (default: <config dir>/kgw/gateways.json)
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Interactively resolve a kernel: gateway, credentials, session.
	Pick(PickArgs),
	/// List configured gateways.
	Gateways,
	/// Probe one gateway's kernel specs without any interaction.
	Specs(SpecsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PickArgs {
	/// Document the kernel is picked for. Names the new session's path.
	#[arg(long, value_name = "PATH")]
	pub document: Option<String>,

	/// Only offer kernels for this language (e.g. python).
	#[arg(long, value_name = "LANG")]
	pub language: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SpecsArgs {
	/// Configured gateway name to probe.
	#[arg(value_name = "GATEWAY")]
	pub gateway: String,

	/// Token to authenticate with, overriding the configured one.
	#[arg(long, value_name = "TOKEN")]
	pub token: Option<String>,
}
