//! Command implementations and dispatch.

mod gateways;
mod pick;
mod specs;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::config::GatewayConfig;

/// Runs the selected command and returns the process exit code.
pub async fn dispatch(cli: Cli) -> Result<i32> {
	let config = GatewayConfig::load(cli.config.as_deref())?;
	match cli.command {
		Commands::Pick(args) => pick::run(config, args).await,
		Commands::Gateways => gateways::run(&config),
		Commands::Specs(args) => specs::run(&config, args).await,
	}
}
