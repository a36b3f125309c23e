//! `kgw specs`: non-interactive spec discovery probe.
//!
//! Useful for checking whether a gateway is reachable and how a failed
//! request gets classified, without walking the interactive flow.

use anyhow::{Result, bail};
use colored::Colorize;
use kgw::GatewayClient;
use kgw_client::HttpGateway;

use crate::cli::SpecsArgs;
use crate::config::GatewayConfig;

pub async fn run(config: &GatewayConfig, args: SpecsArgs) -> Result<i32> {
	let Some(descriptor) = config.find(&args.gateway) else {
		let known: Vec<&str> = config
			.gateways
			.iter()
			.map(|gateway| gateway.name.as_str())
			.collect();
		bail!(
			"unknown gateway '{}' (configured: {})",
			args.gateway,
			if known.is_empty() { "none".to_string() } else { known.join(", ") }
		);
	};

	let mut options = descriptor.options.clone();
	if let Some(token) = args.token {
		options = options.with_token(token);
	}

	let client = HttpGateway::new()?;
	match client.kernel_specs(&options).await {
		Ok(specs) => {
			for spec in specs {
				println!(
					"{}  {}  {}",
					spec.name.bold(),
					spec.display_name,
					spec.language.dimmed(),
				);
			}
			Ok(0)
		}
		Err(error) => {
			let status = error
				.status
				.map(|status| format!(" (HTTP {status})"))
				.unwrap_or_default();
			eprintln!(
				"{} {:?}{}: {}",
				"discovery failed:".red().bold(),
				error.kind,
				status,
				error.message,
			);
			Ok(1)
		}
	}
}
