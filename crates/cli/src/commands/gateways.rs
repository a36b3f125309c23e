//! `kgw gateways`: list the configured gateways.

use anyhow::Result;
use colored::Colorize;
use kgw_protocol::COOKIE;

use crate::config::{GatewayConfig, default_path};

pub fn run(config: &GatewayConfig) -> Result<i32> {
	if config.gateways.is_empty() {
		let hint = default_path()
			.map(|path| path.display().to_string())
			.unwrap_or_else(|| "--config <FILE>".to_string());
		eprintln!("no gateways configured (expected {hint})");
		return Ok(1);
	}
	for gateway in &config.gateways {
		let mut auth = Vec::new();
		if gateway.options.token.is_some() {
			auth.push("token");
		}
		if gateway.options.headers.contains_key(COOKIE) {
			auth.push("cookie");
		}
		let auth = if auth.is_empty() {
			String::new()
		} else {
			format!("  [{}]", auth.join(", "))
		};
		println!(
			"{}  {}{}",
			gateway.name.bold(),
			gateway.options.base_url.dimmed(),
			auth.dimmed(),
		);
	}
	Ok(0)
}
