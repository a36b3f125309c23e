//! `kgw pick`: interactive kernel resolution.

use anyhow::{Context, Result};
use colored::Colorize;
use kgw::{KernelPicker, PickerEnv, PickerState};
use kgw_client::HttpGateway;

use crate::cli::PickArgs;
use crate::config::GatewayConfig;
use crate::terminal::{CliDocument, TermChooser, TermPrompter, TermReporter};

pub async fn run(config: GatewayConfig, args: PickArgs) -> Result<i32> {
	let client = HttpGateway::new().context("failed to initialize the gateway client")?;
	let env = PickerEnv {
		chooser: Box::new(TermChooser),
		prompter: Box::new(TermPrompter),
		client: Box::new(client),
		reporter: Box::new(TermReporter),
		gateways: Box::new(config),
		documents: Box::new(CliDocument {
			path: args.document,
			language: args.language,
		}),
	};

	let mut picker = KernelPicker::new(env);
	match picker.toggle().await {
		Some(resolved) => {
			println!(
				"{} kernel '{}' ({}) on gateway '{}', session {}",
				"connected:".green().bold(),
				resolved.spec.name,
				resolved.spec.display_name,
				resolved.gateway,
				resolved.session.id(),
			);
			Ok(0)
		}
		// Failures were already reported through the picker's reporter;
		// a user cancel exits clean.
		None => match picker.state() {
			PickerState::Cancelled => Ok(0),
			_ => Ok(1),
		},
	}
}
