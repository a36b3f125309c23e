use clap::Parser;
use colored::Colorize;
use kgw_cli::{cli::Cli, commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	match commands::dispatch(cli).await {
		Ok(code) => std::process::exit(code),
		Err(err) => {
			eprintln!("{} {err:#}", "error:".red().bold());
			std::process::exit(1);
		}
	}
}
