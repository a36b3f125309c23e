//! Clap help styling.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

/// Help palette for the `kgw` binary: bold green section headers and
/// usage line, cyan for literal command text, `<PLACEHOLDER>`s, and
/// valid values. Deliberately the same scheme cargo prints with, so the
/// tool blends into a Rust toolchain setup.
pub fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Cyan.on_default())
		.valid(AnsiColor::Cyan.on_default())
}
