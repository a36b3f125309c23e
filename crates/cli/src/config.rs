//! Read-only gateway configuration.
//!
//! Gateways live in a JSON file the tool never writes:
//! `<config dir>/kgw/gateways.json` by default, or wherever `--config`
//! points. A missing default file means no gateways are configured; a
//! missing explicit file is an error, since the user asked for it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kgw::GatewaySource;
use kgw_protocol::GatewayDescriptor;
use serde::Deserialize;
use tracing::debug;

/// Contents of a gateway config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GatewayConfig {
	/// Gateways in presentation order.
	#[serde(default)]
	pub gateways: Vec<GatewayDescriptor>,
}

impl GatewayConfig {
	/// Loads the config from `path`, or from the default location.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		match path {
			Some(path) => Self::load_file(path)
				.with_context(|| format!("failed to load gateway config {}", path.display())),
			None => match default_path() {
				Some(path) if path.exists() => Self::load_file(&path)
					.with_context(|| format!("failed to load gateway config {}", path.display())),
				other => {
					debug!(target = "kgw.cli", path = ?other, "no gateway config file");
					Ok(Self::default())
				}
			},
		}
	}

	fn load_file(path: &Path) -> Result<Self> {
		let text = fs::read_to_string(path)?;
		let config: Self = serde_json::from_str(&text)?;
		debug!(
			target = "kgw.cli",
			path = %path.display(),
			gateways = config.gateways.len(),
			"gateway config loaded"
		);
		Ok(config)
	}

	/// Finds a configured gateway by name.
	pub fn find(&self, name: &str) -> Option<&GatewayDescriptor> {
		self.gateways.iter().find(|gateway| gateway.name == name)
	}
}

impl GatewaySource for GatewayConfig {
	fn gateways(&self) -> Vec<GatewayDescriptor> {
		self.gateways.clone()
	}
}

/// Default config file location: `<platform config dir>/kgw/gateways.json`.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("kgw").join("gateways.json"))
}

#[cfg(test)]
mod tests {
	use std::io::Write;

	use super::*;

	fn write_config(json: &str) -> tempfile::NamedTempFile {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(json.as_bytes()).unwrap();
		file
	}

	#[test]
	fn loads_descriptors_from_explicit_file() {
		let file = write_config(
			r#"{
				"gateways": [
					{"name": "lab", "baseUrl": "https://lab.example.com", "token": "abc"},
					{"name": "local", "baseUrl": "http://127.0.0.1:8888"}
				]
			}"#,
		);
		let config = GatewayConfig::load(Some(file.path())).unwrap();
		assert_eq!(config.gateways.len(), 2);
		assert_eq!(config.find("lab").unwrap().options.token.as_deref(), Some("abc"));
		assert!(config.find("prod").is_none());
	}

	#[test]
	fn empty_object_means_no_gateways() {
		let file = write_config("{}");
		let config = GatewayConfig::load(Some(file.path())).unwrap();
		assert!(config.gateways.is_empty());
	}

	#[test]
	fn missing_explicit_file_is_an_error() {
		let error = GatewayConfig::load(Some(Path::new("/nonexistent/gateways.json"))).unwrap_err();
		assert!(error.to_string().contains("/nonexistent/gateways.json"));
	}

	#[test]
	fn malformed_json_is_an_error() {
		let file = write_config("{\"gateways\": [");
		assert!(GatewayConfig::load(Some(file.path())).is_err());
	}
}
