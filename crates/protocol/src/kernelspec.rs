//! Wire types for the `GET /api/kernelspecs` endpoint.
//!
//! The gateway nests the displayable fields of each spec one level down
//! under `spec`, keyed by registry name. [`KernelSpecsReply::specs`] flattens
//! that shape into the [`KernelSpec`] records the rest of the picker works
//! with.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A kernel specification advertised by a gateway, flattened for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelSpec {
	/// Registry name, e.g. `python3`. This is the value sent back in
	/// session-create requests.
	pub name: String,
	/// Human-readable name shown in pickers.
	pub display_name: String,
	/// Implementation language, e.g. `python`.
	pub language: String,
}

/// Response body of `GET /api/kernelspecs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelSpecsReply {
	/// Registry name of the gateway's default spec, when advertised.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default: Option<String>,
	/// Available specs keyed by registry name.
	pub kernelspecs: BTreeMap<String, KernelSpecEntry>,
}

/// One entry of the `kernelspecs` map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelSpecEntry {
	/// Registry name, repeated inside the entry by the gateway.
	pub name: String,
	/// Nested displayable fields.
	pub spec: KernelSpecDetails,
}

/// The nested `spec` object of a kernelspec entry.
///
/// The gateway also sends `argv`, `env` and resource links here; the picker
/// only needs the displayable subset, so unknown fields are ignored on
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelSpecDetails {
	/// Human-readable name shown in pickers.
	pub display_name: String,
	/// Implementation language, e.g. `python`.
	#[serde(default)]
	pub language: String,
}

impl KernelSpecsReply {
	/// Flattens the nested wire shape into displayable [`KernelSpec`]s.
	///
	/// Entries come back in map order, so the listing is stable across
	/// repeated fetches regardless of gateway-side ordering.
	pub fn specs(&self) -> Vec<KernelSpec> {
		self.kernelspecs
			.values()
			.map(|entry| KernelSpec {
				name: entry.name.clone(),
				display_name: entry.spec.display_name.clone(),
				language: entry.spec.language.clone(),
			})
			.collect()
	}
}
