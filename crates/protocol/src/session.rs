//! Wire types for the `/api/sessions` endpoints.

use serde::{Deserialize, Serialize};

/// A live kernel as embedded in a session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelModel {
	/// Kernel UUID assigned by the gateway.
	pub id: String,
	/// Registry name of the spec the kernel was started from.
	pub name: String,
}

/// A session record as returned by `GET /api/sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionModel {
	/// Session UUID assigned by the gateway.
	pub id: String,
	/// User-assigned name. The gateway sends an empty string when unset.
	#[serde(default)]
	pub name: String,
	/// Resource path the session is bound to.
	#[serde(default)]
	pub path: String,
	/// The kernel serving this session, absent when the kernel died.
	#[serde(default)]
	pub kernel: Option<KernelModel>,
}

impl SessionModel {
	/// Registry name of the session's kernel spec, when identifiable.
	pub fn kernel_name(&self) -> Option<&str> {
		self.kernel.as_ref().map(|kernel| kernel.name.as_str())
	}
}

/// Request body for `POST /api/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionRequest {
	/// Resource path to bind the session to.
	pub path: String,
	/// Session type. The picker always creates `notebook` sessions.
	#[serde(rename = "type")]
	pub session_type: String,
	/// Display name for the session.
	pub name: String,
	/// Kernel to start.
	pub kernel: KernelRef,
}

/// Kernel reference inside a session-create request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelRef {
	/// Registry name of the spec to start.
	pub name: String,
}

impl NewSessionRequest {
	/// Builds a notebook-session request for the given path and kernel spec.
	///
	/// The display name is the final segment of `path`, matching what the
	/// gateway's own UI would record for that resource.
	pub fn notebook(path: impl Into<String>, kernel_name: impl Into<String>) -> Self {
		let path = path.into();
		let name = path.rsplit('/').next().unwrap_or(&path).to_string();
		Self {
			path,
			session_type: "notebook".to_string(),
			name,
			kernel: KernelRef {
				name: kernel_name.into(),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn session_decodes_with_missing_name() {
		let session: SessionModel = serde_json::from_str(
			r#"{
				"id": "b4f5",
				"path": "analysis.ipynb",
				"type": "notebook",
				"kernel": {"id": "k1", "name": "python3", "execution_state": "idle"}
			}"#,
		)
		.unwrap();
		assert_eq!(session.id, "b4f5");
		assert!(session.name.is_empty());
		assert_eq!(session.kernel_name(), Some("python3"));
	}

	#[test]
	fn session_decodes_with_null_kernel() {
		let session: SessionModel = serde_json::from_str(
			r#"{"id": "c9", "path": "x.ipynb", "kernel": null}"#,
		)
		.unwrap();
		assert!(session.kernel_name().is_none());
	}

	#[test]
	fn notebook_request_serializes_gateway_shape() {
		let req = NewSessionRequest::notebook("work/report-1a2b.ipynb", "python3");
		let json = serde_json::to_string(&req).unwrap();
		assert!(json.contains(r#""type":"notebook""#));
		assert!(json.contains(r#""path":"work/report-1a2b.ipynb""#));
		assert!(json.contains(r#""name":"report-1a2b.ipynb""#));
		assert!(json.contains(r#""kernel":{"name":"python3"}"#));
	}

	#[test]
	fn notebook_request_name_for_bare_path() {
		let req = NewSessionRequest::notebook("unsaved-9f", "ir");
		assert_eq!(req.name, "unsaved-9f");
	}
}
