//! Gateway connection metadata and websocket handshake assembly.
//!
//! [`ConnectOptions`] is an immutable snapshot of everything needed to talk
//! to one gateway. Credential negotiation never mutates a snapshot in place;
//! each `with_*` call consumes its receiver and returns an extended value, so
//! earlier snapshots stay valid for retries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Header name used for gateway token auth.
pub const AUTHORIZATION: &str = "Authorization";
/// Header name used for gateway cookie auth.
pub const COOKIE: &str = "Cookie";

/// A configured gateway the picker can offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayDescriptor {
	/// Display name shown in the gateway chooser.
	pub name: String,
	/// Connection metadata for reaching the gateway.
	#[serde(flatten)]
	pub options: ConnectOptions,
}

impl GatewayDescriptor {
	/// Creates a descriptor for a gateway at `base_url`.
	pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			options: ConnectOptions::new(base_url),
		}
	}
}

/// Connection metadata for a single gateway.
///
/// Values only ever grow: negotiation layers a token or cookie on top of
/// whatever was configured, it never removes anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectOptions {
	/// Base HTTP(S) URL of the gateway, e.g. `https://gateway.example.com`.
	pub base_url: String,
	/// Token sent as `Authorization: token <value>` when present.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<String>,
	/// Extra headers attached to every request, in stable key order.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub headers: BTreeMap<String, String>,
	/// Whether websocket upgrades must masquerade as same-origin browser
	/// requests. Set automatically when a cookie is layered on.
	#[serde(default)]
	pub ws_same_origin: bool,
}

impl ConnectOptions {
	/// Creates options for a gateway at `base_url`.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			..Self::default()
		}
	}

	/// Returns options extended with an auth token.
	///
	/// Re-applying the same token yields an equal value.
	pub fn with_token(mut self, token: impl Into<String>) -> Self {
		self.token = Some(token.into());
		self
	}

	/// Returns options extended with an extra request header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());
		self
	}

	/// Returns options extended with a session cookie.
	///
	/// Cookie auth only works when the gateway believes the websocket
	/// upgrade comes from its own web UI, so this also turns on
	/// [`ws_same_origin`](Self::ws_same_origin).
	pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
		self.headers.insert(COOKIE.to_string(), cookie.into());
		self.ws_same_origin = true;
		self
	}

	/// Assembles the headers for an HTTP request against this gateway.
	///
	/// Extra headers come first in key order, then the token header when a
	/// token is present.
	pub fn request_headers(&self) -> Vec<(String, String)> {
		let mut headers: Vec<(String, String)> = self
			.headers
			.iter()
			.map(|(name, value)| (name.clone(), value.clone()))
			.collect();
		if let Some(token) = &self.token {
			headers.push((AUTHORIZATION.to_string(), format!("token {token}")));
		}
		headers
	}

	/// Joins an API path onto the base URL, normalizing slashes.
	///
	/// The base path is preserved, so gateways mounted under a prefix
	/// (e.g. `https://hub/user/me`) keep working.
	pub fn api_url(&self, path: &str) -> String {
		let base = self.base_url.trim_end_matches('/');
		let path = path.trim_start_matches('/');
		format!("{base}/{path}")
	}

	/// Same as [`api_url`](Self::api_url) with the scheme mapped to
	/// websocket (`http` to `ws`, `https` to `wss`).
	pub fn ws_api_url(&self, path: &str) -> String {
		let http = self.api_url(path);
		if let Some(rest) = http.strip_prefix("https://") {
			format!("wss://{rest}")
		} else if let Some(rest) = http.strip_prefix("http://") {
			format!("ws://{rest}")
		} else {
			http
		}
	}

	/// Builds the upgrade request data for a kernel websocket at `path`.
	pub fn ws_handshake(&self, path: &str) -> Result<WsHandshake, url::ParseError> {
		let url = self.ws_api_url(path);
		let parsed = Url::parse(&url)?;
		let mut headers = self.request_headers();
		if self.ws_same_origin {
			if let Some(origin) = http_origin(&parsed) {
				headers.push(("Origin".to_string(), origin));
			}
			if let Some(host) = host_header(&parsed) {
				headers.push(("Host".to_string(), host));
			}
		}
		Ok(WsHandshake { url, headers })
	}
}

/// Everything a websocket client needs to open a kernel channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsHandshake {
	/// Target websocket URL (`ws` or `wss` scheme).
	pub url: String,
	/// Headers to attach to the upgrade request.
	pub headers: Vec<(String, String)>,
}

/// Derives the HTTP origin a browser tab on this gateway would send.
///
/// `wss` and `https` map to `https`, everything else to `http`. Explicit
/// ports are kept.
pub fn http_origin(url: &Url) -> Option<String> {
	let scheme = match url.scheme() {
		"wss" | "https" => "https",
		_ => "http",
	};
	let host = url.host_str()?;
	Some(match url.port() {
		Some(port) => format!("{scheme}://{host}:{port}"),
		None => format!("{scheme}://{host}"),
	})
}

/// Derives the `Host` header value for a gateway URL.
pub fn host_header(url: &Url) -> Option<String> {
	let host = url.host_str()?;
	Some(match url.port() {
		Some(port) => format!("{host}:{port}"),
		None => host.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn with_token_is_idempotent() {
		let base = ConnectOptions::new("http://gw:8888");
		let once = base.clone().with_token("secret");
		let twice = once.clone().with_token("secret");
		assert_eq!(once, twice);
	}

	#[test]
	fn with_cookie_sets_header_and_same_origin_flag() {
		let options = ConnectOptions::new("https://gw").with_cookie("_xsrf=a; session=b");
		assert!(options.ws_same_origin);
		assert_eq!(
			options.headers.get(COOKIE).map(String::as_str),
			Some("_xsrf=a; session=b")
		);
	}

	#[test]
	fn request_headers_appends_token_last() {
		let options = ConnectOptions::new("http://gw")
			.with_header("X-Team", "ml")
			.with_token("abc");
		assert_eq!(
			options.request_headers(),
			vec![
				("X-Team".to_string(), "ml".to_string()),
				("Authorization".to_string(), "token abc".to_string()),
			]
		);
	}

	#[test]
	fn api_url_normalizes_slashes_and_keeps_base_path() {
		let options = ConnectOptions::new("https://hub.example.com/user/me/");
		assert_eq!(
			options.api_url("/api/sessions"),
			"https://hub.example.com/user/me/api/sessions"
		);
	}

	#[test]
	fn ws_api_url_swaps_scheme() {
		let plain = ConnectOptions::new("http://gw:8888");
		assert_eq!(
			plain.ws_api_url("api/kernels/k1/channels"),
			"ws://gw:8888/api/kernels/k1/channels"
		);
		let tls = ConnectOptions::new("https://gw");
		assert_eq!(
			tls.ws_api_url("api/kernels/k1/channels"),
			"wss://gw/api/kernels/k1/channels"
		);
	}

	#[test]
	fn origin_round_trips_through_ws_scheme() {
		for base in ["http://gw:8888", "https://gw.example.com"] {
			let options = ConnectOptions::new(base);
			let ws = Url::parse(&options.ws_api_url("api/kernels/k/channels")).unwrap();
			assert_eq!(http_origin(&ws).as_deref(), Some(base));
		}
	}

	#[test]
	fn handshake_masquerades_only_when_flagged() {
		let anonymous = ConnectOptions::new("http://gw:8888")
			.ws_handshake("api/kernels/k/channels")
			.unwrap();
		assert!(!anonymous.headers.iter().any(|(name, _)| name == "Origin"));

		let cookied = ConnectOptions::new("http://gw:8888")
			.with_cookie("session=s")
			.ws_handshake("api/kernels/k/channels")
			.unwrap();
		assert_eq!(cookied.url, "ws://gw:8888/api/kernels/k/channels");
		assert!(
			cookied
				.headers
				.contains(&("Origin".to_string(), "http://gw:8888".to_string()))
		);
		assert!(
			cookied
				.headers
				.contains(&("Host".to_string(), "gw:8888".to_string()))
		);
		assert!(
			cookied
				.headers
				.contains(&("Cookie".to_string(), "session=s".to_string()))
		);
	}

	#[test]
	fn descriptor_serializes_flat_camel_case() {
		let gw = GatewayDescriptor {
			name: "Team Lab".into(),
			options: ConnectOptions::new("https://gw").with_token("abc"),
		};
		let json = serde_json::to_string(&gw).unwrap();
		assert!(json.contains(r#""name":"Team Lab""#));
		assert!(json.contains(r#""baseUrl":"https://gw""#));
		assert!(json.contains(r#""token":"abc""#));
	}
}
