//! REST calls against a kernel gateway, with single-site failure
//! classification.

use std::time::Duration;

use async_trait::async_trait;
use kgw::{FailureKind, GatewayClient, GatewayError, KernelSession, StartSession};
use kgw_protocol::{
	ConnectOptions, KernelSpec, KernelSpecsReply, NewSessionRequest, SessionModel,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::session::HttpSession;

/// Default per-request deadline. Anything slower is classified as
/// [`FailureKind::Timeout`] and reported as unreachable.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `GatewayClient` over the kernel gateway REST API.
///
/// One instance serves any number of gateways; per-gateway state lives in
/// the [`ConnectOptions`] passed to each call.
#[derive(Debug, Clone)]
pub struct HttpGateway {
	http: reqwest::Client,
	timeout: Duration,
}

impl HttpGateway {
	/// Creates a client with [`DEFAULT_TIMEOUT`].
	pub fn new() -> Result<Self, GatewayError> {
		Self::with_timeout(DEFAULT_TIMEOUT)
	}

	/// Creates a client with an explicit per-request deadline.
	pub fn with_timeout(timeout: Duration) -> Result<Self, GatewayError> {
		let http = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|error| {
				GatewayError::transport(format!("failed to build HTTP client: {error}"))
			})?;
		Ok(Self { http, timeout })
	}

	/// The deadline applied to REST calls and the channel upgrade.
	pub fn timeout(&self) -> Duration {
		self.timeout
	}
}

#[async_trait]
impl GatewayClient for HttpGateway {
	async fn kernel_specs(
		&self,
		options: &ConnectOptions,
	) -> Result<Vec<KernelSpec>, GatewayError> {
		let reply: KernelSpecsReply =
			get_json(&self.http, options, "api/kernelspecs", "kernel spec discovery").await?;
		Ok(reply.specs())
	}

	async fn sessions(&self, options: &ConnectOptions) -> Result<Vec<SessionModel>, GatewayError> {
		get_json(&self.http, options, "api/sessions", "session listing").await
	}

	async fn connect_session(
		&self,
		id: &str,
		options: &ConnectOptions,
	) -> Result<Box<dyn KernelSession>, GatewayError> {
		let model: SessionModel = get_json(
			&self.http,
			options,
			&format!("api/sessions/{id}"),
			"session lookup",
		)
		.await?;
		let session =
			HttpSession::open(self.http.clone(), options.clone(), model, self.timeout).await?;
		Ok(Box::new(session))
	}

	async fn start_session(
		&self,
		request: StartSession<'_>,
	) -> Result<Box<dyn KernelSession>, GatewayError> {
		let body = NewSessionRequest::notebook(request.path, request.kernel_name);
		let model: SessionModel = post_json(
			&self.http,
			request.options,
			"api/sessions",
			&body,
			"session create",
		)
		.await?;
		let session = HttpSession::open(
			self.http.clone(),
			request.options.clone(),
			model,
			self.timeout,
		)
		.await?;
		Ok(Box::new(session))
	}
}

/// Issues a GET against the gateway and decodes the JSON reply.
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
	http: &reqwest::Client,
	options: &ConnectOptions,
	path: &str,
	what: &str,
) -> Result<T, GatewayError> {
	let url = options.api_url(path);
	debug!(target = "kgw.http", %url, "GET");
	let response = http
		.get(&url)
		.headers(header_map(options)?)
		.send()
		.await
		.map_err(|error| classify(what, &url, error))?;
	decode(what, response).await
}

/// Issues a POST with a JSON body and decodes the JSON reply.
pub(crate) async fn post_json<T: serde::de::DeserializeOwned>(
	http: &reqwest::Client,
	options: &ConnectOptions,
	path: &str,
	body: &impl serde::Serialize,
	what: &str,
) -> Result<T, GatewayError> {
	let url = options.api_url(path);
	debug!(target = "kgw.http", %url, "POST");
	let response = http
		.post(&url)
		.headers(header_map(options)?)
		.json(body)
		.send()
		.await
		.map_err(|error| classify(what, &url, error))?;
	decode(what, response).await
}

/// Builds the request headers for one call from the connection snapshot.
fn header_map(options: &ConnectOptions) -> Result<HeaderMap, GatewayError> {
	let mut map = HeaderMap::new();
	for (name, value) in options.request_headers() {
		let name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| {
			GatewayError::transport(format!("invalid header name '{name}': {error}"))
		})?;
		let value = HeaderValue::from_str(&value)
			.map_err(|error| GatewayError::transport(format!("invalid header value: {error}")))?;
		map.insert(name, value);
	}
	Ok(map)
}

/// Classifies a request that never produced an HTTP answer.
///
/// A timeout is its own kind. A connect-level failure (refused, reset, DNS)
/// is deliberately classified `Structured`: gateways behind proxies drop
/// unauthenticated connections the same way a dead host does, so the picker
/// treats it as a candidate for one credential retry. Everything else is a
/// transport fault.
fn classify(what: &str, url: &str, error: reqwest::Error) -> GatewayError {
	let classified = if error.is_timeout() {
		GatewayError::timeout(format!("{what} timed out: {url}"))
	} else if error.is_connect() {
		GatewayError::new(
			FailureKind::Structured,
			format!("{what} could not connect to {url}: {error}"),
		)
	} else {
		GatewayError::transport(format!("{what} failed: {error}"))
	};
	debug!(target = "kgw.http", kind = ?classified.kind, %url, "request failed");
	classified
}

/// Turns an HTTP answer into a decoded body or a classified error.
async fn decode<T: serde::de::DeserializeOwned>(
	what: &str,
	response: reqwest::Response,
) -> Result<T, GatewayError> {
	let status = response.status();
	if !status.is_success() {
		let body = response.text().await.unwrap_or_default();
		let payload: Option<Value> = serde_json::from_str(&body).ok();
		let message = failure_message(what, status.as_u16(), payload.as_ref());
		debug!(target = "kgw.http", status = status.as_u16(), "gateway rejected request");
		return Err(GatewayError::http(status.as_u16(), message, payload));
	}
	response
		.json()
		.await
		.map_err(|error| GatewayError::transport(format!("{what}: invalid response body: {error}")))
}

/// Prefers the gateway's own `message` field over a synthesized one.
fn failure_message(what: &str, status: u16, payload: Option<&Value>) -> String {
	payload
		.and_then(|value| value.get("message"))
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or_else(|| format!("{what} failed with status {status}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn failure_message_prefers_gateway_payload() {
		let payload = serde_json::json!({"message": "Forbidden", "reason": null});
		assert_eq!(
			failure_message("session listing", 403, Some(&payload)),
			"Forbidden"
		);
	}

	#[test]
	fn failure_message_synthesizes_without_payload() {
		assert_eq!(
			failure_message("kernel spec discovery", 502, None),
			"kernel spec discovery failed with status 502"
		);
		let non_object = serde_json::json!("Bad Gateway");
		assert_eq!(
			failure_message("kernel spec discovery", 502, Some(&non_object)),
			"kernel spec discovery failed with status 502"
		);
	}

	#[test]
	fn header_map_carries_cookie_and_token() {
		let options = ConnectOptions::new("http://gw")
			.with_cookie("session=s")
			.with_token("abc");
		let map = header_map(&options).unwrap();
		assert_eq!(map.get("Cookie").unwrap(), "session=s");
		assert_eq!(map.get("Authorization").unwrap(), "token abc");
	}

	#[test]
	fn header_map_rejects_invalid_values() {
		let options = ConnectOptions::new("http://gw").with_header("X-Bad", "line\nbreak");
		let error = header_map(&options).unwrap_err();
		assert_eq!(error.kind, FailureKind::Transport);
	}
}
