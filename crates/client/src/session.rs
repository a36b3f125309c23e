//! Live session handles over the kernel channels websocket.

use std::time::Duration;

use async_trait::async_trait;
use kgw::{FailureKind, GatewayError, KernelSession};
use kgw_protocol::{ConnectOptions, KernelModel, KernelSpec, KernelSpecsReply, SessionModel};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use crate::http::get_json;

type Channel = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A running session with its kernel channel socket held open.
///
/// The handle owns the raw socket only; kernel message framing is the
/// embedder's concern. Dropping the handle drops the socket, which closes
/// the connection while the session keeps running on the gateway.
pub struct HttpSession {
	id: String,
	kernel: KernelModel,
	options: ConnectOptions,
	http: reqwest::Client,
	channel: Mutex<Option<Channel>>,
}

impl HttpSession {
	/// Opens the kernel channel for a session the gateway reported.
	///
	/// Fails when the session has no running kernel: there is nothing to
	/// attach to, and the gateway record is only useful for cleanup.
	pub(crate) async fn open(
		http: reqwest::Client,
		options: ConnectOptions,
		model: SessionModel,
		deadline: Duration,
	) -> Result<Self, GatewayError> {
		let Some(kernel) = model.kernel else {
			return Err(GatewayError::new(
				FailureKind::Structured,
				format!("session {} has no running kernel", model.id),
			));
		};
		let channel = open_channel(&options, &kernel.id, deadline).await?;
		debug!(
			target = "kgw.http",
			session = %model.id,
			kernel = %kernel.id,
			"kernel channel open"
		);
		Ok(Self {
			id: model.id,
			kernel,
			options,
			http,
			channel: Mutex::new(Some(channel)),
		})
	}

	/// Sends a close frame and releases the channel socket.
	///
	/// Idempotent; a handle that was never closed releases the socket on
	/// drop instead, without the close frame.
	pub async fn close(&self) {
		if let Some(mut channel) = self.channel.lock().await.take() {
			let _ = channel.close(None).await;
		}
	}
}

#[async_trait]
impl KernelSession for HttpSession {
	fn id(&self) -> &str {
		&self.id
	}

	async fn kernel_spec(&self) -> Result<KernelSpec, GatewayError> {
		let reply: KernelSpecsReply =
			get_json(&self.http, &self.options, "api/kernelspecs", "kernel spec lookup").await?;
		reply
			.specs()
			.into_iter()
			.find(|spec| spec.name == self.kernel.name)
			.ok_or_else(|| {
				GatewayError::transport(format!(
					"gateway no longer advertises spec '{}'",
					self.kernel.name
				))
			})
	}
}

/// Performs the channels websocket upgrade with the snapshot's auth headers.
async fn open_channel(
	options: &ConnectOptions,
	kernel_id: &str,
	deadline: Duration,
) -> Result<Channel, GatewayError> {
	let handshake = options
		.ws_handshake(&format!("api/kernels/{kernel_id}/channels"))
		.map_err(|error| GatewayError::transport(format!("invalid channel url: {error}")))?;
	let mut request = handshake
		.url
		.as_str()
		.into_client_request()
		.map_err(|error| GatewayError::transport(format!("invalid upgrade request: {error}")))?;
	for (name, value) in &handshake.headers {
		// The library derives Host from the URL; inserting a second copy
		// would duplicate the header on the wire.
		if name.eq_ignore_ascii_case("host") {
			continue;
		}
		let name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| {
			GatewayError::transport(format!("invalid upgrade header name: {error}"))
		})?;
		let value = HeaderValue::from_str(value).map_err(|error| {
			GatewayError::transport(format!("invalid upgrade header value: {error}"))
		})?;
		request.headers_mut().insert(name, value);
	}

	let upgrade = timeout(deadline, connect_async(request)).await.map_err(|_| {
		GatewayError::timeout(format!("kernel channel upgrade timed out: {}", handshake.url))
	})?;
	let (channel, _response) = upgrade.map_err(|error| classify_upgrade(&handshake.url, error))?;
	Ok(channel)
}

/// Maps upgrade failures onto the picker's failure kinds.
///
/// An HTTP rejection keeps its status semantics (403 is a permission
/// denial); raw socket failures stay ambiguous, like their REST
/// counterparts.
fn classify_upgrade(url: &str, error: tokio_tungstenite::tungstenite::Error) -> GatewayError {
	use tokio_tungstenite::tungstenite::Error;
	match error {
		Error::Http(response) => {
			let status = response.status().as_u16();
			let payload = response
				.into_body()
				.and_then(|bytes| serde_json::from_slice(&bytes).ok());
			GatewayError::http(
				status,
				format!("kernel channel upgrade rejected with status {status}"),
				payload,
			)
		}
		Error::Io(io) => GatewayError::new(
			FailureKind::Structured,
			format!("kernel channel upgrade could not connect to {url}: {io}"),
		),
		other => {
			GatewayError::transport(format!("kernel channel upgrade failed: {other}"))
		}
	}
}
