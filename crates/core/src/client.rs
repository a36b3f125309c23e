//! The gateway client boundary: failure classification and client traits.
//!
//! Everything the picker knows about a gateway failure is decided here,
//! once, by whoever implements [`GatewayClient`]. The resolvers key their
//! retry policy off [`FailureKind`] alone and never re-inspect transport
//! errors downstream.

use async_trait::async_trait;
use kgw_protocol::{ConnectOptions, KernelSpec, SessionModel};
use serde_json::Value;
use thiserror::Error;

/// Classification of a failed gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
	/// The gateway did not answer in time. Not an auth problem, so
	/// negotiation is never offered for it.
	Timeout,
	/// The gateway answered with an explicit permission denial (HTTP 403).
	PermissionDenied,
	/// The request was rejected with some other recognizable answer.
	/// Ambiguous: bad credentials and an unreachable host can both surface
	/// this way, so it is the candidate for one credential retry.
	Structured,
	/// Nothing recognizable came back: request build, TLS, or decode
	/// failure. Fatal.
	Transport,
}

/// A classified failure from a gateway call.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GatewayError {
	/// Classification driving the retry policy.
	pub kind: FailureKind,
	/// Human-readable description. Logged, never shown raw to the user.
	pub message: String,
	/// HTTP status, when the gateway answered at all.
	pub status: Option<u16>,
	/// Decoded response body, when the gateway sent JSON.
	pub payload: Option<Value>,
}

impl GatewayError {
	/// Creates an error of the given kind with no HTTP evidence.
	pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
			status: None,
			payload: None,
		}
	}

	/// Creates a timeout failure.
	pub fn timeout(message: impl Into<String>) -> Self {
		Self::new(FailureKind::Timeout, message)
	}

	/// Creates a transport failure.
	pub fn transport(message: impl Into<String>) -> Self {
		Self::new(FailureKind::Transport, message)
	}

	/// Creates a failure from an HTTP error status.
	///
	/// 403 classifies as [`FailureKind::PermissionDenied`], everything
	/// else as [`FailureKind::Structured`].
	pub fn http(status: u16, message: impl Into<String>, payload: Option<Value>) -> Self {
		let kind = if status == 403 {
			FailureKind::PermissionDenied
		} else {
			FailureKind::Structured
		};
		Self {
			kind,
			message: message.into(),
			status: Some(status),
			payload,
		}
	}

	/// Returns true when the gateway did not answer in time.
	pub fn is_timeout(&self) -> bool {
		self.kind == FailureKind::Timeout
	}

	/// Returns true for an explicit permission denial.
	pub fn is_permission_denied(&self) -> bool {
		self.kind == FailureKind::PermissionDenied
	}

	/// Returns true when one credential retry is worth offering.
	pub fn is_retryable_auth(&self) -> bool {
		matches!(
			self.kind,
			FailureKind::Structured | FailureKind::PermissionDenied
		)
	}
}

/// Parameters for starting a new session.
#[derive(Debug, Clone, Copy)]
pub struct StartSession<'a> {
	/// Connection snapshot to use.
	pub options: &'a ConnectOptions,
	/// Registry name of the kernel spec to start.
	pub kernel_name: &'a str,
	/// Gateway-side resource path for the new session.
	pub path: &'a str,
}

/// Remote gateway operations the picker depends on.
///
/// Implementations own all transport concerns and must classify every
/// failure into a [`FailureKind`] (see `kgw-client` for the reference
/// binding). Calls are issued one at a time; the picker never overlaps
/// requests against the same client.
#[async_trait]
pub trait GatewayClient: Send + Sync {
	/// Fetches the kernel specs advertised by the gateway.
	async fn kernel_specs(
		&self,
		options: &ConnectOptions,
	) -> Result<Vec<KernelSpec>, GatewayError>;

	/// Lists running sessions.
	async fn sessions(
		&self,
		options: &ConnectOptions,
	) -> Result<Vec<SessionModel>, GatewayError>;

	/// Attaches to a running session's kernel.
	async fn connect_session(
		&self,
		id: &str,
		options: &ConnectOptions,
	) -> Result<Box<dyn KernelSession>, GatewayError>;

	/// Starts a new session and attaches to its kernel.
	async fn start_session(
		&self,
		request: StartSession<'_>,
	) -> Result<Box<dyn KernelSession>, GatewayError>;
}

/// A live kernel binding produced by attach-or-create.
///
/// Dropping the handle releases the connection; the session itself keeps
/// running on the gateway.
#[async_trait]
pub trait KernelSession: Send + Sync {
	/// Gateway-assigned session id.
	fn id(&self) -> &str;

	/// Fetches the spec of the kernel serving this session.
	async fn kernel_spec(&self) -> Result<KernelSpec, GatewayError>;
}

/// Final output of a successful resolution. Ownership transfers to the
/// caller; the picker's responsibility ends here.
pub struct ResolvedKernel {
	/// Display name of the gateway the kernel lives on.
	pub gateway: String,
	/// Spec of the kernel the session runs.
	pub spec: KernelSpec,
	/// Live session handle.
	pub session: Box<dyn KernelSession>,
}

impl std::fmt::Debug for ResolvedKernel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ResolvedKernel")
			.field("gateway", &self.gateway)
			.field("spec", &self.spec)
			.field("session", &self.session.id())
			.finish()
	}
}
