//! Error taxonomy for kernel resolution.

use thiserror::Error;

use crate::client::GatewayError;

/// Result type alias for picker operations.
pub type Result<T> = std::result::Result<T, PickError>;

/// Errors that end a resolution attempt.
///
/// Recoverable conditions (an ambiguous rejection with a pending credential
/// retry, a forbidden session listing) never surface here; they are handled
/// inside the resolvers. Whatever reaches the orchestrator is final for the
/// current attempt.
#[derive(Debug, Error)]
pub enum PickError {
	/// The user backed out of a chooser or prompt. Not a failure: the
	/// attempt stops silently and nothing is reported.
	#[error("cancelled by user")]
	Cancelled,

	/// No gateways are configured, so there is nothing to pick from.
	#[error("no kernel gateways are configured")]
	NoGateways,

	/// The gateway did not answer spec discovery in time. Reported with
	/// the gateway name; never retried automatically.
	#[error("gateway '{gateway}' is unreachable: {message}")]
	Unreachable {
		/// Display name of the gateway that timed out.
		gateway: String,
		/// Transport-level description of the timeout.
		message: String,
	},

	/// A gateway call failed past the point of recovery.
	#[error(transparent)]
	Gateway(#[from] GatewayError),
}
