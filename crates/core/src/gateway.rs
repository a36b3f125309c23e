//! Gateway resolution: spec discovery with one bounded credential retry.

use kgw_protocol::{ConnectOptions, GatewayDescriptor, KernelSpec};
use tracing::{debug, warn};

use crate::client::{FailureKind, GatewayClient};
use crate::error::{PickError, Result};
use crate::negotiate::{Negotiation, negotiate};
use crate::ui::{Chooser, Prompter};

/// A gateway that answered spec discovery.
#[derive(Debug, Clone)]
pub struct DiscoveredGateway {
	/// Options that worked, including any negotiated credential.
	pub options: ConnectOptions,
	/// Advertised specs surviving the caller's filter.
	pub specs: Vec<KernelSpec>,
}

/// Runs spec discovery against a gateway, negotiating credentials once if
/// the first attempt fails ambiguously.
///
/// `spec_filter` keeps only the kernels the caller can use, e.g. those
/// matching the active document's language.
///
/// The transport cannot reliably tell "invalid credentials" from "host
/// unreachable"; both can surface as a refused connection. Anything that is
/// not an explicit timeout is therefore treated as a candidate for exactly
/// one authentication retry. If the retried attempt fails too, that failure
/// is final; negotiation is never re-entered.
pub async fn discover(
	client: &dyn GatewayClient,
	chooser: &mut dyn Chooser,
	prompter: &mut dyn Prompter,
	descriptor: &GatewayDescriptor,
	spec_filter: impl Fn(&KernelSpec) -> bool,
) -> Result<DiscoveredGateway> {
	let options = descriptor.options.clone();
	let error = match client.kernel_specs(&options).await {
		Ok(specs) => {
			debug!(
				target = "kgw.gateway",
				gateway = %descriptor.name,
				specs = specs.len(),
				"spec discovery succeeded"
			);
			return Ok(discovered(options, specs, &spec_filter));
		}
		Err(error) => error,
	};

	match error.kind {
		FailureKind::Timeout => {
			warn!(target = "kgw.gateway", gateway = %descriptor.name, error = %error, "discovery timed out");
			Err(PickError::Unreachable {
				gateway: descriptor.name.clone(),
				message: error.message,
			})
		}
		FailureKind::Transport => {
			warn!(target = "kgw.gateway", gateway = %descriptor.name, error = %error, "discovery failed without a gateway answer");
			Err(error.into())
		}
		FailureKind::Structured | FailureKind::PermissionDenied => {
			debug!(
				target = "kgw.gateway",
				gateway = %descriptor.name,
				status = error.status,
				"ambiguous rejection, offering credentials"
			);
			let negotiated =
				match negotiate(chooser, prompter, &options, &descriptor.name).await {
					Negotiation::Token(next) | Negotiation::Cookie(next) => next,
					Negotiation::Cancelled => return Err(PickError::Cancelled),
				};
			// Exactly one retry. A second failure of any kind is final.
			let specs = client.kernel_specs(&negotiated).await?;
			Ok(discovered(negotiated, specs, &spec_filter))
		}
	}
}

fn discovered(
	options: ConnectOptions,
	specs: Vec<KernelSpec>,
	spec_filter: &impl Fn(&KernelSpec) -> bool,
) -> DiscoveredGateway {
	DiscoveredGateway {
		options,
		specs: specs.into_iter().filter(spec_filter).collect(),
	}
}
