//! The picker orchestrator: gateway to live kernel, one stage at a time.

use kgw_protocol::{GatewayDescriptor, KernelSpec};
use tracing::{debug, error, info, warn};

use crate::client::{GatewayClient, ResolvedKernel, StartSession};
use crate::error::{PickError, Result};
use crate::gateway::discover;
use crate::session::{Listing, SessionChoice, list_sessions, session_label, session_path};
use crate::ui::{
	Choice, Chooser, ChooserItem, ChooserView, DocumentSource, FailureReporter, GatewaySource,
	Prompter,
};

/// Stages of one resolution attempt.
///
/// The workflow is a single logical task whose suspension points (network
/// calls, user input) separate the stages; the enum makes the implicit
/// machine explicit and testable without any UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
	/// No resolution running.
	Idle,
	/// Waiting for the user to pick a gateway.
	GatewaySelection,
	/// Spec discovery, and possibly credential negotiation, in flight.
	SpecDiscovery,
	/// Waiting for attach-or-create.
	SessionListing,
	/// Waiting for a kernel spec. New-session path only.
	KernelSelection,
	/// Attach or create in flight.
	Connecting,
	/// A kernel was resolved.
	Done,
	/// The user backed out.
	Cancelled,
	/// A fatal error was reported.
	Failed,
}

impl PickerState {
	/// Legal transition table. Anything else is a picker bug.
	pub fn can_enter(self, next: PickerState) -> bool {
		use PickerState::*;
		matches!(
			(self, next),
			(Idle, GatewaySelection)
				| (GatewaySelection, SpecDiscovery)
				| (SpecDiscovery, SessionListing)
				| (SessionListing, KernelSelection | Connecting)
				| (KernelSelection, Connecting)
				| (Connecting, Done)
				| (
					GatewaySelection | SpecDiscovery | SessionListing | KernelSelection | Connecting,
					Cancelled,
				)
				| (SpecDiscovery | SessionListing | Connecting, Failed)
				| (Done | Cancelled | Failed, Idle)
		)
	}

	/// Returns true for states that end a resolution.
	pub fn is_terminal(self) -> bool {
		matches!(
			self,
			PickerState::Done | PickerState::Cancelled | PickerState::Failed
		)
	}
}

/// Collaborator set a picker resolves against.
pub struct PickerEnv {
	/// Shared list-selection UI, re-rendered across all stages.
	pub chooser: Box<dyn Chooser>,
	/// Free-text credential input.
	pub prompter: Box<dyn Prompter>,
	/// Gateway transport binding.
	pub client: Box<dyn GatewayClient>,
	/// Failure surface. The picker is its only caller per resolution.
	pub reporter: Box<dyn FailureReporter>,
	/// Configured gateways.
	pub gateways: Box<dyn GatewaySource>,
	/// Active document context the kernel is bound to.
	pub documents: Box<dyn DocumentSource>,
}

/// Resolves one remote kernel per [`toggle`](KernelPicker::toggle) call.
pub struct KernelPicker {
	env: PickerEnv,
	state: PickerState,
}

impl KernelPicker {
	/// Creates an idle picker over the given collaborators.
	pub fn new(env: PickerEnv) -> Self {
		Self {
			env,
			state: PickerState::Idle,
		}
	}

	/// Current stage, for status surfaces.
	pub fn state(&self) -> PickerState {
		self.state
	}

	/// Runs one full resolution attempt.
	///
	/// Returns the resolved kernel, or `None` when the user cancelled or a
	/// failure was already reported. Taking `&mut self` keeps resolutions
	/// single-flight by construction: no two attempts can overlap on the
	/// same picker.
	pub async fn toggle(&mut self) -> Option<ResolvedKernel> {
		if self.state.is_terminal() {
			self.enter(PickerState::Idle);
		}
		let outcome = self.run().await;
		self.env.chooser.close();
		match outcome {
			Ok(resolved) => {
				info!(
					target = "kgw.picker",
					gateway = %resolved.gateway,
					kernel = %resolved.spec.name,
					session = resolved.session.id(),
					"kernel resolved"
				);
				self.enter(PickerState::Done);
				Some(resolved)
			}
			Err(PickError::Cancelled) => {
				debug!(target = "kgw.picker", "resolution cancelled");
				self.enter(PickerState::Cancelled);
				None
			}
			Err(PickError::NoGateways) => {
				self.env.reporter.report(
					"No kernel gateways are configured",
					Some("Add a gateway to the configuration and try again."),
				);
				None
			}
			Err(PickError::Unreachable { gateway, message }) => {
				warn!(target = "kgw.picker", %gateway, %message, "gateway unreachable");
				self.env
					.reporter
					.report(&format!("Gateway '{gateway}' is unreachable"), Some(&message));
				self.enter(PickerState::Failed);
				None
			}
			Err(PickError::Gateway(error)) => {
				error!(target = "kgw.picker", error = %error, "kernel resolution failed");
				self.env
					.reporter
					.report("Failed to connect to the kernel gateway", None);
				self.enter(PickerState::Failed);
				None
			}
		}
	}

	async fn run(&mut self) -> Result<ResolvedKernel> {
		let gateways = self.env.gateways.gateways();
		if gateways.is_empty() {
			return Err(PickError::NoGateways);
		}
		let document = self.env.documents.active_document();
		let language = document.as_ref().and_then(|doc| doc.language.clone());

		self.enter(PickerState::GatewaySelection);
		let descriptor = self.pick_gateway(&gateways).await?;

		self.enter(PickerState::SpecDiscovery);
		self.env.chooser.update(
			&ChooserView::new(format!("Kernels on {}", descriptor.name))
				.with_loading(format!("Contacting {}", descriptor.options.base_url)),
		);
		let discovered = discover(
			&*self.env.client,
			&mut *self.env.chooser,
			&mut *self.env.prompter,
			descriptor,
			|spec| match &language {
				Some(language) => spec.language.eq_ignore_ascii_case(language),
				None => true,
			},
		)
		.await?;

		self.enter(PickerState::SessionListing);
		self.env.chooser.update(
			&ChooserView::new(format!("Sessions on {}", descriptor.name))
				.with_loading("Listing sessions"),
		);
		let choice = match list_sessions(&*self.env.client, &discovered.options, &discovered.specs)
			.await?
		{
			Listing::CreateOnly => SessionChoice::New {
				specs: discovered.specs.clone(),
			},
			Listing::Open(choices) => self.pick_session(&descriptor.name, choices).await?,
		};

		let session = match choice {
			SessionChoice::Existing { session } => {
				self.enter(PickerState::Connecting);
				self.env.chooser.update(
					&ChooserView::new(session_label(&session)).with_loading("Attaching to session"),
				);
				self.env
					.client
					.connect_session(&session.id, &discovered.options)
					.await?
			}
			SessionChoice::New { specs } => {
				self.enter(PickerState::KernelSelection);
				let spec = self.pick_spec(specs).await?;
				self.enter(PickerState::Connecting);
				self.env.chooser.update(
					&ChooserView::new(spec.display_name.clone())
						.with_loading("Starting a new session"),
				);
				let path =
					session_path(document.as_ref().and_then(|doc| doc.path.as_deref()));
				self.env
					.client
					.start_session(StartSession {
						options: &discovered.options,
						kernel_name: &spec.name,
						path: &path,
					})
					.await?
			}
		};

		// The document may have gone away while the user was choosing.
		// With nothing to bind the kernel to, the session handle is
		// dropped and the attempt ends silently.
		if self.env.documents.active_document().is_none() {
			debug!(target = "kgw.picker", "active document gone, discarding session");
			return Err(PickError::Cancelled);
		}

		let spec = session.kernel_spec().await?;
		Ok(ResolvedKernel {
			gateway: descriptor.name.clone(),
			spec,
			session,
		})
	}

	async fn pick_gateway<'a>(
		&mut self,
		gateways: &'a [GatewayDescriptor],
	) -> Result<&'a GatewayDescriptor> {
		let items = gateways
			.iter()
			.map(|gateway| {
				ChooserItem::new(&gateway.name).with_detail(&gateway.options.base_url)
			})
			.collect();
		let view = ChooserView::new("Select a kernel gateway").with_items(items);
		match self.env.chooser.choose(&view).await {
			Choice::Confirmed(index) => gateways.get(index).ok_or(PickError::Cancelled),
			Choice::Cancelled => Err(PickError::Cancelled),
		}
	}

	async fn pick_session(
		&mut self,
		gateway: &str,
		choices: Vec<SessionChoice>,
	) -> Result<SessionChoice> {
		let items = choices
			.iter()
			.map(|choice| match choice {
				SessionChoice::New { .. } => {
					ChooserItem::new("New session").with_detail("Start a fresh kernel")
				}
				SessionChoice::Existing { session } => {
					let item = ChooserItem::new(session_label(session));
					match session.kernel_name() {
						Some(kernel) => item.with_detail(kernel),
						None => item,
					}
				}
			})
			.collect();
		let view = ChooserView::new(format!("Sessions on {gateway}")).with_items(items);
		let choice = self.env.chooser.choose(&view).await;
		confirmed(choice, choices).ok_or(PickError::Cancelled)
	}

	async fn pick_spec(&mut self, specs: Vec<KernelSpec>) -> Result<KernelSpec> {
		let items = specs
			.iter()
			.map(|spec| ChooserItem::new(&spec.display_name).with_detail(&spec.language))
			.collect();
		let view = ChooserView::new("Select a kernel")
			.with_items(items)
			.with_empty("No kernels match the current document");
		let choice = self.env.chooser.choose(&view).await;
		confirmed(choice, specs).ok_or(PickError::Cancelled)
	}

	fn enter(&mut self, next: PickerState) {
		debug_assert!(
			self.state.can_enter(next),
			"illegal picker transition {:?} -> {next:?}",
			self.state
		);
		debug!(target = "kgw.picker", from = ?self.state, to = ?next, "state transition");
		self.state = next;
	}
}

/// Takes the confirmed element out of `items`. A confirm outside the view
/// counts as a cancel.
fn confirmed<T>(choice: Choice, mut items: Vec<T>) -> Option<T> {
	match choice {
		Choice::Confirmed(index) if index < items.len() => Some(items.swap_remove(index)),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn happy_path_transitions_are_legal() {
		use PickerState::*;
		let attach = [Idle, GatewaySelection, SpecDiscovery, SessionListing, Connecting, Done];
		let create = [
			Idle,
			GatewaySelection,
			SpecDiscovery,
			SessionListing,
			KernelSelection,
			Connecting,
			Done,
		];
		for path in [&attach[..], &create[..]] {
			for pair in path.windows(2) {
				assert!(pair[0].can_enter(pair[1]), "{:?} -> {:?}", pair[0], pair[1]);
			}
		}
	}

	#[test]
	fn cancel_is_reachable_from_every_interactive_state() {
		use PickerState::*;
		for state in [GatewaySelection, SpecDiscovery, SessionListing, KernelSelection, Connecting]
		{
			assert!(state.can_enter(Cancelled), "{state:?}");
		}
		assert!(!Idle.can_enter(Cancelled));
	}

	#[test]
	fn failed_is_only_reachable_from_network_stages() {
		use PickerState::*;
		assert!(SpecDiscovery.can_enter(Failed));
		assert!(SessionListing.can_enter(Failed));
		assert!(Connecting.can_enter(Failed));
		assert!(!GatewaySelection.can_enter(Failed));
		assert!(!KernelSelection.can_enter(Failed));
	}

	#[test]
	fn terminal_states_reset_to_idle_only() {
		use PickerState::*;
		for state in [Done, Cancelled, Failed] {
			assert!(state.is_terminal());
			assert!(state.can_enter(Idle));
			assert!(!state.can_enter(GatewaySelection));
		}
		assert!(!Idle.is_terminal());
	}

	#[test]
	fn confirmed_takes_element_and_rejects_out_of_range() {
		assert_eq!(confirmed(Choice::Confirmed(1), vec!["a", "b"]), Some("b"));
		assert_eq!(confirmed(Choice::Confirmed(2), vec!["a", "b"]), None);
		assert_eq!(confirmed::<&str>(Choice::Cancelled, vec!["a"]), None);
	}
}
