//! Session resolution: listing, labeling, and new-session path tokens.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use kgw_protocol::{ConnectOptions, KernelSpec, SessionModel};
use tracing::debug;

use crate::client::{GatewayClient, GatewayError};

/// One row of the unified attach-or-create choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChoice {
	/// Start a fresh session; the user still picks one of these specs.
	New {
		/// Candidate kernel specs for the new session.
		specs: Vec<KernelSpec>,
	},
	/// Attach to a running session.
	Existing {
		/// The gateway's record of the running session.
		session: SessionModel,
	},
}

/// What the session-listing stage produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
	/// The unified choice list, the `New` entry first.
	Open(Vec<SessionChoice>),
	/// The gateway forbids session enumeration; only creation remains.
	CreateOnly,
}

/// Lists running sessions and builds the unified choice list.
///
/// A permission-denied listing is not a failure: gateways may disable
/// enumeration entirely, in which case only the create path remains. Any
/// other failure propagates to the caller.
pub async fn list_sessions(
	client: &dyn GatewayClient,
	options: &ConnectOptions,
	specs: &[KernelSpec],
) -> Result<Listing, GatewayError> {
	let sessions = match client.sessions(options).await {
		Ok(sessions) => sessions,
		Err(error) if error.is_permission_denied() => {
			debug!(target = "kgw.session", "session listing forbidden, create only");
			return Ok(Listing::CreateOnly);
		}
		Err(error) => return Err(error),
	};

	debug!(target = "kgw.session", sessions = sessions.len(), "sessions listed");
	let mut choices = vec![SessionChoice::New {
		specs: specs.to_vec(),
	}];
	choices.extend(
		sessions
			.into_iter()
			.filter(|session| kernel_matches(session, specs))
			.map(|session| SessionChoice::Existing { session }),
	);
	Ok(Listing::Open(choices))
}

/// Keeps sessions whose kernel runs one of `specs`. Sessions with no
/// identifiable kernel name pass through: unknown, show anyway.
fn kernel_matches(session: &SessionModel, specs: &[KernelSpec]) -> bool {
	match session.kernel_name() {
		Some(name) => specs.iter().any(|spec| spec.name == name),
		None => true,
	}
}

/// User-facing label for a running session.
///
/// The session's own name wins when the user set one, then the
/// tilde-shortened path, then a synthetic `Session <id>`.
pub fn session_label(session: &SessionModel) -> String {
	if !session.name.is_empty() {
		return session.name.clone();
	}
	if !session.path.is_empty() {
		return shorten_home(&session.path);
	}
	format!("Session {}", session.id)
}

/// Replaces a leading home-directory prefix with `~`.
pub fn shorten_home(path: &str) -> String {
	match std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
		Ok(home) if !home.is_empty() => shorten_with(path, &home),
		_ => path.to_string(),
	}
}

fn shorten_with(path: &str, home: &str) -> String {
	let home = home.trim_end_matches('/');
	match path.strip_prefix(home) {
		Some("") => "~".to_string(),
		Some(rest) if rest.starts_with('/') => format!("~{rest}"),
		_ => path.to_string(),
	}
}

/// Gateway-side resource path for a new session on `document`.
///
/// The token suffix keeps concurrent new-session requests against the same
/// (or absent) document from colliding.
pub fn session_path(document: Option<&str>) -> String {
	format!("{}-{}", document.unwrap_or("unsaved"), unique_token())
}

static TOKEN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a short hex token unique across processes and calls.
///
/// Mixes clock entropy with the process id and a process-local counter, so
/// two pickers starting sessions in the same nanosecond still diverge.
pub fn unique_token() -> String {
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("time went backwards")
		.as_nanos();
	let pid = u128::from(process::id());
	let count = u128::from(TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed));
	format!("{:x}", nanos ^ (pid << 96) ^ (count << 64))
}
