//! Credential negotiation: one interactive round of token-or-cookie.

use kgw_protocol::ConnectOptions;
use tracing::debug;

use crate::ui::{Choice, Chooser, ChooserItem, ChooserView, Prompter};

/// Outcome of one negotiation round.
///
/// The input options are never touched; the augmented snapshot rides in
/// the outcome, so a failed retry can still fall back to earlier state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
	/// The user supplied a token; the options carry it.
	Token(ConnectOptions),
	/// The user supplied a cookie; the options carry it and same-origin
	/// upgrade masquerading is enabled.
	Cookie(ConnectOptions),
	/// The user backed out. Not an error.
	Cancelled,
}

/// Offers token, cookie, or cancel, and returns augmented options.
///
/// An empty prompt answer counts as a cancel: retrying with blank
/// credentials would only reproduce the failure that led here.
pub async fn negotiate(
	chooser: &mut dyn Chooser,
	prompter: &mut dyn Prompter,
	options: &ConnectOptions,
	gateway: &str,
) -> Negotiation {
	let view = ChooserView::new(format!("Authenticate to {gateway}"))
		.with_info("The gateway rejected the request. Pick a credential to retry with.")
		.with_items(vec![
			ChooserItem::new("Provide a token")
				.with_detail("Sent as an Authorization header on every request"),
			ChooserItem::new("Provide a cookie")
				.with_detail("Copied from an authenticated browser tab"),
			ChooserItem::new("Cancel"),
		]);

	match chooser.choose(&view).await {
		Choice::Confirmed(0) => match answer(prompter, "Token").await {
			Some(token) => {
				debug!(target = "kgw.gateway", %gateway, "token credential applied");
				Negotiation::Token(options.clone().with_token(token))
			}
			None => Negotiation::Cancelled,
		},
		Choice::Confirmed(1) => match answer(prompter, "Cookie").await {
			Some(cookie) => {
				debug!(target = "kgw.gateway", %gateway, "cookie credential applied");
				Negotiation::Cookie(options.clone().with_cookie(cookie))
			}
			None => Negotiation::Cancelled,
		},
		_ => Negotiation::Cancelled,
	}
}

/// Prompts and normalizes the reply: trimmed, empty treated as cancel.
async fn answer(prompter: &mut dyn Prompter, label: &str) -> Option<String> {
	prompter
		.prompt(label)
		.await
		.map(|text| text.trim().to_string())
		.filter(|text| !text.is_empty())
}
