//! View-model types and collaborator traits for the picker's UI seams.
//!
//! The picker never renders anything itself. It describes what should be
//! on screen as a [`ChooserView`] and waits for a [`Choice`]; terminal,
//! editor, and test front-ends implement the traits below.

use async_trait::async_trait;
use kgw_protocol::GatewayDescriptor;

/// One selectable row in the chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooserItem {
	/// Primary label.
	pub label: String,
	/// Secondary text shown next to the label.
	pub detail: Option<String>,
}

impl ChooserItem {
	/// Creates an item with no detail line.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			detail: None,
		}
	}

	/// Sets the detail line.
	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());
		self
	}
}

/// What the shared chooser should currently display.
///
/// The same chooser instance is re-rendered for every picker stage; only
/// the view changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChooserView {
	/// Title above the list.
	pub title: String,
	/// Selectable items. May be empty while loading.
	pub items: Vec<ChooserItem>,
	/// Informational line.
	pub info: Option<String>,
	/// Progress line shown while a network call is in flight.
	pub loading: Option<String>,
	/// Line shown when `items` is empty and nothing is loading.
	pub empty: Option<String>,
	/// Error line.
	pub error: Option<String>,
}

impl ChooserView {
	/// Creates a view with only a title.
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Self::default()
		}
	}

	/// Sets the selectable items.
	pub fn with_items(mut self, items: Vec<ChooserItem>) -> Self {
		self.items = items;
		self
	}

	/// Sets the informational line.
	pub fn with_info(mut self, info: impl Into<String>) -> Self {
		self.info = Some(info.into());
		self
	}

	/// Sets the in-flight progress line.
	pub fn with_loading(mut self, loading: impl Into<String>) -> Self {
		self.loading = Some(loading.into());
		self
	}

	/// Sets the empty-list line.
	pub fn with_empty(mut self, empty: impl Into<String>) -> Self {
		self.empty = Some(empty.into());
		self
	}

	/// Sets the error line.
	pub fn with_error(mut self, error: impl Into<String>) -> Self {
		self.error = Some(error.into());
		self
	}
}

/// Outcome of one interactive chooser round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
	/// The user confirmed the item at this index into the view's items.
	Confirmed(usize),
	/// The user dismissed the chooser.
	Cancelled,
}

/// Interactive list selection, shared across all picker stages.
#[async_trait]
pub trait Chooser: Send {
	/// Re-renders the chooser without waiting for input. Used for busy
	/// states while a network call is in flight.
	fn update(&mut self, view: &ChooserView);

	/// Renders the view and waits for a confirmation or a cancel.
	async fn choose(&mut self, view: &ChooserView) -> Choice;

	/// Hides the chooser, restoring whatever had focus before.
	fn close(&mut self);
}

/// Free-text input.
#[async_trait]
pub trait Prompter: Send {
	/// Asks for one line of text. `None` means the user cancelled.
	async fn prompt(&mut self, label: &str) -> Option<String>;
}

/// Fire-and-forget failure surface (toast, status line, log sink).
pub trait FailureReporter: Send {
	/// Reports a failure with an optional detail line.
	fn report(&mut self, title: &str, detail: Option<&str>);
}

/// Read-only source of configured gateways.
pub trait GatewaySource: Send {
	/// The gateways the picker may offer, in presentation order.
	fn gateways(&self) -> Vec<GatewayDescriptor>;
}

/// The document a kernel is being picked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
	/// Path of the document, when it has been saved.
	pub path: Option<String>,
	/// Language id, e.g. `python`. Drives kernel-spec filtering.
	pub language: Option<String>,
}

/// Application-side context the resolved kernel is bound to.
pub trait DocumentSource: Send {
	/// The currently active document, if any. Re-queried at bind time:
	/// if the document went away mid-flow there is nothing to bind the
	/// kernel to and the resolution aborts silently.
	fn active_document(&self) -> Option<DocumentInfo>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn view_builder_sets_status_lines() {
		let view = ChooserView::new("Kernels")
			.with_items(vec![ChooserItem::new("python3").with_detail("python")])
			.with_loading("Contacting gateway");
		assert_eq!(view.title, "Kernels");
		assert_eq!(view.items.len(), 1);
		assert_eq!(view.loading.as_deref(), Some("Contacting gateway"));
		assert!(view.error.is_none());
	}
}
