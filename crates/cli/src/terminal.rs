//! Line-oriented implementations of the picker's UI traits.
//!
//! The chooser renders a numbered list on stderr and reads a selection from
//! stdin, keeping stdout free for command output. Stdin reads run on the
//! blocking pool so the picker task stays suspendable.

use async_trait::async_trait;
use colored::Colorize;
use kgw::{
	Choice, Chooser, ChooserView, DocumentInfo, DocumentSource, FailureReporter, Prompter,
};

/// Numbered-list chooser over stderr/stdin.
#[derive(Debug, Default)]
pub struct TermChooser;

#[async_trait]
impl Chooser for TermChooser {
	fn update(&mut self, view: &ChooserView) {
		for line in render(view) {
			eprintln!("{line}");
		}
	}

	async fn choose(&mut self, view: &ChooserView) -> Choice {
		self.update(view);
		if view.items.is_empty() {
			// Nothing to confirm; wait for an acknowledging enter.
			eprint!("{}", "press enter to go back ".dimmed());
			let _ = read_line().await;
			return Choice::Cancelled;
		}
		loop {
			eprint!("{}", format!("choose 1-{} (empty cancels): ", view.items.len()).dimmed());
			let Some(input) = read_line().await else {
				return Choice::Cancelled;
			};
			match parse_selection(&input, view.items.len()) {
				Selection::Confirmed(index) => return Choice::Confirmed(index),
				Selection::Cancelled => return Choice::Cancelled,
				Selection::Invalid => eprintln!("{}", "not a listed number".yellow()),
			}
		}
	}

	fn close(&mut self) {}
}

/// Free-text prompter over stderr/stdin.
#[derive(Debug, Default)]
pub struct TermPrompter;

#[async_trait]
impl Prompter for TermPrompter {
	async fn prompt(&mut self, label: &str) -> Option<String> {
		eprint!("{}: ", label.bold());
		read_line().await
	}
}

/// Failure reporter printing to stderr.
#[derive(Debug, Default)]
pub struct TermReporter;

impl FailureReporter for TermReporter {
	fn report(&mut self, title: &str, detail: Option<&str>) {
		eprintln!("{} {title}", "error:".red().bold());
		if let Some(detail) = detail {
			eprintln!("  {}", detail.dimmed());
		}
	}
}

/// Document context supplied on the command line.
///
/// A terminal run always has a context to bind to (the invocation itself),
/// so this source never reports the document as gone.
#[derive(Debug, Clone, Default)]
pub struct CliDocument {
	/// Path used for new-session naming.
	pub path: Option<String>,
	/// Language the spec filter keys on.
	pub language: Option<String>,
}

impl DocumentSource for CliDocument {
	fn active_document(&self) -> Option<DocumentInfo> {
		Some(DocumentInfo {
			path: self.path.clone(),
			language: self.language.clone(),
		})
	}
}

/// Renders one view as display lines, items numbered from 1.
fn render(view: &ChooserView) -> Vec<String> {
	let mut lines = vec![format!("\n{}", view.title.bold())];
	if let Some(info) = &view.info {
		lines.push(format!("{}", info.dimmed()));
	}
	if let Some(error) = &view.error {
		lines.push(format!("{}", error.red()));
	}
	for (index, item) in view.items.iter().enumerate() {
		let number = format!("{:>3}.", index + 1);
		match &item.detail {
			Some(detail) => lines.push(format!(
				"{} {}  {}",
				number.cyan(),
				item.label,
				detail.dimmed()
			)),
			None => lines.push(format!("{} {}", number.cyan(), item.label)),
		}
	}
	if view.items.is_empty() {
		if let Some(empty) = &view.empty {
			lines.push(format!("{}", empty.dimmed()));
		}
	}
	if let Some(loading) = &view.loading {
		lines.push(format!("{}", format!("{loading}…").dimmed()));
	}
	lines
}

enum Selection {
	Confirmed(usize),
	Cancelled,
	Invalid,
}

/// Maps one input line onto a selection. Empty input and `q` cancel.
fn parse_selection(input: &str, len: usize) -> Selection {
	let input = input.trim();
	if input.is_empty() || input.eq_ignore_ascii_case("q") {
		return Selection::Cancelled;
	}
	match input.parse::<usize>() {
		Ok(number) if (1..=len).contains(&number) => Selection::Confirmed(number - 1),
		_ => Selection::Invalid,
	}
}

/// Reads one line from stdin off the async task. `None` on closed stdin.
async fn read_line() -> Option<String> {
	tokio::task::spawn_blocking(|| {
		let mut line = String::new();
		match std::io::stdin().read_line(&mut line) {
			Ok(0) | Err(_) => None,
			Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
		}
	})
	.await
	.ok()
	.flatten()
}

#[cfg(test)]
mod tests {
	use kgw::ChooserItem;

	use super::*;

	#[test]
	fn selection_parses_numbers_and_cancels() {
		assert!(matches!(parse_selection("2", 3), Selection::Confirmed(1)));
		assert!(matches!(parse_selection(" 1 ", 1), Selection::Confirmed(0)));
		assert!(matches!(parse_selection("", 3), Selection::Cancelled));
		assert!(matches!(parse_selection("Q", 3), Selection::Cancelled));
		assert!(matches!(parse_selection("0", 3), Selection::Invalid));
		assert!(matches!(parse_selection("4", 3), Selection::Invalid));
		assert!(matches!(parse_selection("two", 3), Selection::Invalid));
	}

	#[test]
	fn render_numbers_items_and_shows_empty_line() {
		let view = ChooserView::new("Kernels")
			.with_items(vec![
				ChooserItem::new("python3").with_detail("python"),
				ChooserItem::new("ir"),
			]);
		let lines = render(&view);
		assert!(lines[0].contains("Kernels"));
		assert!(lines[1].contains("1.") && lines[1].contains("python3"));
		assert!(lines[2].contains("2.") && lines[2].contains("ir"));

		let empty = ChooserView::new("Kernels").with_empty("none match");
		let lines = render(&empty);
		assert!(lines.iter().any(|line| line.contains("none match")));
	}
}
