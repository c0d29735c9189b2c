//! Pass/fail reporting for scripted runs.

use colored::Colorize;
use serde::Serialize;

/// Outcome of one executed step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
	pub index: usize,
	pub label: String,
	pub passed: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
}

impl StepReport {
	pub fn pass(index: usize, label: impl Into<String>) -> Self {
		Self {
			index,
			label: label.into(),
			passed: true,
			detail: None,
		}
	}

	pub fn pass_with(index: usize, label: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			detail: Some(detail.into()),
			..Self::pass(index, label)
		}
	}

	pub fn fail(index: usize, label: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			index,
			label: label.into(),
			passed: false,
			detail: Some(detail.into()),
		}
	}
}

/// Outcome of a whole scripted run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	pub steps: Vec<StepReport>,
}

impl RunReport {
	pub fn new(name: Option<String>) -> Self {
		Self {
			name,
			steps: Vec::new(),
		}
	}

	pub fn push(&mut self, step: StepReport) {
		self.steps.push(step);
	}

	pub fn passed(&self) -> bool {
		self.steps.iter().all(|s| s.passed)
	}

	pub fn passed_count(&self) -> usize {
		self.steps.iter().filter(|s| s.passed).count()
	}

	pub fn failed_count(&self) -> usize {
		self.steps.len() - self.passed_count()
	}

	/// Prints one line per step plus a summary line.
	pub fn print(&self) {
		if let Some(name) = &self.name {
			println!("{}", name.bold());
		}
		for step in &self.steps {
			let verdict = if step.passed { "PASS".green() } else { "FAIL".red() };
			match &step.detail {
				Some(detail) => println!("  {verdict} {:>3}. {} ({detail})", step.index + 1, step.label),
				None => println!("  {verdict} {:>3}. {}", step.index + 1, step.label),
			}
		}
		let summary = format!("{} passed, {} failed", self.passed_count(), self.failed_count());
		if self.passed() {
			println!("{}", summary.green());
		} else {
			println!("{}", summary.red());
		}
	}
}
