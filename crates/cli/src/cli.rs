use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use drover_protocol::BrowserKind;

fn parse_browser(value: &str) -> Result<BrowserKind, String> {
	value.parse()
}

/// Scripted browser test runner.
#[derive(Debug, Parser)]
#[command(name = "drover", version, about)]
pub struct Cli {
	/// Profile to run under (its own browser instance and config).
	#[arg(long, global = true, default_value = "default")]
	pub profile: String,

	/// Browser kind override for this invocation.
	#[arg(long, global = true, value_parser = parse_browser)]
	pub browser: Option<BrowserKind>,

	/// Increase log verbosity (-v info, -vv debug).
	#[arg(short, long, global = true, action = ArgAction::Count)]
	pub verbose: u8,

	/// Execute against the in-memory endpoint instead of a live browser.
	#[arg(long, global = true)]
	pub dry_run: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Execute a JSON step script and report pass/fail per step.
	Run {
		/// Path to the script file.
		script: PathBuf,
	},
	/// Open a URL and wait for the page to settle.
	Open { url: String },
	/// Click the element named by a symbolic locator.
	Click { locator: String },
	/// Type text into the element named by a symbolic locator.
	Type { locator: String, text: String },
	/// Assert the visible text of an element.
	AssertText { locator: String, expected: String },
	/// Assert an attribute value of an element.
	AssertAttr {
		locator: String,
		name: String,
		expected: String,
	},
	/// Capture a screenshot to a PNG file.
	Screenshot { path: PathBuf },
	/// Save the current page's cookies to a JSON file.
	SaveCookies { path: PathBuf },
	/// Close the current window, or the whole session when it is last.
	CloseWindow,
	/// List known window handles for the profile.
	Windows,
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn verify_cli() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_run_with_globals() {
		let cli = Cli::parse_from(["drover", "--profile", "ci", "--browser", "firefox", "-vv", "run", "smoke.json"]);
		assert_eq!(cli.profile, "ci");
		assert_eq!(cli.browser, Some(BrowserKind::Firefox));
		assert_eq!(cli.verbose, 2);
		assert!(matches!(cli.command, Command::Run { .. }));
	}

	#[test]
	fn rejects_unknown_browser() {
		let result = Cli::try_parse_from(["drover", "--browser", "netscape", "windows"]);
		assert!(result.is_err());
	}

	#[test]
	fn parses_assert_attr_operands() {
		let cli = Cli::parse_from(["drover", "assert-attr", "id=msg", "class", "ok"]);
		match cli.command {
			Command::AssertAttr { locator, name, expected } => {
				assert_eq!(locator, "id=msg");
				assert_eq!(name, "class");
				assert_eq!(expected, "ok");
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}
}
