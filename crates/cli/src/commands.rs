//! Command dispatch: maps CLI invocations onto scripted steps.

use std::sync::Arc;

use drover::{DirectFactory, SessionFactory};
use drover_runtime::{Endpoint, StubEndpoint};

use crate::cli::{Cli, Command};
use crate::error::{CliError, Result};
use crate::report::RunReport;
use crate::runner::Runner;
use crate::script::{Script, Step};
use crate::{profile, script};

/// Executes the parsed invocation and returns the run report.
pub async fn dispatch(cli: Cli) -> Result<RunReport> {
	let mut config = profile::load(&cli.profile)?;
	if let Some(browser) = cli.browser {
		config.browser = browser;
	}

	let (endpoint, factory): (Arc<dyn Endpoint>, Arc<dyn SessionFactory>) = if cli.dry_run {
		let endpoint: Arc<dyn Endpoint> = Arc::new(StubEndpoint::new());
		let factory = Arc::new(DirectFactory::new(Arc::clone(&endpoint)));
		(endpoint, factory)
	} else {
		// Live driver and cloud endpoints are linked as separate endpoint
		// crates; this build ships only the in-memory one.
		return Err(CliError::NoEndpoint);
	};
	let mut runner = Runner::new(endpoint, factory, cli.profile.clone(), config);

	let script = resolve_script(cli.command)?;
	let report = runner.run(&script).await;
	runner.shutdown().await;
	report
}

fn resolve_script(command: Command) -> Result<Script> {
	let script = match command {
		Command::Run { script } => script::Script::load(&script)?,
		Command::Open { url } => Script::single(Step::Open { url, profile: None }),
		Command::Click { locator } => Script::single(Step::Click { locator, profile: None }),
		Command::Type { locator, text } => Script::single(Step::Type {
			locator,
			text,
			profile: None,
		}),
		Command::AssertText { locator, expected } => Script::single(Step::AssertText {
			locator,
			expected,
			profile: None,
		}),
		Command::AssertAttr { locator, name, expected } => Script::single(Step::AssertAttr {
			locator,
			name,
			expected,
			profile: None,
		}),
		Command::Screenshot { path } => Script::single(Step::Screenshot {
			path: path.display().to_string(),
			profile: None,
		}),
		Command::SaveCookies { path } => Script::single(Step::SaveCookies {
			path: path.display().to_string(),
			profile: None,
		}),
		Command::CloseWindow => Script::single(Step::CloseWindow { profile: None }),
		Command::Windows => Script::single(Step::Windows { profile: None }),
	};
	Ok(script)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn single_commands_become_single_step_scripts() {
		let script = resolve_script(Command::Click {
			locator: "css=#go".into(),
		})
		.unwrap();
		assert_eq!(script.steps.len(), 1);
		assert!(matches!(&script.steps[0], Step::Click { locator, .. } if locator == "css=#go"));
	}
}
