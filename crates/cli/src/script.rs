//! JSON step scripts.
//!
//! A script is a named list of steps executed in order. Steps may name a
//! profile to run under; profiles drive independent browser instances
//! within one run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

/// One scripted test run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
	/// Display name for the run summary.
	#[serde(default)]
	pub name: Option<String>,
	pub steps: Vec<Step>,
}

/// One step of a scripted run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
	Open {
		url: String,
		#[serde(default)]
		profile: Option<String>,
	},
	Click {
		locator: String,
		#[serde(default)]
		profile: Option<String>,
	},
	Type {
		locator: String,
		text: String,
		#[serde(default)]
		profile: Option<String>,
	},
	AssertText {
		locator: String,
		expected: String,
		#[serde(default)]
		profile: Option<String>,
	},
	AssertAttr {
		locator: String,
		name: String,
		expected: String,
		#[serde(default)]
		profile: Option<String>,
	},
	Screenshot {
		path: String,
		#[serde(default)]
		profile: Option<String>,
	},
	SaveCookies {
		path: String,
		#[serde(default)]
		profile: Option<String>,
	},
	CloseWindow {
		#[serde(default)]
		profile: Option<String>,
	},
	Windows {
		#[serde(default)]
		profile: Option<String>,
	},
	Wait {
		ms: u64,
		#[serde(default)]
		profile: Option<String>,
	},
}

impl Step {
	/// Profile this step runs under, when overridden.
	pub fn profile(&self) -> Option<&str> {
		match self {
			Step::Open { profile, .. }
			| Step::Click { profile, .. }
			| Step::Type { profile, .. }
			| Step::AssertText { profile, .. }
			| Step::AssertAttr { profile, .. }
			| Step::Screenshot { profile, .. }
			| Step::SaveCookies { profile, .. }
			| Step::CloseWindow { profile }
			| Step::Windows { profile }
			| Step::Wait { profile, .. } => profile.as_deref(),
		}
	}

	/// Short human label for step reports.
	pub fn label(&self) -> String {
		match self {
			Step::Open { url, .. } => format!("open {url}"),
			Step::Click { locator, .. } => format!("click {locator}"),
			Step::Type { locator, .. } => format!("type into {locator}"),
			Step::AssertText { locator, expected, .. } => format!("assert text of {locator} is {expected:?}"),
			Step::AssertAttr { locator, name, .. } => format!("assert attr {name} of {locator}"),
			Step::Screenshot { path, .. } => format!("screenshot {path}"),
			Step::SaveCookies { path, .. } => format!("save cookies {path}"),
			Step::CloseWindow { .. } => "close window".to_string(),
			Step::Windows { .. } => "list windows".to_string(),
			Step::Wait { ms, .. } => format!("wait {ms}ms"),
		}
	}
}

impl Script {
	/// Loads and validates a script file.
	pub fn load(path: &Path) -> Result<Self> {
		let contents = std::fs::read_to_string(path).map_err(|source| CliError::ScriptRead {
			path: path.to_path_buf(),
			source,
		})?;
		let script: Script = serde_json::from_str(&contents)?;
		script.validate()?;
		Ok(script)
	}

	/// Rejects scripts that cannot run (empty, malformed URLs).
	pub fn validate(&self) -> Result<()> {
		if self.steps.is_empty() {
			return Err(CliError::Script("script has no steps".to_string()));
		}
		for step in &self.steps {
			if let Step::Open { url, .. } = step {
				url::Url::parse(url).map_err(|e| CliError::InvalidUrl(format!("{url}: {e}")))?;
			}
		}
		Ok(())
	}

	/// Wraps a single step as an anonymous script.
	pub fn single(step: Step) -> Self {
		Self {
			name: None,
			steps: vec![step],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_tagged_steps() {
		let json = r#"{
			"name": "smoke",
			"steps": [
				{"action": "open", "url": "https://example.com"},
				{"action": "click", "locator": "css=#go"},
				{"action": "assertText", "locator": "id=msg", "expected": "Welcome"},
				{"action": "wait", "ms": 250},
				{"action": "closeWindow"}
			]
		}"#;
		let script: Script = serde_json::from_str(json).unwrap();
		assert_eq!(script.name.as_deref(), Some("smoke"));
		assert_eq!(script.steps.len(), 5);
		assert!(matches!(script.steps[1], Step::Click { .. }));
		script.validate().unwrap();
	}

	#[test]
	fn per_step_profile_override() {
		let json = r#"{"steps": [{"action": "open", "url": "https://a.test", "profile": "second"}]}"#;
		let script: Script = serde_json::from_str(json).unwrap();
		assert_eq!(script.steps[0].profile(), Some("second"));
	}

	#[test]
	fn empty_script_is_rejected() {
		let script: Script = serde_json::from_str(r#"{"steps": []}"#).unwrap();
		assert!(matches!(script.validate(), Err(CliError::Script(_))));
	}

	#[test]
	fn malformed_open_url_is_rejected() {
		let script: Script = serde_json::from_str(r#"{"steps": [{"action": "open", "url": "not a url"}]}"#).unwrap();
		assert!(matches!(script.validate(), Err(CliError::InvalidUrl(_))));
	}

	#[test]
	fn unknown_action_fails_to_parse() {
		let result: std::result::Result<Script, _> =
			serde_json::from_str(r#"{"steps": [{"action": "teleport"}]}"#);
		assert!(result.is_err());
	}
}
