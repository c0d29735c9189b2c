//! Per-profile configuration.
//!
//! A profile is a named automation channel; each profile drives one live
//! session and profiles run in parallel. Configuration is read-only
//! during execution.

use std::path::Path;

use drover_protocol::{BrowserKind, Timeouts, WaitMode};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings for one profile, loadable from a JSON profile file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileConfig {
	/// Browser engine this profile targets.
	pub browser: BrowserKind,
	/// Implicit vs explicit wait tuning (mutually exclusive).
	pub wait_mode: WaitMode,
	/// Session-wide timeout settings.
	pub timeouts: Timeouts,
	/// Forces the content-signature stability path even on browsers whose
	/// ready-state signal is trustworthy.
	pub strict_stability: bool,
	/// Treats open native dialogs as ignorable during stability checks.
	pub ignore_alerts: bool,
}

impl ProfileConfig {
	/// Loads a profile file, or defaults when the file does not exist.
	pub fn load_or_default(path: &Path) -> Result<Self> {
		match std::fs::read_to_string(path) {
			Ok(contents) => Ok(serde_json::from_str(&contents)?),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
			Err(err) => Err(err.into()),
		}
	}

	/// Saves the profile file, creating parent directories.
	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, serde_json::to_string_pretty(self)?)?;
		Ok(())
	}
}
