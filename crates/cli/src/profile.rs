//! Profile config file resolution.

use std::path::PathBuf;

use drover::ProfileConfig;

use crate::error::Result;

/// Location of a named profile's config file:
/// `<config_dir>/drover/profiles/<name>.json`.
pub fn profile_path(name: &str) -> PathBuf {
	dirs::config_dir()
		.unwrap_or_else(|| PathBuf::from("."))
		.join("drover")
		.join("profiles")
		.join(format!("{name}.json"))
}

/// Loads a named profile, defaulting when no file exists.
pub fn load(name: &str) -> Result<ProfileConfig> {
	Ok(ProfileConfig::load_or_default(&profile_path(name))?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn path_ends_with_profile_file() {
		let path = profile_path("ci");
		assert!(path.ends_with("drover/profiles/ci.json"));
	}
}
