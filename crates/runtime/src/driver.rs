//! Driver-binary lookup.
//!
//! Resolution order, mirroring how the rest of the toolchain finds its
//! helpers:
//! 1. `DROVER_DRIVER_<KIND>` environment variable (runtime override)
//! 2. `DROVER_DRIVER` environment variable (kind-agnostic override)
//! 3. `PATH` lookup of the conventional binary name
//!
//! Cloud kinds are brokered remotely and resolve to `None`. Downloading
//! or verifying driver binaries is out of scope; a missing binary is a
//! construction error surfaced to the calling command.

use std::path::PathBuf;

use drover_protocol::BrowserKind;
use tracing::{debug, warn};

use crate::error::{EndpointError, Result};

/// Conventional binary name for a kind, or `None` for brokered kinds.
pub fn binary_name(kind: BrowserKind) -> Option<&'static str> {
	match kind {
		BrowserKind::Chrome | BrowserKind::ChromeHeadless => Some("chromedriver"),
		BrowserKind::Firefox | BrowserKind::FirefoxHeadless => Some("geckodriver"),
		BrowserKind::Edge => Some("msedgedriver"),
		BrowserKind::Ie => Some("IEDriverServer"),
		BrowserKind::Safari => Some("safaridriver"),
		BrowserKind::CloudChrome | BrowserKind::CloudFirefox | BrowserKind::CloudEdge => None,
	}
}

/// Environment variable consulted before the kind-agnostic override.
fn env_var_for(kind: BrowserKind) -> String {
	format!("DROVER_DRIVER_{}", kind.to_string().to_uppercase().replace('-', "_"))
}

/// Resolves the driver binary for a kind.
///
/// Returns `Ok(None)` for cloud kinds (no local binary involved) and
/// [`EndpointError::Driver`] when a local kind's binary cannot be found.
pub fn resolve(kind: BrowserKind) -> Result<Option<PathBuf>> {
	let Some(name) = binary_name(kind) else {
		debug!(target = "drover.driver", %kind, "cloud kind, no local driver binary");
		return Ok(None);
	};

	let kind_var = env_var_for(kind);
	for var in [kind_var.as_str(), "DROVER_DRIVER"] {
		if let Ok(value) = std::env::var(var) {
			let path = PathBuf::from(&value);
			if path.is_file() {
				debug!(target = "drover.driver", %kind, source = var, path = %path.display(), "driver from env override");
				return Ok(Some(path));
			}
			warn!(
				target = "drover.driver",
				%kind,
				source = var,
				path = %path.display(),
				"env override is not a file; trying next source"
			);
		}
	}

	match which::which(name) {
		Ok(path) => {
			debug!(target = "drover.driver", %kind, path = %path.display(), "driver from PATH");
			Ok(Some(path))
		}
		Err(_) => Err(EndpointError::Driver(format!(
			"no {name} binary for {kind}; install it or set {kind_var}"
		))),
	}
}
