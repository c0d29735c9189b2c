//! Session-wide timeout and wait-mode settings.

use serde::{Deserialize, Serialize};

/// Default page-load budget in milliseconds.
pub const DEFAULT_PAGE_LOAD_MS: u64 = 30_000;

/// Default implicit-wait tuning in milliseconds.
pub const DEFAULT_IMPLICIT_WAIT_MS: u64 = 5_000;

/// Default interval between quiescence polls in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Default number of consecutive stable polls required for quiescence.
pub const DEFAULT_STABILITY_TOLERANCE: u32 = 3;

/// How element waits are tuned for a session.
///
/// The two modes are mutually exclusive: implicit wait is configured on the
/// endpoint only when the capability allows it and explicit mode was not
/// requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitMode {
	/// Endpoint-side implicit wait applied to every element search.
	#[default]
	Implicit,
	/// Caller-side explicit/fluent waits; implicit wait stays unset.
	Explicit,
}

/// Session-wide timeout settings applied at (re)creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeouts {
	/// Implicit-wait tuning in milliseconds.
	pub implicit_wait_ms: u64,
	/// Page-load budget in milliseconds.
	pub page_load_ms: u64,
	/// Interval between quiescence polls in milliseconds.
	pub poll_interval_ms: u64,
	/// Consecutive stable polls required to declare quiescence.
	pub stability_tolerance: u32,
}

impl Default for Timeouts {
	fn default() -> Self {
		Self {
			implicit_wait_ms: DEFAULT_IMPLICIT_WAIT_MS,
			page_load_ms: DEFAULT_PAGE_LOAD_MS,
			poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
			stability_tolerance: DEFAULT_STABILITY_TOLERANCE,
		}
	}
}

impl Timeouts {
	/// Page-load budget as a [`std::time::Duration`].
	pub fn page_load(&self) -> std::time::Duration {
		std::time::Duration::from_millis(self.page_load_ms)
	}

	/// Poll interval as a [`std::time::Duration`].
	pub fn poll_interval(&self) -> std::time::Duration {
		std::time::Duration::from_millis(self.poll_interval_ms)
	}
}
