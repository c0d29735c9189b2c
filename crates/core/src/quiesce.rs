//! Page quiescence detection.
//!
//! Decides, after a state-changing action, whether the displayed page has
//! finished settling within a bounded time budget. Layered strategy, in
//! priority order: blocking-dialog short-circuit, dead-window
//! short-circuit, ready-state fast path, content-signature strict path.
//!
//! The detector never raises on timeout; it reports `true`/`false` and
//! leaves the reaction to the calling command. Incremental ready-state
//! polling is cheap and accurate where the endpoint supports implicit
//! wait tuning; content-signature polling costs a full page-source
//! serialization per poll, so it runs only when configured or when the
//! capability record rules the fast path out.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::time::Duration;

use drover_protocol::{BrowserCaps, SessionId};
use drover_runtime::{Endpoint, ErrorClass};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::config::ProfileConfig;

/// Budget for the dead-window URL probe.
const URL_PROBE_BUDGET: Duration = Duration::from_millis(250);

/// Settle sleep used when the content-signature mechanism is unsupported.
const SETTLE_FALLBACK: Duration = Duration::from_millis(500);

/// Inputs for one quiescence wait, derived from profile config plus the
/// session's capability record.
#[derive(Clone, Copy, Debug)]
pub struct StabilityConfig {
	/// Minimum interval between polls.
	pub poll_interval: Duration,
	/// Overall deadline for the wait.
	pub page_load_timeout: Duration,
	/// Forces the content-signature path.
	pub strict: bool,
	/// Treats open dialogs as ignorable instead of "not stable".
	pub ignore_alerts: bool,
	/// Consecutive stable polls required on the strict path.
	pub tolerance: u32,
}

impl StabilityConfig {
	/// Derives the stability inputs for a session. The strict path is
	/// selected when explicitly configured or when the kind's capability
	/// record rules out incremental wait tuning.
	pub fn from_profile(config: &ProfileConfig, caps: &BrowserCaps) -> Self {
		Self {
			poll_interval: config.timeouts.poll_interval(),
			page_load_timeout: config.timeouts.page_load(),
			strict: config.strict_stability || !caps.implicit_wait,
			ignore_alerts: config.ignore_alerts,
			tolerance: config.timeouts.stability_tolerance,
		}
	}
}

/// Ephemeral state for one strict-path wait.
struct StabilityWindow {
	streak: u32,
	last_signature: Option<u64>,
	deadline: Instant,
}

impl StabilityWindow {
	fn new(deadline: Instant) -> Self {
		Self {
			streak: 0,
			last_signature: None,
			deadline,
		}
	}

	/// Folds one observation into the streak. A changed signature resets
	/// the streak; an unchanged signature with a true ready signal
	/// extends it; unchanged-but-not-ready holds it.
	fn observe(&mut self, signature: u64, ready: bool) -> u32 {
		match self.last_signature {
			Some(last) if last == signature => {
				if ready {
					self.streak += 1;
				}
			}
			_ => self.streak = 0,
		}
		self.last_signature = Some(signature);
		self.streak
	}

	fn expired(&self) -> bool {
		Instant::now() >= self.deadline
	}
}

/// Waits for the current page to stop changing.
///
/// Returns `false` on deadline expiry, on a blocking dialog (unless
/// configured ignorable), and on a window that cannot report its URL
/// within the probe budget. Endpoint faults never escalate out of the
/// detector; the next liveness probe re-evaluates the session.
pub async fn wait_for_quiescence(
	endpoint: &dyn Endpoint,
	session: &SessionId,
	caps: &BrowserCaps,
	config: &StabilityConfig,
) -> bool {
	let deadline = Instant::now() + config.page_load_timeout;

	// A native dialog blocks the render thread; content comparison is
	// meaningless while one is open.
	if !config.ignore_alerts {
		match endpoint.alert_text(session).await {
			Ok(Some(text)) => {
				debug!(target = "drover.quiesce", %text, "dialog open, not stable");
				return false;
			}
			Ok(None) => {}
			Err(err) if err.class() == ErrorClass::DialogBlocked => return false,
			Err(err) => debug!(target = "drover.quiesce", error = %err, "alert probe failed"),
		}
	}

	// A window that cannot even report its URL has no content to settle
	// (for example a just-opened download target).
	match tokio::time::timeout(URL_PROBE_BUDGET.max(config.poll_interval), endpoint.current_url(session)).await {
		Ok(Ok(_)) => {}
		Ok(Err(err)) => {
			debug!(target = "drover.quiesce", error = %err, "url probe failed, not stable");
			return false;
		}
		Err(_) => {
			debug!(target = "drover.quiesce", "url probe timed out, not stable");
			return false;
		}
	}

	if config.strict {
		strict_path(endpoint, session, caps, config, deadline).await
	} else {
		fast_path(endpoint, session, config, deadline).await
	}
}

/// Polls the ready-state signal up to the deadline.
async fn fast_path(endpoint: &dyn Endpoint, session: &SessionId, config: &StabilityConfig, deadline: Instant) -> bool {
	loop {
		match endpoint.ready_state(session).await {
			Ok(state) if state.is_complete() => return true,
			Ok(state) => trace!(target = "drover.quiesce", ?state, "not ready"),
			Err(err) => {
				debug!(target = "drover.quiesce", error = %err, "ready-state probe failed");
				return false;
			}
		}
		if Instant::now() >= deadline {
			return false;
		}
		tokio::time::sleep(config.poll_interval).await;
	}
}

/// Content-signature polling with a success-streak requirement.
async fn strict_path(
	endpoint: &dyn Endpoint,
	session: &SessionId,
	caps: &BrowserCaps,
	config: &StabilityConfig,
	deadline: Instant,
) -> bool {
	// No signature mechanism on this kind: fixed settle sleep plus a
	// single ready-state check.
	if !caps.page_source {
		let remaining = deadline.saturating_duration_since(Instant::now());
		tokio::time::sleep(SETTLE_FALLBACK.min(remaining)).await;
		return matches!(endpoint.ready_state(session).await, Ok(state) if state.is_complete());
	}

	let mut window = StabilityWindow::new(deadline);
	loop {
		// Dismiss any dialog that appeared mid-wait before touching the
		// page source.
		match endpoint.dismiss_alert(session).await {
			Ok(dismissed) => {
				if dismissed {
					trace!(target = "drover.quiesce", "dismissed dialog during strict poll");
				}
			}
			// The browser is in a known, expected blocked state.
			Err(err) if err.class() == ErrorClass::DialogBlocked => return true,
			Err(err) => debug!(target = "drover.quiesce", error = %err, "dismiss probe failed"),
		}

		let signature = match endpoint.page_source(session).await {
			Ok(source) => content_signature(&source),
			Err(err) if err.class() == ErrorClass::DialogBlocked => return true,
			Err(err) => {
				debug!(target = "drover.quiesce", error = %err, "page-source capture failed");
				return false;
			}
		};

		let ready = matches!(endpoint.ready_state(session).await, Ok(state) if state.is_complete());
		let streak = window.observe(signature, ready);
		trace!(target = "drover.quiesce", streak, ready, "strict poll");
		if streak >= config.tolerance {
			return true;
		}

		if window.expired() {
			return false;
		}
		tokio::time::sleep(config.poll_interval).await;
	}
}

/// 64-bit signature of the serialized page markup.
fn content_signature(source: &str) -> u64 {
	let mut hasher = DefaultHasher::new();
	source.hash(&mut hasher);
	hasher.finish()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn streak_extends_only_when_unchanged_and_ready() {
		let mut window = StabilityWindow::new(Instant::now() + Duration::from_secs(1));
		assert_eq!(window.observe(1, false), 0); // first capture, no previous
		assert_eq!(window.observe(1, false), 0); // unchanged, not ready: held
		assert_eq!(window.observe(1, true), 1);
		assert_eq!(window.observe(1, true), 2);
	}

	#[test]
	fn changed_signature_resets_streak() {
		let mut window = StabilityWindow::new(Instant::now() + Duration::from_secs(1));
		window.observe(1, true);
		window.observe(1, true);
		assert_eq!(window.observe(2, true), 0);
		assert_eq!(window.observe(2, true), 1);
	}

	#[test]
	fn signatures_differ_for_different_markup() {
		assert_ne!(content_signature("<html>a</html>"), content_signature("<html>b</html>"));
		assert_eq!(content_signature("<html></html>"), content_signature("<html></html>"));
	}

	#[test]
	fn strict_selected_by_config_or_capability() {
		let profile = ProfileConfig::default();
		let mut caps = drover_protocol::BrowserKind::Chrome.caps();
		assert!(!StabilityConfig::from_profile(&profile, &caps).strict);

		caps.implicit_wait = false;
		assert!(StabilityConfig::from_profile(&profile, &caps).strict);

		let strict_profile = ProfileConfig {
			strict_stability: true,
			..Default::default()
		};
		let caps = drover_protocol::BrowserKind::Chrome.caps();
		assert!(StabilityConfig::from_profile(&strict_profile, &caps).strict);
	}
}
