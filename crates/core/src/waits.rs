//! Explicit element waits.
//!
//! Used when a profile runs in explicit wait mode: the endpoint gets no
//! implicit-wait tuning, and callers poll for elements themselves with a
//! bounded deadline.

use std::time::Duration;

use drover_protocol::{ElementRef, LocatorSpec, SessionId, Timeouts};
use drover_runtime::Endpoint;
use tokio::time::Instant;
use tracing::trace;

use crate::error::{Error, Result};

/// Polls for an element until it appears or the implicit-wait budget
/// expires. Absence after the deadline is `Ok(None)`.
pub async fn wait_for_element(
	endpoint: &dyn Endpoint,
	session: &SessionId,
	spec: &LocatorSpec,
	timeouts: &Timeouts,
) -> Result<Option<ElementRef>> {
	let deadline = Instant::now() + Duration::from_millis(timeouts.implicit_wait_ms);
	loop {
		if let Some(element) = endpoint.find_element(session, spec).await? {
			return Ok(Some(element));
		}
		if Instant::now() >= deadline {
			return Ok(None);
		}
		trace!(target = "drover.wait", locator = %spec, "element not present yet");
		tokio::time::sleep(timeouts.poll_interval()).await;
	}
}

/// Like [`wait_for_element`], but absence after the deadline raises
/// [`Error::Timeout`], for call sites where the element is required.
pub async fn require_element(
	endpoint: &dyn Endpoint,
	session: &SessionId,
	spec: &LocatorSpec,
	timeouts: &Timeouts,
) -> Result<ElementRef> {
	match wait_for_element(endpoint, session, spec, timeouts).await? {
		Some(element) => Ok(element),
		None => Err(Error::Timeout {
			ms: timeouts.implicit_wait_ms,
			condition: spec.to_string(),
		}),
	}
}
