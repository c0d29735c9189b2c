//! Endpoint error taxonomy and raw-message classification.
//!
//! Expected absence (no such element, no dialog open) is never modeled as
//! an error: probe operations return `Ok(None)` instead. Error variants
//! are reserved for faults, so callers distinguish control flow from
//! failure without generic catch-alls.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EndpointError>;

/// Fault raised by the automation endpoint or its transport.
#[derive(Debug, Error)]
pub enum EndpointError {
	/// Session could not be created at all (binary missing, capability
	/// conflict, launch failure). Fatal to the calling command.
	#[error("session construction failed: {0}")]
	Construction(String),

	/// The referenced window/tab no longer exists.
	#[error("no such window: {0}")]
	NoSuchWindow(String),

	/// The transport to the browser was severed mid-call. Transient;
	/// the next liveness probe re-evaluates the session.
	#[error("transport severed: {0}")]
	Transport(String),

	/// A native dialog is blocking the render thread.
	#[error("blocked by dialog: {0}")]
	BlockedByDialog(String),

	/// Driver binary could not be resolved for the requested kind.
	#[error("driver unavailable: {0}")]
	Driver(String),

	/// Any other protocol-level failure.
	#[error("protocol error: {0}")]
	Protocol(String),
}

impl EndpointError {
	/// Classification of this error for recovery decisions.
	pub fn class(&self) -> ErrorClass {
		match self {
			EndpointError::Construction(_) | EndpointError::Driver(_) => ErrorClass::Construction,
			EndpointError::NoSuchWindow(_) => ErrorClass::StaleWindow,
			EndpointError::Transport(_) => ErrorClass::TransportSevered,
			EndpointError::BlockedByDialog(_) => ErrorClass::DialogBlocked,
			EndpointError::Protocol(msg) => classify(msg),
		}
	}
}

/// Coarse category used by the liveness probe and the quiescence loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
	Construction,
	StaleWindow,
	TransportSevered,
	DialogBlocked,
	Other,
}

/// Message fragments endpoints emit when the active window is gone.
const STALE_WINDOW_MARKERS: &[&str] = &[
	"no such window",
	"window already closed",
	"web view not found",
	"target window already closed",
];

/// Message fragments for a severed transport. These show up as transient
/// network blips and must not force session recreation.
const TRANSPORT_MARKERS: &[&str] = &[
	"connection aborted",
	"connection refused",
	"connection reset",
	"stream ended unexpectedly",
	"remote end closed",
	"chrome not reachable",
];

/// Message fragments for a dialog blocking the render thread.
const DIALOG_MARKERS: &[&str] = &[
	"unexpected alert open",
	"modal dialog present",
	"unhandled alert",
];

/// Classifies a raw protocol error message by its known substrings.
pub fn classify(message: &str) -> ErrorClass {
	let lower = message.to_lowercase();
	if STALE_WINDOW_MARKERS.iter().any(|m| lower.contains(m)) {
		ErrorClass::StaleWindow
	} else if TRANSPORT_MARKERS.iter().any(|m| lower.contains(m)) {
		ErrorClass::TransportSevered
	} else if DIALOG_MARKERS.iter().any(|m| lower.contains(m)) {
		ErrorClass::DialogBlocked
	} else {
		ErrorClass::Other
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stale_window_messages_classify() {
		assert_eq!(classify("no such window: target window already closed"), ErrorClass::StaleWindow);
		assert_eq!(classify("Web view not found"), ErrorClass::StaleWindow);
	}

	#[test]
	fn transport_messages_classify() {
		assert_eq!(classify("Connection aborted by peer"), ErrorClass::TransportSevered);
		assert_eq!(classify("chrome not reachable"), ErrorClass::TransportSevered);
		assert_eq!(classify("stream ended unexpectedly while reading response"), ErrorClass::TransportSevered);
	}

	#[test]
	fn dialog_messages_classify() {
		assert_eq!(classify("unexpected alert open: {Alert text : hi}"), ErrorClass::DialogBlocked);
	}

	#[test]
	fn unknown_messages_are_other() {
		assert_eq!(classify("invalid session id"), ErrorClass::Other);
	}

	#[test]
	fn typed_variants_win_over_message_content() {
		// A typed NoSuchWindow classifies as stale even with an odd message.
		let err = EndpointError::NoSuchWindow("gone".into());
		assert_eq!(err.class(), ErrorClass::StaleWindow);
		// Protocol falls back to substring classification.
		let err = EndpointError::Protocol("connection reset by peer".into());
		assert_eq!(err.class(), ErrorClass::TransportSevered);
	}
}
