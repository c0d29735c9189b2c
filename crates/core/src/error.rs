use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// No session could be constructed, even after the forced-recreate
	/// retry. Fatal to the calling command.
	#[error("session unavailable: {0}")]
	SessionUnavailable(String),

	/// Window recovery exhausted every candidate and the endpoint reports
	/// zero open windows; the browser has likely terminated.
	#[error("browser likely terminated: {0}")]
	BrowserGone(String),

	/// Malformed or blank locator string. A programming error in the
	/// calling script; never retried.
	#[error("locator syntax: {0}")]
	LocatorSyntax(String),

	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	#[error("capture failed: {0}")]
	Capture(String),

	#[error(transparent)]
	Endpoint(#[from] drover_runtime::EndpointError),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
