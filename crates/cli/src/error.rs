use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("script error: {0}")]
	Script(String),

	#[error("invalid url: {0}")]
	InvalidUrl(String),

	#[error("assertion failed: {0}")]
	Assertion(String),

	#[error("no live endpoint is linked into this build; run with --dry-run, or link an endpoint crate")]
	NoEndpoint,

	#[error("could not read script: {path}")]
	ScriptRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Core(#[from] drover::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}

impl CliError {
	/// Process exit code for this error. Assertion failures exit 1 like
	/// any failed test run; everything else exits 2 to distinguish
	/// harness faults from test faults.
	pub fn exit_code(&self) -> i32 {
		match self {
			CliError::Assertion(_) => 1,
			_ => 2,
		}
	}
}
