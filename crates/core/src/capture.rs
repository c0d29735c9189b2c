//! Screenshot capture helpers.

use std::path::Path;

use base64::Engine;
use drover_protocol::SessionId;
use drover_runtime::Endpoint;

use crate::error::{Error, Result};

/// Captures a screenshot and returns PNG bytes.
pub async fn screenshot_png(endpoint: &dyn Endpoint, session: &SessionId) -> Result<Vec<u8>> {
	let encoded = endpoint.screenshot(session).await?;
	base64::prelude::BASE64_STANDARD
		.decode(encoded.as_bytes())
		.map_err(|e| Error::Capture(format!("decode screenshot: {e}")))
}

/// Captures a screenshot, writes it to `path`, and returns the bytes.
pub async fn screenshot_to_file(endpoint: &dyn Endpoint, session: &SessionId, path: &Path) -> Result<Vec<u8>> {
	let bytes = screenshot_png(endpoint, session).await?;
	tokio::fs::write(path, &bytes).await?;
	Ok(bytes)
}
