//! The remote automation endpoint as seen by the core.
//!
//! The wire protocol behind this trait is out of scope; implementations
//! may speak to a local driver binary, a cloud broker, or the in-memory
//! [`crate::stub::StubEndpoint`]. Probe operations return `Ok(None)` for
//! expected absence and reserve `Err` for faults.

use async_trait::async_trait;
use drover_protocol::{
	BrowserCaps, BrowserKind, Cmd, ElementRef, LocatorSpec, ReadyState, SessionId, Timeouts, WindowHandle,
};

use crate::error::Result;

/// One remote browser control channel.
///
/// All calls are blocking from the caller's perspective and bounded by the
/// endpoint's own transport timeouts; the core adds its own deadlines on
/// top where the spec requires them.
#[async_trait]
pub trait Endpoint: Send + Sync {
	// -- session lifecycle --

	/// Creates a session of the given kind. Construction failures are
	/// [`crate::EndpointError::Construction`].
	async fn create_session(&self, kind: BrowserKind, caps: &BrowserCaps) -> Result<SessionId>;

	/// Tears the session down. Errors are advisory; the session is gone
	/// either way.
	async fn quit(&self, session: &SessionId) -> Result<()>;

	/// Applies session-wide timeout tuning.
	async fn set_timeouts(&self, session: &SessionId, timeouts: &Timeouts) -> Result<()>;

	/// Escape hatch for commands this trait does not name.
	async fn execute(&self, session: &SessionId, cmd: Cmd) -> Result<serde_json::Value>;

	// -- window state --

	/// Handle of the currently focused window. Cheap; used as the
	/// liveness probe.
	async fn current_window(&self, session: &SessionId) -> Result<WindowHandle>;

	/// All open window handles, in endpoint order.
	async fn window_handles(&self, session: &SessionId) -> Result<Vec<WindowHandle>>;

	/// Moves focus to the given window.
	async fn switch_to_window(&self, session: &SessionId, handle: &WindowHandle) -> Result<()>;

	/// Closes the currently focused window.
	async fn close_window(&self, session: &SessionId) -> Result<()>;

	// -- page state --

	async fn navigate(&self, session: &SessionId, url: &str) -> Result<()>;

	async fn current_url(&self, session: &SessionId) -> Result<String>;

	async fn title(&self, session: &SessionId) -> Result<String>;

	/// Document readiness signal used by the quiescence fast path.
	async fn ready_state(&self, session: &SessionId) -> Result<ReadyState>;

	/// Full serialized page markup, used for content signatures. Expensive.
	async fn page_source(&self, session: &SessionId) -> Result<String>;

	/// Text of the open native dialog, or `None` when no dialog is open.
	async fn alert_text(&self, session: &SessionId) -> Result<Option<String>>;

	/// Dismisses the open dialog. Returns `false` when none was open.
	async fn dismiss_alert(&self, session: &SessionId) -> Result<bool>;

	// -- elements --

	/// First element matching the spec, or `None`.
	async fn find_element(&self, session: &SessionId, spec: &LocatorSpec) -> Result<Option<ElementRef>>;

	/// All elements matching the spec.
	async fn find_elements(&self, session: &SessionId, spec: &LocatorSpec) -> Result<Vec<ElementRef>>;

	async fn click(&self, session: &SessionId, element: &ElementRef) -> Result<()>;

	async fn send_keys(&self, session: &SessionId, element: &ElementRef, text: &str) -> Result<()>;

	async fn clear(&self, session: &SessionId, element: &ElementRef) -> Result<()>;

	async fn element_text(&self, session: &SessionId, element: &ElementRef) -> Result<String>;

	/// Attribute value, or `None` when the attribute is absent.
	async fn element_attr(&self, session: &SessionId, element: &ElementRef, name: &str) -> Result<Option<String>>;

	// -- capture --

	/// Base64-encoded PNG of the current viewport.
	async fn screenshot(&self, session: &SessionId) -> Result<String>;

	/// All cookies visible to the current page, as endpoint JSON.
	async fn cookies(&self, session: &SessionId) -> Result<Vec<serde_json::Value>>;

	async fn add_cookie(&self, session: &SessionId, cookie: serde_json::Value) -> Result<()>;
}
