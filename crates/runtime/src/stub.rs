//! Scriptable in-memory endpoint.
//!
//! Backs integration tests and the CLI `--dry-run` mode with a fully
//! deterministic browser: per-session window lists, programmable switch
//! failures and probe faults, ready-state and page-source sequences,
//! alert toggles, and an element table keyed by locator.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use drover_protocol::{
	BrowserCaps, BrowserKind, Cmd, ElementRef, LocatorSpec, ReadyState, SessionId, Timeouts, WindowHandle,
};
use parking_lot::Mutex;

use crate::endpoint::Endpoint;
use crate::error::{EndpointError, Result};

/// One fault injected into the next liveness probe.
#[derive(Clone, Debug)]
pub enum ProbeFault {
	Stale(String),
	Transport(String),
	Other(String),
}

impl ProbeFault {
	fn into_error(self) -> EndpointError {
		match self {
			ProbeFault::Stale(msg) => EndpointError::NoSuchWindow(msg),
			ProbeFault::Transport(msg) => EndpointError::Transport(msg),
			ProbeFault::Other(msg) => EndpointError::Protocol(msg),
		}
	}
}

/// A fake element the stub can find, click, and read back.
#[derive(Clone, Debug, Default)]
pub struct StubElement {
	pub text: String,
	pub attrs: HashMap<String, String>,
	pub value: String,
}

#[derive(Default)]
struct StubSession {
	kind: BrowserKind,
	windows: Vec<WindowHandle>,
	current: Option<WindowHandle>,
	url: String,
	title: String,
	ready_states: VecDeque<ReadyState>,
	last_ready: Option<ReadyState>,
	sources: VecDeque<String>,
	last_source: Option<String>,
	alert: Option<String>,
	url_delay: Option<Duration>,
	elements: HashMap<String, Vec<ElementRef>>,
	element_state: HashMap<ElementRef, StubElement>,
	cookies: Vec<serde_json::Value>,
	probe_faults: VecDeque<ProbeFault>,
	switch_attempts: Vec<WindowHandle>,
	timeouts: Option<Timeouts>,
	alerts_dismissed: u32,
	source_fetches: u32,
	next_element: u64,
}

/// Deterministic in-memory [`Endpoint`].
#[derive(Default)]
pub struct StubEndpoint {
	sessions: DashMap<String, Mutex<StubSession>>,
	counter: AtomicU64,
	fail_create: Mutex<Option<String>>,
	created: AtomicU64,
}

impl StubEndpoint {
	pub fn new() -> Self {
		Self::default()
	}

	fn with_session<T>(&self, id: &SessionId, f: impl FnOnce(&mut StubSession) -> Result<T>) -> Result<T> {
		let entry = self
			.sessions
			.get(&id.0)
			.ok_or_else(|| EndpointError::Protocol(format!("invalid session id: {id}")))?;
		let mut session = entry.lock();
		f(&mut session)
	}

	// -- scripting surface (tests and dry-run setup) --

	/// Makes the next `create_session` fail with a construction error.
	pub fn fail_next_create(&self, message: &str) {
		*self.fail_create.lock() = Some(message.to_string());
	}

	/// Number of sessions created so far.
	pub fn created_count(&self) -> u64 {
		self.created.load(Ordering::SeqCst)
	}

	/// Replaces the live window list; the first handle becomes current.
	pub fn set_windows(&self, id: &SessionId, handles: &[&str]) {
		self.with_session(id, |s| {
			s.windows = handles.iter().map(|h| WindowHandle::from(*h)).collect();
			s.current = s.windows.first().cloned();
			Ok(())
		})
		.expect("stub session");
	}

	/// Opens an additional window without changing focus.
	pub fn open_window(&self, id: &SessionId, handle: &str) {
		self.with_session(id, |s| {
			s.windows.push(WindowHandle::from(handle));
			Ok(())
		})
		.expect("stub session");
	}

	/// Closes every window; the next probe sees a terminated browser.
	pub fn kill_browser(&self, id: &SessionId) {
		self.with_session(id, |s| {
			s.windows.clear();
			s.current = None;
			Ok(())
		})
		.expect("stub session");
	}

	/// Queues a fault for upcoming `current_window` probes.
	pub fn fault_next_probe(&self, id: &SessionId, fault: ProbeFault) {
		self.with_session(id, |s| {
			s.probe_faults.push_back(fault);
			Ok(())
		})
		.expect("stub session");
	}

	/// Scripts the ready-state sequence; the last value repeats.
	pub fn set_ready_states(&self, id: &SessionId, states: &[ReadyState]) {
		self.with_session(id, |s| {
			s.ready_states = states.iter().copied().collect();
			s.last_ready = None;
			Ok(())
		})
		.expect("stub session");
	}

	/// Scripts the page-source sequence; the last value repeats.
	pub fn set_sources(&self, id: &SessionId, sources: &[&str]) {
		self.with_session(id, |s| {
			s.sources = sources.iter().map(|v| v.to_string()).collect();
			s.last_source = None;
			Ok(())
		})
		.expect("stub session");
	}

	/// Opens (or clears) a native dialog.
	pub fn set_alert(&self, id: &SessionId, text: Option<&str>) {
		self.with_session(id, |s| {
			s.alert = text.map(str::to_string);
			Ok(())
		})
		.expect("stub session");
	}

	/// Delays every `current_url` answer, to exercise the dead-window
	/// short-circuit.
	pub fn set_url_delay(&self, id: &SessionId, delay: Duration) {
		self.with_session(id, |s| {
			s.url_delay = Some(delay);
			Ok(())
		})
		.expect("stub session");
	}

	/// Registers an element findable through `spec`.
	pub fn insert_element(&self, id: &SessionId, spec: &LocatorSpec, element: StubElement) -> ElementRef {
		self.with_session(id, |s| {
			s.next_element += 1;
			let element_ref = ElementRef(format!("el-{}", s.next_element));
			s.elements.entry(spec.to_string()).or_default().push(element_ref.clone());
			s.element_state.insert(element_ref.clone(), element);
			Ok(element_ref)
		})
		.expect("stub session")
	}

	/// Window handles probed by `switch_to_window`, in call order.
	pub fn switch_attempts(&self, id: &SessionId) -> Vec<WindowHandle> {
		self.with_session(id, |s| Ok(s.switch_attempts.clone())).expect("stub session")
	}

	/// Timeouts most recently applied through `set_timeouts`.
	pub fn applied_timeouts(&self, id: &SessionId) -> Option<Timeouts> {
		self.with_session(id, |s| Ok(s.timeouts)).expect("stub session")
	}

	/// Number of dialogs dismissed on this session.
	pub fn alerts_dismissed(&self, id: &SessionId) -> u32 {
		self.with_session(id, |s| Ok(s.alerts_dismissed)).expect("stub session")
	}

	/// Number of page-source captures taken on this session.
	pub fn source_fetches(&self, id: &SessionId) -> u32 {
		self.with_session(id, |s| Ok(s.source_fetches)).expect("stub session")
	}

	/// Text typed into an element so far.
	pub fn element_value(&self, id: &SessionId, element: &ElementRef) -> Option<String> {
		self.with_session(id, |s| Ok(s.element_state.get(element).map(|e| e.value.clone())))
			.expect("stub session")
	}

	/// Kind the session was created with.
	pub fn session_kind(&self, id: &SessionId) -> BrowserKind {
		self.with_session(id, |s| Ok(s.kind)).expect("stub session")
	}
}

#[async_trait]
impl Endpoint for StubEndpoint {
	async fn create_session(&self, kind: BrowserKind, _caps: &BrowserCaps) -> Result<SessionId> {
		if let Some(message) = self.fail_create.lock().take() {
			return Err(EndpointError::Construction(message));
		}
		let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
		let id = SessionId(format!("stub-{n}"));
		let window = WindowHandle(format!("w-{n}-1"));
		self.sessions.insert(
			id.0.clone(),
			Mutex::new(StubSession {
				kind,
				windows: vec![window.clone()],
				current: Some(window),
				url: "about:blank".to_string(),
				title: String::new(),
				..Default::default()
			}),
		);
		self.created.fetch_add(1, Ordering::SeqCst);
		Ok(id)
	}

	async fn quit(&self, session: &SessionId) -> Result<()> {
		self.sessions.remove(&session.0);
		Ok(())
	}

	async fn set_timeouts(&self, session: &SessionId, timeouts: &Timeouts) -> Result<()> {
		self.with_session(session, |s| {
			s.timeouts = Some(*timeouts);
			Ok(())
		})
	}

	async fn execute(&self, session: &SessionId, _cmd: Cmd) -> Result<serde_json::Value> {
		self.with_session(session, |_| Ok(serde_json::Value::Null))
	}

	async fn current_window(&self, session: &SessionId) -> Result<WindowHandle> {
		self.with_session(session, |s| {
			if let Some(fault) = s.probe_faults.pop_front() {
				return Err(fault.into_error());
			}
			match &s.current {
				Some(current) if s.windows.contains(current) => Ok(current.clone()),
				_ => Err(EndpointError::NoSuchWindow("no such window".to_string())),
			}
		})
	}

	async fn window_handles(&self, session: &SessionId) -> Result<Vec<WindowHandle>> {
		self.with_session(session, |s| Ok(s.windows.clone()))
	}

	async fn switch_to_window(&self, session: &SessionId, handle: &WindowHandle) -> Result<()> {
		self.with_session(session, |s| {
			s.switch_attempts.push(handle.clone());
			if s.windows.contains(handle) {
				s.current = Some(handle.clone());
				Ok(())
			} else {
				Err(EndpointError::NoSuchWindow(format!("no such window: {handle}")))
			}
		})
	}

	async fn close_window(&self, session: &SessionId) -> Result<()> {
		self.with_session(session, |s| {
			if let Some(current) = s.current.take() {
				s.windows.retain(|w| *w != current);
			}
			Ok(())
		})
	}

	async fn navigate(&self, session: &SessionId, url: &str) -> Result<()> {
		self.with_session(session, |s| {
			s.url = url.to_string();
			Ok(())
		})
	}

	async fn current_url(&self, session: &SessionId) -> Result<String> {
		let delay = self.with_session(session, |s| Ok(s.url_delay))?;
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		self.with_session(session, |s| Ok(s.url.clone()))
	}

	async fn title(&self, session: &SessionId) -> Result<String> {
		self.with_session(session, |s| Ok(s.title.clone()))
	}

	async fn ready_state(&self, session: &SessionId) -> Result<ReadyState> {
		self.with_session(session, |s| {
			if let Some(state) = s.ready_states.pop_front() {
				if s.ready_states.is_empty() {
					s.last_ready = Some(state);
				}
				return Ok(state);
			}
			Ok(s.last_ready.unwrap_or(ReadyState::Complete))
		})
	}

	async fn page_source(&self, session: &SessionId) -> Result<String> {
		self.with_session(session, |s| {
			s.source_fetches += 1;
			if let Some(source) = s.sources.pop_front() {
				if s.sources.is_empty() {
					s.last_source = Some(source.clone());
				}
				return Ok(source);
			}
			Ok(s.last_source.clone().unwrap_or_else(|| "<html></html>".to_string()))
		})
	}

	async fn alert_text(&self, session: &SessionId) -> Result<Option<String>> {
		self.with_session(session, |s| Ok(s.alert.clone()))
	}

	async fn dismiss_alert(&self, session: &SessionId) -> Result<bool> {
		self.with_session(session, |s| {
			let was_open = s.alert.take().is_some();
			if was_open {
				s.alerts_dismissed += 1;
			}
			Ok(was_open)
		})
	}

	async fn find_element(&self, session: &SessionId, spec: &LocatorSpec) -> Result<Option<ElementRef>> {
		self.with_session(session, |s| {
			Ok(s.elements.get(&spec.to_string()).and_then(|refs| refs.first().cloned()))
		})
	}

	async fn find_elements(&self, session: &SessionId, spec: &LocatorSpec) -> Result<Vec<ElementRef>> {
		self.with_session(session, |s| Ok(s.elements.get(&spec.to_string()).cloned().unwrap_or_default()))
	}

	async fn click(&self, session: &SessionId, element: &ElementRef) -> Result<()> {
		self.with_session(session, |s| {
			if s.element_state.contains_key(element) {
				Ok(())
			} else {
				Err(EndpointError::Protocol(format!("stale element reference: {}", element.0)))
			}
		})
	}

	async fn send_keys(&self, session: &SessionId, element: &ElementRef, text: &str) -> Result<()> {
		self.with_session(session, |s| {
			match s.element_state.get_mut(element) {
				Some(state) => {
					state.value.push_str(text);
					Ok(())
				}
				None => Err(EndpointError::Protocol(format!("stale element reference: {}", element.0))),
			}
		})
	}

	async fn clear(&self, session: &SessionId, element: &ElementRef) -> Result<()> {
		self.with_session(session, |s| {
			match s.element_state.get_mut(element) {
				Some(state) => {
					state.value.clear();
					Ok(())
				}
				None => Err(EndpointError::Protocol(format!("stale element reference: {}", element.0))),
			}
		})
	}

	async fn element_text(&self, session: &SessionId, element: &ElementRef) -> Result<String> {
		self.with_session(session, |s| {
			s.element_state
				.get(element)
				.map(|e| e.text.clone())
				.ok_or_else(|| EndpointError::Protocol(format!("stale element reference: {}", element.0)))
		})
	}

	async fn element_attr(&self, session: &SessionId, element: &ElementRef, name: &str) -> Result<Option<String>> {
		self.with_session(session, |s| {
			s.element_state
				.get(element)
				.map(|e| e.attrs.get(name).cloned())
				.ok_or_else(|| EndpointError::Protocol(format!("stale element reference: {}", element.0)))
		})
	}

	async fn screenshot(&self, session: &SessionId) -> Result<String> {
		// Base64 of the 8-byte PNG signature; enough for decode tests.
		self.with_session(session, |_| Ok("iVBORw0KGgo=".to_string()))
	}

	async fn cookies(&self, session: &SessionId) -> Result<Vec<serde_json::Value>> {
		self.with_session(session, |s| Ok(s.cookies.clone()))
	}

	async fn add_cookie(&self, session: &SessionId, cookie: serde_json::Value) -> Result<()> {
		self.with_session(session, |s| {
			s.cookies.push(cookie);
			Ok(())
		})
	}
}
