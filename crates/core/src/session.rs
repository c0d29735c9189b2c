//! Session lifecycle: creation, readiness, window recovery, teardown.
//!
//! One controller drives one profile from one logical thread. Every
//! command asks [`SessionController::ensure_ready`] for a usable session
//! first; the controller transparently repairs the failure modes a
//! long-running automated browser accumulates (closed windows, crashed
//! processes, severed transports) before the command runs.

use std::sync::Arc;

use drover_protocol::{BrowserCaps, BrowserKind, SessionId, WaitMode, WindowHandle};
use drover_runtime::{Endpoint, ErrorClass, driver};
use futures_util::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::config::ProfileConfig;
use crate::error::{Error, Result};
use crate::quiesce::{self, StabilityConfig};
use crate::window::WindowSet;

/// One live connection to a browser instance.
#[derive(Debug)]
pub struct Session {
	id: SessionId,
	kind: BrowserKind,
	caps: BrowserCaps,
	windows: WindowSet,
}

impl Session {
	pub fn id(&self) -> &SessionId {
		&self.id
	}

	pub fn kind(&self) -> BrowserKind {
		self.kind
	}

	pub fn caps(&self) -> &BrowserCaps {
		&self.caps
	}

	pub fn windows(&self) -> &WindowSet {
		&self.windows
	}
}

/// Kind-specific session construction, delegated so the controller's
/// state machine stays kind-agnostic.
pub trait SessionFactory: Send + Sync {
	fn create(&self, kind: BrowserKind) -> BoxFuture<'_, Result<SessionId>>;
}

/// Default factory: resolve the driver binary for the kind, then ask the
/// endpoint for a session.
pub struct DriverFactory {
	endpoint: Arc<dyn Endpoint>,
}

impl DriverFactory {
	pub fn new(endpoint: Arc<dyn Endpoint>) -> Self {
		Self { endpoint }
	}
}

impl SessionFactory for DriverFactory {
	fn create(&self, kind: BrowserKind) -> BoxFuture<'_, Result<SessionId>> {
		Box::pin(async move {
			if let Some(path) = driver::resolve(kind)? {
				debug!(target = "drover.session", %kind, driver = %path.display(), "driver resolved");
			}
			let caps = kind.caps();
			Ok(self.endpoint.create_session(kind, &caps).await?)
		})
	}
}

/// Factory for endpoints that need no local driver binary (cloud brokers,
/// in-memory endpoints).
pub struct DirectFactory {
	endpoint: Arc<dyn Endpoint>,
}

impl DirectFactory {
	pub fn new(endpoint: Arc<dyn Endpoint>) -> Self {
		Self { endpoint }
	}
}

impl SessionFactory for DirectFactory {
	fn create(&self, kind: BrowserKind) -> BoxFuture<'_, Result<SessionId>> {
		Box::pin(async move {
			let caps = kind.caps();
			Ok(self.endpoint.create_session(kind, &caps).await?)
		})
	}
}

/// Owns the lifecycle of one profile's browser session.
pub struct SessionController {
	profile: String,
	config: ProfileConfig,
	endpoint: Arc<dyn Endpoint>,
	factory: Arc<dyn SessionFactory>,
	session: Option<Session>,
}

impl SessionController {
	/// Creates a controller with the default driver-backed factory.
	pub fn new(profile: impl Into<String>, config: ProfileConfig, endpoint: Arc<dyn Endpoint>) -> Self {
		let factory = Arc::new(DriverFactory::new(Arc::clone(&endpoint)));
		Self::with_factory(profile, config, endpoint, factory)
	}

	/// Creates a controller with an explicit construction strategy.
	pub fn with_factory(
		profile: impl Into<String>,
		config: ProfileConfig,
		endpoint: Arc<dyn Endpoint>,
		factory: Arc<dyn SessionFactory>,
	) -> Self {
		Self {
			profile: profile.into(),
			config,
			endpoint,
			factory,
			session: None,
		}
	}

	pub fn profile(&self) -> &str {
		&self.profile
	}

	pub fn config(&self) -> &ProfileConfig {
		&self.config
	}

	/// Replaces this profile's configuration. A changed browser kind
	/// takes effect on the next [`Self::ensure_ready`], which recreates
	/// the session.
	pub fn update_config(&mut self, config: ProfileConfig) {
		self.config = config;
	}

	pub fn endpoint(&self) -> Arc<dyn Endpoint> {
		Arc::clone(&self.endpoint)
	}

	/// Live session, if one exists. Prefer [`Self::ensure_ready`].
	pub fn session(&self) -> Option<&Session> {
		self.session.as_ref()
	}

	/// Guarantees a connected session attached to a meaningful window.
	///
	/// Probes an existing session with a cheap current-window call and
	/// classifies the outcome: stale windows trigger recovery, severed
	/// transports are tolerated until the next probe, and anything else
	/// forces one recreation before a fatal
	/// [`Error::SessionUnavailable`].
	pub async fn ensure_ready(&mut self) -> Result<&Session> {
		let live_kind = self.session.as_ref().map(|s| s.kind);
		if let Some(live) = live_kind {
			if live != self.config.browser {
				info!(
					target = "drover.session",
					profile = %self.profile,
					%live,
					configured = %self.config.browser,
					"configured kind changed; recreating session"
				);
				self.teardown().await;
			}
		}

		if let Some(id) = self.session.as_ref().map(|s| s.id.clone()) {
			match self.endpoint.current_window(&id).await {
				Ok(handle) => {
					debug!(target = "drover.session", profile = %self.profile, window = %handle, "liveness probe ok");
				}
				Err(err) => match err.class() {
					ErrorClass::TransportSevered => {
						// Transient network blip; forcing a reconnect here
						// would thrash. The next probe re-evaluates.
						warn!(
							target = "drover.session",
							profile = %self.profile,
							error = %err,
							"transport severed mid-probe; keeping session"
						);
					}
					ErrorClass::StaleWindow => {
						if let Err(recovery_err) = self.recover_window().await {
							warn!(
								target = "drover.session",
								profile = %self.profile,
								error = %recovery_err,
								"window recovery failed; forcing recreation"
							);
							self.teardown().await;
						}
					}
					_ => {
						warn!(
							target = "drover.session",
							profile = %self.profile,
							error = %err,
							"liveness probe failed; forcing recreation"
						);
						self.teardown().await;
					}
				},
			}
		}

		if self.session.is_none() {
			self.create_session().await?;
		}
		self.seed_initial().await?;
		Ok(self.session.as_ref().expect("session just ensured"))
	}

	/// Recovers focus after the active window disappeared.
	///
	/// Walks the cached handles most-recently-added first; the first one
	/// that accepts focus wins and every candidate probed before it is
	/// removed. With the cache exhausted, falls back to the live handle
	/// list, picking the last entry as the most likely active window.
	/// Zero live windows is fatal: the browser has likely terminated.
	pub async fn recover_window(&mut self) -> Result<WindowHandle> {
		let session = self
			.session
			.as_mut()
			.ok_or_else(|| Error::SessionUnavailable("no live session to recover".to_string()))?;

		let candidates: Vec<WindowHandle> = session.windows.newest_first().cloned().collect();
		let mut failed = Vec::new();
		let mut winner = None;
		for handle in candidates {
			match self.endpoint.switch_to_window(&session.id, &handle).await {
				Ok(()) => {
					winner = Some(handle);
					break;
				}
				Err(err) => {
					debug!(target = "drover.session", window = %handle, error = %err, "recovery candidate refused focus");
					failed.push(handle);
				}
			}
		}
		for handle in &failed {
			session.windows.remove(handle);
		}
		if let Some(handle) = winner {
			debug!(target = "drover.session", window = %handle, "recovered from cached handle");
			return Ok(handle);
		}

		// Cache exhausted; ask the endpoint for ground truth.
		let live = self.endpoint.window_handles(&session.id).await?;
		if live.is_empty() {
			return Err(Error::BrowserGone(format!("no open windows remain for profile {}", self.profile)));
		}
		// No perfect signal exists for which window has focus; the last
		// handle in the returned collection is the heuristic choice.
		let target = live.last().cloned().expect("non-empty live list");
		for handle in &live {
			session.windows.push(handle.clone());
		}
		self.endpoint.switch_to_window(&session.id, &target).await?;
		session.windows.set_initial(target.clone());
		info!(target = "drover.session", window = %target, live = live.len(), "recovered from live handle list");
		Ok(target)
	}

	/// Adds unseen live handles to the window set and seeds the initial
	/// handle when none is recorded.
	pub async fn resync_windows(&mut self) -> Result<()> {
		let session = self
			.session
			.as_mut()
			.ok_or_else(|| Error::SessionUnavailable("no live session to resync".to_string()))?;

		let live = self.endpoint.window_handles(&session.id).await?;
		for handle in live {
			session.windows.push(handle);
		}

		if session.windows.initial().is_none() {
			match self.endpoint.current_window(&session.id).await {
				Ok(handle) => session.windows.set_initial(handle),
				Err(err) => {
					debug!(target = "drover.session", error = %err, "current-window probe failed; seeding from stored handles");
					if let Some(first) = session.windows.handles().first().cloned() {
						session.windows.set_initial(first);
					}
				}
			}
		}
		Ok(())
	}

	/// Forgets one handle without touching the live session.
	pub fn remove_window(&mut self, handle: &WindowHandle) {
		if let Some(session) = &mut self.session {
			session.windows.remove(handle);
		}
	}

	/// True when both the live count and the cached count are at most
	/// one: closing the current window should tear the session down
	/// rather than leave a windowless browser behind.
	pub async fn is_last_window(&self) -> Result<bool> {
		let session = self
			.session
			.as_ref()
			.ok_or_else(|| Error::SessionUnavailable("no live session".to_string()))?;
		let live = self.endpoint.window_handles(&session.id).await?;
		Ok(live.len() <= 1 && session.windows.len() <= 1)
	}

	/// Closes the focused window, tearing down the whole session when it
	/// was the last one. Returns `true` when the session was torn down.
	pub async fn close_current_window(&mut self) -> Result<bool> {
		if self.is_last_window().await? {
			info!(target = "drover.session", profile = %self.profile, "closing last window; tearing session down");
			self.teardown().await;
			return Ok(true);
		}

		let session = self.session.as_mut().expect("checked by is_last_window");
		let current = self.endpoint.current_window(&session.id).await?;
		self.endpoint.close_window(&session.id).await?;
		session.windows.remove(&current);
		self.recover_window().await?;
		Ok(false)
	}

	/// Waits for the current page to stop changing, using this profile's
	/// stability settings and the session's capability record.
	pub async fn settle(&self) -> Result<bool> {
		let session = self
			.session
			.as_ref()
			.ok_or_else(|| Error::SessionUnavailable("no live session to settle".to_string()))?;
		let stability = StabilityConfig::from_profile(&self.config, &session.caps);
		Ok(quiesce::wait_for_quiescence(self.endpoint.as_ref(), &session.id, &session.caps, &stability).await)
	}

	/// Quits the live session and forgets all window state. Quit errors
	/// are advisory; the session is gone either way.
	pub async fn teardown(&mut self) {
		if let Some(session) = self.session.take() {
			if let Err(err) = self.endpoint.quit(&session.id).await {
				debug!(target = "drover.session", profile = %self.profile, error = %err, "quit failed during teardown");
			}
		}
	}

	async fn create_session(&mut self) -> Result<()> {
		let kind = self.config.browser;
		let id = match self.factory.create(kind).await {
			Ok(id) => id,
			Err(err) => {
				return Err(Error::SessionUnavailable(format!("could not construct {kind} session: {err}")));
			}
		};

		let caps = kind.caps();
		// Implicit wait and explicit waits are mutually exclusive; the
		// implicit timeout is applied only when the capability allows it
		// and explicit mode was not requested.
		let mut timeouts = self.config.timeouts;
		if !(caps.implicit_wait && self.config.wait_mode == WaitMode::Implicit) {
			timeouts.implicit_wait_ms = 0;
		}
		self.endpoint.set_timeouts(&id, &timeouts).await?;

		info!(target = "drover.session", profile = %self.profile, %kind, session = %id, "session created");
		self.session = Some(Session {
			id,
			kind,
			caps,
			windows: WindowSet::new(),
		});
		Ok(())
	}

	async fn seed_initial(&mut self) -> Result<()> {
		let session = self.session.as_mut().expect("seed_initial requires a session");
		if session.windows.initial().is_none() {
			let handle = self.endpoint.current_window(&session.id).await?;
			debug!(target = "drover.session", window = %handle, "seeded initial handle");
			session.windows.set_initial(handle);
		}
		Ok(())
	}
}
