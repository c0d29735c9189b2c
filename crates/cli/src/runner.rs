//! Step execution over the session core.
//!
//! Every step follows the same shape: ensure a ready session for the
//! step's profile, resolve the locator, act through the endpoint, wait
//! for the page to settle, record pass/fail. Assertion and lookup
//! failures become failed steps and the run continues; endpoint faults
//! and locator syntax errors abort the run.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use drover::{ProfileConfig, SessionController, SessionFactory, capture, waits};
use drover_protocol::{ElementRef, LocatorSpec, SessionId, WaitMode};
use drover_runtime::{Endpoint, SessionStore};
use tracing::info;

use crate::error::Result;
use crate::report::{RunReport, StepReport};
use crate::script::{Script, Step};

/// Drives script steps across one or more profiles.
pub struct Runner {
	endpoint: Arc<dyn Endpoint>,
	factory: Arc<dyn SessionFactory>,
	store: SessionStore,
	base_config: ProfileConfig,
	default_profile: String,
	controllers: HashMap<String, SessionController>,
}

/// Element lookup either finds a target or names why the step failed.
enum Located {
	Found(SessionId, ElementRef),
	Missing(String),
}

impl Runner {
	pub fn new(
		endpoint: Arc<dyn Endpoint>,
		factory: Arc<dyn SessionFactory>,
		default_profile: impl Into<String>,
		base_config: ProfileConfig,
	) -> Self {
		Self {
			endpoint,
			factory,
			store: SessionStore::new(),
			base_config,
			default_profile: default_profile.into(),
			controllers: HashMap::new(),
		}
	}

	/// Sessions currently registered, by profile.
	pub fn store(&self) -> &SessionStore {
		&self.store
	}

	/// Executes every step in order. A failed assertion marks its step
	/// and the run continues; a harness fault aborts.
	pub async fn run(&mut self, script: &Script) -> Result<RunReport> {
		script.validate()?;
		let mut report = RunReport::new(script.name.clone());
		for (index, step) in script.steps.iter().enumerate() {
			info!(target = "drover.run", step = index + 1, label = %step.label(), "executing");
			report.push(self.run_step(index, step).await?);
		}
		Ok(report)
	}

	/// Tears down every profile's session.
	pub async fn shutdown(&mut self) {
		for (profile, controller) in &mut self.controllers {
			info!(target = "drover.run", %profile, "tearing down session");
			controller.teardown().await;
		}
		self.store.drain();
	}

	async fn run_step(&mut self, index: usize, step: &Step) -> Result<StepReport> {
		let profile = step.profile().unwrap_or(&self.default_profile).to_string();
		self.ensure_controller(&profile);
		let label = step.label();

		let controller = self.controllers.get_mut(&profile).expect("controller just ensured");
		let session_id = controller.ensure_ready().await?.id().clone();
		self.store.insert(&profile, session_id.clone());
		let endpoint = Arc::clone(&self.endpoint);
		let config = controller.config().clone();

		let report = match step {
			Step::Open { url, .. } => {
				endpoint.navigate(&session_id, url).await.map_err(drover::Error::from)?;
				if controller.settle().await? {
					StepReport::pass(index, label)
				} else {
					StepReport::fail(index, label, "page did not settle")
				}
			}
			Step::Click { locator, .. } => match locate(endpoint.as_ref(), &session_id, locator, &config).await? {
				Located::Found(session, element) => {
					endpoint.click(&session, &element).await.map_err(drover::Error::from)?;
					if controller.settle().await? {
						StepReport::pass(index, label)
					} else {
						StepReport::fail(index, label, "page did not settle after click")
					}
				}
				Located::Missing(detail) => StepReport::fail(index, label, detail),
			},
			Step::Type { locator, text, .. } => match locate(endpoint.as_ref(), &session_id, locator, &config).await? {
				Located::Found(session, element) => {
					endpoint.clear(&session, &element).await.map_err(drover::Error::from)?;
					endpoint.send_keys(&session, &element, text).await.map_err(drover::Error::from)?;
					StepReport::pass(index, label)
				}
				Located::Missing(detail) => StepReport::fail(index, label, detail),
			},
			Step::AssertText { locator, expected, .. } => match locate(endpoint.as_ref(), &session_id, locator, &config).await? {
				Located::Found(session, element) => {
					let actual = endpoint.element_text(&session, &element).await.map_err(drover::Error::from)?;
					if actual == *expected {
						StepReport::pass(index, label)
					} else {
						StepReport::fail(index, label, format!("expected {expected:?}, got {actual:?}"))
					}
				}
				Located::Missing(detail) => StepReport::fail(index, label, detail),
			},
			Step::AssertAttr {
				locator, name, expected, ..
			} => match locate(endpoint.as_ref(), &session_id, locator, &config).await? {
				Located::Found(session, element) => {
					match endpoint.element_attr(&session, &element, name).await.map_err(drover::Error::from)? {
						Some(actual) if actual == *expected => StepReport::pass(index, label),
						Some(actual) => StepReport::fail(index, label, format!("expected {expected:?}, got {actual:?}")),
						None => StepReport::fail(index, label, format!("attribute {name:?} is absent")),
					}
				}
				Located::Missing(detail) => StepReport::fail(index, label, detail),
			},
			Step::Screenshot { path, .. } => {
				let bytes = capture::screenshot_to_file(endpoint.as_ref(), &session_id, Path::new(path)).await?;
				StepReport::pass_with(index, label, format!("{} bytes", bytes.len()))
			}
			Step::SaveCookies { path, .. } => {
				let cookies = endpoint.cookies(&session_id).await.map_err(drover::Error::from)?;
				std::fs::write(path, serde_json::to_string_pretty(&cookies)?)?;
				StepReport::pass_with(index, label, format!("{} cookies", cookies.len()))
			}
			Step::CloseWindow { .. } => {
				let torn_down = controller.close_current_window().await?;
				if torn_down {
					self.store.remove(&profile);
					StepReport::pass_with(index, label, "last window; session closed")
				} else {
					StepReport::pass_with(index, label, "window closed")
				}
			}
			Step::Windows { .. } => {
				controller.resync_windows().await?;
				let session = controller.session().expect("session ensured above");
				let handles: Vec<String> = session.windows().handles().iter().map(|h| h.to_string()).collect();
				StepReport::pass_with(index, label, handles.join(", "))
			}
			Step::Wait { ms, .. } => {
				tokio::time::sleep(Duration::from_millis(*ms)).await;
				StepReport::pass(index, label)
			}
		};
		Ok(report)
	}

	fn ensure_controller(&mut self, profile: &str) {
		if !self.controllers.contains_key(profile) {
			let controller = SessionController::with_factory(
				profile.to_string(),
				self.base_config.clone(),
				Arc::clone(&self.endpoint),
				Arc::clone(&self.factory),
			);
			self.controllers.insert(profile.to_string(), controller);
		}
	}
}

/// Resolves a symbolic locator and looks the element up. In explicit
/// wait mode the lookup polls with a bounded deadline; otherwise a single
/// find relies on the endpoint's implicit wait.
async fn locate(endpoint: &dyn Endpoint, session: &SessionId, locator: &str, config: &ProfileConfig) -> Result<Located> {
	let spec: LocatorSpec = drover::parse(locator)?;
	let found = match config.wait_mode {
		WaitMode::Explicit => waits::wait_for_element(endpoint, session, &spec, &config.timeouts).await?,
		WaitMode::Implicit => endpoint.find_element(session, &spec).await.map_err(drover::Error::from)?,
	};
	match found {
		Some(element) => Ok(Located::Found(session.clone(), element)),
		None => Ok(Located::Missing(format!("no element matches {spec}"))),
	}
}
