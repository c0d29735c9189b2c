//! End-to-end step flows against the in-memory endpoint.

use std::collections::HashMap;
use std::sync::Arc;

use drover::{DirectFactory, ProfileConfig};
use drover_cli::error::CliError;
use drover_cli::runner::Runner;
use drover_cli::script::{Script, Step};
use drover_protocol::LocatorSpec;
use drover_runtime::stub::{StubElement, StubEndpoint};
use drover_runtime::{Endpoint, SessionStore};
use tempfile::TempDir;

fn spec(locator: &str) -> LocatorSpec {
	drover::parse(locator).unwrap()
}

fn runner_with_stub() -> (Arc<StubEndpoint>, Runner) {
	let stub = Arc::new(StubEndpoint::new());
	let endpoint: Arc<dyn Endpoint> = Arc::clone(&stub) as Arc<dyn Endpoint>;
	let factory = Arc::new(DirectFactory::new(Arc::clone(&endpoint)));
	let runner = Runner::new(endpoint, factory, "default", ProfileConfig::default());
	(stub, runner)
}

fn open_step(url: &str) -> Script {
	Script::single(Step::Open {
		url: url.to_string(),
		profile: None,
	})
}

#[tokio::test]
async fn full_script_flow_passes_every_step() {
	let (stub, mut runner) = runner_with_stub();
	let dir = TempDir::new().unwrap();

	// First step creates the session; seed elements into it afterwards.
	let report = runner.run(&open_step("https://app.test/login")).await.unwrap();
	assert!(report.passed());

	let id = runner.store().get("default").unwrap();
	stub.insert_element(&id, &spec("css=#go"), StubElement::default());
	let input = stub.insert_element(&id, &spec("name=q"), StubElement::default());
	stub.insert_element(
		&id,
		&spec("id=msg"),
		StubElement {
			text: "Welcome".to_string(),
			attrs: HashMap::from([("class".to_string(), "ok".to_string())]),
			..Default::default()
		},
	);

	let shot = dir.path().join("shot.png").display().to_string();
	let cookies = dir.path().join("cookies.json").display().to_string();
	let script: Script = serde_json::from_str(&format!(
		r#"{{
			"name": "login smoke",
			"steps": [
				{{"action": "click", "locator": "css=#go"}},
				{{"action": "type", "locator": "name=q", "text": "standard"}},
				{{"action": "assertText", "locator": "id=msg", "expected": "Welcome"}},
				{{"action": "assertAttr", "locator": "id=msg", "name": "class", "expected": "ok"}},
				{{"action": "screenshot", "path": {shot:?}}},
				{{"action": "saveCookies", "path": {cookies:?}}},
				{{"action": "windows"}},
				{{"action": "closeWindow"}}
			]
		}}"#
	))
	.unwrap();

	let report = runner.run(&script).await.unwrap();
	assert!(report.passed(), "failed steps: {:?}", report.steps);
	assert_eq!(stub.element_value(&id, &input), Some("standard".to_string()));
	assert!(dir.path().join("shot.png").exists());
	assert!(dir.path().join("cookies.json").exists());
	// Closing the last window tore the session down and unregistered it.
	assert!(runner.store().get("default").is_none());

	runner.shutdown().await;
}

#[tokio::test]
async fn failed_assertion_marks_step_and_continues() {
	let (stub, mut runner) = runner_with_stub();

	runner.run(&open_step("https://app.test")).await.unwrap();
	let id = runner.store().get("default").unwrap();
	stub.insert_element(
		&id,
		&spec("id=msg"),
		StubElement {
			text: "Goodbye".to_string(),
			..Default::default()
		},
	);

	let script: Script = serde_json::from_str(
		r#"{"steps": [
			{"action": "assertText", "locator": "id=msg", "expected": "Welcome"},
			{"action": "wait", "ms": 1}
		]}"#,
	)
	.unwrap();

	let report = runner.run(&script).await.unwrap();
	assert!(!report.passed());
	assert!(!report.steps[0].passed);
	assert!(report.steps[0].detail.as_deref().unwrap().contains("Goodbye"));
	assert!(report.steps[1].passed);
	runner.shutdown().await;
}

#[tokio::test]
async fn missing_element_fails_the_step_without_aborting() {
	let (_stub, mut runner) = runner_with_stub();

	let script: Script = serde_json::from_str(
		r#"{"steps": [
			{"action": "click", "locator": "css=#nope"},
			{"action": "wait", "ms": 1}
		]}"#,
	)
	.unwrap();

	let report = runner.run(&script).await.unwrap();
	assert!(!report.steps[0].passed);
	assert!(report.steps[0].detail.as_deref().unwrap().contains("no element matches"));
	assert!(report.steps[1].passed);
	runner.shutdown().await;
}

#[tokio::test]
async fn blank_locator_aborts_the_run() {
	let (_stub, mut runner) = runner_with_stub();

	let script = Script::single(Step::Click {
		locator: String::new(),
		profile: None,
	});
	let err = runner.run(&script).await.unwrap_err();
	assert!(matches!(err, CliError::Core(drover::Error::LocatorSyntax(_))), "got: {err}");
	runner.shutdown().await;
}

#[tokio::test]
async fn explicit_wait_polls_for_late_elements() {
	let stub = Arc::new(StubEndpoint::new());
	let endpoint: Arc<dyn Endpoint> = Arc::clone(&stub) as Arc<dyn Endpoint>;
	let factory = Arc::new(DirectFactory::new(Arc::clone(&endpoint)));
	let config = ProfileConfig {
		wait_mode: drover_protocol::WaitMode::Explicit,
		timeouts: drover_protocol::Timeouts {
			implicit_wait_ms: 500,
			poll_interval_ms: 5,
			..Default::default()
		},
		..Default::default()
	};
	let mut runner = Runner::new(endpoint, factory, "default", config);

	runner.run(&open_step("https://app.test")).await.unwrap();
	let id = runner.store().get("default").unwrap();

	// The element shows up only after the click step has started polling.
	let late_stub = Arc::clone(&stub);
	let late_id = id.clone();
	tokio::spawn(async move {
		tokio::time::sleep(std::time::Duration::from_millis(20)).await;
		late_stub.insert_element(&late_id, &spec("css=#late"), StubElement::default());
	});

	let script: Script = serde_json::from_str(r#"{"steps": [{"action": "click", "locator": "css=#late"}]}"#).unwrap();
	let report = runner.run(&script).await.unwrap();
	assert!(report.passed(), "failed steps: {:?}", report.steps);
	runner.shutdown().await;
}

#[tokio::test]
async fn profiles_drive_independent_sessions() {
	let (stub, mut runner) = runner_with_stub();

	let script: Script = serde_json::from_str(
		r#"{"steps": [
			{"action": "open", "url": "https://a.test", "profile": "first"},
			{"action": "open", "url": "https://b.test", "profile": "second"}
		]}"#,
	)
	.unwrap();

	let report = runner.run(&script).await.unwrap();
	assert!(report.passed());
	assert_eq!(stub.created_count(), 2);

	let store: &SessionStore = runner.store();
	let first = store.get("first").unwrap();
	let second = store.get("second").unwrap();
	assert_ne!(first, second);

	runner.shutdown().await;
	assert!(runner.store().is_empty());
}
