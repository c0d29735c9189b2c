//! Opaque handles and element-search strategies.

use serde::{Deserialize, Serialize};

/// Identifier of one live browser session, owned by the endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<&str> for SessionId {
	fn from(s: &str) -> Self {
		SessionId(s.to_string())
	}
}

/// Opaque identifier of one window/tab within a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub String);

impl std::fmt::Display for WindowHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<&str> for WindowHandle {
	fn from(s: &str) -> Self {
		WindowHandle(s.to_string())
	}
}

/// Endpoint-owned reference to a located element.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementRef(pub String);

/// Document readiness as reported by the endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
	Loading,
	Interactive,
	Complete,
}

impl ReadyState {
	/// True once the document has finished loading.
	pub fn is_complete(self) -> bool {
		matches!(self, ReadyState::Complete)
	}
}

/// Element-search strategy selected by locator parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Strategy {
	Id,
	Class,
	Name,
	Css,
	LinkText,
	PartialLinkText,
	XPath,
	Tag,
}

impl Strategy {
	/// Wire name of this strategy.
	pub fn as_str(self) -> &'static str {
		match self {
			Strategy::Id => "id",
			Strategy::Class => "class",
			Strategy::Name => "name",
			Strategy::Css => "css",
			Strategy::LinkText => "linkText",
			Strategy::PartialLinkText => "partialLinkText",
			Strategy::XPath => "xpath",
			Strategy::Tag => "tag",
		}
	}
}

/// A resolved locator: exactly one strategy plus its argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorSpec {
	pub strategy: Strategy,
	pub argument: String,
}

impl LocatorSpec {
	pub fn new(strategy: Strategy, argument: impl Into<String>) -> Self {
		Self {
			strategy,
			argument: argument.into(),
		}
	}
}

impl std::fmt::Display for LocatorSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}={}", self.strategy.as_str(), self.argument)
	}
}

/// Generic named command for the endpoint's escape-hatch `execute` call.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cmd {
	pub name: String,
	#[serde(default)]
	pub params: serde_json::Value,
}

impl Cmd {
	pub fn new(name: impl Into<String>, params: serde_json::Value) -> Self {
		Self {
			name: name.into(),
			params,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn handles_serialize_transparently() {
		let handle = WindowHandle::from("w-42");
		assert_eq!(serde_json::to_string(&handle).unwrap(), "\"w-42\"");
	}

	#[test]
	fn ready_state_deserializes_lowercase() {
		let state: ReadyState = serde_json::from_str("\"complete\"").unwrap();
		assert!(state.is_complete());
		let state: ReadyState = serde_json::from_str("\"interactive\"").unwrap();
		assert!(!state.is_complete());
	}

	#[test]
	fn locator_spec_display_matches_symbolic_form() {
		let spec = LocatorSpec::new(Strategy::Css, "#login");
		assert_eq!(spec.to_string(), "css=#login");
	}

	#[test]
	fn cmd_defaults_params_to_null() {
		let cmd: Cmd = serde_json::from_str(r#"{"name": "refresh"}"#).unwrap();
		assert_eq!(cmd.name, "refresh");
		assert!(cmd.params.is_null());
	}
}
