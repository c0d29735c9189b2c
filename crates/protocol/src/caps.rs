//! Browser kinds and their capability records.
//!
//! Kind-specific behavior in the core is driven entirely by the
//! [`BrowserCaps`] record returned from [`BrowserKind::caps`]; the state
//! machine itself never branches on the kind directly.

use serde::{Deserialize, Serialize};

/// Browser engine targeted by a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrowserKind {
	/// Google Chrome / Chromium.
	#[default]
	Chrome,
	/// Chrome in headless mode.
	ChromeHeadless,
	/// Mozilla Firefox.
	Firefox,
	/// Firefox in headless mode.
	FirefoxHeadless,
	/// Microsoft Edge.
	Edge,
	/// Internet Explorer.
	Ie,
	/// Apple Safari.
	Safari,
	/// Chrome brokered by a cloud testing provider.
	CloudChrome,
	/// Firefox brokered by a cloud testing provider.
	CloudFirefox,
	/// Edge brokered by a cloud testing provider.
	CloudEdge,
}

/// Per-kind capability flags consumed by the session controller and the
/// quiescence detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserCaps {
	/// Whether the endpoint honors implicit-wait timeout tuning.
	pub implicit_wait: bool,
	/// Whether page-source capture is available for content signatures.
	pub page_source: bool,
	/// Whether the kind runs without a visible window.
	pub headless: bool,
	/// Whether window/tab focus switching is supported.
	pub window_switch: bool,
}

impl BrowserKind {
	/// Capability record for this kind.
	pub fn caps(self) -> BrowserCaps {
		match self {
			BrowserKind::Chrome | BrowserKind::Edge => BrowserCaps {
				implicit_wait: true,
				page_source: true,
				headless: false,
				window_switch: true,
			},
			BrowserKind::ChromeHeadless | BrowserKind::FirefoxHeadless => BrowserCaps {
				implicit_wait: false,
				page_source: true,
				headless: true,
				window_switch: true,
			},
			BrowserKind::Firefox => BrowserCaps {
				implicit_wait: true,
				page_source: true,
				headless: false,
				window_switch: true,
			},
			// IE's source serialization is too lossy to compare between polls.
			BrowserKind::Ie => BrowserCaps {
				implicit_wait: true,
				page_source: false,
				headless: false,
				window_switch: true,
			},
			BrowserKind::Safari => BrowserCaps {
				implicit_wait: true,
				page_source: true,
				headless: false,
				window_switch: false,
			},
			BrowserKind::CloudChrome | BrowserKind::CloudFirefox | BrowserKind::CloudEdge => BrowserCaps {
				implicit_wait: false,
				page_source: true,
				headless: false,
				window_switch: true,
			},
		}
	}

	/// Whether sessions of this kind are brokered by a cloud provider.
	pub fn is_cloud(self) -> bool {
		matches!(self, BrowserKind::CloudChrome | BrowserKind::CloudFirefox | BrowserKind::CloudEdge)
	}

	/// All kinds, in declaration order.
	pub fn all() -> &'static [BrowserKind] {
		&[
			BrowserKind::Chrome,
			BrowserKind::ChromeHeadless,
			BrowserKind::Firefox,
			BrowserKind::FirefoxHeadless,
			BrowserKind::Edge,
			BrowserKind::Ie,
			BrowserKind::Safari,
			BrowserKind::CloudChrome,
			BrowserKind::CloudFirefox,
			BrowserKind::CloudEdge,
		]
	}
}

impl std::fmt::Display for BrowserKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			BrowserKind::Chrome => "chrome",
			BrowserKind::ChromeHeadless => "chrome-headless",
			BrowserKind::Firefox => "firefox",
			BrowserKind::FirefoxHeadless => "firefox-headless",
			BrowserKind::Edge => "edge",
			BrowserKind::Ie => "ie",
			BrowserKind::Safari => "safari",
			BrowserKind::CloudChrome => "cloud-chrome",
			BrowserKind::CloudFirefox => "cloud-firefox",
			BrowserKind::CloudEdge => "cloud-edge",
		};
		write!(f, "{name}")
	}
}

impl std::str::FromStr for BrowserKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"chrome" | "chromium" => Ok(BrowserKind::Chrome),
			"chrome-headless" => Ok(BrowserKind::ChromeHeadless),
			"firefox" => Ok(BrowserKind::Firefox),
			"firefox-headless" => Ok(BrowserKind::FirefoxHeadless),
			"edge" => Ok(BrowserKind::Edge),
			"ie" => Ok(BrowserKind::Ie),
			"safari" => Ok(BrowserKind::Safari),
			"cloud-chrome" => Ok(BrowserKind::CloudChrome),
			"cloud-firefox" => Ok(BrowserKind::CloudFirefox),
			"cloud-edge" => Ok(BrowserKind::CloudEdge),
			other => Err(format!("unknown browser kind: {other}")),
		}
	}
}
