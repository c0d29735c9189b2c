//! Browser session controller.
//!
//! Guarantees that callers always get a session that is connected and
//! attached to a meaningful window, and that state-changing actions can
//! wait for the page to stop moving before the next step runs. The four
//! pieces, leaf-first:
//!
//! - [`locator`]: pure translation of symbolic locator strings into
//!   typed search strategies.
//! - [`window`]: the insertion-ordered, duplicate-free set of known
//!   window handles plus the designated initial handle.
//! - [`quiesce`]: layered page-stability detection with a ready-state
//!   fast path, a content-signature strict path, and deadline fallback.
//! - [`session`]: session lifecycle, from creation and liveness probing
//!   through window recovery, teardown, and re-creation.
//!
//! The remote automation endpoint itself is a collaborator behind
//! [`drover_runtime::Endpoint`]; this crate owns no wire protocol.

pub mod capture;
pub mod config;
pub mod error;
pub mod locator;
pub mod quiesce;
pub mod session;
pub mod waits;
pub mod window;

pub use config::ProfileConfig;
pub use error::{Error, Result};
pub use locator::{parse, parse_relative};
pub use quiesce::{StabilityConfig, wait_for_quiescence};
pub use session::{DirectFactory, DriverFactory, Session, SessionController, SessionFactory};
pub use window::WindowSet;

pub use drover_protocol::{BrowserCaps, BrowserKind, LocatorSpec, SessionId, Strategy, WindowHandle};
