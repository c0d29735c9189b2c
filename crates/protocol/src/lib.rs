//! Wire-level types shared between the drover core and the automation
//! endpoint: browser kinds and their capability records, opaque handles,
//! locator strategies, and timeout settings.
//!
//! This crate is serialization-only; it performs no I/O and owns no
//! behavior beyond small total functions over its own enums.

pub mod caps;
pub mod options;
pub mod types;

pub use caps::{BrowserCaps, BrowserKind};
pub use options::{Timeouts, WaitMode};
pub use types::{Cmd, ElementRef, LocatorSpec, ReadyState, SessionId, Strategy, WindowHandle};
