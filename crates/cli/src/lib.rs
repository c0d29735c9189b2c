//! Scripted browser test runner.
//!
//! Every command is a thin flow over the session core: ensure a ready
//! session, resolve the locator, act through the endpoint, wait for the
//! page to settle, report pass/fail. All state-machine complexity lives
//! in `drover`; this crate owns argument parsing, profile loading, and
//! step reporting only.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod profile;
pub mod report;
pub mod runner;
pub mod script;
