//! Ordered set of known window handles.
//!
//! Insertion-ordered with duplicates suppressed, plus the designated
//! "initial" handle. Invariant: a non-null initial handle is always a
//! member of the collection. Only the session controller mutates this
//! set; the snapshot is rebuilt (not incrementally trusted) whenever it
//! may be stale.

use drover_protocol::WindowHandle;

/// Insertion-ordered, duplicate-free collection of window handles.
#[derive(Clone, Debug, Default)]
pub struct WindowSet {
	handles: Vec<WindowHandle>,
	initial: Option<WindowHandle>,
}

impl WindowSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a handle if unseen, preserving insertion order.
	pub fn push(&mut self, handle: WindowHandle) {
		if !self.handles.contains(&handle) {
			self.handles.push(handle);
		}
	}

	/// Removes one handle. Removing the initial handle clears that
	/// designation, forcing the next resync to pick a new one.
	pub fn remove(&mut self, handle: &WindowHandle) {
		self.handles.retain(|h| h != handle);
		if self.initial.as_ref() == Some(handle) {
			self.initial = None;
		}
	}

	/// Drops every handle and the initial designation.
	pub fn clear(&mut self) {
		self.handles.clear();
		self.initial = None;
	}

	/// Marks a handle as the initial one, inserting it if unseen.
	pub fn set_initial(&mut self, handle: WindowHandle) {
		self.push(handle.clone());
		self.initial = Some(handle);
	}

	pub fn initial(&self) -> Option<&WindowHandle> {
		self.initial.as_ref()
	}

	pub fn contains(&self, handle: &WindowHandle) -> bool {
		self.handles.contains(handle)
	}

	/// Handles in insertion order.
	pub fn handles(&self) -> &[WindowHandle] {
		&self.handles
	}

	/// Handles most-recently-added first: the documented, deterministic
	/// order of the recovery walk.
	pub fn newest_first(&self) -> impl Iterator<Item = &WindowHandle> {
		self.handles.iter().rev()
	}

	pub fn len(&self) -> usize {
		self.handles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handles.is_empty()
	}
}
