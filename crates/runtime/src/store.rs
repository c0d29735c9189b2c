//! Concurrent session registry keyed by profile name.
//!
//! Each logical profile drives at most one live session; profiles run in
//! parallel with no shared mutable state beyond this registry. Uses
//! [`DashMap`] so parallel profile threads never contend on one lock.

use dashmap::DashMap;
use drover_protocol::SessionId;

/// Process-wide map of profile name to live session id.
#[derive(Default)]
pub struct SessionStore {
	sessions: DashMap<String, SessionId>,
}

impl SessionStore {
	pub fn new() -> Self {
		Self {
			sessions: DashMap::new(),
		}
	}

	/// Records the live session for a profile, returning the previous one
	/// if a session was already registered.
	pub fn insert(&self, profile: &str, session: SessionId) -> Option<SessionId> {
		self.sessions.insert(profile.to_string(), session)
	}

	/// Live session for a profile, if any.
	pub fn get(&self, profile: &str) -> Option<SessionId> {
		self.sessions.get(profile).map(|entry| entry.value().clone())
	}

	/// Removes and returns the live session for a profile.
	pub fn remove(&self, profile: &str) -> Option<SessionId> {
		self.sessions.remove(profile).map(|(_, session)| session)
	}

	/// Number of profiles with a live session.
	pub fn len(&self) -> usize {
		self.sessions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sessions.is_empty()
	}

	/// Drains every registered session, for process shutdown.
	pub fn drain(&self) -> Vec<(String, SessionId)> {
		let profiles: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
		profiles
			.into_iter()
			.filter_map(|profile| self.sessions.remove(&profile))
			.collect()
	}
}
