//! Capability interface to the external, session-aware lock service.
//!
//! The election engine never talks to a concrete coordination store. It only
//! needs the operations of [`LockService`], which keeps the engine testable
//! against the in-memory adaptor or a mock.

mod mem;
pub use mem::*;


///--------------------------------------
/// Trait Definition
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::Result;

/// `(key, value, session)` tuple stored under an election key.
///
/// An entry with a non-empty `session` is owned by the node whose identity is
/// in `value` for as long as that session stays valid. An empty session marks
/// an unowned, stale entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEntry {
    pub key: String,
    pub value: String,
    pub session: String,
}

impl LockEntry {
    pub fn is_held(&self) -> bool {
        !self.session.is_empty()
    }

    /// True when the entry is held and both `value` and `session` match.
    pub fn is_held_by(
        &self,
        value: &str,
        session: &str,
    ) -> bool {
        self.is_held() && self.value == value && self.session == session
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LockService: Send + Sync + 'static {
    /// Identity of the local node. Stable for the life of the process.
    fn agent_identity(&self) -> String;

    /// Returns the session named `name` owned by this node, creating it when
    /// none exists. Repeated calls with the same name return the same session.
    async fn resolve_session(
        &self,
        name: &str,
    ) -> Result<String>;

    /// Reads the entry stored under `key`. `Ok(None)` when the key is absent.
    async fn read_entry(
        &self,
        key: &str,
    ) -> Result<Option<LockEntry>>;

    /// Writes `value` under `key` bound to `session` if the key is unheld or
    /// held by an invalid session.
    ///
    /// Returns `Ok(false)` when a live competing session holds the key.
    async fn acquire_entry(
        &self,
        key: &str,
        value: &str,
        session: &str,
    ) -> Result<bool>;

    /// Clears the session of `key` if it is currently held by `session`
    /// with `value`.
    async fn release_entry(
        &self,
        key: &str,
        value: &str,
        session: &str,
    ) -> Result<bool>;
}
