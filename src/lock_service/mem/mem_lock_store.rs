//! In-memory lock service.
//!
//! `MemLockStore` plays the role of the shared coordination store and hands
//! out one `MemLockClient` per node. Sessions and conditional writes follow
//! the session/KV model of Consul: a session is a liveness lease, a key is
//! held while its session lives, and invalidating a session releases every
//! key it held.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;
use tracing::info;

use crate::LockEntry;
use crate::LockService;
use crate::LockServiceError;
use crate::Result;

#[derive(Debug)]
struct StoredEntry {
    value: String,
    session: Option<String>,
}

#[derive(Debug)]
struct SessionRecord {
    name: String,
    node: String,
}

#[derive(Debug, Default)]
struct StoreState {
    entries: HashMap<String, StoredEntry>,
    // session id -> owner
    sessions: HashMap<String, SessionRecord>,
}

impl StoreState {
    fn release_held_by(
        &mut self,
        session: &str,
    ) -> usize {
        let mut released = 0;
        for entry in self.entries.values_mut() {
            if entry.session.as_deref() == Some(session) {
                entry.session = None;
                released += 1;
            }
        }
        released
    }
}

#[derive(Debug, Default)]
pub struct MemLockStore {
    state: Mutex<StoreState>,
}

impl MemLockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Returns a client acting as `node`.
    pub fn client(
        self: &Arc<Self>,
        node: impl Into<String>,
    ) -> MemLockClient {
        MemLockClient {
            node: node.into(),
            store: self.clone(),
        }
    }

    /// Drops `session` and releases every key it held, as the service does
    /// when a lease expires. Returns false if the session was unknown.
    pub fn invalidate_session(
        &self,
        session: &str,
    ) -> bool {
        let mut state = self.state.lock();
        if state.sessions.remove(session).is_none() {
            return false;
        }
        let released = state.release_held_by(session);
        info!("session {} invalidated, released {} key(s)", session, released);
        true
    }

    /// Invalidates all sessions owned by `node`. Returns how many were dropped.
    pub fn invalidate_node_sessions(
        &self,
        node: &str,
    ) -> usize {
        let mut state = self.state.lock();
        let ids: Vec<String> = state
            .sessions
            .iter()
            .filter(|(_, record)| record.node == node)
            .map(|(id, _)| id.clone())
            .collect();

        for id in &ids {
            state.sessions.remove(id);
            state.release_held_by(id);
        }
        info!("invalidated {} session(s) of node {}", ids.len(), node);
        ids.len()
    }

    /// Number of live sessions owned by `node`.
    pub fn session_count(
        &self,
        node: &str,
    ) -> usize {
        self.state.lock().sessions.values().filter(|r| r.node == node).count()
    }

    /// Reads `key` as any node would.
    pub fn entry(
        &self,
        key: &str,
    ) -> Option<LockEntry> {
        self.state.lock().entries.get(key).map(|stored| LockEntry {
            key: key.to_string(),
            value: stored.value.clone(),
            session: stored.session.clone().unwrap_or_default(),
        })
    }
}

/// Per-node view of a [`MemLockStore`].
#[derive(Debug, Clone)]
pub struct MemLockClient {
    node: String,
    store: Arc<MemLockStore>,
}

impl MemLockClient {
    pub fn store(&self) -> &Arc<MemLockStore> {
        &self.store
    }
}

#[async_trait]
impl LockService for MemLockClient {
    fn agent_identity(&self) -> String {
        self.node.clone()
    }

    async fn resolve_session(
        &self,
        name: &str,
    ) -> Result<String> {
        let mut state = self.store.state.lock();
        if let Some((id, _)) = state
            .sessions
            .iter()
            .find(|(_, record)| record.name == name && record.node == self.node)
        {
            return Ok(id.clone());
        }

        info!("no session {} found for node {}, creating...", name, self.node);
        let id = nanoid::nanoid!();
        state.sessions.insert(
            id.clone(),
            SessionRecord {
                name: name.to_string(),
                node: self.node.clone(),
            },
        );
        Ok(id)
    }

    async fn read_entry(
        &self,
        key: &str,
    ) -> Result<Option<LockEntry>> {
        Ok(self.store.entry(key))
    }

    async fn acquire_entry(
        &self,
        key: &str,
        value: &str,
        session: &str,
    ) -> Result<bool> {
        let mut state = self.store.state.lock();
        if !state.sessions.contains_key(session) {
            return Err(LockServiceError::SessionNotFound(session.to_string()).into());
        }

        let holder = state
            .entries
            .get(key)
            .and_then(|stored| stored.session.clone())
            .filter(|holder| state.sessions.contains_key(holder));

        if let Some(holder) = holder {
            if holder != session {
                debug!("acquire {} rejected: held by session {}", key, holder);
                return Ok(false);
            }
        }

        state.entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                session: Some(session.to_string()),
            },
        );
        Ok(true)
    }

    async fn release_entry(
        &self,
        key: &str,
        value: &str,
        session: &str,
    ) -> Result<bool> {
        let mut state = self.store.state.lock();
        match state.entries.get_mut(key) {
            Some(stored) if stored.session.as_deref() == Some(session) && stored.value == value => {
                stored.session = None;
                Ok(true)
            }
            _ => {
                debug!("release {} rejected: not held by session {}", key, session);
                Ok(false)
            }
        }
    }
}
