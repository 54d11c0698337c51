//! Leader election engine.
//!
//! One [`LeaderElection`] contends for one key of a [`LockService`]. The
//! engine keeps no "am I leader" flag: every leadership query is a fresh read
//! of the key, so a competitor's acquisition is visible on the very next
//! [`LeaderElection::is_leader`] call.
//!
//! ## Poll cycle
//! 1. Stop if the cancellation token has fired.
//! 2. If not leader, resolve the session named after the key and try a
//!    conditional acquire with this node's identity.
//! 3. Read the key once more and trace the current holder.
//! 4. Sleep for the poll interval.
//!
//! Nothing inside the cycle is fatal. Failed session resolution, rejected or
//! failed acquisitions and failed reads are logged and the loop moves on.
//! Cancellation is observed only at the top of a cycle, so shutdown may take
//! up to one poll interval.
//!
//! ## Hand-off
//! [`LeaderElection::cancel`] and [`LeaderElection::step_down`] are
//! independent. Cancelling does not release the key and stepping down does
//! not stop the loop, which may acquire the key again on its next cycle.
//! A clean hand-off calls both.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::constants::MIN_POLL_INTERVAL;
use crate::metrics::record_acquire;
use crate::metrics::record_step_down;
use crate::metrics::OUTCOME_ACQUIRED;
use crate::metrics::OUTCOME_ERROR;
use crate::metrics::OUTCOME_NOOP;
use crate::metrics::OUTCOME_REJECTED;
use crate::metrics::OUTCOME_RELEASED;
use crate::utils::spawn_task;
use crate::ElectionConfig;
use crate::ElectionError;
use crate::LockEntry;
use crate::LockService;
use crate::Result;

/// Holds the running flag up for as long as the loop future lives, including
/// when the task is aborted mid-cycle.
struct RunningGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunningGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

pub struct LeaderElection<C: LockService> {
    key: String,
    poll_interval: Duration,
    client: Arc<C>,
    cancel: CancellationToken,
    running: AtomicBool,
}

impl<C: LockService> LeaderElection<C> {
    /// Creates an engine for `key`. `poll_interval` is raised to
    /// [`MIN_POLL_INTERVAL`] if shorter.
    pub fn new(
        key: impl Into<String>,
        poll_interval: Duration,
        client: Arc<C>,
    ) -> Self {
        Self::with_floor(key.into(), poll_interval, MIN_POLL_INTERVAL, client)
    }

    /// Creates an engine from configuration, clamping the poll interval to
    /// the configured floor.
    pub fn from_config(
        config: &ElectionConfig,
        client: Arc<C>,
    ) -> Self {
        Self::with_floor(
            config.leader_key.clone(),
            config.poll_interval(),
            config.min_poll_interval(),
            client,
        )
    }

    fn with_floor(
        key: String,
        poll_interval: Duration,
        floor: Duration,
        client: Arc<C>,
    ) -> Self {
        Self {
            key,
            poll_interval: poll_interval.max(floor),
            client,
            cancel: CancellationToken::new(),
            running: AtomicBool::new(false),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True while [`run`](Self::run) is executing.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs the election loop until [`cancel`](Self::cancel) is observed.
    ///
    /// Returns immediately if the engine was already cancelled.
    pub async fn run(&self) {
        let _running = RunningGuard::enter(&self.running);
        let identity = self.client.agent_identity();
        info!(
            "election on {} started for {} (poll interval {:?})",
            self.key, identity, self.poll_interval
        );

        loop {
            if self.cancel.is_cancelled() {
                info!("stopping election: {}", self.key);
                break;
            }

            if !self.is_leader().await {
                self.try_acquire(&identity).await;
            }

            if let Some(entry) = self.current_leader().await {
                debug!("current leader={}, session={}", entry.value, entry.session);
            }

            sleep(self.poll_interval).await;
        }
    }

    /// Spawns [`run`](Self::run) on the current tokio runtime.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let election = self.clone();
        spawn_task(&format!("election:{}", self.key), async move { election.run().await })
    }

    async fn try_acquire(
        &self,
        identity: &str,
    ) {
        let session = match self.client.resolve_session(&self.key).await {
            Ok(session) => session,
            Err(e) => {
                warn!("resolve session {} failed: {:?}", self.key, e);
                record_acquire(&self.key, OUTCOME_ERROR);
                return;
            }
        };

        match self.client.acquire_entry(&self.key, identity, &session).await {
            Ok(true) => {
                info!("now the leader is: {}", identity);
                record_acquire(&self.key, OUTCOME_ACQUIRED);
            }
            Ok(false) => {
                debug!("{} is held by another session", self.key);
                record_acquire(&self.key, OUTCOME_REJECTED);
            }
            Err(e) => {
                warn!("acquire {} failed: {:?}", self.key, e);
                record_acquire(&self.key, OUTCOME_ERROR);
            }
        }
    }

    /// Whether this node currently holds the key.
    ///
    /// True iff the stored value equals this node's identity and the stored
    /// session equals the session resolved for the key. Any error reads as
    /// `false`.
    pub async fn is_leader(&self) -> bool {
        let entry = match self.client.read_entry(&self.key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!("leadership key is missing: {}", self.key);
                return false;
            }
            Err(e) => {
                error!("get [key={}]: {:?}", self.key, e);
                return false;
            }
        };

        // A value without a session is left over from an expired term
        if !entry.is_held() {
            return false;
        }

        match self.client.resolve_session(&self.key).await {
            Ok(session) => entry.is_held_by(&self.client.agent_identity(), &session),
            Err(e) => {
                warn!("resolve session {} failed: {:?}", self.key, e);
                false
            }
        }
    }

    /// Current holder of the key, if the key is held by any live session.
    pub async fn current_leader(&self) -> Option<LockEntry> {
        match self.client.read_entry(&self.key).await {
            Ok(entry) => entry.filter(LockEntry::is_held),
            Err(e) => {
                error!("get [key={}]: {:?}", self.key, e);
                None
            }
        }
    }

    /// Gives up the key if this node holds it.
    ///
    /// A no-op when not leader. Otherwise releases the key scoped to this
    /// node's identity and session; a failed or rejected release is returned
    /// and leadership is unchanged.
    pub async fn step_down(&self) -> Result<()> {
        if !self.is_leader().await {
            record_step_down(&self.key, OUTCOME_NOOP);
            return Ok(());
        }

        let identity = self.client.agent_identity();
        let session = self.client.resolve_session(&self.key).await.inspect_err(|e| {
            error!("resolve session {} failed: {:?}", self.key, e);
            record_step_down(&self.key, OUTCOME_ERROR);
        })?;

        match self.client.release_entry(&self.key, &identity, &session).await {
            Ok(true) => {
                info!("released leadership: {}", self.key);
                record_step_down(&self.key, OUTCOME_RELEASED);
                Ok(())
            }
            Ok(false) => {
                warn!("release of {} rejected for session {}", self.key, session);
                record_step_down(&self.key, OUTCOME_ERROR);
                Err(ElectionError::ReleaseRejected {
                    key: self.key.clone(),
                    session,
                }
                .into())
            }
            Err(e) => {
                error!("release {} failed: {:?}", self.key, e);
                record_step_down(&self.key, OUTCOME_ERROR);
                Err(e)
            }
        }
    }

    /// Signals the loop to stop at its next cycle. Does not release the key.
    pub fn cancel(&self) {
        debug!("cancel election: {}", self.key);
        self.cancel.cancel();
    }

    /// Cancels the loop and waits for the task returned by
    /// [`spawn`](Self::spawn) to finish.
    pub async fn shutdown(
        &self,
        handle: JoinHandle<()>,
    ) -> Result<()> {
        self.cancel();
        handle.await.map_err(ElectionError::TaskFailed)?;
        Ok(())
    }
}
