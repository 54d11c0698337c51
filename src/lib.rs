//! Cooperative leader election over a session-aware lock service.
//!
//! A set of independent nodes contend for one key in an external key-value
//! store that supports sessions (liveness leases) and conditional
//! acquire/release. The node whose identity is stored under the key, bound to
//! its live session, is the leader.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use d_election::{LeaderElection, MemLockStore};
//!
//! let store = MemLockStore::new();
//! let election = Arc::new(LeaderElection::new(
//!     "service/leader-election/leader",
//!     Duration::from_secs(2),
//!     Arc::new(store.client("node-a")),
//! ));
//!
//! let handle = election.spawn();
//! if election.is_leader().await {
//!     // do leader work
//! }
//!
//! election.step_down().await?;
//! election.shutdown(handle).await?;
//! ```

mod config;
mod election;
mod errors;
mod lock_service;
mod metrics;
mod utils;

pub mod constants;

pub use config::*;
pub use election::*;
pub use errors::*;
pub use lock_service::*;
pub use metrics::*;
