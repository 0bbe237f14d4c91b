// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Coalesces duplicate async computations into a single execution.
//!
//! This crate provides [`SamFlight`], a mechanism for deduplicating concurrent
//! async work. When multiple tasks request the same computation (identified by
//! a key), only the first caller (the "leader") starts it; everyone else
//! attaches to the in-progress flight and receives a clone of its result.
//!
//! # When to Use
//!
//! Use `SamFlight` when an expensive operation may be requested concurrently
//! with the same parameters:
//!
//! - **Cache population**: prevent a thundering herd when a cache entry expires
//! - **Database queries**: coalesce identical queries issued simultaneously
//! - **API calls**: deduplicate concurrent requests to the same endpoint
//!
//! # Example
//!
//! ```
//! use samflight::SamFlight;
//!
//! # async fn example() {
//! let group: SamFlight<&str, String> = SamFlight::new();
//!
//! // Concurrent calls with the same key share a single execution.
//! let result = group.work("user:123", || async {
//!     "expensive_result".to_string()
//! }).await;
//! # }
//! ```
//!
//! # Cancellation
//!
//! The computation is spawned onto the runtime, so it runs to completion even
//! if every caller waiting on it is cancelled. A caller that abandons its wait
//! (timeout, dropped future) does not disturb the flight for anyone else, and
//! the eventual result still lands wherever the computation writes it. This is
//! the property a cache wants: population work, once started, finishes.
//!
//! # Failure
//!
//! An ordinary fallible computation should use `T = Result<V, E>`; the error
//! then reaches every attached caller, identically. [`FlightAborted`] is
//! reserved for the abnormal cases — the computation panicked or the runtime
//! shut down underneath it.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use futures::{
    FutureExt,
    future::{BoxFuture, Shared},
};
use parking_lot::Mutex;

/// The shared handle every attached caller waits on.
type FlightHandle<T> = Shared<BoxFuture<'static, Result<T, FlightAborted>>>;

type FlightMap<K, T> = Arc<Mutex<HashMap<K, FlightHandle<T>>>>;

/// The in-flight computation ended without producing a result.
///
/// Raised when the spawned computation panicked or was torn down by runtime
/// shutdown. Ordinary failures should travel inside the computation's output
/// type instead.
#[derive(Clone, Debug, thiserror::Error)]
#[error("coalesced computation aborted: {reason}")]
pub struct FlightAborted {
    reason: Arc<str>,
}

impl FlightAborted {
    fn from_join(err: tokio::task::JoinError) -> Self {
        let reason = if err.is_panic() {
            format!("leader panicked: {err}")
        } else {
            "leader task was cancelled".to_string()
        };
        Self { reason: reason.into() }
    }
}

/// Removes the in-flight entry when the computation finishes, however it
/// finishes. Held inside the spawned task so a panic still cleans up.
struct ClearOnDrop<K: Eq + Hash, T> {
    key: K,
    flights: FlightMap<K, T>,
}

impl<K: Eq + Hash, T> Drop for ClearOnDrop<K, T> {
    fn drop(&mut self) {
        self.flights.lock().remove(&self.key);
    }
}

/// Represents a class of work and creates a space in which units of work are
/// executed with duplicate suppression.
///
/// Exactly one in-flight entry exists per key at any instant; its lifetime is
/// the duration of the spawned computation.
pub struct SamFlight<K, T> {
    flights: FlightMap<K, T>,
}

impl<K, T> Default for SamFlight<K, T> {
    fn default() -> Self {
        Self { flights: Arc::default() }
    }
}

impl<K, T> std::fmt::Debug for SamFlight<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamFlight").finish_non_exhaustive()
    }
}

impl<K, T> SamFlight<K, T>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates a new `SamFlight` instance.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes `func`'s future for the given key, deduplicating against any
    /// computation already in flight for that key.
    ///
    /// The first caller becomes the leader: `func` is invoked once and the
    /// resulting future is spawned onto the runtime, so it runs to completion
    /// regardless of caller cancellation. Subsequent callers arriving before
    /// the flight lands attach to it and never invoke their own `func`.
    ///
    /// All attached callers observe the same outcome.
    ///
    /// # Errors
    ///
    /// Returns [`FlightAborted`] if the spawned computation panicked or the
    /// runtime is shutting down.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime, as the leader path spawns.
    pub fn work<F, Fut>(&self, key: K, func: F) -> impl Future<Output = Result<T, FlightAborted>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut flights = self.flights.lock();
        if let Some(handle) = flights.get(&key) {
            // Attach to the flight already in progress.
            return handle.clone();
        }

        // Leader: func runs exactly once per flight. The guard lives inside
        // the spawned task so the entry is cleared even on panic.
        let fut = func();
        let guard = ClearOnDrop {
            key: key.clone(),
            flights: Arc::clone(&self.flights),
        };
        let task = tokio::spawn(async move {
            let _guard = guard;
            fut.await
        });

        let handle: FlightHandle<T> = async move { task.await.map_err(FlightAborted::from_join) }.boxed().shared();
        flights.insert(key, handle.clone());
        handle
    }

    /// Returns the number of computations currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.flights.lock().len()
    }
}
