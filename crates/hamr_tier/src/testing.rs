// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! In-memory test double for exercising code that talks to a [`CacheTier`].
//!
//! [`MockTier`] stores entries in a map, keeps a log of every call it
//! receives, and can reject calls matching a failure rule, which is how the
//! orchestrator's degraded-tier paths get tested.

use std::{collections::HashMap, hash::Hash, sync::Arc};

use parking_lot::Mutex;

use crate::{CacheEntry, CacheTier, Error};

/// The kinds of call a tier receives.
///
/// Used both in the [`MockTier`] call log and in failure rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TierOpKind {
    /// A read.
    Get,
    /// A write.
    Insert,
    /// A single-key removal.
    Invalidate,
    /// A whole-tier removal.
    Clear,
}

impl TierOpKind {
    fn name(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Insert => "insert",
            Self::Invalidate => "invalidate",
            Self::Clear => "clear",
        }
    }
}

/// One recorded call against a [`MockTier`], in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierOp<K> {
    /// Which operation was called.
    pub kind: TierOpKind,
    /// The key it was called with; `None` for [`TierOpKind::Clear`].
    pub key: Option<K>,
}

type FailRule<K> = Box<dyn Fn(TierOpKind, Option<&K>) -> bool + Send + Sync>;

struct Inner<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    log: Vec<TierOp<K>>,
    fail_when: Option<FailRule<K>>,
}

impl<K, V> Inner<K, V>
where
    K: Clone,
{
    /// Logs the call, then applies the failure rule. Rejected calls are still
    /// logged so a test can assert that a failing tier was actually consulted.
    fn admit(&mut self, kind: TierOpKind, key: Option<&K>) -> Result<(), Error> {
        self.log.push(TierOp { kind, key: key.cloned() });
        if self.fail_when.as_ref().is_some_and(|rule| rule(kind, key)) {
            return Err(Error::from_message(format!("mock tier: injected {} failure", kind.name())));
        }
        Ok(())
    }
}

/// A tier backed by a plain map, with a call log and failure injection.
///
/// Clones share state, so a test can hand one handle to the code under test
/// and keep another for assertions.
///
/// # Examples
///
/// ```
/// use hamr_tier::{CacheTier, testing::{MockTier, TierOpKind}};
///
/// # async fn example() {
/// let tier = MockTier::<String, i32>::new();
/// tier.fail_when(|kind, key| kind == TierOpKind::Get && key.is_some_and(|k| k == "flaky"));
///
/// assert!(tier.get(&"flaky".to_string()).await.is_err());
/// assert!(tier.get(&"steady".to_string()).await.is_ok());
/// assert_eq!(tier.calls(TierOpKind::Get), 2);
/// # }
/// ```
pub struct MockTier<K, V> {
    inner: Arc<Mutex<Inner<K, V>>>,
}

impl<K, V> std::fmt::Debug for MockTier<K, V>
where
    K: std::fmt::Debug,
    V: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("MockTier")
            .field("entries", &inner.entries)
            .field("log", &inner.log)
            .field("fail_when", &inner.fail_when.is_some())
            .finish()
    }
}

impl<K, V> Clone for MockTier<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Default for MockTier<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MockTier<K, V> {
    /// Creates an empty tier with no failure rule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                log: Vec::new(),
                fail_when: None,
            })),
        }
    }

    /// Installs a failure rule: calls for which it returns `true` are
    /// rejected with a tier error. Replaces any previous rule.
    ///
    /// The rule sees the operation kind and, for keyed operations, the key.
    pub fn fail_when<F>(&self, rule: F)
    where
        F: Fn(TierOpKind, Option<&K>) -> bool + Send + Sync + 'static,
    {
        self.inner.lock().fail_when = Some(Box::new(rule));
    }

    /// Removes the failure rule.
    pub fn clear_failures(&self) {
        self.inner.lock().fail_when = None;
    }

    /// Returns how many entries the tier holds.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.inner.lock().entries.len()
    }
}

impl<K, V> MockTier<K, V>
where
    K: Clone,
{
    /// Returns every recorded call, oldest first.
    #[must_use]
    pub fn operations(&self) -> Vec<TierOp<K>> {
        self.inner.lock().log.clone()
    }

    /// Returns how many calls of the given kind were recorded.
    #[must_use]
    pub fn calls(&self, kind: TierOpKind) -> usize {
        self.inner.lock().log.iter().filter(|op| op.kind == kind).count()
    }

    /// Forgets all recorded calls. The stored entries are untouched.
    pub fn clear_operations(&self) {
        self.inner.lock().log.clear();
    }
}

impl<K, V> MockTier<K, V>
where
    K: Eq + Hash,
{
    /// Stores an entry directly, without logging a call or consulting the
    /// failure rule. For arranging a tier's starting contents.
    pub fn seed(&self, key: K, entry: CacheEntry<V>) {
        self.inner.lock().entries.insert(key, entry);
    }

    /// Returns `true` if the tier holds the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().entries.contains_key(key)
    }
}

impl<K, V> CacheTier<K, V> for MockTier<K, V>
where
    K: Clone + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Result<Option<CacheEntry<V>>, Error> {
        let mut inner = self.inner.lock();
        inner.admit(TierOpKind::Get, Some(key))?;
        Ok(inner.entries.get(key).cloned())
    }

    async fn insert(&self, key: &K, mut entry: CacheEntry<V>) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        inner.admit(TierOpKind::Insert, Some(key))?;
        entry.stamp();
        inner.entries.insert(key.clone(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &K) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        inner.admit(TierOpKind::Invalidate, Some(key))?;
        inner.entries.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        inner.admit(TierOpKind::Clear, None)?;
        inner.entries.clear();
        Ok(())
    }

    fn len(&self) -> Option<u64> {
        Some(self.inner.lock().entries.len() as u64)
    }
}
