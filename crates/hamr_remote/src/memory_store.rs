// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! An in-process [`BlobStore`] for tests and examples.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{
            AtomicBool, AtomicU64,
            Ordering::{AcqRel, Acquire, Release},
        },
    },
    time::{Duration, Instant},
};

use bytes::Bytes;
use hamr_tier::{Error, Result};
use parking_lot::Mutex;

use crate::BlobStore;

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Bytes,
    expires_at: Option<Instant>,
}

#[derive(Debug, Default)]
struct Inner {
    blobs: Mutex<HashMap<String, StoredBlob>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicU64,
    writes: AtomicU64,
}

/// A [`BlobStore`] backed by a process-local hash map.
///
/// Stands in for the real shared store in tests, examples, and single-process
/// deployments. TTLs are honored by deadline; expired blobs read as absent.
/// Cloning is cheap and clones share the same storage, so a "remote" store can
/// be handed to several caches at once.
///
/// Failure injection (`fail_reads`, `fail_writes`) and operation counters make
/// degraded-backend behavior testable.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    inner: Arc<Inner>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent read fail, or restores them.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Release);
    }

    /// Makes every subsequent write (put, delete, clear) fail, or restores
    /// them.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Release);
    }

    /// Returns how many reads have been attempted, including failed ones.
    #[must_use]
    pub fn read_count(&self) -> u64 {
        self.inner.reads.load(Acquire)
    }

    /// Returns how many puts have been attempted, including failed ones.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Acquire)
    }

    /// Returns the number of blobs currently held, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.blobs.lock().len()
    }

    /// Returns `true` if the store holds no blobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.blobs.lock().is_empty()
    }

    /// Plants a raw blob without expiry, bypassing failure injection.
    ///
    /// Lets tests stage arbitrary bytes, such as an envelope written by an
    /// older shape version or a corrupted payload.
    pub fn put_raw(&self, key: impl Into<String>, blob: Bytes) {
        self.inner.blobs.lock().insert(
            key.into(),
            StoredBlob {
                bytes: blob,
                expires_at: None,
            },
        );
    }

    /// Returns the raw stored bytes for `key`, ignoring expiry and failure
    /// injection.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<Bytes> {
        self.inner.blobs.lock().get(key).map(|stored| stored.bytes.clone())
    }
}

impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.inner.reads.fetch_add(1, AcqRel);
        if self.inner.fail_reads.load(Acquire) {
            return Err(Error::from_message("memory blob store: reads are failing"));
        }

        let mut blobs = self.inner.blobs.lock();
        let Some(stored) = blobs.get(key) else {
            return Ok(None);
        };
        if let Some(deadline) = stored.expires_at
            && Instant::now() >= deadline
        {
            blobs.remove(key);
            return Ok(None);
        }
        Ok(Some(stored.bytes.clone()))
    }

    async fn put(&self, key: &str, blob: Bytes, ttl: Duration) -> Result<()> {
        self.inner.writes.fetch_add(1, AcqRel);
        if self.inner.fail_writes.load(Acquire) {
            return Err(Error::from_message("memory blob store: writes are failing"));
        }

        self.inner.blobs.lock().insert(
            key.to_string(),
            StoredBlob {
                bytes: blob,
                expires_at: Instant::now().checked_add(ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.inner.fail_writes.load(Acquire) {
            return Err(Error::from_message("memory blob store: writes are failing"));
        }
        self.inner.blobs.lock().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        if self.inner.fail_writes.load(Acquire) {
            return Err(Error::from_message("memory blob store: writes are failing"));
        }
        self.inner.blobs.lock().clear();
        Ok(())
    }
}
