// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Integration tests for the two-tier cache.

use std::{
    convert::Infallible,
    sync::{
        Arc,
        atomic::{
            AtomicUsize,
            Ordering::{AcqRel, Acquire},
        },
    },
    time::Duration,
};

use futures::{StreamExt, stream::FuturesUnordered};
use hamr::{
    Cache, CacheConfig, CacheEntry, CacheTier, EnvelopeTier, Error, FieldKind, InMemoryTier, MemoryBlobStore,
    ShapeDescriptor, Shaped,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct BookingRequest {
    flight_code: String,
    passport_number: String,
    seat_preference: String,
}

impl Shaped for BookingRequest {
    fn descriptor() -> ShapeDescriptor {
        ShapeDescriptor::of("BookingRequest")
            .field("flight_code", FieldKind::Str)
            .field("passport_number", FieldKind::Str)
            .field("seat_preference", FieldKind::Str)
    }
}

fn booking() -> BookingRequest {
    BookingRequest {
        flight_code: "VA123".to_string(),
        passport_number: "N0123456".to_string(),
        seat_preference: "window".to_string(),
    }
}

type BookingCache = Cache<String, BookingRequest, InMemoryTier<String, BookingRequest>, EnvelopeTier<BookingRequest, MemoryBlobStore>>;

fn two_tier(store: MemoryBlobStore) -> BookingCache {
    Cache::builder::<String, BookingRequest>()
        .name("bookings")
        .config(CacheConfig::default())
        .memory()
        .remote(store)
        .build()
}

#[tokio::test]
async fn miss_populates_both_tiers_and_second_call_is_local() {
    let store = MemoryBlobStore::new();
    let cache = two_tier(store.clone());
    let key = "booking:1".to_string();

    let calls = Arc::new(AtomicUsize::default());
    let counter = Arc::clone(&calls);
    let entry = cache
        .get_or_create(&key, move || async move {
            counter.fetch_add(1, AcqRel);
            Ok::<_, Infallible>(booking())
        })
        .await
        .expect("populate");
    assert_eq!(*entry.value(), booking());
    assert_eq!(calls.load(Acquire), 1);

    // Both tiers now hold the value.
    assert!(store.raw(&key).is_some());
    let reads_before = store.read_count();

    // The second call is served locally: the fallback does not run and the
    // shared store is not consulted.
    let counter = Arc::clone(&calls);
    let entry = cache
        .get_or_create(&key, move || async move {
            counter.fetch_add(1, AcqRel);
            Ok::<_, Infallible>(booking())
        })
        .await
        .expect("hit");
    assert_eq!(*entry.value(), booking());
    assert_eq!(calls.load(Acquire), 1);
    assert_eq!(store.read_count(), reads_before);
}

#[tokio::test]
async fn shared_tier_hit_is_promoted_without_running_the_fallback() {
    let store = MemoryBlobStore::new();

    // Another process populated the shared store.
    let writer = two_tier(store.clone());
    writer.insert(&"booking:1".to_string(), CacheEntry::new(booking())).await.expect("seed");

    // This process has an empty local tier but sees the shared entry; its
    // fallback must never run.
    let reader = two_tier(store.clone());
    let calls = Arc::new(AtomicUsize::default());
    let counter = Arc::clone(&calls);
    let entry = reader
        .get_or_create(&"booking:1".to_string(), move || async move {
            counter.fetch_add(1, AcqRel);
            Ok::<_, Infallible>(booking())
        })
        .await
        .expect("shared hit");
    assert_eq!(*entry.value(), booking());
    assert_eq!(calls.load(Acquire), 0);

    // Promoted: the next read does not touch the shared store.
    let reads_before = store.read_count();
    let entry = reader.get(&"booking:1".to_string()).await.expect("get").expect("local hit");
    assert_eq!(*entry.value(), booking());
    assert_eq!(store.read_count(), reads_before);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_misses_run_the_fallback_once() {
    let store = MemoryBlobStore::new();
    let cache = Arc::new(two_tier(store));
    let calls = Arc::new(AtomicUsize::default());

    let futures = FuturesUnordered::new();
    for _ in 0..10 {
        let cache = Arc::clone(&cache);
        let counter = Arc::clone(&calls);
        futures.push(async move {
            cache
                .get_or_create(&"booking:1".to_string(), move || async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    counter.fetch_add(1, AcqRel);
                    Ok::<_, Infallible>(booking())
                })
                .await
        });
    }

    let entries: Vec<_> = futures.collect().await;
    for entry in entries {
        assert_eq!(*entry.expect("populate").value(), booking());
    }
    assert_eq!(calls.load(Acquire), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn fallback_failure_reaches_every_waiter_and_caches_nothing() {
    let store = MemoryBlobStore::new();
    let cache = Arc::new(two_tier(store.clone()));

    let futures = FuturesUnordered::new();
    for _ in 0..4 {
        let cache = Arc::clone(&cache);
        futures.push(async move {
            cache
                .get_or_create(&"booking:1".to_string(), || async {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Err::<BookingRequest, _>(std::io::Error::other("reservations database is down"))
                })
                .await
        });
    }

    let outcomes: Vec<_> = futures.collect().await;
    for outcome in outcomes {
        let error = outcome.expect_err("fallback failed");
        assert!(matches!(error, Error::Fallback(_)), "got: {error:?}");
        assert!(error.fallback_as::<std::io::Error>().is_some());
    }

    // Errors are not cached: both tiers stay empty and a later call retries.
    assert!(store.is_empty());
    let entry = cache
        .get_or_create(&"booking:1".to_string(), || async { Ok::<_, Infallible>(booking()) })
        .await
        .expect("retry succeeds");
    assert_eq!(*entry.value(), booking());
}

#[tokio::test]
async fn schema_evolution_degrades_to_a_miss() {
    // Version 1 of the shape, as an older deployment would write it.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct BookingRequestV2 {
        flight_code: String,
        passport_number: String,
        seat_preference: String,
        meal_preference: String,
    }

    impl Shaped for BookingRequestV2 {
        fn descriptor() -> ShapeDescriptor {
            ShapeDescriptor::of("BookingRequest")
                .field("flight_code", FieldKind::Str)
                .field("passport_number", FieldKind::Str)
                .field("seat_preference", FieldKind::Str)
                .field("meal_preference", FieldKind::Str)
        }
    }

    let store = MemoryBlobStore::new();
    let key = "booking:VA123:N0123456".to_string();

    // The v1 deployment caches its shape.
    let v1 = two_tier(store.clone());
    v1.insert(&key, CacheEntry::new(booking())).await.expect("v1 insert");
    let v1_blob = store.raw(&key).expect("v1 blob");

    // The v2 deployment reads the same key: the stale envelope is a miss, the
    // fallback runs, and the v2 shape is cached in its place.
    let v2 = Cache::builder::<String, BookingRequestV2>()
        .name("bookings")
        .memory()
        .remote(store.clone())
        .build();

    let calls = Arc::new(AtomicUsize::default());
    let counter = Arc::clone(&calls);
    let entry = v2
        .get_or_create(&key, move || async move {
            counter.fetch_add(1, AcqRel);
            Ok::<_, Infallible>(BookingRequestV2 {
                flight_code: "VA123".to_string(),
                passport_number: "N0123456".to_string(),
                seat_preference: "window".to_string(),
                meal_preference: "vegetarian".to_string(),
            })
        })
        .await
        .expect("v2 populate");
    assert_eq!(entry.value().meal_preference, "vegetarian");
    assert_eq!(calls.load(Acquire), 1);

    // The blob was rewritten under the new fingerprint.
    let v2_blob = store.raw(&key).expect("v2 blob");
    assert_ne!(v1_blob[..8], v2_blob[..8]);
}

#[tokio::test]
async fn shared_tier_write_failure_still_returns_the_value() {
    let store = MemoryBlobStore::new();
    let cache = two_tier(store.clone());
    store.fail_writes(true);

    let entry = cache
        .get_or_create(&"booking:1".to_string(), || async { Ok::<_, Infallible>(booking()) })
        .await
        .expect("population must not fail on a shared-tier write error");
    assert_eq!(*entry.value(), booking());

    // The value landed locally even though the shared write was dropped.
    assert!(store.is_empty());
    let entry = cache.local().get(&"booking:1".to_string()).await.expect("get").expect("local hit");
    assert_eq!(*entry.value(), booking());
}

#[tokio::test]
async fn shared_tier_read_failure_degrades_to_the_fallback() {
    let store = MemoryBlobStore::new();
    let cache = two_tier(store.clone());

    // Seed the shared store, then lose the backend.
    cache.remote().insert(&"booking:1".to_string(), CacheEntry::new(booking())).await.expect("seed");
    store.fail_reads(true);

    let calls = Arc::new(AtomicUsize::default());
    let counter = Arc::clone(&calls);
    let entry = cache
        .get_or_create(&"booking:1".to_string(), move || async move {
            counter.fetch_add(1, AcqRel);
            Ok::<_, Infallible>(booking())
        })
        .await
        .expect("degrades to fallback");
    assert_eq!(*entry.value(), booking());
    assert_eq!(calls.load(Acquire), 1);
}

#[tokio::test]
async fn shared_tier_read_failure_does_not_fail_a_plain_get() {
    let store = MemoryBlobStore::new();
    let cache = two_tier(store.clone());
    let key = "booking:1".to_string();

    cache.remote().insert(&key, CacheEntry::new(booking())).await.expect("seed");
    store.fail_reads(true);

    // The shared tier is a remote dependency: losing it turns reads into
    // misses, not errors.
    assert!(cache.get(&key).await.expect("get degrades to a miss").is_none());
    assert!(!cache.contains(&key).await.expect("contains degrades too"));
}

#[tokio::test]
async fn invalidate_clears_both_tiers() {
    let store = MemoryBlobStore::new();
    let cache = two_tier(store.clone());
    let key = "booking:1".to_string();

    cache.insert(&key, CacheEntry::new(booking())).await.expect("insert");
    assert!(cache.contains(&key).await.expect("contains"));

    cache.invalidate(&key).await.expect("invalidate");
    assert!(store.raw(&key).is_none());
    assert!(!cache.contains(&key).await.expect("contains"));
}

#[tokio::test]
async fn local_only_cache_works_without_a_shared_tier() {
    let cache = Cache::builder::<String, i32>().memory().build();

    let entry = cache
        .get_or_create(&"key".to_string(), || async { Ok::<_, Infallible>(7) })
        .await
        .expect("populate");
    assert_eq!(*entry.value(), 7);

    let entry = cache.get(&"key".to_string()).await.expect("get").expect("hit");
    assert_eq!(*entry.value(), 7);
}

#[tokio::test]
async fn corrupt_shared_blob_is_evicted_and_recomputed() {
    let store = MemoryBlobStore::new();
    let cache = two_tier(store.clone());
    let key = "booking:1".to_string();

    // A valid envelope, truncated mid-payload: matching fingerprint, bad bytes.
    cache.remote().insert(&key, CacheEntry::new(booking())).await.expect("seed");
    let blob = store.raw(&key).expect("blob");
    store.put_raw(key.clone(), blob.slice(..blob.len() - 3));

    let calls = Arc::new(AtomicUsize::default());
    let counter = Arc::clone(&calls);
    let entry = cache
        .get_or_create(&key, move || async move {
            counter.fetch_add(1, AcqRel);
            Ok::<_, Infallible>(booking())
        })
        .await
        .expect("corruption degrades to a recompute");
    assert_eq!(*entry.value(), booking());
    assert_eq!(calls.load(Acquire), 1);

    // The rewritten blob decodes cleanly again.
    let entry = cache.remote().get(&key).await.expect("get").expect("rewritten");
    assert_eq!(*entry.value(), booking());
}

#[tokio::test]
async fn local_tier_failure_degrades_to_the_fallback() {
    use hamr_tier::testing::{MockTier, TierOpKind};

    let local = MockTier::<String, i32>::new();
    local.fail_when(|kind, _| kind == TierOpKind::Get);

    let cache = Cache::builder::<String, i32>().local(local.clone()).build();

    // A plain get propagates the tier failure.
    assert!(cache.get(&"key".to_string()).await.is_err());

    // get_or_create absorbs it and falls back.
    let entry = cache
        .get_or_create(&"key".to_string(), || async { Ok::<_, Infallible>(7) })
        .await
        .expect("local failure must not fail population");
    assert_eq!(*entry.value(), 7);
}

#[tokio::test]
async fn config_applies_regardless_of_builder_call_order() {
    // The TTL is set after the tier is selected; it must still be honored,
    // because tiers are only constructed at build time.
    let cache = Cache::builder::<String, i32>()
        .memory()
        .config(CacheConfig::new().local_ttl(Duration::from_millis(50)))
        .build();

    cache.insert(&"key".to_string(), CacheEntry::new(1)).await.expect("insert");
    assert!(cache.get(&"key".to_string()).await.expect("get").is_some());

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(cache.get(&"key".to_string()).await.expect("get").is_none());
}

#[tokio::test]
async fn distinct_keys_do_not_coalesce() {
    let store = MemoryBlobStore::new();
    let cache = Arc::new(two_tier(store));
    let calls = Arc::new(AtomicUsize::default());

    let futures = FuturesUnordered::new();
    for i in 0..4 {
        let cache = Arc::clone(&cache);
        let counter = Arc::clone(&calls);
        futures.push(async move {
            cache
                .get_or_create(&format!("booking:{i}"), move || async move {
                    counter.fetch_add(1, AcqRel);
                    Ok::<_, Infallible>(booking())
                })
                .await
        });
    }

    let entries: Vec<_> = futures.collect().await;
    assert!(entries.into_iter().all(|entry| entry.is_ok()));
    assert_eq!(calls.load(Acquire), 4);
}
