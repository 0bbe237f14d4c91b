// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Integration tests for `InMemoryTier`.

use std::time::Duration;

use hamr_memory::InMemoryTier;
use hamr_tier::{CacheEntry, CacheTier};

#[tokio::test]
async fn insert_and_get_round_trip() {
    let tier = InMemoryTier::<String, String>::new();

    tier.insert(&"key".to_string(), CacheEntry::new("value".to_string()))
        .await
        .expect("insert");

    let entry = tier.get(&"key".to_string()).await.expect("get").expect("entry");
    assert_eq!(entry.value(), "value");
    assert_eq!(tier.len(), Some(1));
}

#[tokio::test]
async fn missing_key_is_a_miss() {
    let tier = InMemoryTier::<String, i32>::new();
    assert!(tier.get(&"absent".to_string()).await.expect("get").is_none());
}

#[tokio::test]
async fn invalidate_removes_the_entry() {
    let tier = InMemoryTier::<String, i32>::new();
    tier.insert(&"key".to_string(), CacheEntry::new(1)).await.expect("insert");

    tier.invalidate(&"key".to_string()).await.expect("invalidate");
    assert!(tier.get(&"key".to_string()).await.expect("get").is_none());
}

#[tokio::test]
async fn clear_removes_everything() {
    let tier = InMemoryTier::<String, i32>::new();
    for i in 0..5 {
        tier.insert(&format!("key-{i}"), CacheEntry::new(i)).await.expect("insert");
    }

    tier.clear().await.expect("clear");
    tier.evict_expired().await;
    assert_eq!(tier.len(), Some(0));
}

#[tokio::test]
async fn clones_share_storage() {
    let tier = InMemoryTier::<String, i32>::new();
    let clone = tier.clone();

    tier.insert(&"key".to_string(), CacheEntry::new(42)).await.expect("insert");
    let entry = clone.get(&"key".to_string()).await.expect("get").expect("entry");
    assert_eq!(*entry.value(), 42);
}

#[tokio::test]
async fn per_entry_ttl_expires_the_entry() {
    let tier = InMemoryTier::<String, i32>::new();

    tier.insert(
        &"short".to_string(),
        CacheEntry::with_ttl(1, Duration::from_millis(20)),
    )
    .await
    .expect("insert");
    tier.insert(&"forever".to_string(), CacheEntry::new(2)).await.expect("insert");

    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(tier.get(&"short".to_string()).await.expect("get").is_none());
    assert!(tier.get(&"forever".to_string()).await.expect("get").is_some());
}

#[tokio::test]
async fn tier_level_ttl_expires_entries() {
    let tier = InMemoryTier::<String, i32>::builder()
        .time_to_live(Duration::from_millis(20))
        .build();

    tier.insert(&"key".to_string(), CacheEntry::new(1)).await.expect("insert");
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(tier.get(&"key".to_string()).await.expect("get").is_none());
}

#[tokio::test]
async fn capacity_bound_evicts_under_pressure() {
    let tier = InMemoryTier::<String, i32>::with_capacity(10);

    for i in 0..100 {
        tier.insert(&format!("key-{i}"), CacheEntry::new(i)).await.expect("insert");
    }
    tier.evict_expired().await;

    assert!(tier.len().expect("len") <= 10);
}
