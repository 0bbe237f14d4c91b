// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! What happens when a record shape evolves under a shared cache.
//!
//! Two "deployments" share one blob store. The old one caches a three-field
//! booking shape; the new one adds `meal_preference`. The new deployment's
//! fingerprint differs, so the stale blob reads as a miss and is rewritten —
//! no deserialization error, no garbage value.
//!
//! Run with `cargo run --example schema_evolution`.

use hamr::{Cache, CacheEntry, FieldKind, Fingerprint, MemoryBlobStore, ShapeDescriptor, Shaped};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
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

/// The same record one release later.
#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), hamr::Error> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    println!("v1 fingerprint: {}", Fingerprint::of::<BookingRequest>());
    println!("v2 fingerprint: {}", Fingerprint::of::<BookingRequestV2>());

    let store = MemoryBlobStore::new();
    let key = "booking:VA123:N0123456".to_string();

    // The old deployment populates the shared store.
    let v1 = Cache::builder::<String, BookingRequest>().name("bookings").memory().remote(store.clone()).build();
    v1.insert(
        &key,
        CacheEntry::new(BookingRequest {
            flight_code: "VA123".to_string(),
            passport_number: "N0123456".to_string(),
            seat_preference: "window".to_string(),
        }),
    )
    .await?;
    println!("v1 cached its shape under {key}");

    // The new deployment reads the same key. The stale envelope degrades to a
    // miss; the fallback runs and the blob is rewritten under the new
    // fingerprint.
    let v2 = Cache::builder::<String, BookingRequestV2>().name("bookings").memory().remote(store.clone()).build();
    let entry = v2
        .get_or_create(&key, || async {
            println!("v2 fallback running: the v1 blob was a miss, not an error");
            Ok::<_, std::io::Error>(BookingRequestV2 {
                flight_code: "VA123".to_string(),
                passport_number: "N0123456".to_string(),
                seat_preference: "window".to_string(),
                meal_preference: "vegetarian".to_string(),
            })
        })
        .await?;
    println!("v2 read: {:?}", entry.value());

    Ok(())
}
