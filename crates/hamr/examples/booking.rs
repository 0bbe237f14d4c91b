// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Two-tier caching of booking requests.
//!
//! Run with `cargo run --example booking`.

use std::time::Duration;

use hamr::{Cache, CacheConfig, FieldKind, MemoryBlobStore, ShapeDescriptor, Shaped};
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

async fn load_booking(flight_code: &str, passport_number: &str) -> Result<BookingRequest, std::io::Error> {
    // Stands in for the reservations database.
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(BookingRequest {
        flight_code: flight_code.to_string(),
        passport_number: passport_number.to_string(),
        seat_preference: "window".to_string(),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), hamr::Error> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let store = MemoryBlobStore::new();
    let cache = Cache::builder::<String, BookingRequest>()
        .name("bookings")
        .config(CacheConfig::new().local_ttl(Duration::from_secs(60)).shared_ttl(Duration::from_secs(300)))
        .memory()
        .remote(store.clone())
        .build();

    let key = "booking:VA123:N0123456".to_string();

    let start = std::time::Instant::now();
    let entry = cache.get_or_create(&key, || async { load_booking("VA123", "N0123456").await }).await?;
    println!("first call (database): {:?} in {:?}", entry.value(), start.elapsed());

    let start = std::time::Instant::now();
    let entry = cache.get_or_create(&key, || async { load_booking("VA123", "N0123456").await }).await?;
    println!("second call (local tier): {:?} in {:?}", entry.value(), start.elapsed());

    // A second process sharing the same store hits the shared tier without
    // touching the database.
    let other_process = Cache::builder::<String, BookingRequest>()
        .name("bookings")
        .memory()
        .remote(store)
        .build();
    let start = std::time::Instant::now();
    let entry = other_process.get_or_create(&key, || async { load_booking("VA123", "N0123456").await }).await?;
    println!("other process (shared tier): {:?} in {:?}", entry.value(), start.elapsed());

    Ok(())
}
