//! Real service integration tests using MinIO.
//!
//! These tests verify the S3 object store against a real S3-compatible
//! service.
//!
//! # Requirements
//!
//! A MinIO server with a `ct-tiles` bucket:
//! ```bash
//! docker run -p 9000:9000 minio/minio server /data
//! mc mb local/ct-tiles
//! ```
//!
//! # Running the tests
//!
//! ```bash
//! cargo test --test integration real_service -- --ignored
//! ```
//!
//! These tests are marked as `#[ignore]` by default because they require external
//! services to be running.

use std::time::{SystemTime, UNIX_EPOCH};

use ctile::io::{create_s3_client, ObjectStore, S3ObjectStore};
use ctile::log::EntryBatch;
use ctile::tile::{CacheLookup, Tile, TileCache};

use super::test_utils::log_entry;

/// Default URL for a local MinIO
const MINIO_ENDPOINT: &str = "http://localhost:9000";
const MINIO_BUCKET: &str = "ct-tiles";

async fn minio_store() -> S3ObjectStore {
    // MinIO default credentials
    std::env::set_var("AWS_ACCESS_KEY_ID", "minioadmin");
    std::env::set_var("AWS_SECRET_ACCESS_KEY", "minioadmin");
    let client = create_s3_client(Some(MINIO_ENDPOINT), "us-east-1").await;
    S3ObjectStore::new(client, MINIO_BUCKET)
}

fn unique_prefix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("ctile-test-{}", nanos)
}

#[tokio::test]
#[ignore]
async fn test_minio_missing_object_is_none() {
    let store = minio_store().await;
    store.check_bucket().await.expect("MinIO bucket should exist");

    let key = format!("{}/does-not-exist", unique_prefix());
    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn test_minio_tile_roundtrip() {
    let cache = TileCache::new(minio_store().await, unique_prefix());
    let tile = Tile::containing(70, 32, "http://log.example").unwrap();

    assert_eq!(cache.get(&tile).await.unwrap(), CacheLookup::Miss);

    let batch = EntryBatch::new((64..96).map(log_entry).collect());
    cache.put(&tile, &batch).await.unwrap();
    // Overwriting with the same tile is fine
    cache.put(&tile, &batch).await.unwrap();

    assert_eq!(cache.get(&tile).await.unwrap(), CacheLookup::Hit(batch));
}
