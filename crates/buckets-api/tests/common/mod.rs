// Common test utilities for bucket integration tests

use std::path::PathBuf;

use buckets::{Bucket, Database, Item};
use tempfile::TempDir;

/// Test fixture owning a fresh database file in its own temporary directory.
///
/// Each test builds its own fixture; nothing is shared between tests.
pub struct TestDb {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
    pub path: PathBuf,
    pub db: Database,
}

impl TestDb {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("buckets.redb");
        let db = Database::open(&path).expect("Failed to open database");

        Self { temp_dir, path, db }
    }

    /// Creates `name` and fills it with the given string pairs.
    #[allow(dead_code)]
    pub fn bucket_with(&self, name: &str, pairs: &[(&str, &str)]) -> Bucket {
        let bucket = self.db.new_bucket(name).expect("Failed to create bucket");
        let items: Vec<Item> = pairs.iter().map(|&(k, v)| Item::new(k, v)).collect();
        bucket.insert(&items).expect("Failed to insert items");
        bucket
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts string keys into owned byte vectors for comparisons.
#[allow(dead_code)]
pub fn byte_keys(keys: &[&str]) -> Vec<Vec<u8>> {
    keys.iter().map(|k| k.as_bytes().to_vec()).collect()
}
