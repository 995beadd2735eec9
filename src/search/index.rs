//! The merged, queryable view over loaded shards.
//!
//! The index is created empty at session start and populated on demand by
//! the shard loader. Both maps are append-only for the life of the session:
//! a loaded shard is immutable and never evicted, and a recorded failure is
//! never cleared. That discipline is what makes concurrent reads from
//! in-flight match operations safe.

use crate::error::ShardError;
use crate::shard::Shard;
use ahash::AHashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Append-only session index: loaded shards plus the buckets that failed.
#[derive(Debug, Default)]
pub struct SearchIndex {
    shards: RwLock<AHashMap<String, Arc<Shard>>>,
    failed: RwLock<AHashMap<String, ShardError>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a loaded shard. If the bucket is already resident the existing
    /// shard is kept; entries are never overwritten in place.
    pub async fn insert(&self, shard: Shard) {
        let mut shards = self.shards.write().await;
        shards
            .entry(shard.bucket.clone())
            .or_insert_with(|| Arc::new(shard));
    }

    /// Record a load failure for a bucket. The first failure wins; the
    /// bucket stays unavailable for the rest of the session.
    pub async fn record_failure(&self, error: ShardError) {
        let mut failed = self.failed.write().await;
        failed.entry(error.bucket().to_string()).or_insert(error);
    }

    /// Whether a shard is resident for `bucket`.
    pub async fn contains(&self, bucket: &str) -> bool {
        self.shards.read().await.contains_key(bucket)
    }

    /// The recorded failure for `bucket`, if any.
    pub async fn failure(&self, bucket: &str) -> Option<ShardError> {
        self.failed.read().await.get(bucket).cloned()
    }

    pub async fn is_failed(&self, bucket: &str) -> bool {
        self.failed.read().await.contains_key(bucket)
    }

    /// Snapshot of all loaded shards, sorted by bucket key so downstream
    /// merging is deterministic regardless of load completion order.
    pub async fn snapshot(&self) -> Vec<Arc<Shard>> {
        let shards = self.shards.read().await;
        let mut out: Vec<_> = shards.values().cloned().collect();
        out.sort_by(|a, b| a.bucket.cmp(&b.bucket));
        out
    }

    /// Bucket keys currently resident, sorted.
    pub async fn loaded_buckets(&self) -> Vec<String> {
        let shards = self.shards.read().await;
        let mut out: Vec<_> = shards.keys().cloned().collect();
        out.sort();
        out
    }
}
