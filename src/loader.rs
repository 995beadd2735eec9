//! Lazy shard loading with in-flight deduplication.
//!
//! Shards are fetched on demand, one asset per bucket key, and parsed into
//! the session index. Loads for distinct buckets run concurrently; loads for
//! the same bucket are deduplicated through shared futures so every caller
//! awaits the one in-flight fetch. Failures are recorded per bucket and are
//! not retried within the session.

use crate::error::ShardError;
use crate::search::SearchIndex;
use crate::shard;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, timeout};

/// Type alias for shared in-flight load futures.
type SharedLoad = Shared<BoxFuture<'static, Result<(), ShardError>>>;

/// Resolves and loads shard assets into a [`SearchIndex`].
pub struct ShardLoader {
    index: Arc<SearchIndex>,
    shard_dir: PathBuf,
    load_timeout: Duration,

    /// In-flight loads by bucket (awaitable by multiple callers).
    in_flight: Mutex<HashMap<String, SharedLoad>>,
}

impl ShardLoader {
    pub fn new(index: Arc<SearchIndex>, shard_dir: PathBuf, load_timeout: Duration) -> Self {
        Self {
            index,
            shard_dir,
            load_timeout,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Ensure every bucket in `buckets` is either resident in the index or
    /// has a failure recorded for it. Idempotent; concurrent across buckets.
    pub async fn ensure_loaded(&self, buckets: &[String]) {
        futures::future::join_all(buckets.iter().map(|b| self.ensure_bucket(b))).await;
    }

    /// Ensure a single bucket is resident or marked failed.
    pub async fn ensure_bucket(&self, bucket: &str) {
        if self.index.contains(bucket).await || self.index.is_failed(bucket).await {
            return;
        }

        let load = {
            let mut in_flight = self.in_flight.lock().await;
            if let Some(existing) = in_flight.get(bucket) {
                tracing::debug!("Awaiting in-flight load for shard '{}'", bucket);
                existing.clone()
            } else {
                let future: BoxFuture<'static, Result<(), ShardError>> = Box::pin(load_and_record(
                    self.index.clone(),
                    self.shard_dir.join(format!("{bucket}.json")),
                    bucket.to_string(),
                    self.load_timeout,
                ));
                let shared = future.shared();
                in_flight.insert(bucket.to_string(), shared.clone());
                shared
            }
        };

        let result = load.await;

        {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.remove(bucket);
        }

        if let Err(e) = result {
            tracing::warn!("Shard load failed: {}", e);
        }
    }
}

impl std::fmt::Debug for ShardLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardLoader")
            .field("shard_dir", &self.shard_dir)
            .field("load_timeout", &self.load_timeout)
            .finish_non_exhaustive()
    }
}

/// Fetch and parse one shard asset, recording the outcome in the index.
///
/// The recording happens here, inside the shared future, so it runs exactly
/// once no matter how many callers await the load.
async fn load_and_record(
    index: Arc<SearchIndex>,
    path: PathBuf,
    bucket: String,
    load_timeout: Duration,
) -> Result<(), ShardError> {
    // A concurrent caller may have completed the load while this future was
    // being scheduled.
    if index.contains(&bucket).await {
        return Ok(());
    }

    let result = timeout(load_timeout, fetch_and_parse(&path, &bucket))
        .await
        .unwrap_or_else(|_| {
            Err(ShardError::Timeout {
                bucket: bucket.clone(),
                timeout_ms: load_timeout.as_millis() as u64,
            })
        });

    match result {
        Ok(shard) => {
            tracing::debug!(
                "Loaded shard '{}' ({} entries) from {}",
                bucket,
                shard.entries.len(),
                path.display()
            );
            index.insert(shard).await;
            Ok(())
        }
        Err(error) => {
            index.record_failure(error.clone()).await;
            Err(error)
        }
    }
}

async fn fetch_and_parse(path: &Path, bucket: &str) -> Result<crate::shard::Shard, ShardError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ShardError::Fetch {
            bucket: bucket.to_string(),
            reason: e.to_string(),
        })?;

    shard::parse_asset(bucket, &raw)
}
