//! The query pipeline: normalize → ensure shards → match → rank.

use crate::config::EngineConfig;
use crate::error::QueryCancelled;
use crate::loader::ShardLoader;
use crate::search::{BucketScheme, LeadingCharScheme, ResultGroup, SearchIndex};
use crate::search::{find_matches, normalize, rank};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// The outcome of one query: ranked groups plus a flag marking the result as
/// incomplete when a required shard failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryOutcome {
    pub groups: Vec<ResultGroup>,
    pub partial: bool,
}

/// Queryable facade over the session index and shard loader.
pub struct SearchEngine {
    index: Arc<SearchIndex>,
    loader: ShardLoader,
    scheme: Arc<dyn BucketScheme>,
    max_results: usize,
}

impl SearchEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_scheme(config, Arc::new(LeadingCharScheme))
    }

    /// Build an engine with a caller-supplied bucket scheme, for generators
    /// whose partition rule differs from the leading-letter default.
    pub fn with_scheme(config: &EngineConfig, scheme: Arc<dyn BucketScheme>) -> Self {
        let index = Arc::new(SearchIndex::new());
        let loader = ShardLoader::new(index.clone(), config.shard_dir.clone(), config.load_timeout());
        Self {
            index,
            loader,
            scheme,
            max_results: config.max_results,
        }
    }

    /// The session index. Append-only; shared with in-flight loads.
    pub fn index(&self) -> &Arc<SearchIndex> {
        &self.index
    }

    /// Run one query to completion.
    ///
    /// Triggers loads for the buckets implied by the query's leading
    /// characters, then matches across every loaded shard. Cancellation is
    /// cooperative: the token is checked at each suspension point, and a
    /// superseded query returns [`QueryCancelled`] instead of a result.
    pub async fn query(
        &self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> Result<QueryOutcome, QueryCancelled> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Ok(QueryOutcome::default());
        }

        let required: Vec<String> = self.scheme.bucket_for(&normalized).into_iter().collect();

        if cancel.is_cancelled() {
            return Err(QueryCancelled);
        }

        self.loader.ensure_loaded(&required).await;

        if cancel.is_cancelled() {
            return Err(QueryCancelled);
        }

        let mut partial = false;
        for bucket in &required {
            if let Some(failure) = self.index.failure(bucket).await {
                tracing::debug!("Query '{}' degraded: {}", raw, failure);
                partial = true;
            }
        }

        let snapshot = self.index.snapshot().await;

        if cancel.is_cancelled() {
            return Err(QueryCancelled);
        }

        let matches = find_matches(&snapshot, &normalized);
        let groups = rank(matches, raw, self.max_results);
        tracing::debug!(
            "Query '{}' matched {} group(s) across {} shard(s)",
            raw,
            groups.len(),
            snapshot.len()
        );

        Ok(QueryOutcome { groups, partial })
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("loader", &self.loader)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}
