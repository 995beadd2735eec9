//! Error handling types and utilities.

/// A specialized Result type for docsearch operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error recorded when a shard fails to load.
///
/// Scoped to a single bucket key: the bucket is marked unavailable and later
/// queries degrade to partial results. Never fatal to the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShardError {
    /// The shard asset could not be read.
    #[error("shard '{bucket}' could not be read: {reason}")]
    Fetch { bucket: String, reason: String },
    /// The shard asset was read but is structurally invalid.
    #[error("shard '{bucket}' is malformed: {reason}")]
    Parse { bucket: String, reason: String },
    /// The shard load did not complete within the configured interval.
    #[error("shard '{bucket}' did not load within {timeout_ms}ms")]
    Timeout { bucket: String, timeout_ms: u64 },
}

impl ShardError {
    /// The bucket key this failure is scoped to.
    pub fn bucket(&self) -> &str {
        match self {
            Self::Fetch { bucket, .. }
            | Self::Parse { bucket, .. }
            | Self::Timeout { bucket, .. } => bucket,
        }
    }
}

/// Signal that a query was superseded by newer input before completing.
///
/// Expected control flow, not a failure: a cancelled query produces no
/// user-visible error and no presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("query superseded by newer input")]
pub struct QueryCancelled;
