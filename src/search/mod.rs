//! Matching, merging and ranking over the sharded symbol index.
//!
//! This module owns the queryable side of the engine: the append-only index
//! of loaded shards, query normalization, the substring/prefix match pass,
//! and the grouping/ranking that turns raw matches into display order.

// Module declarations
pub(crate) mod index;
pub(crate) mod matcher;
pub(crate) mod normalize;
pub(crate) mod ranker;

// Public re-exports (used via lib.rs)
pub use index::SearchIndex;
pub use matcher::MatchClass;
pub use normalize::{BucketScheme, LeadingCharScheme};
pub use ranker::ResultGroup;

// Internal re-exports
pub(crate) use matcher::find_matches;
pub(crate) use normalize::normalize;
pub(crate) use ranker::rank;
