pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod search;
pub mod session;
pub mod shard;
pub mod tracing;

pub use config::EngineConfig;
pub use engine::{QueryOutcome, SearchEngine};
pub use error::{QueryCancelled, Result, ShardError};
pub use search::{BucketScheme, LeadingCharScheme, MatchClass, ResultGroup, SearchIndex};
pub use session::{QuerySession, ResultRow, ResultSink, SessionMachine, SessionState};
pub use shard::{EntryKind, EntryRecord, Shard, TargetRef};
