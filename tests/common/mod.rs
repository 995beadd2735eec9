//! Shared test fixtures and utilities for integration tests.
//!
//! Each test gets a fresh temporary shard directory and its own engine with
//! an empty session index, so tests can run in parallel without
//! interference. The default corpus mirrors the upstream generator's output
//! shape: a shard `r` with `radius` overloads and a shard `g` whose
//! `gradient` key contains `radi` as a substring.

use docsearch::config::EngineConfig;
use docsearch::engine::SearchEngine;
use docsearch::session::{ResultRow, ResultSink};
use rstest::fixture;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

/// A temporary directory of shard assets.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct ShardDir {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl ShardDir {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write a raw shard asset for `bucket`.
    pub fn write_shard(&self, bucket: &str, body: &str) {
        std::fs::write(self.root.join(format!("{bucket}.json")), body)
            .unwrap_or_else(|e| panic!("Failed to write shard '{}': {}", bucket, e));
    }

    /// Populate the default corpus used by most tests.
    pub fn write_default_corpus(&self) {
        self.write_shard(
            "r",
            r#"{
                "entries": [
                    {
                        "key": "radius",
                        "display": "radius",
                        "kind": "function",
                        "targets": [
                            {"page": "classArcStrokedPoint.html", "anchor": "a9ab02", "scope": "ArcStrokedPoint", "signature": "(void) const"},
                            {"page": "classArcStrokedPoint.html", "anchor": "a82834", "scope": "ArcStrokedPoint", "signature": "(void)"}
                        ]
                    },
                    {
                        "key": "range",
                        "display": "range",
                        "kind": "member",
                        "targets": [
                            {"page": "classc__array.html", "anchor": "a99967", "scope": "c_array"}
                        ]
                    },
                    {
                        "key": "radial_5fgradient",
                        "display": "radial_gradient",
                        "kind": "function",
                        "targets": [
                            {"page": "classPainterBrush.html", "anchor": "a2db2c", "scope": "PainterBrush", "signature": "(const cs, start, end)"},
                            {"page": "classPainterBrush.html", "anchor": "aef27b", "scope": "PainterBrush", "signature": "(const cs, p, r)"}
                        ]
                    }
                ]
            }"#,
        );
        self.write_shard(
            "g",
            r#"{
                "entries": [
                    {
                        "key": "gradient",
                        "display": "gradient",
                        "kind": "member",
                        "targets": [
                            {"page": "classPainterBrush.html", "anchor": "a77aa1", "scope": "PainterBrush"}
                        ]
                    }
                ]
            }"#,
        );
    }
}

impl Default for ShardDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Build an engine over `dir` with test-friendly timings.
#[allow(dead_code)]
pub fn engine_for(dir: &ShardDir) -> Arc<SearchEngine> {
    let config = EngineConfig {
        shard_dir: dir.path().to_path_buf(),
        debounce_ms: 30,
        load_timeout_ms: 2000,
        max_results: 50,
    };
    Arc::new(SearchEngine::new(&config))
}

/// Shard directory pre-populated with the default corpus.
#[fixture]
#[allow(dead_code)]
pub fn corpus() -> ShardDir {
    let dir = ShardDir::new();
    dir.write_default_corpus();
    dir
}

/// A [`ResultSink`] that records every presentation and clear it receives.
#[allow(dead_code)] // Used in session_test.rs
#[derive(Default)]
pub struct RecordingSink {
    presentations: Mutex<Vec<(Vec<ResultRow>, bool)>>,
    clears: AtomicUsize,
}

#[allow(dead_code)] // Used in session_test.rs
impl RecordingSink {
    pub fn presentations(&self) -> Vec<(Vec<ResultRow>, bool)> {
        self.presentations.lock().unwrap().clone()
    }

    pub fn presentation_count(&self) -> usize {
        self.presentations.lock().unwrap().len()
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl ResultSink for RecordingSink {
    fn present(&self, rows: &[ResultRow], partial: bool) {
        self.presentations
            .lock()
            .unwrap()
            .push((rows.to_vec(), partial));
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}
