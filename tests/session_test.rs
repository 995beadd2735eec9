mod common;

use assert2::check;
use common::{RecordingSink, ShardDir, corpus, engine_for};
use docsearch::session::{QuerySession, SessionState};
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const DEBOUNCE: Duration = Duration::from_millis(30);

/// Long enough for a debounced match over local shard files to settle.
const SETTLE: Duration = Duration::from_millis(400);

fn session_over(
    corpus: &ShardDir,
) -> (Arc<QuerySession>, Arc<RecordingSink>) {
    let engine = engine_for(corpus);
    let sink = Arc::new(RecordingSink::default());
    let session = QuerySession::new(engine, sink.clone(), DEBOUNCE);
    (session, sink)
}

/// A single input produces exactly one presentation.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn input_presents_once(corpus: ShardDir) {
    let (session, sink) = session_over(&corpus);

    session.input("radius").await;
    sleep(SETTLE).await;

    check!(sink.presentation_count() == 1);
    let (rows, partial) = &sink.presentations()[0];
    check!(rows.len() == 1);
    check!(rows[0].display == "radius");
    check!(rows[0].scope == "ArcStrokedPoint");
    check!(!*partial);
    check!(matches!(session.state().await, SessionState::Presenting { .. }));
}

/// Keystrokes inside the debounce window coalesce into one match.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rapid_keystrokes_coalesce(corpus: ShardDir) {
    let (session, sink) = session_over(&corpus);

    for prefix in ["r", "ra", "rad", "radi", "radiu", "radius"] {
        session.input(prefix).await;
    }
    sleep(SETTLE).await;

    check!(sink.presentation_count() == 1);
    let (rows, _) = &sink.presentations()[0];
    check!(rows[0].display == "radius");
}

/// Superseding a query mid-flight never presents the superseded result
/// after the new one.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn superseded_result_never_presents_after_newer(corpus: ShardDir) {
    let (session, sink) = session_over(&corpus);

    // Let the first query present, then supersede with a second.
    session.input("gradient").await;
    sleep(SETTLE).await;
    session.input("radius").await;
    sleep(SETTLE).await;

    let presentations = sink.presentations();
    check!(presentations.len() == 2);
    check!(presentations[0].0[0].display == "gradient");
    check!(presentations[1].0[0].display == "radius");
}

/// Clearing the input goes straight to Idle and clears the display; a
/// pending match is cancelled silently.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clear_cancels_pending_and_clears_display(corpus: ShardDir) {
    let (session, sink) = session_over(&corpus);

    session.input("radius").await;
    session.input("").await;
    sleep(SETTLE).await;

    check!(sink.presentation_count() == 0);
    check!(sink.clear_count() == 1);
    check!(session.state().await == SessionState::Idle);
}

/// A failed shard reaches the renderer as a partial presentation, not an
/// error.
#[tokio::test(flavor = "multi_thread")]
async fn partial_results_reach_the_sink() {
    let dir = ShardDir::new();
    dir.write_shard("r", "{broken");
    let (session, sink) = session_over(&dir);

    session.input("radius").await;
    sleep(SETTLE).await;

    check!(sink.presentation_count() == 1);
    let (rows, partial) = &sink.presentations()[0];
    check!(rows.is_empty());
    check!(*partial);
}
