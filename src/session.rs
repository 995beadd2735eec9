//! The keystroke-driven query session.
//!
//! Split in two layers: [`SessionMachine`] is a pure state machine
//! (`Idle → Pending → Presenting → Idle`) whose transitions take explicit
//! state and events and return effects, so the last-input-wins semantics are
//! unit-testable without a UI or a runtime. [`QuerySession`] is the async
//! driver that interprets those effects on tokio: debouncing input, spawning
//! match tasks, cancelling superseded ones, and handing ranked results to
//! the renderer seam.

use crate::engine::{QueryOutcome, SearchEngine};
use crate::search::ResultGroup;
use crate::shard::{EntryKind, TargetRef};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// Session controller states. No terminal state; the controller persists for
/// the life of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No outstanding query.
    #[default]
    Idle,
    /// A match for `seq` is in flight.
    Pending { seq: u64 },
    /// The most recent completed match has been handed to the renderer.
    Presenting { seq: u64 },
}

/// Inputs to the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user edited the query text.
    InputChanged(String),
    /// The user cleared the input.
    InputCleared,
    /// A spawned match finished. Stale sequence numbers are discarded.
    MatchFinished { seq: u64, outcome: QueryOutcome },
}

/// Effects the driver must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Cancel the in-flight match for `seq`; its result must be dropped.
    CancelMatch { seq: u64 },
    /// Start matching `query` under sequence number `seq`.
    SpawnMatch { seq: u64, query: String },
    /// Hand a completed outcome to the renderer.
    Present { outcome: QueryOutcome },
    /// Instruct the renderer to clear.
    ClearDisplay,
}

/// Pure session state machine with last-input-wins semantics.
#[derive(Debug, Default)]
pub struct SessionMachine {
    state: SessionState,
    seq: u64,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply one event, returning the effects to carry out.
    ///
    /// Deterministic given (state, event); no ambient state is consulted.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::InputChanged(text) if text.is_empty() => self.clear(),
            SessionEvent::InputChanged(text) => {
                let mut effects = Vec::new();
                if let SessionState::Pending { seq } = self.state {
                    effects.push(Effect::CancelMatch { seq });
                }
                self.seq += 1;
                self.state = SessionState::Pending { seq: self.seq };
                effects.push(Effect::SpawnMatch {
                    seq: self.seq,
                    query: text,
                });
                effects
            }
            SessionEvent::InputCleared => self.clear(),
            SessionEvent::MatchFinished { seq, outcome } => match self.state {
                SessionState::Pending { seq: current } if current == seq => {
                    self.state = SessionState::Presenting { seq };
                    vec![Effect::Present { outcome }]
                }
                // Superseded or spurious completion: dropped on arrival.
                _ => vec![],
            },
        }
    }

    fn clear(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let SessionState::Pending { seq } = self.state {
            effects.push(Effect::CancelMatch { seq });
        }
        self.state = SessionState::Idle;
        effects.push(Effect::ClearDisplay);
        effects
    }
}

/// One row of a presentation: everything the renderer needs for a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub display: String,
    /// Qualifying context of the first target, shown alongside the match.
    pub scope: String,
    pub kind: EntryKind,
    pub targets: Vec<TargetRef>,
}

impl ResultRow {
    /// Build the presentation row for one ranked group.
    pub fn from_group(group: &ResultGroup) -> Self {
        Self {
            display: group.display.clone(),
            scope: group
                .targets
                .first()
                .map(|t| t.scope.clone())
                .unwrap_or_default(),
            kind: group.kind,
            targets: group.targets.clone(),
        }
    }
}

/// Renderer seam. The session controller emits ordered rows plus a partial
/// flag; turning them into UI is the collaborator's concern.
pub trait ResultSink: Send + Sync {
    fn present(&self, rows: &[ResultRow], partial: bool);
    fn clear(&self);
}

/// Async driver for the session machine: debounces input, runs matches as
/// cancellable tasks, and forwards effects to the sink.
pub struct QuerySession {
    engine: Arc<SearchEngine>,
    sink: Arc<dyn ResultSink>,
    debounce: Duration,
    machine: Mutex<SessionMachine>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl QuerySession {
    pub fn new(engine: Arc<SearchEngine>, sink: Arc<dyn ResultSink>, debounce: Duration) -> Arc<Self> {
        Arc::new(Self {
            engine,
            sink,
            debounce,
            machine: Mutex::new(SessionMachine::new()),
            in_flight: Mutex::new(None),
        })
    }

    /// Feed one input-field edit into the session. An empty string clears.
    pub async fn input(self: &Arc<Self>, text: &str) {
        let effects = {
            let mut machine = self.machine.lock().await;
            machine.handle(SessionEvent::InputChanged(text.to_string()))
        };

        for effect in effects {
            match effect {
                Effect::CancelMatch { seq } => {
                    if let Some(token) = self.in_flight.lock().await.take() {
                        tracing::trace!("Superseding match #{}", seq);
                        token.cancel();
                    }
                }
                Effect::SpawnMatch { seq, query } => {
                    let token = CancellationToken::new();
                    *self.in_flight.lock().await = Some(token.clone());
                    let session = self.clone();
                    tokio::spawn(async move {
                        session.run_match(seq, query, token).await;
                    });
                }
                Effect::Present { outcome } => self.present_outcome(&outcome),
                Effect::ClearDisplay => self.sink.clear(),
            }
        }
    }

    /// Current machine state, for observability.
    pub async fn state(&self) -> SessionState {
        self.machine.lock().await.state().clone()
    }

    /// Debounce, run the query, and report completion back to the machine.
    /// Cancellation at any point is silent.
    ///
    /// Completion events only ever yield presentation effects, so they are
    /// interpreted here directly; only fresh input can spawn a match.
    async fn run_match(self: &Arc<Self>, seq: u64, query: String, token: CancellationToken) {
        tokio::select! {
            () = token.cancelled() => return,
            () = tokio::time::sleep(self.debounce) => {}
        }

        match self.engine.query(&query, &token).await {
            Ok(outcome) => {
                let effects = {
                    let mut machine = self.machine.lock().await;
                    machine.handle(SessionEvent::MatchFinished { seq, outcome })
                };
                for effect in effects {
                    match effect {
                        Effect::Present { outcome } => self.present_outcome(&outcome),
                        Effect::ClearDisplay => self.sink.clear(),
                        Effect::CancelMatch { .. } | Effect::SpawnMatch { .. } => {}
                    }
                }
            }
            Err(_cancelled) => {
                tracing::trace!("Match #{} cancelled", seq);
            }
        }
    }

    fn present_outcome(&self, outcome: &QueryOutcome) {
        let rows: Vec<ResultRow> = outcome.groups.iter().map(ResultRow::from_group).collect();
        self.sink.present(&rows, outcome.partial);
    }
}
