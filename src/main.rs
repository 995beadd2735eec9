use clap::Parser;
use docsearch::cli::{Cli, Commands};
use docsearch::config::EngineConfig;
use docsearch::engine::SearchEngine;
use docsearch::session::{QuerySession, ResultRow, ResultSink, SessionState};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// Prints presentations to stdout, one line per result group.
struct TerminalSink;

impl TerminalSink {
    fn print_rows(rows: &[ResultRow], partial: bool) {
        if rows.is_empty() {
            println!("(no matches)");
        }
        for row in rows {
            let qualified = row.kind.qualified(&row.scope, &row.display);
            println!("{:<10} {}", row.kind.label(), qualified);
            for target in &row.targets {
                let anchor = if target.anchor.is_empty() {
                    String::new()
                } else {
                    format!("#{}", target.anchor)
                };
                let signature = target.signature.as_deref().unwrap_or("");
                println!("           -> {}{} {}", target.page, anchor, signature);
            }
        }
        if partial {
            println!("(partial: one or more index shards failed to load)");
        }
    }
}

impl ResultSink for TerminalSink {
    fn present(&self, rows: &[ResultRow], partial: bool) {
        Self::print_rows(rows, partial);
    }

    fn clear(&self) {
        println!("(cleared)");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docsearch::tracing::init();

    let cli = Cli::parse();

    let mut config = EngineConfig::load(cli.config.as_deref())?;
    if let Some(shard_dir) = cli.shard_dir {
        config.shard_dir = shard_dir;
    }
    if let Some(limit) = cli.limit {
        config.max_results = limit;
    }

    let engine = Arc::new(SearchEngine::new(&config));

    match cli.command {
        Commands::Query { text } => {
            let outcome = engine.query(&text, &CancellationToken::new()).await?;
            let rows: Vec<ResultRow> = outcome.groups.iter().map(ResultRow::from_group).collect();
            TerminalSink::print_rows(&rows, outcome.partial);
        }
        Commands::Interactive => {
            let session = QuerySession::new(engine, Arc::new(TerminalSink), config.debounce());

            tracing::info!("Interactive session started (EOF to exit)");
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                session.input(line.trim_end()).await;
            }

            // Let an in-flight match settle before tearing the session down.
            while matches!(session.state().await, SessionState::Pending { .. }) {
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
        }
    }

    Ok(())
}
