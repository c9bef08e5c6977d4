//! MomentumSignals - Main Entry Point
//!
//! Replays a JSON-lines feed of ticks and fills through the decision engine,
//! logging order intents and emitting throttled narration.

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use momentum_signals::common::channels::create_feed_channel;
use momentum_signals::config::load_config;
use momentum_signals::feed::spawn_feed;
use momentum_signals::{
    FeedEvent, JsonLinesFeed, LoggingExecutor, MarketSnapshot, NarrationQueue, NarrationWorker,
    TracingSink, TradingEngine, WholeShareSizer,
};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "APP_LOG_LEVEL")]
    log_level: Option<String>,

    /// JSON-lines feed of tick and fill events (stdin when omitted)
    #[arg(short, long)]
    feed: Option<String>,

    /// Comma-separated instrument list overriding the configured universe
    #[arg(long)]
    symbols: Option<String>,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(Some(&args.config)).context("loading configuration")?;
    if let Some(symbols) = &args.symbols {
        config.engine.instruments = symbols
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        config.validate().context("validating --symbols")?;
    }

    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.settings.log_level));
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting MomentumSignals");
    info!("Configuration file: {}", args.config);
    info!(instruments = config.engine.instruments.len(), "Instrument universe loaded");

    let narration = NarrationQueue::new(&config.narration);
    let worker = NarrationWorker::spawn(
        narration.clone(),
        Arc::new(TracingSink),
        Duration::from_millis(config.narration.drain_interval_ms),
        Duration::from_millis(config.narration.flush_timeout_ms),
    );

    let mut engine = TradingEngine::new(
        config.engine.clone(),
        narration.clone(),
        Box::new(LoggingExecutor),
        Box::new(WholeShareSizer),
    );
    let fills = engine.fill_handler();

    let (tx, mut rx) = create_feed_channel(config.settings.feed_channel_size);
    let feed_task = match &args.feed {
        Some(path) => spawn_feed(JsonLinesFeed::open(path).await?, tx),
        None => spawn_feed(JsonLinesFeed::stdin(), tx),
    };

    let mut last_seen: HashMap<String, MarketSnapshot> = HashMap::new();
    let mut pending_fills = JoinSet::new();
    let mut ticks = 0usize;
    let mut intents = 0usize;
    let mut interrupted = false;

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(FeedEvent::Tick { snapshots }) => {
                        let report = engine.on_tick(&snapshots);
                        ticks += 1;
                        intents += report.intents.len();
                        for snapshot in snapshots {
                            last_seen.insert(snapshot.symbol.clone(), snapshot);
                        }
                    }
                    Some(FeedEvent::Fill(fill)) => {
                        // Fills arrive out of band, as they would from a broker callback
                        let handler = fills.clone();
                        pending_fills.spawn_blocking(move || handler.on_fill(&fill));
                    }
                    None => break,
                }
            }
            Some(finished) = pending_fills.join_next(), if !pending_fills.is_empty() => {
                if let Err(e) = finished {
                    warn!("Fill handler task failed: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal, cleaning up...");
                interrupted = true;
                break;
            }
        }
    }

    drop(rx);
    if interrupted {
        feed_task.abort();
    }
    match feed_task.await {
        Ok(Ok(forwarded)) => info!(forwarded, "Feed finished"),
        Ok(Err(e)) => warn!("Feed stopped early: {}", e),
        Err(e) => warn!("Feed task aborted: {}", e),
    }

    while let Some(finished) = pending_fills.join_next().await {
        if let Err(e) = finished {
            warn!("Fill handler task failed: {}", e);
        }
    }

    for symbol in engine.instruments() {
        if let Some(snapshot) = last_seen.get(symbol) {
            if let Err(e) = engine.narrate_status(snapshot) {
                warn!(symbol = %symbol, "Status narration failed: {}", e);
            }
        }
    }

    info!(ticks, intents, pending = narration.depth(), "Replay complete, flushing narration");
    worker.shutdown().await?;

    Ok(())
}
