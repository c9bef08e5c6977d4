//! MomentumSignals Library
//!
//! A streaming decision engine turning per-instrument oscillator, momentum
//! and volume observations into buy/sell intents, with rate-limited
//! narration of every decision and fill.

pub mod common;
pub mod config;
pub mod feed;
pub mod narration;
pub mod signals;
pub mod strategy;

// Re-export commonly used types
pub use common::errors::{EngineError, Result};
pub use common::traits::{MarketFeed, NarrationSink, OrderExecutor, OrderSizer};
pub use common::types::{FeedEvent, FillEvent, MarketSnapshot, OrderIntent};
pub use config::types::AppConfig;
pub use feed::JsonLinesFeed;
pub use narration::{NarrationQueue, NarrationWorker, TracingSink};
pub use signals::{Channel, MetricStore, RollingWindow};

// Strategy types
pub use strategy::{
    Decision, FillHandler, IndicatorSnapshot, LoggingExecutor, SellReason, TickReport,
    TradingEngine, WholeShareSizer,
};
