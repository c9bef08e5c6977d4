//! Decision making on top of the derived signals
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    TICK LOOP (sync)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MarketSnapshot per instrument                              │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  MetricStore: volume mean, oscillator slope, slope EMA      │
//! │  DrawdownTracker: position value watermark                  │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  decision::evaluate() → Sell / Buy / Hold                   │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  OrderExecutor.submit(Flatten | MarketBuy)                  │
//! │  NarrationQueue.push(...)                                   │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    OUT OF BAND (any thread)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  FillHandler.on_fill() ─ reads PurchaseLedger ─ narrates    │
//! │  NarrationWorker ─ drains the queue at a fixed cadence      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TradingEngine`]: owns per-instrument state and runs each tick
//! - [`decision::evaluate`]: pure sell-first-then-buy rules
//! - [`buy_budget`] and [`WholeShareSizer`]: capped-fraction buy sizing
//! - [`DrawdownTracker`]: peak value watermark and status narration
//! - [`FillHandler`]: reconciles fills against [`PurchaseLedger`]

pub mod decision;
mod drawdown;
mod engine;
mod execution;
mod fills;
mod size_calculator;
mod types;

pub use drawdown::{drawdown, DrawdownTracker};
pub use engine::TradingEngine;
pub use execution::{BoxedExecutor, BoxedSizer, LoggingExecutor};
pub use fills::{FillHandler, FillReport, PurchaseLedger};
pub use size_calculator::{buy_budget, BuyBudget, WholeShareSizer};
pub use types::{Decision, DecisionThresholds, IndicatorSnapshot, SellReason, TickReport};
