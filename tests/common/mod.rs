//! Common test utilities and fixtures

#![allow(dead_code)]

use momentum_signals::config::types::{EngineConfig, NarrationConfig};
use momentum_signals::{
    MarketSnapshot, NarrationQueue, OrderExecutor, OrderIntent, OrderSizer, TradingEngine,
    WholeShareSizer,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

/// Executor that records every submitted intent
#[derive(Clone, Default)]
pub struct RecordingExecutor {
    submitted: Arc<Mutex<Vec<OrderIntent>>>,
}

impl RecordingExecutor {
    pub fn submitted(&self) -> Vec<OrderIntent> {
        self.submitted.lock().unwrap().clone()
    }
}

impl OrderExecutor for RecordingExecutor {
    fn submit(&self, intent: &OrderIntent) -> momentum_signals::Result<()> {
        self.submitted.lock().unwrap().push(intent.clone());
        Ok(())
    }
}

/// Sizer returning a fixed quantity and remembering the fractions it was asked for
#[derive(Clone)]
pub struct FixedSizer {
    quantity: Decimal,
    fractions: Arc<Mutex<Vec<Decimal>>>,
}

impl FixedSizer {
    pub fn new(quantity: Decimal) -> Self {
        Self {
            quantity,
            fractions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn fractions(&self) -> Vec<Decimal> {
        self.fractions.lock().unwrap().clone()
    }
}

impl OrderSizer for FixedSizer {
    fn order_quantity(&self, _snapshot: &MarketSnapshot, target_fraction: Decimal) -> Decimal {
        self.fractions.lock().unwrap().push(target_fraction);
        self.quantity
    }
}

pub fn engine_config(symbols: &[&str]) -> EngineConfig {
    EngineConfig {
        instruments: symbols.iter().map(|s| s.to_string()).collect(),
        ..EngineConfig::default()
    }
}

/// Engine with a recording executor and whole-share sizing
pub fn recording_engine(symbols: &[&str]) -> (TradingEngine, RecordingExecutor) {
    let executor = RecordingExecutor::default();
    let engine = TradingEngine::new(
        engine_config(symbols),
        NarrationQueue::new(&NarrationConfig::default()),
        Box::new(executor.clone()),
        Box::new(WholeShareSizer),
    );
    (engine, executor)
}

/// Neutral snapshot: no crossover, neutral momentum, volume 100
pub fn quiet_snapshot(symbol: &str) -> MarketSnapshot {
    MarketSnapshot {
        symbol: symbol.to_string(),
        oscillator: dec!(1),
        oscillator_signal: dec!(1),
        momentum: dec!(50),
        price: dec!(50),
        volume: dec!(100),
        invested: false,
        position_quantity: Decimal::ZERO,
        position_avg_price: Decimal::ZERO,
        total_portfolio_value: dec!(10000),
        available_cash: dec!(10000),
    }
}

/// Feed `ticks` quiet snapshots so the mean volume settles at 100
pub fn settle_volume(engine: &mut TradingEngine, symbol: &str, ticks: usize) {
    for _ in 0..ticks {
        engine.on_tick(&[quiet_snapshot(symbol)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_snapshot_is_flat() {
        let snap = quiet_snapshot("AAPL");
        assert_eq!(snap.oscillator, snap.oscillator_signal);
        assert!(!snap.invested);
    }
}
