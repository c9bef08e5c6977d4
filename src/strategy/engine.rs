//! Per-tick orchestration of signal updates, decisions and order intents

use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

use super::decision;
use super::drawdown::DrawdownTracker;
use super::execution::{BoxedExecutor, BoxedSizer};
use super::fills::{FillHandler, PurchaseLedger};
use super::size_calculator::buy_budget;
use super::types::{Decision, DecisionThresholds, IndicatorSnapshot, SellReason, TickReport};
use crate::common::errors::{EngineError, Result};
use crate::common::types::{MarketSnapshot, OrderIntent};
use crate::config::types::EngineConfig;
use crate::narration::NarrationQueue;
use crate::signals::MetricStore;

/// Decision engine for a fixed instrument set
///
/// Owns every per-instrument history. The purchase price ledger and the
/// narration queue are shared with [`FillHandler`]s handed out by
/// [`TradingEngine::fill_handler`].
pub struct TradingEngine {
    config: EngineConfig,
    thresholds: DecisionThresholds,
    store: MetricStore,
    drawdown: DrawdownTracker,
    ledger: PurchaseLedger,
    narration: NarrationQueue,
    executor: BoxedExecutor,
    sizer: BoxedSizer,
}

impl TradingEngine {
    pub fn new(
        config: EngineConfig,
        narration: NarrationQueue,
        executor: BoxedExecutor,
        sizer: BoxedSizer,
    ) -> Self {
        let store = MetricStore::new(
            config.instruments.iter().cloned(),
            config.window_capacity,
            config.ema_period,
            config.ema_fold_order,
        );
        let drawdown =
            DrawdownTracker::new(config.instruments.iter().cloned(), config.significant_drawdown);
        Self {
            thresholds: DecisionThresholds::from(&config),
            config,
            store,
            drawdown,
            ledger: PurchaseLedger::new(),
            narration,
            executor,
            sizer,
        }
    }

    /// Handler for asynchronous fill reports, sharing this engine's ledger
    pub fn fill_handler(&self) -> FillHandler {
        FillHandler::new(self.ledger.clone(), self.narration.clone())
    }

    pub fn narration(&self) -> &NarrationQueue {
        &self.narration
    }

    pub fn metrics(&self) -> &MetricStore {
        &self.store
    }

    pub fn drawdown(&self) -> &DrawdownTracker {
        &self.drawdown
    }

    pub fn purchase_ledger(&self) -> &PurchaseLedger {
        &self.ledger
    }

    pub fn instruments(&self) -> &[String] {
        &self.config.instruments
    }

    /// Process one scheduling tick
    ///
    /// A failure on one instrument is logged and narrated, and processing
    /// continues with the next. Only the first snapshot of a symbol is
    /// processed; repeats are reported as failures.
    #[instrument(skip_all, fields(instruments = snapshots.len()))]
    pub fn on_tick(&mut self, snapshots: &[MarketSnapshot]) -> TickReport {
        let mut report = TickReport::default();
        let mut seen = HashSet::with_capacity(snapshots.len());

        for snapshot in snapshots {
            let outcome = if seen.insert(snapshot.symbol.as_str()) {
                self.process_instrument(snapshot)
            } else {
                Err(EngineError::DuplicateSnapshot(snapshot.symbol.clone()))
            };
            match outcome {
                Ok(intent) => {
                    report.evaluated += 1;
                    report.intents.extend(intent);
                }
                Err(e) => {
                    warn!(symbol = %snapshot.symbol, "Instrument processing failed: {}", e);
                    self.narration
                        .push(format!("Skipping {} this tick: {}", snapshot.symbol, e));
                    report.failures.push(snapshot.symbol.clone());
                }
            }
        }

        debug!(
            evaluated = report.evaluated,
            intents = report.intents.len(),
            failures = report.failures.len(),
            "Tick processed"
        );
        report
    }

    /// Update histories for one instrument, decide, and act on the decision
    pub fn process_instrument(&mut self, snapshot: &MarketSnapshot) -> Result<Option<OrderIntent>> {
        let symbol = snapshot.symbol.as_str();

        self.store.update_volume(symbol, snapshot.volume)?;
        let derived = self.store.update_oscillator(symbol, snapshot.oscillator)?;
        self.drawdown.observe(snapshot)?;

        let indicators = IndicatorSnapshot::from_market(snapshot, derived);
        match decision::evaluate(&indicators, snapshot.invested, &self.thresholds) {
            Decision::Hold => Ok(None),
            Decision::Sell(reason) => self.sell(snapshot, reason).map(Some),
            Decision::Buy => self.buy(snapshot),
        }
    }

    fn sell(&self, snapshot: &MarketSnapshot, reason: SellReason) -> Result<OrderIntent> {
        self.narration
            .push(format!("Selling {} due to {}.", snapshot.symbol, reason));

        let intent = OrderIntent::Flatten {
            symbol: snapshot.symbol.clone(),
        };
        self.executor.submit(&intent)?;

        info!(symbol = %snapshot.symbol, %reason, "Flatten submitted");
        self.narration.push(format!(
            "Selling {} at ${:.2} due to {}. Detailed gain/loss metrics will be calculated upon order fill.",
            snapshot.symbol,
            snapshot.price.round_dp(2),
            reason
        ));
        Ok(intent)
    }

    fn buy(&self, snapshot: &MarketSnapshot) -> Result<Option<OrderIntent>> {
        let Some(budget) = buy_budget(snapshot, self.config.max_position_fraction)? else {
            debug!(symbol = %snapshot.symbol, "Buy signal without investable cash");
            return Ok(None);
        };

        let quantity = self.sizer.order_quantity(snapshot, budget.target_fraction);
        if quantity <= Decimal::ZERO {
            debug!(
                symbol = %snapshot.symbol,
                cash = %budget.cash_to_invest,
                "Buy signal sized to zero quantity"
            );
            return Ok(None);
        }

        let intent = OrderIntent::MarketBuy {
            symbol: snapshot.symbol.clone(),
            quantity,
        };
        self.executor.submit(&intent)?;
        self.ledger.record(&snapshot.symbol, snapshot.price);

        info!(symbol = %snapshot.symbol, %quantity, "Market buy submitted");
        self.narration.push(format!(
            "Buying {} due to bullish oscillator crossover, oversold momentum, and high volume.",
            snapshot.symbol
        ));
        self.narration.push(format!(
            "Buy order for {}: Quantity: {} at ${:.2}. Reason: bullish crossover on high volume.",
            snapshot.symbol,
            quantity,
            snapshot.price.round_dp(2)
        ));
        Ok(Some(intent))
    }

    /// Narrate holdings and drawdown for one instrument on demand
    pub fn narrate_status(&self, snapshot: &MarketSnapshot) -> Result<()> {
        self.narration.push(self.drawdown.status_message(snapshot)?);
        Ok(())
    }
}
