//! Fill reconciliation against recorded purchase prices

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::common::errors::{EngineError, Result};
use crate::common::types::FillEvent;
use crate::narration::NarrationQueue;

/// Price recorded at buy time per instrument, shared with the fill handler
///
/// Entries are overwritten by later buys and never cleared.
#[derive(Debug, Clone, Default)]
pub struct PurchaseLedger {
    prices: Arc<Mutex<HashMap<String, Decimal>>>,
}

impl PurchaseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Decimal>> {
        self.prices.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, symbol: &str, price: Decimal) {
        self.lock().insert(symbol.to_string(), price);
    }

    pub fn get(&self, symbol: &str) -> Option<Decimal> {
        self.lock().get(symbol).copied()
    }
}

/// Gain or loss of a fill relative to the recorded purchase price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    pub reference_price: Decimal,
    pub gain_loss: Decimal,
    pub gain_loss_percent: Decimal,
}

impl FillReport {
    /// Without a recorded price the fill price is its own reference
    pub fn compute(fill: &FillEvent, recorded: Option<Decimal>) -> Result<Self> {
        let reference_price = recorded.unwrap_or(fill.fill_price);
        let gain_loss = fill
            .fill_price
            .checked_sub(reference_price)
            .and_then(|diff| diff.checked_mul(fill.fill_quantity.abs()))
            .ok_or(EngineError::Overflow("fill gain/loss"))?;
        let gain_loss_percent = if reference_price.is_zero() {
            Decimal::ZERO
        } else {
            fill.fill_price
                .checked_div(reference_price)
                .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or(EngineError::Overflow("fill gain/loss percent"))?
        };
        Ok(Self {
            reference_price,
            gain_loss,
            gain_loss_percent,
        })
    }
}

/// Handles fill notifications from the execution collaborator
///
/// Cheap to clone and safe to call from any thread while the tick loop runs.
#[derive(Debug, Clone)]
pub struct FillHandler {
    ledger: PurchaseLedger,
    narration: NarrationQueue,
}

impl FillHandler {
    pub fn new(ledger: PurchaseLedger, narration: NarrationQueue) -> Self {
        Self { ledger, narration }
    }

    /// Narrate a fill; gain/loss is left out when it cannot be computed
    pub fn on_fill(&self, fill: &FillEvent) {
        let direction = if fill.fill_quantity > Decimal::ZERO {
            "bought"
        } else {
            "sold"
        };
        let report = match FillReport::compute(fill, self.ledger.get(&fill.symbol)) {
            Ok(report) => report,
            Err(e) => {
                warn!(symbol = %fill.symbol, "Fill reconciliation failed: {}", e);
                self.narration.push(format!(
                    "Order filled: {} {}, Quantity: {}, Fill Price: {}. Gain/Loss unavailable.",
                    fill.symbol, direction, fill.fill_quantity, fill.fill_price
                ));
                return;
            }
        };
        debug!(symbol = %fill.symbol, gain_loss = %report.gain_loss, "Fill reconciled");

        self.narration.push(format!(
            "Order filled: {} {}, Quantity: {}, Fill Price: {}. Gain/Loss: ${:.2} ({:.2}%).",
            fill.symbol,
            direction,
            fill.fill_quantity,
            fill.fill_price,
            report.gain_loss.round_dp(2),
            report.gain_loss_percent.round_dp(2)
        ));
    }
}
