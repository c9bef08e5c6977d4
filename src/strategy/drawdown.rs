//! Peak position value per instrument, for drawdown narration only

use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::common::errors::{EngineError, Result};
use crate::common::types::MarketSnapshot;

/// Drawdown from peak, zero when no peak has been recorded
pub fn drawdown(max_value: Decimal, current_value: Decimal) -> Result<Decimal> {
    if max_value.is_zero() {
        return Ok(Decimal::ZERO);
    }
    max_value
        .checked_sub(current_value)
        .and_then(|fall| fall.checked_div(max_value))
        .ok_or(EngineError::Overflow("drawdown"))
}

/// Monotone high-water mark of `quantity * price` per instrument
#[derive(Debug, Clone, Default)]
pub struct DrawdownTracker {
    watermarks: HashMap<String, Decimal>,
    significant: Decimal,
}

impl DrawdownTracker {
    pub fn new<I, S>(symbols: I, significant: Decimal) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            watermarks: symbols.into_iter().map(|s| (s.into(), Decimal::ZERO)).collect(),
            significant,
        }
    }

    /// Raise the watermark if the current position value exceeds it
    pub fn observe(&mut self, snapshot: &MarketSnapshot) -> Result<Decimal> {
        let value = snapshot.position_value()?;
        let mark = self
            .watermarks
            .entry(snapshot.symbol.clone())
            .or_insert(Decimal::ZERO);
        if value > *mark {
            *mark = value;
        }
        Ok(*mark)
    }

    pub fn watermark(&self, symbol: &str) -> Decimal {
        self.watermarks.get(symbol).copied().unwrap_or_default()
    }

    /// Holdings narration for one instrument
    pub fn status_message(&self, snapshot: &MarketSnapshot) -> Result<String> {
        if !snapshot.invested {
            return Ok(format!(
                "Symbol: {}, Holdings: 0, Currently not invested. Awaiting favorable market conditions.",
                snapshot.symbol
            ));
        }

        let current = snapshot.position_value()?;
        let dd = drawdown(self.watermark(&snapshot.symbol), current)?;
        let dd_percent = dd
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(EngineError::Overflow("drawdown percent"))?;
        let note = if dd >= self.significant {
            "Significant drawdown, review position."
        } else {
            "Monitoring for portfolio optimization."
        };
        Ok(format!(
            "Symbol: {}, Holdings: {}, Current Value: ${:.2}, Drawdown: {:.2}%, {}",
            snapshot.symbol,
            snapshot.position_quantity,
            current.round_dp(2),
            dd_percent.round_dp(2),
            note
        ))
    }
}
