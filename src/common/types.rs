//! Boundary types exchanged with the surrounding trading platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::{EngineError, Result};

/// Per-instrument observation delivered once per scheduling tick
///
/// Indicator values are computed upstream; position and portfolio fields are
/// owned by the external portfolio and are read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Ticker symbol
    pub symbol: String,
    /// Oscillator (MACD-like) current value
    pub oscillator: Decimal,
    /// Oscillator signal-line value
    pub oscillator_signal: Decimal,
    /// Momentum oscillator (RSI-like), 0 to 100
    pub momentum: Decimal,
    /// Last traded price
    pub price: Decimal,
    /// Volume for this bar
    pub volume: Decimal,
    /// Whether the portfolio currently holds the instrument
    #[serde(default)]
    pub invested: bool,
    /// Held quantity
    #[serde(default)]
    pub position_quantity: Decimal,
    /// Average cost basis of the held quantity
    #[serde(default)]
    pub position_avg_price: Decimal,
    /// Total portfolio value (cash plus holdings)
    pub total_portfolio_value: Decimal,
    /// Cash available for new orders
    pub available_cash: Decimal,
}

impl MarketSnapshot {
    /// Current notional value of the held position
    pub fn position_value(&self) -> Result<Decimal> {
        self.position_quantity
            .checked_mul(self.price)
            .ok_or(EngineError::Overflow("position value"))
    }
}

/// Order instruction produced by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderIntent {
    /// Liquidate the whole position (target allocation 0)
    Flatten { symbol: String },
    /// Market buy for a fixed quantity
    MarketBuy { symbol: String, quantity: Decimal },
}

impl OrderIntent {
    pub fn symbol(&self) -> &str {
        match self {
            OrderIntent::Flatten { symbol } => symbol,
            OrderIntent::MarketBuy { symbol, .. } => symbol,
        }
    }
}

impl std::fmt::Display for OrderIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderIntent::Flatten { symbol } => write!(f, "FLATTEN {}", symbol),
            OrderIntent::MarketBuy { symbol, quantity } => {
                write!(f, "BUY {} x{}", symbol, quantity)
            }
        }
    }
}

/// Fill report from the execution collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillEvent {
    pub symbol: String,
    pub fill_price: Decimal,
    /// Positive = bought, negative = sold
    pub fill_quantity: Decimal,
}

/// Events carried by a market feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedEvent {
    /// One scheduling tick with a snapshot per instrument
    Tick { snapshots: Vec<MarketSnapshot> },
    /// Asynchronous fill notification
    Fill(FillEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_position_value() {
        let snapshot = MarketSnapshot {
            symbol: "AAPL".to_string(),
            oscillator: dec!(0),
            oscillator_signal: dec!(0),
            momentum: dec!(50),
            price: dec!(25),
            volume: dec!(100),
            invested: true,
            position_quantity: dec!(4),
            position_avg_price: dec!(20),
            total_portfolio_value: dec!(10000),
            available_cash: dec!(9900),
        };
        assert_eq!(snapshot.position_value().unwrap(), dec!(100));
    }

    #[test]
    fn test_position_value_overflow_is_an_error() {
        let snapshot = MarketSnapshot {
            symbol: "AAPL".to_string(),
            oscillator: dec!(0),
            oscillator_signal: dec!(0),
            momentum: dec!(50),
            price: dec!(1_000_000_000_000_000),
            volume: dec!(100),
            invested: true,
            position_quantity: dec!(1_000_000_000_000_000),
            position_avg_price: dec!(1),
            total_portfolio_value: dec!(10000),
            available_cash: dec!(0),
        };
        assert!(matches!(
            snapshot.position_value(),
            Err(EngineError::Overflow("position value"))
        ));
    }

    #[test]
    fn test_fill_event_deserialization() {
        let json = r#"{"type":"fill","symbol":"NVDA","fill_price":"101.5","fill_quantity":"-3"}"#;
        let event: FeedEvent = serde_json::from_str(json).unwrap();
        match event {
            FeedEvent::Fill(fill) => {
                assert_eq!(fill.symbol, "NVDA");
                assert_eq!(fill.fill_quantity, dec!(-3));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_order_intent_display() {
        let intent = OrderIntent::MarketBuy {
            symbol: "AMD".to_string(),
            quantity: dec!(7),
        };
        assert_eq!(intent.to_string(), "BUY AMD x7");
        assert_eq!(intent.symbol(), "AMD");
    }
}
