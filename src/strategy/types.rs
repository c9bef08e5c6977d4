use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::types::{MarketSnapshot, OrderIntent};
use crate::config::types::EngineConfig;
use crate::signals::{volume, DerivedSignals};

/// Indicator values for one instrument on one tick
///
/// Built fresh every tick from the market snapshot and the rolling windows.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub oscillator: Decimal,
    pub oscillator_signal: Decimal,
    pub momentum: Decimal,
    pub volume: Decimal,
    pub mean_volume: Option<Decimal>,
    pub slope: Option<Decimal>,
    pub smoothed_slope: Option<Decimal>,
    pub price: Decimal,
}

impl IndicatorSnapshot {
    pub fn from_market(snapshot: &MarketSnapshot, derived: DerivedSignals) -> Self {
        Self {
            oscillator: snapshot.oscillator,
            oscillator_signal: snapshot.oscillator_signal,
            momentum: snapshot.momentum,
            volume: snapshot.volume,
            mean_volume: derived.mean_volume,
            slope: derived.slope,
            smoothed_slope: derived.smoothed_slope,
            price: snapshot.price,
        }
    }

    pub fn is_high_volume(&self, factor: Decimal) -> bool {
        volume::is_high_volume(self.volume, self.mean_volume, factor)
    }
}

/// Thresholds used by the decision rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionThresholds {
    pub overbought: Decimal,
    pub oversold: Decimal,
    pub volume_factor: Decimal,
}

impl From<&EngineConfig> for DecisionThresholds {
    fn from(config: &EngineConfig) -> Self {
        Self {
            overbought: config.overbought,
            oversold: config.oversold,
            volume_factor: config.volume_factor,
        }
    }
}

/// Why a sell fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellReason {
    /// Momentum above the overbought level on high volume
    OverboughtHighVolume,
    /// Smoothed oscillator slope at or below zero
    NegativeSlope,
}

impl std::fmt::Display for SellReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SellReason::OverboughtHighVolume => write!(f, "overbought momentum and high volume"),
            SellReason::NegativeSlope => write!(f, "non-positive smoothed oscillator slope"),
        }
    }
}

/// Verdict for one instrument on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No action should be taken
    Hold,
    /// Flatten the position
    Sell(SellReason),
    /// Open a position
    Buy,
}

impl Decision {
    pub fn is_hold(&self) -> bool {
        matches!(self, Self::Hold)
    }
}

/// Result of processing one tick across all instruments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Intents submitted, in instrument order
    pub intents: Vec<OrderIntent>,
    /// Instruments evaluated without error
    pub evaluated: usize,
    /// Instruments whose processing failed
    pub failures: Vec<String>,
}
