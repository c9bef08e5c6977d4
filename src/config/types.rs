//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::errors::{EngineError, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Signal and decision parameters
    #[serde(default)]
    pub engine: EngineConfig,
    /// Narration throttle parameters
    #[serde(default)]
    pub narration: NarrationConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.narration.validate()
    }
}

/// Order in which the slope EMA folds over the slope window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaFoldOrder {
    /// Seed with the most recent slope and fold toward older ones
    #[default]
    NewestFirst,
    /// Seed with the oldest slope and fold toward the most recent
    Chronological,
}

/// Signal derivation and decision parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed instrument universe
    #[serde(default = "default_instruments")]
    pub instruments: Vec<String>,
    /// Capacity of the oscillator, slope and volume windows
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
    /// EMA period for the slope smoothing
    #[serde(default = "default_ema_period")]
    pub ema_period: usize,
    #[serde(default)]
    pub ema_fold_order: EmaFoldOrder,
    /// Volume must exceed mean volume times this factor to count as high
    #[serde(default = "default_volume_factor")]
    pub volume_factor: Decimal,
    /// Momentum above this is overbought
    #[serde(default = "default_overbought")]
    pub overbought: Decimal,
    /// Momentum below this is oversold
    #[serde(default = "default_oversold")]
    pub oversold: Decimal,
    /// Cap on a single instrument's share of total portfolio value
    #[serde(default = "default_max_position_fraction")]
    pub max_position_fraction: Decimal,
    /// Drawdown at or beyond which status narration flags the position
    #[serde(default = "default_significant_drawdown")]
    pub significant_drawdown: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instruments: default_instruments(),
            window_capacity: default_window_capacity(),
            ema_period: default_ema_period(),
            ema_fold_order: EmaFoldOrder::default(),
            volume_factor: default_volume_factor(),
            overbought: default_overbought(),
            oversold: default_oversold(),
            max_position_fraction: default_max_position_fraction(),
            significant_drawdown: default_significant_drawdown(),
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<()> {
        if self.instruments.is_empty() {
            return Err(EngineError::Configuration(
                "at least one instrument is required".to_string(),
            ));
        }
        if self.window_capacity < 2 {
            return Err(EngineError::Configuration(format!(
                "window_capacity must be at least 2, got {}",
                self.window_capacity
            )));
        }
        if self.ema_period == 0 {
            return Err(EngineError::Configuration(
                "ema_period must be positive".to_string(),
            ));
        }
        if self.max_position_fraction <= Decimal::ZERO || self.max_position_fraction > Decimal::ONE {
            return Err(EngineError::Configuration(format!(
                "max_position_fraction must be in (0, 1], got {}",
                self.max_position_fraction
            )));
        }
        Ok(())
    }
}

fn default_instruments() -> Vec<String> {
    [
        // Tech and AI equities
        "AAPL", "GOOG", "MSFT", "AMZN", "FB", "NVDA", "TSLA", "AMD", "INTC", "CRM", "ORCL", "CSCO",
        "IBM", "ADBE", "QCOM", "TXN", "SHOP", "SAP", "TWTR", "UBER",
        // Leveraged tech ETFs
        "TQQQ", "SOXL", "UPRO", "SPXL", "TECL", "FNGU",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_window_capacity() -> usize {
    10
}

fn default_ema_period() -> usize {
    10
}

fn default_volume_factor() -> Decimal {
    dec!(1.2)
}

fn default_overbought() -> Decimal {
    dec!(70)
}

fn default_oversold() -> Decimal {
    dec!(30)
}

fn default_max_position_fraction() -> Decimal {
    dec!(0.20)
}

fn default_significant_drawdown() -> Decimal {
    dec!(0.10)
}

/// Narration queue and worker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationConfig {
    /// Messages emitted per drain at most
    #[serde(default = "default_max_per_drain")]
    pub max_per_drain: usize,
    /// Minimum time between successful emissions in milliseconds
    #[serde(default = "default_min_interval")]
    pub min_interval_ms: u64,
    /// Worker drain cadence in milliseconds
    #[serde(default = "default_drain_interval")]
    pub drain_interval_ms: u64,
    /// Backlog depth that raises the queue alarm
    #[serde(default = "default_backlog_alarm")]
    pub backlog_alarm_threshold: usize,
    /// Longest the worker keeps flushing after shutdown, in milliseconds
    #[serde(default = "default_flush_timeout")]
    pub flush_timeout_ms: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            max_per_drain: default_max_per_drain(),
            min_interval_ms: default_min_interval(),
            drain_interval_ms: default_drain_interval(),
            backlog_alarm_threshold: default_backlog_alarm(),
            flush_timeout_ms: default_flush_timeout(),
        }
    }
}

impl NarrationConfig {
    fn validate(&self) -> Result<()> {
        if self.max_per_drain == 0 {
            return Err(EngineError::Configuration(
                "max_per_drain must be positive".to_string(),
            ));
        }
        if self.drain_interval_ms == 0 {
            return Err(EngineError::Configuration(
                "drain_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_max_per_drain() -> usize {
    2
}

fn default_min_interval() -> u64 {
    500
}

fn default_drain_interval() -> u64 {
    100
}

fn default_backlog_alarm() -> usize {
    1000
}

fn default_flush_timeout() -> u64 {
    30_000
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Buffer size of the feed event channel
    #[serde(default = "default_feed_channel_size")]
    pub feed_channel_size: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            feed_channel_size: default_feed_channel_size(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_feed_channel_size() -> usize {
    1000
}
