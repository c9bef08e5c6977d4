//! Per-instrument rolling metrics and the values derived from them

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::rolling_window::RollingWindow;
use super::{slope, volume};
use crate::common::errors::{EngineError, Result};
use crate::config::types::EmaFoldOrder;

/// Named rolling window kept for every instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Oscillator,
    Slope,
    Volume,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Oscillator => write!(f, "oscillator"),
            Channel::Slope => write!(f, "slope"),
            Channel::Volume => write!(f, "volume"),
        }
    }
}

/// Values derived on the latest update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedSignals {
    /// Slope of this tick, absent before two oscillator values exist
    pub slope: Option<Decimal>,
    /// EMA of the slope window, absent until it is full
    pub smoothed_slope: Option<Decimal>,
    /// Trailing mean volume, absent for an empty volume window
    pub mean_volume: Option<Decimal>,
}

/// Rolling windows and derived values of a single instrument
#[derive(Debug, Clone)]
pub struct InstrumentMetrics {
    oscillator: RollingWindow<Decimal>,
    slopes: RollingWindow<Decimal>,
    volumes: RollingWindow<Decimal>,
    derived: DerivedSignals,
}

impl InstrumentMetrics {
    pub fn new(capacity: usize) -> Self {
        Self {
            oscillator: RollingWindow::new(capacity),
            slopes: RollingWindow::new(capacity),
            volumes: RollingWindow::new(capacity),
            derived: DerivedSignals::default(),
        }
    }

    pub fn window(&self, channel: Channel) -> &RollingWindow<Decimal> {
        match channel {
            Channel::Oscillator => &self.oscillator,
            Channel::Slope => &self.slopes,
            Channel::Volume => &self.volumes,
        }
    }

    fn window_mut(&mut self, channel: Channel) -> &mut RollingWindow<Decimal> {
        match channel {
            Channel::Oscillator => &mut self.oscillator,
            Channel::Slope => &mut self.slopes,
            Channel::Volume => &mut self.volumes,
        }
    }

    pub fn derived(&self) -> DerivedSignals {
        self.derived
    }
}

/// Rolling metric store for a fixed instrument set
///
/// Records are created once at construction; lookups for any other symbol
/// fail with `UnknownInstrument`.
#[derive(Debug, Clone)]
pub struct MetricStore {
    instruments: HashMap<String, InstrumentMetrics>,
    ema_period: usize,
    fold_order: EmaFoldOrder,
}

impl MetricStore {
    pub fn new<I, S>(symbols: I, capacity: usize, ema_period: usize, fold_order: EmaFoldOrder) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let instruments = symbols
            .into_iter()
            .map(|s| (s.into(), InstrumentMetrics::new(capacity)))
            .collect();
        Self {
            instruments,
            ema_period,
            fold_order,
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.instruments.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn metrics(&self, symbol: &str) -> Result<&InstrumentMetrics> {
        self.instruments
            .get(symbol)
            .ok_or_else(|| EngineError::UnknownInstrument(symbol.to_string()))
    }

    fn metrics_mut(&mut self, symbol: &str) -> Result<&mut InstrumentMetrics> {
        self.instruments
            .get_mut(symbol)
            .ok_or_else(|| EngineError::UnknownInstrument(symbol.to_string()))
    }

    /// Append to a channel, evicting its oldest value when full
    pub fn push(&mut self, symbol: &str, channel: Channel, value: Decimal) -> Result<()> {
        self.metrics_mut(symbol)?.window_mut(channel).push(value);
        Ok(())
    }

    /// Value at `index` from the most recent entry of a channel
    pub fn get(&self, symbol: &str, channel: Channel, index: usize) -> Result<Decimal> {
        self.metrics(symbol)?.window(channel).get(index)
    }

    pub fn count(&self, symbol: &str, channel: Channel) -> Result<usize> {
        Ok(self.metrics(symbol)?.window(channel).count())
    }

    /// Record this tick's volume and refresh the trailing mean
    pub fn update_volume(&mut self, symbol: &str, current: Decimal) -> Result<Option<Decimal>> {
        let metrics = self.metrics_mut(symbol)?;
        metrics.volumes.push(current);
        metrics.derived.mean_volume = volume::mean_volume(&metrics.volumes)?;
        Ok(metrics.derived.mean_volume)
    }

    /// Record this tick's oscillator value, then derive slope and smoothed slope
    ///
    /// The smoothed slope keeps its last value on ticks where it is not
    /// recomputed.
    pub fn update_oscillator(&mut self, symbol: &str, value: Decimal) -> Result<DerivedSignals> {
        let (period, order) = (self.ema_period, self.fold_order);
        let metrics = self.metrics_mut(symbol)?;
        metrics.oscillator.push(value);

        metrics.derived.slope = slope::first_difference(&metrics.oscillator)?;
        if let Some(current) = metrics.derived.slope {
            metrics.slopes.push(current);
            if let Some(ema) = slope::smoothed_slope(&metrics.slopes, period, order)? {
                metrics.derived.smoothed_slope = Some(ema);
            }
        }
        Ok(metrics.derived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn store() -> MetricStore {
        MetricStore::new(["AAPL", "MSFT"], 10, 10, EmaFoldOrder::NewestFirst)
    }

    #[test]
    fn test_push_get_count_per_channel() {
        let mut store = store();
        store.push("AAPL", Channel::Volume, dec!(10)).unwrap();
        store.push("AAPL", Channel::Volume, dec!(20)).unwrap();

        assert_eq!(store.count("AAPL", Channel::Volume).unwrap(), 2);
        assert_eq!(store.count("AAPL", Channel::Oscillator).unwrap(), 0);
        assert_eq!(store.get("AAPL", Channel::Volume, 0).unwrap(), dec!(20));
        assert_eq!(store.count("MSFT", Channel::Volume).unwrap(), 0);
    }

    #[test]
    fn test_get_beyond_occupancy_fails() {
        let store = store();
        assert!(matches!(
            store.get("AAPL", Channel::Slope, 0),
            Err(EngineError::IndexOutOfRange { index: 0, count: 0 })
        ));
    }

    #[test]
    fn test_unknown_instrument() {
        let mut store = store();
        assert!(matches!(
            store.push("GME", Channel::Oscillator, dec!(1)),
            Err(EngineError::UnknownInstrument(_))
        ));
    }

    #[test]
    fn test_first_oscillator_value_has_no_slope() {
        let mut store = store();
        let derived = store.update_oscillator("AAPL", dec!(0.5)).unwrap();
        assert_eq!(derived.slope, None);
        assert_eq!(store.count("AAPL", Channel::Slope).unwrap(), 0);
    }

    #[test]
    fn test_slope_pushed_from_second_value() {
        let mut store = store();
        store.update_oscillator("AAPL", dec!(0.5)).unwrap();
        let derived = store.update_oscillator("AAPL", dec!(0.2)).unwrap();
        assert_eq!(derived.slope, Some(dec!(-0.3)));
        assert_eq!(store.get("AAPL", Channel::Slope, 0).unwrap(), dec!(-0.3));
    }

    #[test]
    fn test_smoothed_slope_appears_when_slope_window_fills() {
        let mut store = store();
        // 10 oscillator values give 9 slopes
        for i in 0..10 {
            let derived = store.update_oscillator("AAPL", Decimal::from(i)).unwrap();
            assert_eq!(derived.smoothed_slope, None);
        }
        let derived = store.update_oscillator("AAPL", dec!(10)).unwrap();
        assert_eq!(store.count("AAPL", Channel::Slope).unwrap(), 10);
        assert_eq!(derived.smoothed_slope, Some(Decimal::ONE));
    }

    #[test]
    fn test_volume_mean_tracks_window() {
        let mut store = store();
        assert_eq!(store.update_volume("MSFT", dec!(100)).unwrap(), Some(dec!(100)));
        assert_eq!(store.update_volume("MSFT", dec!(300)).unwrap(), Some(dec!(200)));
        assert_eq!(store.metrics("MSFT").unwrap().derived().mean_volume, Some(dec!(200)));
    }
}
