//! Oscillator slope and its exponential smoothing

use rust_decimal::Decimal;

use super::rolling_window::RollingWindow;
use crate::common::errors::{EngineError, Result};
use crate::config::types::EmaFoldOrder;

/// First difference of the two most recent oscillator values
///
/// Absent while fewer than two values have been observed.
pub fn first_difference(oscillator: &RollingWindow<Decimal>) -> Result<Option<Decimal>> {
    if oscillator.count() < 2 {
        return Ok(None);
    }
    oscillator
        .get(0)?
        .checked_sub(oscillator.get(1)?)
        .map(Some)
        .ok_or(EngineError::Overflow("oscillator slope"))
}

/// Smoothing factor `2 / (period + 1)`
pub fn smoothing_factor(period: usize) -> Decimal {
    Decimal::TWO / Decimal::from(period as u64 + 1)
}

/// EMA over the whole slope window, absent until the window is full
///
/// `NewestFirst` seeds the accumulator with index 0 and folds through
/// indices 1..count-1. `Chronological` seeds with the oldest entry and
/// folds toward index 0.
pub fn smoothed_slope(
    slopes: &RollingWindow<Decimal>,
    period: usize,
    order: EmaFoldOrder,
) -> Result<Option<Decimal>> {
    if !slopes.is_full() {
        return Ok(None);
    }
    let k = smoothing_factor(period);
    match order {
        EmaFoldOrder::NewestFirst => fold(slopes.iter().copied(), k),
        EmaFoldOrder::Chronological => fold(slopes.iter().rev().copied(), k),
    }
}

fn fold(mut values: impl Iterator<Item = Decimal>, k: Decimal) -> Result<Option<Decimal>> {
    let Some(seed) = values.next() else {
        return Ok(None);
    };
    let decay = Decimal::ONE - k;
    values
        .try_fold(seed, |ema, value| {
            value.checked_mul(k)?.checked_add(ema.checked_mul(decay)?)
        })
        .map(Some)
        .ok_or(EngineError::Overflow("smoothed slope"))
}
