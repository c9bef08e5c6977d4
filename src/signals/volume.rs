//! Trailing mean volume and the high-volume predicate

use rust_decimal::Decimal;

use super::rolling_window::RollingWindow;
use crate::common::errors::{EngineError, Result};

/// Arithmetic mean of the occupied entries, absent for an empty window
pub fn mean_volume(volumes: &RollingWindow<Decimal>) -> Result<Option<Decimal>> {
    if volumes.is_empty() {
        return Ok(None);
    }
    let total = volumes
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or(EngineError::Overflow("volume sum"))?;
    Ok(Some(total / Decimal::from(volumes.count() as u64)))
}

/// `current > mean * factor`; false without a baseline
///
/// A threshold too large to represent is never exceeded.
pub fn is_high_volume(current: Decimal, mean: Option<Decimal>, factor: Decimal) -> bool {
    match mean.and_then(|mean| mean.checked_mul(factor)) {
        Some(threshold) => current > threshold,
        None => false,
    }
}
