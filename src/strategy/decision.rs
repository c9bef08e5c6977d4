//! Sell-first, then buy decision rules

use rust_decimal::Decimal;

use super::types::{Decision, DecisionThresholds, IndicatorSnapshot, SellReason};

/// Evaluate one instrument
///
/// Sell rules only apply to held instruments and buy rules only to instruments
/// not held, so a single call can never produce both. A sell short-circuits
/// the buy check.
pub fn evaluate(
    indicators: &IndicatorSnapshot,
    invested: bool,
    thresholds: &DecisionThresholds,
) -> Decision {
    if invested {
        return match sell_reason(indicators, thresholds) {
            Some(reason) => Decision::Sell(reason),
            None => Decision::Hold,
        };
    }

    if should_buy(indicators, thresholds) {
        Decision::Buy
    } else {
        Decision::Hold
    }
}

fn sell_reason(indicators: &IndicatorSnapshot, thresholds: &DecisionThresholds) -> Option<SellReason> {
    if indicators.momentum > thresholds.overbought
        && indicators.is_high_volume(thresholds.volume_factor)
    {
        return Some(SellReason::OverboughtHighVolume);
    }

    // No smoothed slope yet means no trend signal
    match indicators.smoothed_slope {
        Some(slope) if slope <= Decimal::ZERO => Some(SellReason::NegativeSlope),
        _ => None,
    }
}

fn should_buy(indicators: &IndicatorSnapshot, thresholds: &DecisionThresholds) -> bool {
    // Only a positive difference can overflow once the crossover holds
    let spread = indicators
        .oscillator
        .checked_sub(indicators.oscillator_signal)
        .unwrap_or(Decimal::MAX);
    let bullish_cross = indicators.oscillator > indicators.oscillator_signal && spread > Decimal::ZERO;

    bullish_cross
        && indicators.momentum < thresholds.oversold
        && indicators.is_high_volume(thresholds.volume_factor)
}
