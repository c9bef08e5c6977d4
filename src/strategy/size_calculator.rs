use rust_decimal::Decimal;
use tracing::warn;

use crate::common::errors::{EngineError, Result};
use crate::common::traits::OrderSizer;
use crate::common::types::MarketSnapshot;

/// Cash sizing for a prospective buy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyBudget {
    /// Cap on this instrument's notional
    pub max_investment: Decimal,
    /// Cash to deploy on this order
    pub cash_to_invest: Decimal,
    /// `cash_to_invest` as a fraction of total portfolio value
    pub target_fraction: Decimal,
}

/// Cash available for a buy under the capped-fraction rule
///
/// `min(available_cash, total * max_fraction - current notional)`. Returns
/// `None` when there is nothing to invest or no portfolio value to size
/// against; insufficient funds are not an error.
pub fn buy_budget(snapshot: &MarketSnapshot, max_fraction: Decimal) -> Result<Option<BuyBudget>> {
    if snapshot.total_portfolio_value <= Decimal::ZERO {
        return Ok(None);
    }

    let max_investment = snapshot
        .total_portfolio_value
        .checked_mul(max_fraction)
        .ok_or(EngineError::Overflow("maximum investment"))?;
    let headroom = max_investment
        .checked_sub(snapshot.position_value()?)
        .ok_or(EngineError::Overflow("investment headroom"))?;
    let cash_to_invest = snapshot.available_cash.min(headroom);
    if cash_to_invest <= Decimal::ZERO {
        return Ok(None);
    }

    let target_fraction = cash_to_invest
        .checked_div(snapshot.total_portfolio_value)
        .ok_or(EngineError::Overflow("target fraction"))?;
    Ok(Some(BuyBudget {
        max_investment,
        cash_to_invest,
        target_fraction,
    }))
}

/// Sizes orders in whole units at the current price
///
/// `floor(target_fraction * total_portfolio_value / price)`, zero for a
/// non-positive price or a quantity too large to represent.
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeShareSizer;

impl OrderSizer for WholeShareSizer {
    fn order_quantity(&self, snapshot: &MarketSnapshot, target_fraction: Decimal) -> Decimal {
        if snapshot.price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let quantity = target_fraction
            .checked_mul(snapshot.total_portfolio_value)
            .and_then(|notional| notional.checked_div(snapshot.price));
        match quantity {
            Some(quantity) => quantity.floor().max(Decimal::ZERO),
            None => {
                warn!(symbol = %snapshot.symbol, price = %snapshot.price, "Order quantity overflowed, sizing to zero");
                Decimal::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(total: Decimal, cash: Decimal, quantity: Decimal, price: Decimal) -> MarketSnapshot {
        MarketSnapshot {
            symbol: "AAPL".to_string(),
            oscillator: dec!(5),
            oscillator_signal: dec!(3),
            momentum: dec!(20),
            price,
            volume: dec!(150),
            invested: false,
            position_quantity: quantity,
            position_avg_price: price,
            total_portfolio_value: total,
            available_cash: cash,
        }
    }

    #[test]
    fn test_budget_capped_by_available_cash() {
        // 5 units at 100 = 500 existing notional
        let snap = snapshot(dec!(10000), dec!(100), dec!(5), dec!(100));
        let budget = buy_budget(&snap, dec!(0.20)).unwrap().unwrap();
        assert_eq!(budget.max_investment, dec!(2000));
        assert_eq!(budget.cash_to_invest, dec!(100));
        assert_eq!(budget.target_fraction, dec!(0.01));
    }

    #[test]
    fn test_budget_capped_by_headroom() {
        let snap = snapshot(dec!(10000), dec!(5000), dec!(5), dec!(100));
        let budget = buy_budget(&snap, dec!(0.20)).unwrap().unwrap();
        assert_eq!(budget.cash_to_invest, dec!(1500));
    }

    #[test]
    fn test_no_budget_when_over_cap() {
        let snap = snapshot(dec!(10000), dec!(5000), dec!(30), dec!(100));
        assert_eq!(buy_budget(&snap, dec!(0.20)).unwrap(), None);
    }

    #[test]
    fn test_no_budget_without_cash_or_portfolio() {
        assert_eq!(
            buy_budget(&snapshot(dec!(10000), dec!(0), dec!(0), dec!(10)), dec!(0.2)).unwrap(),
            None
        );
        assert_eq!(
            buy_budget(&snapshot(dec!(0), dec!(0), dec!(0), dec!(10)), dec!(0.2)).unwrap(),
            None
        );
    }

    #[test]
    fn test_budget_overflow_is_an_error() {
        let huge = dec!(1_000_000_000_000_000);
        let snap = snapshot(dec!(10000), dec!(100), huge, huge);
        assert!(matches!(
            buy_budget(&snap, dec!(0.20)),
            Err(EngineError::Overflow("position value"))
        ));
    }

    #[test]
    fn test_whole_share_sizer_floors() {
        let snap = snapshot(dec!(10000), dec!(100), dec!(0), dec!(30));
        assert_eq!(WholeShareSizer.order_quantity(&snap, dec!(0.01)), dec!(3));
    }

    #[test]
    fn test_whole_share_sizer_zero_when_price_too_high() {
        let snap = snapshot(dec!(10000), dec!(100), dec!(0), dec!(150));
        assert_eq!(WholeShareSizer.order_quantity(&snap, dec!(0.01)), Decimal::ZERO);
    }

    #[test]
    fn test_whole_share_sizer_zero_on_overflow() {
        let snap = snapshot(Decimal::MAX, Decimal::MAX, dec!(0), dec!(0.0001));
        assert_eq!(WholeShareSizer.order_quantity(&snap, dec!(0.2)), Decimal::ZERO);
    }
}
