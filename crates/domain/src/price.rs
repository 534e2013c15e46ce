//! Fiat price models with optional projected growth.
//!
//! Prices are a reporting concern: they convert fiat-denominated investment
//! amounts to native units and value final balances, but never feed back into
//! the native-unit simulation math.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Compounding growth of the fiat unit price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthSpec {
    /// Growth per period as a fraction (0.05 = 5%).
    pub rate: Decimal,
    /// Period length in days the rate is quoted over.
    pub period_days: u32,
}

/// Fiat unit price of the staked asset, optionally growing over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceModel {
    /// Unit price at day 0.
    pub initial_price: Decimal,
    /// Optional projected appreciation.
    pub growth: Option<GrowthSpec>,
}

impl PriceModel {
    /// A flat price with no growth.
    #[must_use]
    pub fn fixed(initial_price: Decimal) -> Self {
        Self {
            initial_price,
            growth: None,
        }
    }

    /// Adds a compounding growth projection.
    #[must_use]
    pub fn with_growth(mut self, rate: Decimal, period_days: u32) -> Self {
        self.growth = Some(GrowthSpec { rate, period_days });
        self
    }

    /// Unit price at simulated day `day`.
    ///
    /// With growth enabled, the daily rate is derived once from the period
    /// rate, `(1 + rate)^(1/period_days) - 1`, then compounded per day. The
    /// `day` index must match the simulator's day index.
    #[must_use]
    pub fn price_at(&self, day: u32) -> Decimal {
        let Some(growth) = self.growth else {
            return self.initial_price;
        };
        if growth.rate.is_zero() || growth.period_days == 0 {
            return self.initial_price;
        }

        let rate = growth.rate.to_f64().unwrap_or(0.0);
        let daily_rate = (1.0 + rate).powf(1.0 / f64::from(growth.period_days)) - 1.0;
        let factor = (1.0 + daily_rate).powf(f64::from(day));
        let initial = self.initial_price.to_f64().unwrap_or(0.0);

        Decimal::from_f64(initial * factor).unwrap_or(self.initial_price)
    }

    /// Converts a fiat amount to native units at the day-`day` price.
    /// Returns zero when the price is zero.
    #[must_use]
    pub fn to_native(&self, fiat: Decimal, day: u32) -> Decimal {
        let price = self.price_at(day);
        if price.is_zero() {
            return Decimal::ZERO;
        }
        fiat / price
    }

    /// Values a native amount in fiat at the day-`day` price.
    #[must_use]
    pub fn to_fiat(&self, native: Decimal, day: u32) -> Decimal {
        native * self.price_at(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_fixed_price_ignores_day() {
        let model = PriceModel::fixed(dec!(0.24));
        assert_eq!(model.price_at(0), dec!(0.24));
        assert_eq!(model.price_at(365), dec!(0.24));
    }

    #[test]
    fn test_growth_compounds_to_period_rate() {
        let model = PriceModel::fixed(dec!(1)).with_growth(dec!(0.05), 365);
        assert_close(model.price_at(365), dec!(1.05), dec!(0.0001));
    }

    #[test]
    fn test_zero_rate_or_period_disables_growth() {
        let zero_rate = PriceModel::fixed(dec!(2)).with_growth(dec!(0), 365);
        let zero_period = PriceModel::fixed(dec!(2)).with_growth(dec!(0.05), 0);
        assert_eq!(zero_rate.price_at(100), dec!(2));
        assert_eq!(zero_period.price_at(100), dec!(2));
    }

    #[test]
    fn test_fiat_native_conversions() {
        let model = PriceModel::fixed(dec!(0.25));
        assert_eq!(model.to_native(dec!(100), 0), dec!(400));
        assert_eq!(model.to_fiat(dec!(400), 0), dec!(100));
        assert_eq!(PriceModel::fixed(dec!(0)).to_native(dec!(100), 0), dec!(0));
    }

    #[test]
    fn test_growth_adjusted_conversion_shrinks_native_amount() {
        let model = PriceModel::fixed(dec!(1)).with_growth(dec!(1), 365);
        let early = model.to_native(dec!(100), 30);
        let late = model.to_native(dec!(100), 300);
        assert!(late < early);
        assert!(early < dec!(100));
    }
}
