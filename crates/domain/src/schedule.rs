//! Duration and claim-frequency conversions.

use crate::error::SimulationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed year length used for all duration math.
pub const DAYS_PER_YEAR: u32 = 365;

/// Fixed month length used for all duration math.
pub const DAYS_PER_MONTH: u32 = 30;

/// Converts a years+months horizon to days using the fixed 365/30
/// approximation. Calendar-accurate months are deliberately not used; output
/// compatibility depends on this approximation.
#[must_use]
pub fn duration_days(years: u32, months: u32) -> u32 {
    years * DAYS_PER_YEAR + months * DAYS_PER_MONTH
}

/// Cadence at which accrued rewards are moved into the compounding principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimFrequency {
    /// Every day.
    Daily,
    /// Every 7 days.
    Weekly,
    /// Every 30 days.
    Monthly,
    /// Every 90 days.
    Quarterly,
    /// A custom interval in days.
    Custom(u32),
}

impl ClaimFrequency {
    /// Maps an interval in days onto the enumerated set, falling back to
    /// [`ClaimFrequency::Custom`].
    pub fn from_days(days: u32) -> Result<Self, SimulationError> {
        match days {
            0 => Err(SimulationError::InvalidClaimInterval(days)),
            1 => Ok(Self::Daily),
            7 => Ok(Self::Weekly),
            30 => Ok(Self::Monthly),
            90 => Ok(Self::Quarterly),
            n => Ok(Self::Custom(n)),
        }
    }

    /// Days between claim events.
    #[must_use]
    pub fn days(&self) -> u32 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
            Self::Quarterly => 90,
            Self::Custom(days) => *days,
        }
    }

    /// Compounding periods per year for annual-percent rates. The named
    /// frequencies use the conventional 365/52/12/4 counts rather than
    /// 365-over-days, matching how annual rates are quoted.
    #[must_use]
    pub fn periods_per_year(&self) -> Decimal {
        match self {
            Self::Daily => Decimal::from(365),
            Self::Weekly => Decimal::from(52),
            Self::Monthly => Decimal::from(12),
            Self::Quarterly => Decimal::from(4),
            Self::Custom(days) => Decimal::from(DAYS_PER_YEAR) / Decimal::from(*days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_duration_uses_fixed_approximation() {
        assert_eq!(duration_days(1, 0), 365);
        assert_eq!(duration_days(0, 2), 60);
        assert_eq!(duration_days(2, 6), 910);
        assert_eq!(duration_days(0, 0), 0);
    }

    #[test]
    fn test_claim_frequency_from_days() {
        assert_eq!(ClaimFrequency::from_days(7).unwrap(), ClaimFrequency::Weekly);
        assert_eq!(
            ClaimFrequency::from_days(14).unwrap(),
            ClaimFrequency::Custom(14)
        );
        assert!(ClaimFrequency::from_days(0).is_err());
    }

    #[test]
    fn test_periods_per_year_conventions() {
        assert_eq!(ClaimFrequency::Weekly.periods_per_year(), dec!(52));
        assert_eq!(ClaimFrequency::Monthly.periods_per_year(), dec!(12));
        assert_eq!(
            ClaimFrequency::Custom(73).periods_per_year(),
            dec!(5)
        );
    }
}
