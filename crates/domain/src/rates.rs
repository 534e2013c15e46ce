//! Reward rates and registry-weighted rate resolution.

use crate::error::SimulationError;
use crate::schedule::ClaimFrequency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A reward rate together with the cadence it is quoted at.
///
/// The rate is a native-unit (or fractional) yield per `cadence_days` days.
/// FLR-style rates come quoted per 3.5 days; TRX-style annual percentages are
/// converted through [`RewardRate::from_annual_pct`]. An optional commission
/// haircut (e.g. 0.2 for a 20% provider commission) is applied once, before
/// any simulation runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardRate {
    /// Gross yield per quote interval.
    pub rate: Decimal,
    /// Length of the quote interval in days. Fractional cadences are valid.
    pub cadence_days: Decimal,
    /// Commission fraction in [0, 1] deducted from the gross rate.
    pub commission: Option<Decimal>,
}

impl RewardRate {
    /// Rate quoted per a fixed number of days, no commission.
    pub fn per_days(rate: Decimal, cadence_days: Decimal) -> Result<Self, SimulationError> {
        let rate = Self {
            rate,
            cadence_days,
            commission: None,
        };
        rate.validate()?;
        Ok(rate)
    }

    /// Annual percentage rate compounded at the claim frequency. A 5% annual
    /// rate claimed monthly becomes `0.05 / 12` per 30-day interval, keeping
    /// the conventional per-period reward `principal × r / n`.
    pub fn from_annual_pct(
        annual_pct: Decimal,
        frequency: ClaimFrequency,
    ) -> Result<Self, SimulationError> {
        let n = frequency.periods_per_year();
        Self::per_days(
            annual_pct / Decimal::from(100) / n,
            Decimal::from(frequency.days()),
        )
    }

    /// Applies a commission haircut to the gross rate.
    pub fn with_commission(mut self, commission: Decimal) -> Result<Self, SimulationError> {
        self.commission = Some(commission);
        self.validate()?;
        Ok(self)
    }

    /// Checks the rate's invariants. Constructors call this; configs built
    /// from deserialized data should call it again.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.cadence_days <= Decimal::ZERO {
            return Err(SimulationError::InvalidRateCadence(self.cadence_days));
        }
        if self.rate.is_sign_negative() {
            return Err(SimulationError::NegativeValue {
                what: "reward rate",
                value: self.rate,
            });
        }
        if let Some(commission) = self.commission
            && (commission.is_sign_negative() || commission > Decimal::ONE)
        {
            return Err(SimulationError::InvalidCommission(commission));
        }
        Ok(())
    }

    /// Rate after the commission haircut.
    #[must_use]
    pub fn net_rate(&self) -> Decimal {
        match self.commission {
            Some(commission) => self.rate * (Decimal::ONE - commission),
            None => self.rate,
        }
    }

    /// Net yield accrued per simulated day.
    #[must_use]
    pub fn daily_rate(&self) -> Decimal {
        self.net_rate() / self.cadence_days
    }
}

/// One provider/validator in an externally supplied registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// On-chain address of the provider.
    pub address: String,
    /// Annualized reward rate in percent, when the registry knows it.
    pub rate_pct: Option<Decimal>,
}

/// One of the wallet's delegation records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delegation {
    /// Address the stake is delegated to.
    pub address: String,
    /// Vote/stake weight behind this delegation.
    pub weight: Decimal,
}

/// Outcome of matching delegations against a provider registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RateResolution {
    /// At least one delegation matched a registry entry with a known rate.
    Resolved {
        /// Weight-averaged rate in percent over matched entries.
        rate_pct: Decimal,
        /// Number of matched delegations.
        matched: usize,
        /// Addresses of delegations with no usable registry entry.
        unmatched: Vec<String>,
    },
    /// The wallet delegates, but nothing matched the registry.
    NoMatches {
        /// Number of delegations examined.
        delegations: usize,
    },
    /// The wallet has no delegation records at all.
    NoDelegations,
}

impl RateResolution {
    /// The resolved rate, or a caller-supplied manual fallback when
    /// resolution was ambiguous.
    #[must_use]
    pub fn rate_pct_or(&self, fallback: Decimal) -> Decimal {
        match self {
            Self::Resolved { rate_pct, .. } => *rate_pct,
            Self::NoMatches { .. } | Self::NoDelegations => fallback,
        }
    }
}

/// Weight-averages registry rates over the wallet's delegations.
///
/// Addresses are compared case-insensitively. Delegations without a usable
/// registry entry (missing address or missing rate) are excluded from the
/// weighted sum and reported as unmatched. Zero-weight delegations are
/// skipped entirely.
#[must_use]
pub fn resolve_weighted_rate(
    delegations: &[Delegation],
    registry: &[ProviderEntry],
) -> RateResolution {
    if delegations.is_empty() {
        return RateResolution::NoDelegations;
    }

    let mut total_weight = Decimal::ZERO;
    let mut weighted_sum = Decimal::ZERO;
    let mut matched = 0usize;
    let mut unmatched = Vec::new();

    for delegation in delegations {
        if delegation.weight <= Decimal::ZERO {
            continue;
        }
        let entry = registry
            .iter()
            .find(|provider| provider.address.eq_ignore_ascii_case(&delegation.address))
            .and_then(|provider| provider.rate_pct);
        match entry {
            Some(rate) => {
                weighted_sum += delegation.weight * rate;
                total_weight += delegation.weight;
                matched += 1;
            }
            None => unmatched.push(delegation.address.clone()),
        }
    }

    if matched == 0 || total_weight.is_zero() {
        return RateResolution::NoMatches {
            delegations: delegations.len(),
        };
    }

    RateResolution::Resolved {
        rate_pct: weighted_sum / total_weight,
        matched,
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn delegation(address: &str, weight: Decimal) -> Delegation {
        Delegation {
            address: address.to_string(),
            weight,
        }
    }

    fn provider(address: &str, rate_pct: Option<Decimal>) -> ProviderEntry {
        ProviderEntry {
            address: address.to_string(),
            rate_pct,
        }
    }

    #[test]
    fn test_net_rate_applies_commission_once() {
        let rate = RewardRate::per_days(dec!(0.001), dec!(3.5))
            .unwrap()
            .with_commission(dec!(0.2))
            .unwrap();

        assert_eq!(rate.net_rate(), dec!(0.0008));
        assert_eq!(rate.daily_rate(), dec!(0.0008) / dec!(3.5));
    }

    #[test]
    fn test_annual_pct_conversion() {
        let rate = RewardRate::from_annual_pct(dec!(5), ClaimFrequency::Monthly).unwrap();
        assert_eq!(rate.rate, dec!(0.05) / dec!(12));
        assert_eq!(rate.cadence_days, dec!(30));
    }

    #[test]
    fn test_rate_validation() {
        assert!(RewardRate::per_days(dec!(0.01), dec!(0)).is_err());
        assert!(RewardRate::per_days(dec!(-0.01), dec!(1)).is_err());
        assert!(
            RewardRate::per_days(dec!(0.01), dec!(1))
                .unwrap()
                .with_commission(dec!(1.5))
                .is_err()
        );
    }

    #[test]
    fn test_weighted_rate_with_unmatched_entry() {
        let delegations = vec![
            delegation("SR1", dec!(100)),
            delegation("SR2", dec!(200)),
            delegation("SR3", dec!(50)),
        ];
        let registry = vec![
            provider("sr1", Some(dec!(5))),
            provider("SR2", Some(dec!(10))),
            provider("SR3", None),
        ];

        let resolution = resolve_weighted_rate(&delegations, &registry);
        match resolution {
            RateResolution::Resolved {
                rate_pct,
                matched,
                unmatched,
            } => {
                // (100*5 + 200*10) / 300
                assert_eq!(rate_pct.round_dp(2), dec!(8.33));
                assert_eq!(matched, 2);
                assert_eq!(unmatched, vec!["SR3".to_string()]);
            }
            other => panic!("expected resolved rate, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_delegations_vs_zero_matches() {
        let registry = vec![provider("SR1", Some(dec!(5)))];

        assert_eq!(
            resolve_weighted_rate(&[], &registry),
            RateResolution::NoDelegations
        );
        assert_eq!(
            resolve_weighted_rate(&[delegation("other", dec!(10))], &registry),
            RateResolution::NoMatches { delegations: 1 }
        );
    }

    #[test]
    fn test_resolution_fallback() {
        let resolution = RateResolution::NoMatches { delegations: 3 };
        assert_eq!(resolution.rate_pct_or(dec!(4.2)), dec!(4.2));

        let resolved = RateResolution::Resolved {
            rate_pct: dec!(7),
            matched: 1,
            unmatched: vec![],
        };
        assert_eq!(resolved.rate_pct_or(dec!(4.2)), dec!(7));
    }
}
