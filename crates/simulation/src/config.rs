//! Simulation configuration.
//!
//! A [`SimulationConfig`] is assembled once per calculation request by the
//! caller (form layer, scenario file, test) and passed by value into the
//! engine. The engine holds no other state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stakesim_domain::SimulationError;
use stakesim_domain::price::PriceModel;
use stakesim_domain::rates::RewardRate;
use stakesim_domain::streams::{StreamAmounts, StreamSplit};

/// Whether a recurring investment amount is given in native or fiat units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Denomination {
    /// Asset-native units, added as-is.
    Native,
    /// Fiat units, converted at the day-specific price.
    Fiat,
}

/// Recurring external top-up contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPlan {
    /// Contribution size per event.
    pub amount: Decimal,
    /// Unit the amount is denominated in.
    pub denomination: Denomination,
    /// Days between contributions.
    pub interval_days: u32,
}

impl InvestmentPlan {
    /// True when the plan actually schedules contributions.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.amount > Decimal::ZERO && self.interval_days > 0
    }

    /// Native units contributed on day `day`. Fiat amounts use the
    /// growth-adjusted price for that day; validation guarantees a price
    /// model exists for fiat plans.
    #[must_use]
    pub fn native_amount_at(&self, day: u32, price: Option<&PriceModel>) -> Decimal {
        match self.denomination {
            Denomination::Native => self.amount,
            Denomination::Fiat => price
                .map(|model| model.to_native(self.amount, day))
                .unwrap_or(Decimal::ZERO),
        }
    }
}

/// Lending terms for one stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingStream {
    /// Stream the lent resource derives from.
    pub stream: String,
    /// Daily rate quoted per million resource units.
    pub rate_per_million_units: Decimal,
    /// Resource units obtained per staked native unit.
    pub units_per_staked: Decimal,
}

/// Secondary lending yield, computed from derived resource units rather than
/// the staked amount directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingConfig {
    /// Per-stream lending terms.
    pub streams: Vec<LendingStream>,
}

impl LendingConfig {
    /// Normalizes lending rates quoted per million resource units.
    fn rate_denominator() -> Decimal {
        Decimal::from(1_000_000u32)
    }

    /// Day's lending income per stream, from the current stream balances.
    #[must_use]
    pub fn daily_income(&self, balances: &StreamAmounts) -> StreamAmounts {
        let mut income = balances.zeroed_like();
        for lending in &self.streams {
            let Some(balance) = balances.get(&lending.stream) else {
                continue;
            };
            let units = balance * lending.units_per_staked;
            let daily = units * lending.rate_per_million_units / Self::rate_denominator();
            income.credit(&lending.stream, daily);
        }
        income
    }
}

/// Immutable parameters for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Starting staked amount in native units.
    pub principal: Decimal,
    /// Reward rate with its quote cadence and commission.
    pub reward_rate: RewardRate,
    /// Simulated horizon in days.
    pub duration_days: u32,
    /// Days between claim/reinvestment events.
    pub claim_interval_days: u32,
    /// Per-stream allocation of the initial principal. Applied once, before
    /// simulation starts, and never re-applied.
    pub initial_split: StreamAmounts,
    /// Ratios applied to all newly generated amounts (rewards, lending
    /// income, new investment).
    pub restake_split: StreamSplit,
    /// Optional recurring external contribution.
    pub additional_investment: Option<InvestmentPlan>,
    /// Optional lending income streams.
    pub lending: Option<LendingConfig>,
    /// Optional fiat price model, for fiat conversion and reporting only.
    pub price: Option<PriceModel>,
}

impl SimulationConfig {
    /// Single-stream configuration with a weekly claim cadence.
    #[must_use]
    pub fn new(principal: Decimal, reward_rate: RewardRate, duration_days: u32) -> Self {
        Self {
            principal,
            reward_rate,
            duration_days,
            claim_interval_days: 7,
            initial_split: StreamAmounts::single(principal),
            restake_split: StreamSplit::single(),
            additional_investment: None,
            lending: None,
            price: None,
        }
    }

    /// Sets the claim interval in days.
    #[must_use]
    pub fn with_claim_interval(mut self, days: u32) -> Self {
        self.claim_interval_days = days;
        self
    }

    /// Sets explicit initial stream amounts and the restake split.
    #[must_use]
    pub fn with_streams(mut self, initial_split: StreamAmounts, restake_split: StreamSplit) -> Self {
        self.initial_split = initial_split;
        self.restake_split = restake_split;
        self
    }

    /// Sets the recurring investment plan.
    #[must_use]
    pub fn with_investment(mut self, plan: InvestmentPlan) -> Self {
        self.additional_investment = Some(plan);
        self
    }

    /// Sets the lending configuration.
    #[must_use]
    pub fn with_lending(mut self, lending: LendingConfig) -> Self {
        self.lending = Some(lending);
        self
    }

    /// Sets the fiat price model.
    #[must_use]
    pub fn with_price(mut self, price: PriceModel) -> Self {
        self.price = Some(price);
        self
    }

    /// Validates every cross-field invariant before the engine runs. The
    /// engine calls this first; nothing is simulated on invalid input.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.principal <= Decimal::ZERO {
            return Err(SimulationError::InvalidPrincipal(self.principal));
        }
        if self.claim_interval_days == 0 {
            return Err(SimulationError::InvalidClaimInterval(
                self.claim_interval_days,
            ));
        }
        self.reward_rate.validate()?;

        let split_total = self.initial_split.total();
        if (split_total - self.principal).abs() > Decimal::new(1, 9) {
            return Err(SimulationError::SplitMismatch {
                expected: self.principal,
                actual: split_total,
            });
        }
        if !self.restake_split.matches(&self.initial_split) {
            return Err(SimulationError::SplitStreamsDiffer);
        }

        if let Some(plan) = &self.additional_investment {
            if plan.amount.is_sign_negative() {
                return Err(SimulationError::NegativeValue {
                    what: "investment amount",
                    value: plan.amount,
                });
            }
            if plan.amount > Decimal::ZERO && plan.interval_days == 0 {
                return Err(SimulationError::InvalidInvestmentInterval(
                    plan.interval_days,
                ));
            }
            if plan.is_active()
                && plan.denomination == Denomination::Fiat
                && self.price.is_none()
            {
                return Err(SimulationError::MissingPrice);
            }
        }

        if let Some(lending) = &self.lending {
            for stream in &lending.streams {
                if self.initial_split.get(&stream.stream).is_none() {
                    return Err(SimulationError::UnknownStream(stream.stream.clone()));
                }
                if stream.rate_per_million_units.is_sign_negative() {
                    return Err(SimulationError::NegativeValue {
                        what: "lending rate",
                        value: stream.rate_per_million_units,
                    });
                }
                if stream.units_per_staked.is_sign_negative() {
                    return Err(SimulationError::NegativeValue {
                        what: "lending units per staked",
                        value: stream.units_per_staked,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_config() -> SimulationConfig {
        let rate = RewardRate::per_days(dec!(0.001), dec!(3.5)).unwrap();
        SimulationConfig::new(dec!(1000), rate, 30)
    }

    #[test]
    fn test_valid_default_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_nonpositive_principal() {
        let mut config = base_config();
        config.principal = dec!(0);
        config.initial_split = StreamAmounts::single(dec!(0));
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidPrincipal(_))
        ));
    }

    #[test]
    fn test_rejects_split_mismatch() {
        let config = base_config().with_streams(
            StreamAmounts::new(vec![
                ("energy".to_string(), dec!(600)),
                ("bandwidth".to_string(), dec!(300)),
            ])
            .unwrap(),
            StreamSplit::from_slider_pct("energy", "bandwidth", dec!(50)).unwrap(),
        );
        assert!(matches!(
            config.validate(),
            Err(SimulationError::SplitMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_restake_split_over_different_streams() {
        let config = base_config().with_streams(
            StreamAmounts::single(dec!(1000)),
            StreamSplit::from_slider_pct("energy", "bandwidth", dec!(50)).unwrap(),
        );
        assert!(matches!(
            config.validate(),
            Err(SimulationError::SplitStreamsDiffer)
        ));
    }

    #[test]
    fn test_fiat_investment_requires_price() {
        let config = base_config().with_investment(InvestmentPlan {
            amount: dec!(100),
            denomination: Denomination::Fiat,
            interval_days: 30,
        });
        assert!(matches!(
            config.validate(),
            Err(SimulationError::MissingPrice)
        ));

        let priced = config.with_price(PriceModel::fixed(dec!(0.25)));
        assert!(priced.validate().is_ok());
    }

    #[test]
    fn test_lending_stream_must_exist() {
        let config = base_config().with_lending(LendingConfig {
            streams: vec![LendingStream {
                stream: "energy".to_string(),
                rate_per_million_units: dec!(40),
                units_per_staked: dec!(11),
            }],
        });
        assert!(matches!(
            config.validate(),
            Err(SimulationError::UnknownStream(_))
        ));
    }

    #[test]
    fn test_lending_daily_income_per_stream() {
        let balances = StreamAmounts::new(vec![
            ("energy".to_string(), dec!(6000)),
            ("bandwidth".to_string(), dec!(4000)),
        ])
        .unwrap();
        let lending = LendingConfig {
            streams: vec![
                LendingStream {
                    stream: "energy".to_string(),
                    rate_per_million_units: dec!(100),
                    units_per_staked: dec!(10),
                },
                LendingStream {
                    stream: "bandwidth".to_string(),
                    rate_per_million_units: dec!(500),
                    units_per_staked: dec!(1),
                },
            ],
        };

        let income = lending.daily_income(&balances);
        // 6000 * 10 * 100 / 1e6 and 4000 * 1 * 500 / 1e6
        assert_eq!(income.get("energy"), Some(dec!(6)));
        assert_eq!(income.get("bandwidth"), Some(dec!(2)));
    }

    #[test]
    fn test_inactive_investment_plan() {
        let plan = InvestmentPlan {
            amount: dec!(0),
            denomination: Denomination::Native,
            interval_days: 30,
        };
        assert!(!plan.is_active());
    }
}
