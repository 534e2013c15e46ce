//! Working state and output records of a simulation run.

use crate::config::SimulationConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stakesim_domain::streams::StreamAmounts;

/// Mutable state threaded through the day loop. Created fresh for every run;
/// results fully replace any prior run's.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Current total staked native amount.
    pub principal: Decimal,
    /// Per-stream balances. Always sums to `principal`.
    pub stream_balances: StreamAmounts,
    /// Staking rewards accrued since the last claim.
    pub accrued_staking: Decimal,
    /// Lending income accrued per stream since the last claim.
    pub accrued_lending: StreamAmounts,
    /// All staking rewards claimed so far, plus any post-loop residual.
    pub total_staking_reward: Decimal,
    /// All lending income claimed so far, per stream.
    pub total_lending_income: StreamAmounts,
    /// Native units contributed by the recurring investment plan.
    pub total_additional_investment: Decimal,
}

impl SimulationState {
    /// Opens a run from the config's principal and initial split.
    #[must_use]
    pub fn open(config: &SimulationConfig) -> Self {
        Self {
            principal: config.principal,
            stream_balances: config.initial_split.clone(),
            accrued_staking: Decimal::ZERO,
            accrued_lending: config.initial_split.zeroed_like(),
            total_staking_reward: Decimal::ZERO,
            total_lending_income: config.initial_split.zeroed_like(),
            total_additional_investment: Decimal::ZERO,
        }
    }

    /// Everything accrued since the last claim, across sources.
    #[must_use]
    pub fn accrued_total(&self) -> Decimal {
        self.accrued_staking + self.accrued_lending.total()
    }
}

/// One row of the period breakdown, emitted at each claim event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 1-based period index.
    pub period: u32,
    /// Principal before this claim's flush.
    pub opening_amount: Decimal,
    /// Staking rewards flushed in this claim.
    pub staking_reward: Decimal,
    /// Lending income flushed in this claim, per stream.
    pub lending_income: StreamAmounts,
    /// Principal after the flush. Equals opening + staking reward + total
    /// lending income.
    pub closing_amount: Decimal,
    /// Per-stream balances after the flush. Their sum is the closing amount.
    pub closing_stream_balances: StreamAmounts,
}

/// Scalar totals of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Starting principal.
    pub initial_principal: Decimal,
    /// Simulated horizon in days.
    pub duration_days: u32,
    /// Claim cadence in days.
    pub claim_interval_days: u32,
    /// Staking rewards actually generated over the run, including rewards on
    /// reinvested lending income.
    pub total_staking_reward: Decimal,
    /// Staking reward line item for reporting. With lending active this is
    /// the counterfactual reward on principal plus contributions compounded
    /// without lending reinvestment; otherwise it equals
    /// `total_staking_reward`.
    pub pure_staking_reward: Decimal,
    /// Lending income per stream.
    pub total_lending_income: StreamAmounts,
    /// Native units contributed by the recurring investment plan.
    pub total_additional_investment: Decimal,
    /// Final staked amount, residual accruals included.
    pub final_principal: Decimal,
    /// Final per-stream balances.
    pub final_stream_balances: StreamAmounts,
    /// `((final / (principal + contributions))^(365/days) - 1) × 100`.
    pub annualized_return_pct: Decimal,
    /// Nominal staking APY from the rate and claim cadence.
    pub staking_apy_pct: Decimal,
    /// Lending income annualized against the initial principal.
    pub lending_apy_pct: Decimal,
    /// Final balance valued at the day-`duration` price, when a price model
    /// is configured.
    pub final_value_fiat: Option<Decimal>,
}

impl SimulationSummary {
    /// Combined lending income across streams.
    #[must_use]
    pub fn total_lending_income_combined(&self) -> Decimal {
        self.total_lending_income.total()
    }

    /// Principal plus every external contribution, the base the annualized
    /// return is measured against.
    #[must_use]
    pub fn invested_base(&self) -> Decimal {
        self.initial_principal + self.total_additional_investment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use stakesim_domain::rates::RewardRate;

    #[test]
    fn test_open_state_mirrors_initial_split() {
        let rate = RewardRate::per_days(dec!(0.001), dec!(3.5)).unwrap();
        let config = SimulationConfig::new(dec!(1000), rate, 30);
        let state = SimulationState::open(&config);

        assert_eq!(state.principal, dec!(1000));
        assert_eq!(state.stream_balances.total(), dec!(1000));
        assert_eq!(state.accrued_total(), dec!(0));
    }
}
