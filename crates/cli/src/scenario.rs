//! Scenario file format.
//!
//! A scenario JSON file carries the same input shapes the calculator forms
//! expose: principal, a rate (quoted per N days or as an annual percentage),
//! a years+months horizon, claim cadence, optional split/investment/lending/
//! price sections. It maps onto a [`SimulationConfig`] once, at load time.

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::Deserialize;
use stakesim_domain::price::PriceModel;
use stakesim_domain::rates::RewardRate;
use stakesim_domain::schedule::{ClaimFrequency, duration_days};
use stakesim_domain::streams::{StreamAmounts, StreamSplit};
use stakesim_simulation::config::{InvestmentPlan, LendingConfig, SimulationConfig};

fn default_energy() -> String {
    "energy".to_string()
}

fn default_bandwidth() -> String {
    "bandwidth".to_string()
}

/// Reward rate input, either calculator's style.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RateSpec {
    /// Native-unit rate quoted per a fixed cadence (FLR-style), with an
    /// optional provider commission in percent.
    PerDays {
        /// Gross yield per quote interval.
        rate: Decimal,
        /// Quote interval length in days.
        cadence_days: Decimal,
        /// Commission percentage deducted from the gross rate.
        #[serde(default)]
        commission_pct: Option<Decimal>,
    },
    /// Annual percentage rate compounded at the claim cadence (TRX-style).
    AnnualPct {
        /// Annual rate in percent.
        annual_pct: Decimal,
    },
}

/// Initial allocation of the principal across two streams.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AllocationSpec {
    /// Slider percentage in [0, 100]; the second stream receives `pct%`.
    Slider {
        /// Slider position.
        slider_pct: Decimal,
    },
    /// Explicit per-stream amounts. Must sum to the principal.
    Values {
        /// `(stream, amount)` pairs.
        amounts: Vec<(String, Decimal)>,
    },
}

/// Dual-stream split section.
#[derive(Debug, Deserialize)]
pub struct SplitSpec {
    /// First (left) stream name.
    #[serde(default = "default_energy")]
    pub first: String,
    /// Second (right) stream name.
    #[serde(default = "default_bandwidth")]
    pub second: String,
    /// Initial principal allocation.
    pub initial: AllocationSpec,
    /// Restake slider percentage applied to all newly generated amounts.
    pub restake_slider_pct: Decimal,
}

/// Top-level scenario file.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Starting staked amount in native units.
    pub principal: Decimal,
    /// Reward rate input.
    pub rate: RateSpec,
    /// Horizon years (365 days each).
    #[serde(default)]
    pub years: u32,
    /// Horizon months (30 days each).
    #[serde(default)]
    pub months: u32,
    /// Days between claim events. Defaults to 7.
    #[serde(default)]
    pub claim_interval_days: Option<u32>,
    /// Optional dual-stream split. Single-stream when absent.
    #[serde(default)]
    pub split: Option<SplitSpec>,
    /// Optional recurring investment.
    #[serde(default)]
    pub investment: Option<InvestmentPlan>,
    /// Optional lending configuration.
    #[serde(default)]
    pub lending: Option<LendingConfig>,
    /// Optional fiat price model.
    #[serde(default)]
    pub price: Option<PriceModel>,
}

impl Scenario {
    /// Builds the engine configuration. Rate conversion needs the claim
    /// cadence, so this resolves the horizon and cadence first.
    pub fn into_config(self) -> Result<SimulationConfig> {
        let total_days = duration_days(self.years, self.months);
        let claim_days = self.claim_interval_days.unwrap_or(7);
        let frequency = ClaimFrequency::from_days(claim_days)
            .context("invalid claim interval")?;

        let reward_rate = match self.rate {
            RateSpec::PerDays {
                rate,
                cadence_days,
                commission_pct,
            } => {
                let base = RewardRate::per_days(rate, cadence_days)?;
                match commission_pct {
                    Some(pct) => base.with_commission(pct / Decimal::from(100))?,
                    None => base,
                }
            }
            RateSpec::AnnualPct { annual_pct } => {
                RewardRate::from_annual_pct(annual_pct, frequency)?
            }
        };

        let mut config = SimulationConfig::new(self.principal, reward_rate, total_days)
            .with_claim_interval(claim_days);

        if let Some(split) = self.split {
            let initial = match split.initial {
                AllocationSpec::Slider { slider_pct } => StreamAmounts::from_slider_pct(
                    self.principal,
                    &split.first,
                    &split.second,
                    slider_pct,
                )?,
                AllocationSpec::Values { amounts } => {
                    if amounts.is_empty() {
                        bail!("split amounts must name at least one stream");
                    }
                    StreamAmounts::new(amounts)?
                }
            };
            let restake =
                StreamSplit::from_slider_pct(&split.first, &split.second, split.restake_slider_pct)?;
            config = config.with_streams(initial, restake);
        }

        if let Some(plan) = self.investment {
            config = config.with_investment(plan);
        }
        if let Some(lending) = self.lending {
            config = config.with_lending(lending);
        }
        if let Some(price) = self.price {
            config = config.with_price(price);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flr_style_scenario() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "principal": "1000",
                "rate": { "rate": "0.00068308", "cadence_days": "3.5", "commission_pct": "20" },
                "years": 1,
                "claim_interval_days": 7
            }"#,
        )
        .unwrap();

        let config = scenario.into_config().unwrap();
        assert_eq!(config.duration_days, 365);
        assert_eq!(config.claim_interval_days, 7);
        assert!(config.reward_rate.commission.is_some());
        assert_eq!(config.initial_split.len(), 1);
    }

    #[test]
    fn test_trx_style_scenario() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "principal": "10000",
                "rate": { "annual_pct": "5" },
                "months": 2,
                "claim_interval_days": 30,
                "split": {
                    "initial": { "amounts": [["energy", "6000"], ["bandwidth", "4000"]] },
                    "restake_slider_pct": "50"
                },
                "lending": {
                    "streams": [
                        { "stream": "energy", "rate_per_million_units": "40", "units_per_staked": "11" }
                    ]
                }
            }"#,
        )
        .unwrap();

        let config = scenario.into_config().unwrap();
        assert_eq!(config.duration_days, 60);
        assert_eq!(config.initial_split.get("energy"), Some("6000".parse().unwrap()));
        assert!(config.lending.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_slider_allocation() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "principal": "10000",
                "rate": { "annual_pct": "5" },
                "months": 1,
                "split": { "initial": { "slider_pct": "40" }, "restake_slider_pct": "50" }
            }"#,
        )
        .unwrap();

        let config = scenario.into_config().unwrap();
        assert_eq!(config.initial_split.get("energy"), Some("6000".parse().unwrap()));
        assert_eq!(config.initial_split.get("bandwidth"), Some("4000".parse().unwrap()));
    }
}
