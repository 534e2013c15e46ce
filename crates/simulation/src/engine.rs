//! Day-stepped compounding simulator.
//!
//! This module turns a validated [`SimulationConfig`] into a full period
//! breakdown and summary totals. Each simulated day accrues staking rewards
//! and lending income from the current balances; claim days flush the
//! accruals into the principal through the restake split; investment days add
//! the scheduled external contribution. The engine is a pure function of its
//! config: no I/O, no shared state, identical configs produce identical
//! results.

use crate::config::{Denomination, SimulationConfig};
use crate::event::{EventLog, SimulationEvent, SimulationEventKind};
use crate::state::{PeriodRecord, SimulationState, SimulationSummary};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use stakesim_domain::SimulationError;
use stakesim_domain::schedule::{ClaimFrequency, DAYS_PER_YEAR};
use tracing::{debug, info};

/// Complete output of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Scalar totals.
    pub summary: SimulationSummary,
    /// Period breakdown, one record per claim event, ascending.
    pub periods: Vec<PeriodRecord>,
    /// Event log in occurrence order.
    pub events: Vec<SimulationEvent>,
}

/// Runs the day-stepped simulation.
///
/// Validates the config first; nothing is simulated on invalid input. A
/// zero-day horizon short-circuits to the principal plus at most one
/// immediate contribution, with no periods and zero reward.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
    config.validate()?;

    if config.duration_days == 0 {
        return Ok(zero_duration_result(config));
    }

    let mut state = SimulationState::open(config);
    let mut periods = Vec::new();
    let mut events = EventLog::new();

    let daily_rate = config.reward_rate.daily_rate();
    let claim_days = config.claim_interval_days;
    let mut next_claim_day = claim_days;
    let mut period = 1u32;

    let plan = config
        .additional_investment
        .as_ref()
        .filter(|plan| plan.is_active());
    // Contribution cap: floor(duration / interval) scheduled events, valued
    // at the initial price. Growth-shrunk fiat contributions never exceed it.
    let investment_cap = plan.map(|plan| {
        plan.native_amount_at(0, config.price.as_ref())
            * Decimal::from(config.duration_days / plan.interval_days)
    });
    let mut next_investment_day = plan.map(|plan| plan.interval_days);

    for day in 1..=config.duration_days {
        // Accrue from the balances as of the start of the day. Amounts
        // invested later on this same day earn nothing until tomorrow.
        state.accrued_staking += state.principal * daily_rate;
        if let Some(lending) = &config.lending {
            state
                .accrued_lending
                .merge(&lending.daily_income(&state.stream_balances));
        }

        if day == next_claim_day {
            let opening = state.principal;
            let staking_reward = state.accrued_staking;
            let lending_income = state.accrued_lending.clone();
            let flushed = state.accrued_total();

            state
                .stream_balances
                .merge(&config.restake_split.allocate(flushed));
            state.principal += flushed;
            state.total_staking_reward += staking_reward;
            state.total_lending_income.merge(&lending_income);

            debug!(
                period,
                day,
                %opening,
                %staking_reward,
                closing = %state.principal,
                "claim"
            );
            events.record(
                day,
                SimulationEventKind::RewardsClaimed {
                    period,
                    staking_reward,
                    lending_income: lending_income.total(),
                },
            );
            periods.push(PeriodRecord {
                period,
                opening_amount: opening,
                staking_reward,
                lending_income,
                closing_amount: state.principal,
                closing_stream_balances: state.stream_balances.clone(),
            });

            state.accrued_staking = Decimal::ZERO;
            state.accrued_lending = state.accrued_lending.zeroed_like();
            period += 1;
            next_claim_day += claim_days;
        }

        if let (Some(plan), Some(invest_day), Some(cap)) =
            (plan, next_investment_day, investment_cap)
            && day == invest_day
            && state.total_additional_investment < cap
        {
            let amount_native = plan.native_amount_at(day, config.price.as_ref());
            state
                .stream_balances
                .merge(&config.restake_split.allocate(amount_native));
            state.principal += amount_native;
            state.total_additional_investment += amount_native;

            let unit_price = match plan.denomination {
                Denomination::Fiat => config.price.as_ref().map(|model| model.price_at(day)),
                Denomination::Native => None,
            };
            debug!(day, %amount_native, principal = %state.principal, "investment");
            events.record(
                day,
                SimulationEventKind::InvestmentApplied {
                    amount_native,
                    unit_price,
                },
            );
            next_investment_day = Some(invest_day + plan.interval_days);
        }
    }

    // Accruals after the last full claim interval are folded into the totals
    // and final balances without a period record of their own.
    let residual = state.accrued_total();
    if residual > Decimal::ZERO {
        state
            .stream_balances
            .merge(&config.restake_split.allocate(residual));
        state.principal += residual;
        state.total_staking_reward += state.accrued_staking;
        let leftover_lending = state.accrued_lending.clone();
        state.total_lending_income.merge(&leftover_lending);
        state.accrued_staking = Decimal::ZERO;
        state.accrued_lending = state.accrued_lending.zeroed_like();
        events.record(
            config.duration_days,
            SimulationEventKind::ResidualFolded { amount: residual },
        );
    }

    let summary = summarize(config, &state);
    info!(
        final_principal = %summary.final_principal,
        total_staking_reward = %summary.total_staking_reward,
        annualized_return_pct = %summary.annualized_return_pct,
        "simulation complete"
    );

    Ok(SimulationResult {
        summary,
        periods,
        events: events.into_events(),
    })
}

fn zero_duration_result(config: &SimulationConfig) -> SimulationResult {
    let mut state = SimulationState::open(config);
    let mut events = EventLog::new();

    // At most one immediate contribution; no rewards accrue in zero days.
    if let Some(plan) = config
        .additional_investment
        .as_ref()
        .filter(|plan| plan.is_active())
    {
        let amount_native = plan.native_amount_at(0, config.price.as_ref());
        state
            .stream_balances
            .merge(&config.restake_split.allocate(amount_native));
        state.principal += amount_native;
        state.total_additional_investment += amount_native;
        events.record(
            0,
            SimulationEventKind::InvestmentApplied {
                amount_native,
                unit_price: match plan.denomination {
                    Denomination::Fiat => config.price.as_ref().map(|model| model.price_at(0)),
                    Denomination::Native => None,
                },
            },
        );
    }

    let summary = SimulationSummary {
        initial_principal: config.principal,
        duration_days: 0,
        claim_interval_days: config.claim_interval_days,
        total_staking_reward: Decimal::ZERO,
        pure_staking_reward: Decimal::ZERO,
        total_lending_income: state.total_lending_income.clone(),
        total_additional_investment: state.total_additional_investment,
        final_principal: state.principal,
        final_stream_balances: state.stream_balances.clone(),
        annualized_return_pct: Decimal::ZERO,
        staking_apy_pct: Decimal::ZERO,
        lending_apy_pct: Decimal::ZERO,
        final_value_fiat: config
            .price
            .as_ref()
            .map(|model| model.to_fiat(state.principal, 0)),
    };

    SimulationResult {
        summary,
        periods: Vec::new(),
        events: events.into_events(),
    }
}

fn summarize(config: &SimulationConfig, state: &SimulationState) -> SimulationSummary {
    let days = config.duration_days;
    let invested_base = config.principal + state.total_additional_investment;
    let per_claim_rate =
        config.reward_rate.daily_rate() * Decimal::from(config.claim_interval_days);

    let annualized_return_pct = annualized_return_pct(invested_base, state.principal, days);
    let staking_apy_pct = staking_apy_pct(per_claim_rate, config.claim_interval_days);
    let lending_total = state.total_lending_income.total();
    let lending_apy_pct = if config.principal > Decimal::ZERO && days > 0 {
        lending_total / config.principal * Decimal::from(DAYS_PER_YEAR) / Decimal::from(days)
            * Decimal::from(100)
    } else {
        Decimal::ZERO
    };

    // With lending reinvestment active, part of the accrued staking reward is
    // attributable to lending-boosted principal. The reported staking line is
    // the counterfactual reward on principal + contributions without any
    // lending reinvestment.
    let pure_staking_reward = if config.lending.is_some() && lending_total > Decimal::ZERO {
        counterfactual_staking_reward(
            invested_base,
            per_claim_rate,
            days,
            config.claim_interval_days,
        )
    } else {
        state.total_staking_reward
    };

    SimulationSummary {
        initial_principal: config.principal,
        duration_days: days,
        claim_interval_days: config.claim_interval_days,
        total_staking_reward: state.total_staking_reward,
        pure_staking_reward,
        total_lending_income: state.total_lending_income.clone(),
        total_additional_investment: state.total_additional_investment,
        final_principal: state.principal,
        final_stream_balances: state.stream_balances.clone(),
        annualized_return_pct,
        staking_apy_pct,
        lending_apy_pct,
        final_value_fiat: config
            .price
            .as_ref()
            .map(|model| model.to_fiat(state.principal, days)),
    }
}

fn annualized_return_pct(base: Decimal, final_total: Decimal, days: u32) -> Decimal {
    if days == 0 || base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let ratio = (final_total / base).to_f64().unwrap_or(1.0);
    let annualized = ratio.powf(f64::from(DAYS_PER_YEAR) / f64::from(days));
    Decimal::from_f64((annualized - 1.0) * 100.0).unwrap_or(Decimal::ZERO)
}

fn staking_apy_pct(per_claim_rate: Decimal, claim_interval_days: u32) -> Decimal {
    if per_claim_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let periods_per_year = ClaimFrequency::from_days(claim_interval_days)
        .map(|frequency| frequency.periods_per_year())
        .unwrap_or(Decimal::from(DAYS_PER_YEAR))
        .to_f64()
        .unwrap_or(f64::from(DAYS_PER_YEAR));
    let rate = per_claim_rate.to_f64().unwrap_or(0.0);
    Decimal::from_f64(((1.0 + rate).powf(periods_per_year) - 1.0) * 100.0)
        .unwrap_or(Decimal::ZERO)
}

fn counterfactual_staking_reward(
    base: Decimal,
    per_claim_rate: Decimal,
    days: u32,
    claim_interval_days: u32,
) -> Decimal {
    if base <= Decimal::ZERO || per_claim_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let periods = f64::from(days) / f64::from(claim_interval_days);
    let rate = per_claim_rate.to_f64().unwrap_or(0.0);
    let base_f = base.to_f64().unwrap_or(0.0);
    Decimal::from_f64(base_f * ((1.0 + rate).powf(periods) - 1.0)).unwrap_or(Decimal::ZERO)
}
