//! Command line interface for the staking yield simulator.
mod scenario;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prettytable::{Cell, Row, Table};
use rust_decimal::Decimal;
use serde::Serialize;
use stakesim_domain::rates::{Delegation, ProviderEntry, RateResolution, resolve_weighted_rate};
use stakesim_simulation::engine::simulate;
use stakesim_simulation::event::SimulationEvent;
use stakesim_simulation::state::{PeriodRecord, SimulationSummary};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "stakesim")]
#[command(about = "Day-stepped compound yield simulator for staked assets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and print the breakdown
    Simulate {
        /// Path to the scenario JSON file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Emit the full result as JSON instead of tables
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Weight-average registry rates over a wallet's delegations
    ResolveRate {
        /// Path to the provider registry JSON (array of {address, rate_pct})
        #[arg(short, long)]
        registry: PathBuf,

        /// Path to the delegations JSON (array of {address, weight})
        #[arg(short, long)]
        delegations: PathBuf,

        /// Manual fallback rate in percent when resolution is ambiguous
        #[arg(short, long)]
        fallback_pct: Option<Decimal>,
    },
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a SimulationSummary,
    periods: &'a [PeriodRecord],
    events: &'a [SimulationEvent],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { scenario, json } => {
            let raw = fs::read_to_string(&scenario)
                .with_context(|| format!("reading scenario {}", scenario.display()))?;
            let scenario: Scenario =
                serde_json::from_str(&raw).context("parsing scenario file")?;
            let config = scenario.into_config()?;
            info!(
                principal = %config.principal,
                duration_days = config.duration_days,
                "running scenario"
            );
            let result = simulate(&config)?;

            if json {
                let output = JsonOutput {
                    summary: &result.summary,
                    periods: &result.periods,
                    events: &result.events,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_summary(&result.summary);
                if !result.periods.is_empty() {
                    print_periods(&result.periods);
                }
            }
        }
        Commands::ResolveRate {
            registry,
            delegations,
            fallback_pct,
        } => {
            let registry: Vec<ProviderEntry> = serde_json::from_str(
                &fs::read_to_string(&registry)
                    .with_context(|| format!("reading registry {}", registry.display()))?,
            )
            .context("parsing registry file")?;
            let delegations: Vec<Delegation> = serde_json::from_str(
                &fs::read_to_string(&delegations)
                    .with_context(|| format!("reading delegations {}", delegations.display()))?,
            )
            .context("parsing delegations file")?;

            info!(
                providers = registry.len(),
                delegations = delegations.len(),
                "resolving weighted rate"
            );
            print_resolution(resolve_weighted_rate(&delegations, &registry), fallback_pct);
        }
    }

    Ok(())
}

fn print_summary(summary: &SimulationSummary) {
    println!(
        "Initial principal:       {}",
        summary.initial_principal.round_dp(2)
    );
    println!(
        "Additional investment:   {}",
        summary.total_additional_investment.round_dp(2)
    );
    println!(
        "Staking rewards:         {}",
        summary.pure_staking_reward.round_dp(2)
    );
    let lending = summary.total_lending_income_combined();
    if lending > Decimal::ZERO {
        println!("Lending income:          {}", lending.round_dp(2));
        for (stream, income) in summary.total_lending_income.iter() {
            println!("  {stream:<22} {}", income.round_dp(2));
        }
    }
    println!(
        "Final balance:           {}",
        summary.final_principal.round_dp(2)
    );
    for (stream, balance) in summary.final_stream_balances.iter() {
        println!("  {stream:<22} {}", balance.round_dp(2));
    }
    if let Some(fiat) = summary.final_value_fiat {
        println!("Final value (fiat):      {}", fiat.round_dp(2));
    }
    println!(
        "Annualized return:       {}%",
        summary.annualized_return_pct.round_dp(2)
    );
    if summary.staking_apy_pct > Decimal::ZERO {
        println!(
            "Staking APY:             {}%",
            summary.staking_apy_pct.round_dp(2)
        );
    }
    if summary.lending_apy_pct > Decimal::ZERO {
        println!(
            "Lending APY:             {}%",
            summary.lending_apy_pct.round_dp(2)
        );
    }
}

fn print_periods(periods: &[PeriodRecord]) {
    let mut table = Table::new();

    let streams: Vec<String> = periods[0]
        .lending_income
        .names()
        .map(str::to_string)
        .collect();
    let has_lending = periods
        .iter()
        .any(|record| record.lending_income.total() > Decimal::ZERO);

    let mut header = vec![
        Cell::new("Period"),
        Cell::new("Opening"),
        Cell::new("Staking reward"),
    ];
    if has_lending {
        for stream in &streams {
            header.push(Cell::new(&format!("{stream} income")));
        }
    }
    header.push(Cell::new("Closing"));
    table.add_row(Row::new(header));

    for record in periods {
        let mut cells = vec![
            Cell::new(&record.period.to_string()),
            Cell::new(&record.opening_amount.round_dp(4).to_string()),
            Cell::new(&record.staking_reward.round_dp(4).to_string()),
        ];
        if has_lending {
            for stream in &streams {
                let income = record.lending_income.get(stream).unwrap_or(Decimal::ZERO);
                cells.push(Cell::new(&income.round_dp(4).to_string()));
            }
        }
        cells.push(Cell::new(&record.closing_amount.round_dp(4).to_string()));
        table.add_row(Row::new(cells));
    }

    table.printstd();
}

fn print_resolution(resolution: RateResolution, fallback_pct: Option<Decimal>) {
    match &resolution {
        RateResolution::Resolved {
            rate_pct,
            matched,
            unmatched,
        } => {
            println!("Weighted average rate: {}%", rate_pct.round_dp(2));
            println!("Matched delegations:   {matched}");
            if !unmatched.is_empty() {
                println!("Unmatched:             {}", unmatched.join(", "));
            }
        }
        RateResolution::NoMatches { delegations } => {
            println!("{delegations} delegations found, none matched the registry");
        }
        RateResolution::NoDelegations => {
            println!("No delegation records found");
        }
    }

    if let Some(fallback) = fallback_pct {
        println!(
            "Effective rate:        {}%",
            resolution.rate_pct_or(fallback).round_dp(2)
        );
    }
}
