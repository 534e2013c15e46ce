//! Day-stepped compound yield simulation for staked assets.
//!
//! This crate turns a [`config::SimulationConfig`] into a period-by-period
//! breakdown and summary totals:
//! - Daily accrual of staking rewards and lending income from current
//!   balances
//! - Periodic claim events that flush accruals into the principal through
//!   the restake split
//! - Scheduled external contributions, fiat- or native-denominated
//! - Annualized return and APY aggregation
//!
//! The engine is a pure function of its config; all I/O (prices, provider
//! registries, wallet data) happens in collaborators before a config is
//! built.

/// Prelude module for convenient imports.
pub mod prelude;

/// Simulation configuration and validation.
pub mod config;
/// The day-stepped simulator.
pub mod engine;
/// Event log.
pub mod event;
/// Working state and output records.
pub mod state;
