//! Core domain types for the staking yield simulator.
//!
//! This crate holds the pure value objects the simulation engine is built on:
//! - Stream splits and balances (single-stream assets, or energy/bandwidth
//!   style dual-stream assets)
//! - Reward rates with their quote cadence and optional commission haircut
//! - Price models with optional compounding growth
//! - Duration and claim-frequency conversions
//! - Weighted rate resolution against a provider registry
//! - The error taxonomy shared across the workspace

/// Error taxonomy.
pub mod error;
/// Price models and projected growth.
pub mod price;
/// Reward rates and registry-weighted resolution.
pub mod rates;
/// Duration and claim-frequency conversions.
pub mod schedule;
/// Stream balances and split ratios.
pub mod streams;

pub use error::SimulationError;
