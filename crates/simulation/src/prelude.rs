//! Prelude module for convenient imports.
//!
//! Re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use stakesim_simulation::prelude::*;
//! ```

// Configuration
pub use crate::config::{
    Denomination, InvestmentPlan, LendingConfig, LendingStream, SimulationConfig,
};

// Engine
pub use crate::engine::{SimulationResult, simulate};

// Events
pub use crate::event::{EventLog, SimulationEvent, SimulationEventKind};

// State and records
pub use crate::state::{PeriodRecord, SimulationState, SimulationSummary};

// Domain types the engine is parameterized by
pub use stakesim_domain::SimulationError;
pub use stakesim_domain::price::{GrowthSpec, PriceModel};
pub use stakesim_domain::rates::{
    Delegation, ProviderEntry, RateResolution, RewardRate, resolve_weighted_rate,
};
pub use stakesim_domain::schedule::{ClaimFrequency, duration_days};
pub use stakesim_domain::streams::{StreamAmounts, StreamSplit};
