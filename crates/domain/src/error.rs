use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced before or during a simulation run.
///
/// Validation errors are raised before any day-stepping happens; a run either
/// produces a complete result or one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Starting principal must be strictly positive.
    #[error("principal must be positive, got {0}")]
    InvalidPrincipal(Decimal),

    /// Explicit per-stream amounts must sum to the principal.
    #[error("stream amounts sum to {actual}, expected principal {expected}")]
    SplitMismatch {
        /// The configured principal.
        expected: Decimal,
        /// Sum of the per-stream amounts.
        actual: Decimal,
    },

    /// Split ratios must sum to 1.
    #[error("split ratios sum to {0}, expected 1")]
    InvalidRatioSum(Decimal),

    /// A split needs at least one stream.
    #[error("split has no streams")]
    EmptyStreams,

    /// More streams than the engine supports.
    #[error("unsupported stream count {count}, engine supports at most {max}")]
    UnsupportedStreamCount {
        /// Streams in the configuration.
        count: usize,
        /// Engine limit.
        max: usize,
    },

    /// A stream name appeared twice in one split.
    #[error("duplicate stream {0:?}")]
    DuplicateStream(String),

    /// A referenced stream is not part of the initial split.
    #[error("unknown stream {0:?}")]
    UnknownStream(String),

    /// Restake split streams must match the initial split streams.
    #[error("restake split streams do not match the initial split")]
    SplitStreamsDiffer,

    /// A negative amount or rate where only non-negative values make sense.
    #[error("{what} must not be negative, got {value}")]
    NegativeValue {
        /// Which field was negative.
        what: &'static str,
        /// The offending value.
        value: Decimal,
    },

    /// Slider ratios are percentages in [0, 100].
    #[error("slider percentage must be within [0, 100], got {0}")]
    SliderOutOfRange(Decimal),

    /// Claim interval must be at least one day.
    #[error("claim interval must be at least 1 day, got {0}")]
    InvalidClaimInterval(u32),

    /// The cadence a rate is quoted at must be positive.
    #[error("rate cadence must be positive, got {0} days")]
    InvalidRateCadence(Decimal),

    /// Commission must be a fraction in [0, 1].
    #[error("commission must be within [0, 1], got {0}")]
    InvalidCommission(Decimal),

    /// A fiat-denominated investment needs a configured unit price.
    #[error("fiat-denominated investment requires a price model")]
    MissingPrice,

    /// Recurring investment interval must be at least one day.
    #[error("investment interval must be at least 1 day, got {0}")]
    InvalidInvestmentInterval(u32),
}
