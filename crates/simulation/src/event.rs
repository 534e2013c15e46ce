//! Simulation events for tracing what happened during a run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What occurred on a given simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEventKind {
    /// Accrued rewards and lending income were flushed into the principal.
    RewardsClaimed {
        /// 1-based claim period index.
        period: u32,
        /// Staking rewards flushed.
        staking_reward: Decimal,
        /// Combined lending income flushed.
        lending_income: Decimal,
    },
    /// A recurring external contribution was staked.
    InvestmentApplied {
        /// Native units added.
        amount_native: Decimal,
        /// Unit price used for fiat conversion, when one applied.
        unit_price: Option<Decimal>,
    },
    /// Accruals left over after the last full claim interval were folded
    /// into the final balance without a period record.
    ResidualFolded {
        /// Amount folded in.
        amount: Decimal,
    },
}

/// A simulation event with the day it occurred on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Simulated day, 1-based. Day 0 marks pre-loop events.
    pub day: u32,
    /// What happened.
    pub kind: SimulationEventKind,
}

/// Ordered log of events from one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<SimulationEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&mut self, day: u32, kind: SimulationEventKind) {
        self.events.push(SimulationEvent { day, kind });
    }

    /// Consumes the log, yielding events in occurrence order.
    #[must_use]
    pub fn into_events(self) -> Vec<SimulationEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_log_preserves_order() {
        let mut log = EventLog::new();
        log.record(
            7,
            SimulationEventKind::RewardsClaimed {
                period: 1,
                staking_reward: dec!(1.2),
                lending_income: dec!(0),
            },
        );
        log.record(
            30,
            SimulationEventKind::InvestmentApplied {
                amount_native: dec!(100),
                unit_price: None,
            },
        );

        let events = log.into_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].day, 7);
        assert_eq!(events[1].day, 30);
    }
}
