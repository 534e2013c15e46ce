//! Stream balances and split ratios.
//!
//! Staked principal is tracked per revenue stream. Single-stream assets use
//! one `default` stream; dual-stream assets track `energy` and `bandwidth`
//! style resources separately. A [`StreamSplit`] carries the ratios used to
//! distribute newly generated amounts across those streams.

use crate::error::SimulationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum number of streams the engine supports per configuration.
pub const MAX_STREAMS: usize = 4;

/// Stream name used by single-stream assets.
pub const DEFAULT_STREAM: &str = "default";

/// Ratio sums are accepted within this tolerance (1e-9).
fn ratio_tolerance() -> Decimal {
    Decimal::new(1, 9)
}

fn check_stream_set(entries: &[(String, Decimal)]) -> Result<(), SimulationError> {
    if entries.is_empty() {
        return Err(SimulationError::EmptyStreams);
    }
    if entries.len() > MAX_STREAMS {
        return Err(SimulationError::UnsupportedStreamCount {
            count: entries.len(),
            max: MAX_STREAMS,
        });
    }
    for (i, (name, _)) in entries.iter().enumerate() {
        if entries[..i].iter().any(|(other, _)| other == name) {
            return Err(SimulationError::DuplicateStream(name.clone()));
        }
    }
    Ok(())
}

/// Per-stream native amounts, in a stable caller-defined order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamAmounts {
    entries: Vec<(String, Decimal)>,
}

impl StreamAmounts {
    /// Creates per-stream amounts. All amounts must be non-negative and
    /// stream names unique.
    pub fn new(entries: Vec<(String, Decimal)>) -> Result<Self, SimulationError> {
        check_stream_set(&entries)?;
        for (_, amount) in &entries {
            if amount.is_sign_negative() {
                return Err(SimulationError::NegativeValue {
                    what: "stream amount",
                    value: *amount,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Single-stream amounts under the [`DEFAULT_STREAM`] name.
    #[must_use]
    pub fn single(amount: Decimal) -> Self {
        Self {
            entries: vec![(DEFAULT_STREAM.to_string(), amount)],
        }
    }

    /// Splits `total` across two streams from a slider percentage in
    /// [0, 100]: the first stream receives `(100 - pct)%`, the second `pct%`.
    pub fn from_slider_pct(
        total: Decimal,
        first: &str,
        second: &str,
        pct: Decimal,
    ) -> Result<Self, SimulationError> {
        let split = StreamSplit::from_slider_pct(first, second, pct)?;
        Ok(split.allocate(total))
    }

    /// Same stream names, all amounts zero.
    #[must_use]
    pub fn zeroed_like(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(name, _)| (name.clone(), Decimal::ZERO))
                .collect(),
        }
    }

    /// Sum over all streams.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|(_, amount)| *amount).sum()
    }

    /// Amount for a stream, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(stream, _)| stream == name)
            .map(|(_, amount)| *amount)
    }

    /// Adds `amount` to the named stream. Returns whether the stream exists.
    pub fn credit(&mut self, name: &str, amount: Decimal) -> bool {
        match self.entries.iter_mut().find(|(s, _)| s == name) {
            Some((_, balance)) => {
                *balance += amount;
                true
            }
            None => false,
        }
    }

    /// Adds `other` entrywise. Streams absent from `self` are ignored;
    /// configurations are validated to share one stream set up front.
    pub fn merge(&mut self, other: &StreamAmounts) {
        for (name, amount) in &other.entries {
            if let Some((_, balance)) = self.entries.iter_mut().find(|(s, _)| s == name) {
                *balance += *amount;
            }
        }
    }

    /// Number of streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no streams. Validated values never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, amount)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries
            .iter()
            .map(|(name, amount)| (name.as_str(), *amount))
    }

    /// Stream names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

/// Per-stream ratios summing to 1, applied when distributing new amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSplit {
    weights: Vec<(String, Decimal)>,
}

impl StreamSplit {
    /// Creates a split. Weights must be non-negative and sum to 1 within a
    /// 1e-9 tolerance.
    pub fn new(weights: Vec<(String, Decimal)>) -> Result<Self, SimulationError> {
        check_stream_set(&weights)?;
        let mut sum = Decimal::ZERO;
        for (_, weight) in &weights {
            if weight.is_sign_negative() {
                return Err(SimulationError::NegativeValue {
                    what: "split ratio",
                    value: *weight,
                });
            }
            sum += *weight;
        }
        if (sum - Decimal::ONE).abs() > ratio_tolerance() {
            return Err(SimulationError::InvalidRatioSum(sum));
        }
        Ok(Self { weights })
    }

    /// The whole amount goes to the [`DEFAULT_STREAM`].
    #[must_use]
    pub fn single() -> Self {
        Self {
            weights: vec![(DEFAULT_STREAM.to_string(), Decimal::ONE)],
        }
    }

    /// Two-stream split from a slider percentage in [0, 100]: the first
    /// stream weighs `(100 - pct)%`, the second `pct%`.
    pub fn from_slider_pct(first: &str, second: &str, pct: Decimal) -> Result<Self, SimulationError> {
        let hundred = Decimal::from(100);
        if pct.is_sign_negative() || pct > hundred {
            return Err(SimulationError::SliderOutOfRange(pct));
        }
        let second_weight = pct / hundred;
        Self::new(vec![
            (first.to_string(), Decimal::ONE - second_weight),
            (second.to_string(), second_weight),
        ])
    }

    /// Distributes `amount` across streams by weight. The last stream takes
    /// the exact remainder so the allocation always sums to `amount`.
    #[must_use]
    pub fn allocate(&self, amount: Decimal) -> StreamAmounts {
        let mut entries = Vec::with_capacity(self.weights.len());
        let mut allocated = Decimal::ZERO;
        for (i, (name, weight)) in self.weights.iter().enumerate() {
            let share = if i + 1 == self.weights.len() {
                amount - allocated
            } else {
                amount * *weight
            };
            allocated += share;
            entries.push((name.clone(), share));
        }
        StreamAmounts { entries }
    }

    /// Ratio for a stream, if present.
    #[must_use]
    pub fn ratio(&self, name: &str) -> Option<Decimal> {
        self.weights
            .iter()
            .find(|(stream, _)| stream == name)
            .map(|(_, weight)| *weight)
    }

    /// True when this split covers exactly the streams of `amounts`,
    /// ignoring order.
    #[must_use]
    pub fn matches(&self, amounts: &StreamAmounts) -> bool {
        self.weights.len() == amounts.len()
            && self
                .weights
                .iter()
                .all(|(name, _)| amounts.get(name).is_some())
    }

    /// Stream names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.weights.iter().map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amounts_total_and_get() {
        let amounts = StreamAmounts::new(vec![
            ("energy".to_string(), dec!(6000)),
            ("bandwidth".to_string(), dec!(4000)),
        ])
        .unwrap();

        assert_eq!(amounts.total(), dec!(10000));
        assert_eq!(amounts.get("energy"), Some(dec!(6000)));
        assert_eq!(amounts.get("missing"), None);
    }

    #[test]
    fn test_amounts_reject_negative_and_duplicates() {
        assert!(matches!(
            StreamAmounts::new(vec![("a".to_string(), dec!(-1))]),
            Err(SimulationError::NegativeValue { .. })
        ));
        assert!(matches!(
            StreamAmounts::new(vec![
                ("a".to_string(), dec!(1)),
                ("a".to_string(), dec!(2)),
            ]),
            Err(SimulationError::DuplicateStream(_))
        ));
        assert!(matches!(
            StreamAmounts::new(vec![]),
            Err(SimulationError::EmptyStreams)
        ));
    }

    #[test]
    fn test_amounts_reject_oversized_stream_set() {
        let entries: Vec<_> = (0..=MAX_STREAMS)
            .map(|i| (format!("s{i}"), Decimal::ONE))
            .collect();
        assert!(matches!(
            StreamAmounts::new(entries),
            Err(SimulationError::UnsupportedStreamCount { .. })
        ));
    }

    #[test]
    fn test_slider_split_is_reversed() {
        // Slider at 40 leaves 60% on the first stream.
        let amounts =
            StreamAmounts::from_slider_pct(dec!(10000), "energy", "bandwidth", dec!(40)).unwrap();
        assert_eq!(amounts.get("energy"), Some(dec!(6000)));
        assert_eq!(amounts.get("bandwidth"), Some(dec!(4000)));
        assert_eq!(amounts.total(), dec!(10000));
    }

    #[test]
    fn test_split_ratio_sum_enforced() {
        assert!(matches!(
            StreamSplit::new(vec![
                ("a".to_string(), dec!(0.5)),
                ("b".to_string(), dec!(0.4)),
            ]),
            Err(SimulationError::InvalidRatioSum(_))
        ));
    }

    #[test]
    fn test_allocate_sums_exactly() {
        let split = StreamSplit::new(vec![
            ("a".to_string(), dec!(0.3333333333)),
            ("b".to_string(), dec!(0.3333333333)),
            ("c".to_string(), dec!(0.3333333334)),
        ])
        .unwrap();

        let allocation = split.allocate(dec!(100));
        assert_eq!(allocation.total(), dec!(100));
    }

    #[test]
    fn test_merge_adds_entrywise() {
        let mut balances = StreamAmounts::new(vec![
            ("energy".to_string(), dec!(100)),
            ("bandwidth".to_string(), dec!(50)),
        ])
        .unwrap();
        let split = StreamSplit::from_slider_pct("energy", "bandwidth", dec!(50)).unwrap();

        balances.merge(&split.allocate(dec!(10)));
        assert_eq!(balances.get("energy"), Some(dec!(105)));
        assert_eq!(balances.get("bandwidth"), Some(dec!(55)));
    }

    #[test]
    fn test_split_matches_stream_set() {
        let split = StreamSplit::from_slider_pct("energy", "bandwidth", dec!(50)).unwrap();
        let matching = StreamAmounts::new(vec![
            ("bandwidth".to_string(), dec!(1)),
            ("energy".to_string(), dec!(1)),
        ])
        .unwrap();
        let other = StreamAmounts::single(dec!(1));

        assert!(split.matches(&matching));
        assert!(!split.matches(&other));
    }
}
