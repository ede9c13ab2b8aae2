use std::collections::BTreeMap;
use std::fmt;

use plexgen_core::errors::{ErrorInfo, PlexError};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Degree sequence given as a histogram: degree value mapped to the number of nodes with it.
///
/// Nodes are numbered `0..node_count()` by ascending degree value, so the sequence
/// `{1: 2, 3: 1}` describes nodes `0` and `1` of degree one and node `2` of degree three.
/// Entries with a zero count are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DegreeSequence {
    counts: BTreeMap<usize, usize>,
}

impl DegreeSequence {
    /// Creates an empty degree sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` nodes of degree `degree`.
    pub fn with(mut self, degree: usize, count: usize) -> Self {
        self.insert(degree, count);
        self
    }

    /// Builds the histogram of an explicit per-node degree list.
    pub fn from_degrees(degrees: impl IntoIterator<Item = usize>) -> Self {
        degrees.into_iter().map(|degree| (degree, 1)).collect()
    }

    /// Returns the histogram.
    pub fn counts(&self) -> &BTreeMap<usize, usize> {
        &self.counts
    }

    /// Returns the number of nodes described by the sequence, saturating at `usize::MAX`.
    pub fn node_count(&self) -> usize {
        self.counts
            .values()
            .fold(0usize, |total, count| total.saturating_add(*count))
    }

    /// Returns the number of nodes with positive degree, saturating at `usize::MAX`.
    pub fn connected_node_count(&self) -> usize {
        self.counts
            .iter()
            .filter(|(degree, _)| **degree > 0)
            .fold(0usize, |total, (_, count)| total.saturating_add(*count))
    }

    /// Returns the total number of stubs, i.e. the sum of all degrees, saturating at
    /// `usize::MAX`. Use [`validate`](Self::validate) to detect overflow.
    pub fn stub_count(&self) -> usize {
        self.checked_stub_count().unwrap_or(usize::MAX)
    }

    /// Returns the target degree of every node in id order.
    pub fn node_degrees(&self) -> impl Iterator<Item = usize> + '_ {
        self.counts
            .iter()
            .flat_map(|(degree, count)| std::iter::repeat(*degree).take(*count))
    }

    /// Checks that the totals fit in `usize` and that the stub count is even.
    ///
    /// Runs before anything is allocated for the sequence.
    pub fn validate(&self) -> Result<(), PlexError> {
        let nodes = self.checked_node_count().ok_or_else(|| {
            PlexError::DegreeSequence(
                ErrorInfo::new("node-count-overflow", "number of nodes does not fit in usize")
                    .with_context("entries", self.counts.len()),
            )
        })?;
        let stubs = self.checked_stub_count().ok_or_else(|| {
            PlexError::DegreeSequence(
                ErrorInfo::new("degree-sum-overflow", "sum of degrees does not fit in usize")
                    .with_context("nodes", nodes)
                    .with_context("max_degree", self.max_degree()),
            )
        })?;
        if stubs % 2 == 0 {
            return Ok(());
        }
        Err(PlexError::DegreeSequence(
            ErrorInfo::new("odd-degree-sum", "sum of degrees must be even")
                .with_context("degree_sum", stubs)
                .with_context("nodes", nodes)
                .with_hint("add or remove one stub so every stub can be paired"),
        ))
    }

    fn checked_node_count(&self) -> Option<usize> {
        self.counts
            .values()
            .try_fold(0usize, |total, count| total.checked_add(*count))
    }

    fn checked_stub_count(&self) -> Option<usize> {
        self.counts.iter().try_fold(0usize, |total, (degree, count)| {
            total.checked_add(degree.checked_mul(*count)?)
        })
    }

    fn max_degree(&self) -> usize {
        self.counts.keys().next_back().copied().unwrap_or(0)
    }

    fn insert(&mut self, degree: usize, count: usize) {
        if count > 0 {
            let entry = self.counts.entry(degree).or_insert(0);
            *entry = entry.saturating_add(count);
        }
    }
}

impl FromIterator<(usize, usize)> for DegreeSequence {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> Self {
        let mut sequence = Self::new();
        for (degree, count) in iter {
            sequence.insert(degree, count);
        }
        sequence
    }
}

impl From<BTreeMap<usize, usize>> for DegreeSequence {
    fn from(counts: BTreeMap<usize, usize>) -> Self {
        counts.into_iter().collect()
    }
}

impl Serialize for DegreeSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.counts.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DegreeSequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HistogramVisitor)
    }
}

/// Reads a `degree -> count` map, merging repeated degrees and dropping zero counts.
pub(crate) struct HistogramVisitor;

impl<'de> Visitor<'de> for HistogramVisitor {
    type Value = DegreeSequence;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from degree to node count")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut sequence = DegreeSequence::new();
        while let Some((degree, count)) = map.next_entry::<usize, usize>()? {
            sequence.insert(degree, count);
        }
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_accumulates_and_drops_empty_entries() {
        let degs = DegreeSequence::new().with(2, 3).with(0, 0).with(2, 1).with(5, 2);
        assert_eq!(degs.counts(), &BTreeMap::from([(2, 4), (5, 2)]));
        assert_eq!(degs.node_count(), 6);
        assert_eq!(degs.stub_count(), 18);
    }

    #[test]
    fn node_degrees_follow_ascending_degree_order() {
        let degs = DegreeSequence::from_degrees([3, 1, 0, 1]);
        assert_eq!(degs.node_degrees().collect::<Vec<_>>(), vec![0, 1, 1, 3]);
        assert_eq!(degs.connected_node_count(), 3);
    }

    #[test]
    fn odd_sum_fails_validation() {
        let err = DegreeSequence::new().with(3, 1).validate().unwrap_err();
        assert!(matches!(err, PlexError::DegreeSequence(_)));
        assert_eq!(err.code(), "odd-degree-sum");
        assert_eq!(err.info().context.get("degree_sum"), Some(&"3".to_string()));
        assert!(DegreeSequence::new().validate().is_ok());
    }

    #[test]
    fn overflowing_degree_sum_is_rejected() {
        let degs = DegreeSequence::new().with(usize::MAX / 2 + 1, 2);
        assert_eq!(degs.stub_count(), usize::MAX);
        let err = degs.validate().unwrap_err();
        assert!(matches!(err, PlexError::DegreeSequence(_)));
        assert_eq!(err.code(), "degree-sum-overflow");

        let spread = DegreeSequence::new()
            .with(usize::MAX / 2, 1)
            .with(usize::MAX / 2 + 1, 1)
            .with(2, 1);
        assert_eq!(spread.validate().unwrap_err().code(), "degree-sum-overflow");
    }

    #[test]
    fn overflowing_node_count_is_rejected() {
        let degs = DegreeSequence::new().with(0, usize::MAX).with(2, 1);
        assert_eq!(degs.node_count(), usize::MAX);
        assert_eq!(degs.validate().unwrap_err().code(), "node-count-overflow");
    }

    #[test]
    fn parses_json_histogram() {
        let degs: DegreeSequence = serde_json::from_str(r#"{"2": 4, "1": 2}"#).unwrap();
        assert_eq!(degs, DegreeSequence::new().with(1, 2).with(2, 4));
        assert_eq!(serde_json::to_string(&degs).unwrap(), r#"{"1":2,"2":4}"#);
    }

    #[test]
    fn zero_counts_are_dropped_when_parsing() {
        let degs: DegreeSequence = serde_json::from_str(r#"{"2": 0, "1": 2}"#).unwrap();
        assert_eq!(degs, DegreeSequence::new().with(1, 2));
        assert_eq!(degs.node_count(), 2);
    }

    #[test]
    fn non_numeric_degrees_are_rejected() {
        assert!(serde_json::from_str::<DegreeSequence>(r#"{"two": 4}"#).is_err());
        assert!(serde_json::from_str::<DegreeSequence>("[2, 2]").is_err());
    }
}
