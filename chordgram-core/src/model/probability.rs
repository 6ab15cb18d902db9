//! Joint and conditional probability tables derived from n-gram counts
//!
//! Every probability keeps the `(count, total)` pair it was computed from so
//! reports can show how much evidence backs it.

use crate::model::frequency::FrequencyTable;
use crate::model::sequence::Sequence;
use std::collections::{BTreeMap, HashMap};

/// A `count / total` ratio with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub count: u64,
    pub total: u64,
}

impl Observation {
    pub fn new(count: u64, total: u64) -> Self {
        Self { count, total }
    }

    pub fn probability(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count as f64 / self.total as f64
    }
}

/// Empirical distribution over the n-grams of one length
#[derive(Debug, Clone, PartialEq)]
pub struct JointTable {
    length: usize,
    entries: BTreeMap<Sequence, Observation>,
}

impl JointTable {
    /// Divide each count by the number of windows counted at that length
    pub fn from_frequencies(table: &FrequencyTable) -> Self {
        let total = table.total();
        let entries = table
            .iter()
            .map(|(seq, count)| (seq.clone(), Observation::new(count, total)))
            .collect();

        Self {
            length: table.length(),
            entries,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn get(&self, sequence: &Sequence) -> Option<Observation> {
        self.entries.get(sequence).copied()
    }

    /// Probability of `sequence`, zero when it was never observed
    pub fn probability(&self, sequence: &Sequence) -> f64 {
        self.get(sequence).map(|o| o.probability()).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Sequence, &Observation)> {
        self.entries.iter()
    }

    /// Entries sorted by descending probability, ties in key order
    pub fn most_probable(&self, limit: usize) -> Vec<(&Sequence, Observation)> {
        let mut ranked: Vec<(&Sequence, Observation)> =
            self.entries.iter().map(|(seq, obs)| (seq, *obs)).collect();
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }
}

/// Sum of joint counts for every n-gram sharing a prefix.
///
/// Built once per joint table so each conditional denominator is a lookup
/// instead of a scan over the whole table.
#[derive(Debug, Clone, Default)]
pub struct PrefixIndex {
    totals: HashMap<Vec<String>, u64>,
}

impl PrefixIndex {
    pub fn build(joint: &JointTable) -> Self {
        let mut totals: HashMap<Vec<String>, u64> = HashMap::new();
        for (seq, obs) in joint.iter() {
            let total = totals.entry(seq.prefix().to_vec()).or_insert(0);
            *total += obs.count;
        }
        Self { totals }
    }

    pub fn total(&self, prefix: &[String]) -> u64 {
        self.totals.get(prefix).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Key of a conditional entry: P(`unknown` | `observed`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalKey {
    pub observed: Sequence,
    pub unknown: String,
}

/// Distribution of an n-gram's last chord given the chords before it
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalTable {
    length: usize,
    entries: BTreeMap<ConditionalKey, Observation>,
}

impl ConditionalTable {
    /// Derive conditionals from a joint table of length >= 2.
    /// Returns `None` for unigram tables, which have no prefix to condition on.
    pub fn from_joint(joint: &JointTable) -> Option<Self> {
        if joint.length() < 2 {
            return None;
        }

        let index = PrefixIndex::build(joint);
        let entries = joint
            .iter()
            .filter_map(|(seq, obs)| {
                let (prefix, unknown) = seq.split_last()?;
                let key = ConditionalKey {
                    observed: Sequence::from_labels(prefix),
                    unknown: unknown.to_string(),
                };
                Some((key, Observation::new(obs.count, index.total(prefix))))
            })
            .collect();

        Some(Self {
            length: joint.length(),
            entries,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn get(&self, unknown: &str, observed: &[String]) -> Option<Observation> {
        let key = ConditionalKey {
            observed: Sequence::from_labels(observed),
            unknown: unknown.to_string(),
        };
        self.entries.get(&key).copied()
    }

    /// P(`unknown` | `observed`), zero for unseen pairs
    pub fn probability(&self, unknown: &str, observed: &[String]) -> f64 {
        self.get(unknown, observed)
            .map(|o| o.probability())
            .unwrap_or(0.0)
    }

    /// All continuations observed after `observed`, in key order
    pub fn given<'a>(
        &'a self,
        observed: &'a [String],
    ) -> impl Iterator<Item = (&'a str, &'a Observation)> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key.observed.labels() == observed)
            .map(|(key, obs)| (key.unknown.as_str(), obs))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConditionalKey, &Observation)> {
        self.entries.iter()
    }
}
