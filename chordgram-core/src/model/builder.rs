//! Track → augmented track → counts → probability tables

use crate::error::{ChordgramError, Result};
use crate::model::frequency::count_sequences;
use crate::model::probability::{ConditionalTable, JointTable, Observation};
use crate::model::sequence::Sequence;
use crate::types::track::ChordTrack;

/// Longest n-gram counted by default
pub const DEFAULT_MAX_LENGTH: usize = 3;

/// Upper bound accepted for `max_length`
pub const MAX_SEQUENCE_LENGTH: usize = 3;

/// Read-only settings shared by every track in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelConfig {
    /// Transposed copies appended after the original loop (0 = no augmentation)
    pub transpositions: usize,
    /// Count n-grams of length `1..=max_length`
    pub max_length: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            transpositions: 0,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl ModelConfig {
    pub fn new(transpositions: usize, max_length: usize) -> Self {
        Self {
            transpositions,
            max_length,
        }
    }

    pub fn with_transpositions(transpositions: usize) -> Self {
        Self {
            transpositions,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(ChordgramError::InvalidConfig(
                "max_length must be at least 1".to_string(),
            ));
        }
        if self.max_length > MAX_SEQUENCE_LENGTH {
            return Err(ChordgramError::InvalidConfig(format!(
                "max_length must be at most {}, got {}",
                MAX_SEQUENCE_LENGTH, self.max_length
            )));
        }
        Ok(())
    }
}

/// Joint and (for n >= 2) conditional tables for one n-gram length
#[derive(Debug, Clone, PartialEq)]
pub struct LengthTables {
    pub joint: JointTable,
    pub conditional: Option<ConditionalTable>,
}

/// Flat view of one joint entry
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointRow {
    pub sequence: Vec<String>,
    pub count: u64,
    pub total: u64,
    pub probability: f64,
}

/// Flat view of one conditional entry: P(unknown | observed)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalRow {
    pub unknown: String,
    pub observed: Vec<String>,
    pub count: u64,
    pub total: u64,
    pub probability: f64,
}

/// Everything derived from one input track
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceModel {
    config: ModelConfig,
    source_entries: usize,
    augmented_entries: usize,
    lengths: Vec<LengthTables>,
}

impl SequenceModel {
    pub fn config(&self) -> ModelConfig {
        self.config
    }

    /// Entries in the track before augmentation
    pub fn source_entries(&self) -> usize {
        self.source_entries
    }

    /// Entries the n-grams were counted over
    pub fn augmented_entries(&self) -> usize {
        self.augmented_entries
    }

    pub fn tables(&self, length: usize) -> Option<&LengthTables> {
        length.checked_sub(1).and_then(|i| self.lengths.get(i))
    }

    pub fn joint(&self, length: usize) -> Option<&JointTable> {
        self.tables(length).map(|t| &t.joint)
    }

    pub fn conditional(&self, length: usize) -> Option<&ConditionalTable> {
        self.tables(length).and_then(|t| t.conditional.as_ref())
    }

    pub fn lengths(&self) -> impl Iterator<Item = &LengthTables> {
        self.lengths.iter()
    }

    /// Joint entries for every length, shortest first
    pub fn joint_rows(&self) -> Vec<JointRow> {
        self.lengths
            .iter()
            .flat_map(|t| t.joint.iter())
            .map(|(seq, obs)| joint_row(seq, obs))
            .collect()
    }

    /// Conditional entries for every length >= 2, shortest first
    pub fn conditional_rows(&self) -> Vec<ConditionalRow> {
        self.lengths
            .iter()
            .filter_map(|t| t.conditional.as_ref())
            .flat_map(|t| t.iter())
            .map(|(key, obs)| ConditionalRow {
                unknown: key.unknown.clone(),
                observed: key.observed.labels().to_vec(),
                count: obs.count,
                total: obs.total,
                probability: obs.probability(),
            })
            .collect()
    }
}

fn joint_row(seq: &Sequence, obs: &Observation) -> JointRow {
    JointRow {
        sequence: seq.labels().to_vec(),
        count: obs.count,
        total: obs.total,
        probability: obs.probability(),
    }
}

/// Runs the estimation pipeline for one track at a time
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelBuilder {
    config: ModelConfig,
}

impl ModelBuilder {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ModelConfig {
        self.config
    }

    pub fn build(&self, track: &ChordTrack) -> Result<SequenceModel> {
        self.config.validate()?;

        let augmented = track.augmented(self.config.transpositions)?;
        log::debug!(
            "augmented {} entries to {} ({} transpositions)",
            track.len(),
            augmented.len(),
            self.config.transpositions
        );

        let lengths = count_sequences(&augmented, self.config.max_length)
            .tables()
            .iter()
            .map(|frequencies| {
                let joint = JointTable::from_frequencies(frequencies);
                let conditional = ConditionalTable::from_joint(&joint);
                LengthTables { joint, conditional }
            })
            .collect();

        Ok(SequenceModel {
            config: self.config,
            source_entries: track.len(),
            augmented_entries: augmented.len(),
            lengths,
        })
    }
}
