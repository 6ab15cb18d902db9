// chordgram-core/src/model/mod.rs

pub mod builder;
pub mod frequency;
pub mod probability;
pub mod sequence;

pub use builder::{
    ConditionalRow, JointRow, LengthTables, ModelBuilder, ModelConfig, SequenceModel,
    DEFAULT_MAX_LENGTH, MAX_SEQUENCE_LENGTH,
};
pub use frequency::{count_sequences, FrequencyTable, SequenceCounts};
pub use probability::{ConditionalKey, ConditionalTable, JointTable, Observation, PrefixIndex};
pub use sequence::Sequence;
