//! # Chordgram Core
//!
//! WASM-compatible core library for chord n-gram statistics.
//! Parses chord annotations, augments them by transposition, and derives
//! joint and conditional probability tables over n-grams of length 1-3.
//! Performs no file or graphics output of its own.
//!
//! ## Features
//!
//! - **serde**: Enable serialization of configs, rows and chords
//! - **wasm**: Enable WASM bindings via wasm-bindgen
//! - **colored**: Enable colored terminal rendering of chords (disabled in WASM)
//!
//! ## Example
//!
//! ```
//! use chordgram_core::{ChordTrack, ModelBuilder, ModelConfig};
//!
//! let track = ChordTrack::parse("0.0\t1.0\tC:maj\n1.0\t2.0\tF:maj\n2.0\t3.0\tC:maj\n")?;
//! let model = ModelBuilder::new(ModelConfig::default()).build(&track)?;
//! let after_f = vec!["F:maj".to_string()];
//! assert_eq!(model.conditional(2).unwrap().probability("C:maj", &after_f), 1.0);
//! # Ok::<(), chordgram_core::ChordgramError>(())
//! ```

pub mod error;
pub mod model;
pub mod types;
pub mod wasm;

// Re-export commonly used types
pub use error::{ChordgramError, LabelProblem};
pub use model::{
    ConditionalTable, JointTable, ModelBuilder, ModelConfig, Observation, Sequence, SequenceModel,
};
pub use types::{Chord, ChordTrack, Rgb, TimedChord};

// Re-export WASM functions when wasm feature is enabled
#[cfg(feature = "wasm")]
pub use wasm::{analyze_annotation, canonical_label, chord_color};
