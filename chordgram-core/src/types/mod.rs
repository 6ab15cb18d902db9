// chordgram-core/src/types/mod.rs

pub mod chord;
pub mod track;

pub use chord::{Chord, Rgb, Root};
pub use track::{ChordTrack, TimedChord};
