//! Time-stamped chord tracks and transposition augmentation
//!
//! Annotations are tab-separated `start\tend\tlabel` lines. Lines with any
//! other number of fields are blank lines or comments and are skipped.

use crate::error::{ChordgramError, Result};
use crate::types::chord::Chord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One interval of harmonic content
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedChord {
    pub start: f64,
    pub end: f64,
    pub chord: Chord,
}

impl TimedChord {
    pub fn new(start: f64, end: f64, chord: Chord) -> Self {
        Self { start, end, chord }
    }

    /// Copy moved forward by `offset` seconds and transposed by `semitones`
    fn shifted(&self, offset: f64, semitones: i32) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
            chord: self.chord.transposed(semitones),
        }
    }
}

/// An ordered chord timeline covering one musical loop
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChordTrack {
    entries: Vec<TimedChord>,
}

impl ChordTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<TimedChord>) -> Self {
        Self { entries }
    }

    /// Parse annotation text held in memory
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Read an annotation file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read annotation lines from any buffered source.
    ///
    /// The first bad chord label or time aborts the whole read.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut entries: Vec<TimedChord> = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            let line = line.trim_end_matches(['\r', '\n']);

            let fields: Vec<&str> = line.split('\t').collect();
            let [start, end, label] = fields.as_slice() else {
                log::trace!("skipping line {} ({} fields)", line_no, fields.len());
                continue;
            };

            let start = parse_time(start, line_no)?;
            let end = parse_time(end, line_no)?;
            let chord = Chord::parse(label).map_err(|e| e.at_line(line_no))?;

            if let Some(previous) = entries.last() {
                if start < previous.start {
                    log::warn!(
                        "line {}: start time {} is earlier than previous entry ({})",
                        line_no,
                        start,
                        previous.start
                    );
                }
            }

            entries.push(TimedChord::new(start, end, chord));
        }

        log::debug!("read {} chord entries", entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TimedChord] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedChord> {
        self.entries.iter()
    }

    /// Chords in track order
    pub fn chords(&self) -> impl Iterator<Item = &Chord> {
        self.entries.iter().map(|e| &e.chord)
    }

    /// Loop duration: the end time of the last entry
    pub fn duration(&self) -> Option<f64> {
        self.entries.last().map(|e| e.end)
    }

    /// Append `transpositions` copies of this track after the original.
    ///
    /// Copy `i` (1-based) is shifted by `i` loop durations and transposed up
    /// `i` semitones, so the result holds `len * (transpositions + 1)` entries:
    /// the original block first, then each copy in increasing `i`.
    pub fn augmented(&self, transpositions: usize) -> Result<ChordTrack> {
        let loop_length = self.duration().ok_or(ChordgramError::EmptyTrack)?;

        let mut entries = Vec::with_capacity(self.entries.len() * (transpositions + 1));
        entries.extend(self.entries.iter().cloned());

        for i in 1..=transpositions {
            let offset = i as f64 * loop_length;
            let semitones = (i % 12) as i32;
            entries.extend(self.entries.iter().map(|e| e.shifted(offset, semitones)));
        }

        Ok(ChordTrack { entries })
    }
}

impl<'a> IntoIterator for &'a ChordTrack {
    type Item = &'a TimedChord;
    type IntoIter = std::slice::Iter<'a, TimedChord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn parse_time(field: &str, line: usize) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| ChordgramError::InvalidTime {
            line,
            value: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(label: &str) -> Chord {
        Chord::parse(label).unwrap()
    }

    const LOOP: &str = "0.0\t1.0\tC:maj\n1.0\t2.0\tF:maj\n2.0\t3.0\tC:maj\n";

    #[test]
    fn test_parse_annotation() {
        let track = ChordTrack::parse(LOOP).unwrap();
        assert_eq!(track.len(), 3);
        assert_eq!(track.entries()[1], TimedChord::new(1.0, 2.0, chord("F:maj")));
        assert_eq!(track.duration(), Some(3.0));
    }

    #[test]
    fn test_skips_lines_with_wrong_field_count() {
        let text = "\n# comment\n0.0\t1.0\n0.0\t1.0\tN\n1.0\t2.0\tA:min\textra\n";
        let track = ChordTrack::parse(text).unwrap();
        assert_eq!(track.len(), 1);
        assert_eq!(track.entries()[0].chord, chord("N"));
    }

    #[test]
    fn test_crlf_line_endings() {
        let track = ChordTrack::parse("0.0\t1.5\tBb:min7\r\n").unwrap();
        assert_eq!(track.entries()[0].chord.to_string(), "A#:min7");
    }

    #[test]
    fn test_bad_label_aborts_with_line_number() {
        let err = ChordTrack::parse("0.0\t1.0\tC:maj\n1.0\t2.0\tQ:maj\n").unwrap_err();
        match err {
            ChordgramError::InvalidChordLabel { label, line, .. } => {
                assert_eq!(label, "Q:maj");
                assert_eq!(line, Some(2));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bad_time() {
        let err = ChordTrack::parse("zero\t1.0\tC:maj\n").unwrap_err();
        assert!(matches!(err, ChordgramError::InvalidTime { line: 1, .. }));
    }

    #[test]
    fn test_augmentation_blocks() {
        let track = ChordTrack::parse(LOOP).unwrap();
        let augmented = track.augmented(2).unwrap();
        assert_eq!(augmented.len(), 9);

        // Original block untouched
        assert_eq!(&augmented.entries()[..3], track.entries());

        for i in 1..=2usize {
            let block = &augmented.entries()[i * 3..(i + 1) * 3];
            for (copy, original) in block.iter().zip(track.iter()) {
                assert_eq!(copy.start, original.start + 3.0 * i as f64);
                assert_eq!(copy.end, original.end + 3.0 * i as f64);
                assert_eq!(copy.chord, original.chord.transposed(i as i32));
            }
        }

        assert_eq!(augmented.entries()[3].chord, chord("C#:maj"));
        assert_eq!(augmented.entries()[7].chord, chord("G:maj"));
    }

    #[test]
    fn test_augmentation_keeps_sentinels() {
        let track = ChordTrack::parse("0.0\t2.0\tN\n2.0\t4.0\tE:min\n").unwrap();
        let augmented = track.augmented(1).unwrap();
        assert_eq!(augmented.entries()[2], TimedChord::new(4.0, 6.0, chord("N")));
        assert_eq!(augmented.entries()[3].chord, chord("F:min"));
    }

    #[test]
    fn test_zero_transpositions_is_identity() {
        let track = ChordTrack::parse(LOOP).unwrap();
        assert_eq!(track.augmented(0).unwrap(), track);
    }

    #[test]
    fn test_augment_empty_track() {
        let err = ChordTrack::new().augmented(3).unwrap_err();
        assert!(matches!(err, ChordgramError::EmptyTrack));
    }
}
