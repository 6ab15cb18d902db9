//! Sliding-window n-gram counts over a chord track

use crate::model::sequence::Sequence;
use crate::types::track::ChordTrack;
use std::collections::BTreeMap;

/// Raw n-gram counts for one sequence length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    length: usize,
    counts: BTreeMap<Sequence, u64>,
    /// Number of windows counted at this length
    total: u64,
}

impl FrequencyTable {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            counts: BTreeMap::new(),
            total: 0,
        }
    }

    /// Count one window. The total grows on every call, seen key or not.
    pub fn record(&mut self, sequence: Sequence) {
        debug_assert_eq!(sequence.len(), self.length);
        let count = self.counts.entry(sequence).or_insert(0);
        *count += 1;
        self.total += 1;
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Occurrences of `sequence`, zero if never seen
    pub fn count(&self, sequence: &Sequence) -> u64 {
        self.counts.get(sequence).copied().unwrap_or(0)
    }

    /// Number of distinct sequences
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Sequence, u64)> {
        self.counts.iter().map(|(seq, &count)| (seq, count))
    }
}

/// Frequency tables for lengths `1..=max_length`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceCounts {
    tables: Vec<FrequencyTable>,
}

impl SequenceCounts {
    pub fn max_length(&self) -> usize {
        self.tables.len()
    }

    pub fn get(&self, length: usize) -> Option<&FrequencyTable> {
        length.checked_sub(1).and_then(|i| self.tables.get(i))
    }

    pub fn tables(&self) -> &[FrequencyTable] {
        &self.tables
    }
}

/// Count every contiguous window of length `1..=max_length`.
///
/// Windows follow track order positionally, so after augmentation a window can
/// straddle the end of one block and the start of the next. Windows that would
/// run past the end of the track are not counted.
pub fn count_sequences(track: &ChordTrack, max_length: usize) -> SequenceCounts {
    let labels: Vec<String> = track.chords().map(|c| c.to_string()).collect();

    let tables = (1..=max_length)
        .map(|length| {
            let mut table = FrequencyTable::new(length);
            for window in labels.windows(length) {
                table.record(Sequence::from_labels(window));
            }
            log::debug!(
                "length {}: {} windows, {} distinct",
                length,
                table.total(),
                table.len()
            );
            table
        })
        .collect();

    SequenceCounts { tables }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(labels: &[&str]) -> Sequence {
        Sequence::from_labels(labels)
    }

    #[test]
    fn test_record_increments_total_every_time() {
        let mut table = FrequencyTable::new(1);
        table.record(seq(&["C:maj"]));
        table.record(seq(&["C:maj"]));
        table.record(seq(&["G:7"]));
        assert_eq!(table.total(), 3);
        assert_eq!(table.count(&seq(&["C:maj"])), 2);
        assert_eq!(table.count(&seq(&["D:min"])), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_window_totals() {
        let track = ChordTrack::parse("0\t1\tC:maj\n1\t2\tF:maj\n2\t3\tG:7\n3\t4\tC:maj\n").unwrap();
        let counts = count_sequences(&track, 3);
        assert_eq!(counts.max_length(), 3);
        assert_eq!(counts.get(1).unwrap().total(), 4);
        assert_eq!(counts.get(2).unwrap().total(), 3);
        assert_eq!(counts.get(3).unwrap().total(), 2);
        assert!(counts.get(0).is_none());
        assert!(counts.get(4).is_none());

        let trigrams = counts.get(3).unwrap();
        assert_eq!(trigrams.count(&seq(&["C:maj", "F:maj", "G:7"])), 1);
        assert_eq!(trigrams.count(&seq(&["F:maj", "G:7", "C:maj"])), 1);
    }

    #[test]
    fn test_short_track_skips_long_windows() {
        let track = ChordTrack::parse("0\t1\tC:maj\n").unwrap();
        let counts = count_sequences(&track, 3);
        assert_eq!(counts.get(1).unwrap().total(), 1);
        assert!(counts.get(2).unwrap().is_empty());
        assert_eq!(counts.get(3).unwrap().total(), 0);
    }

    #[test]
    fn test_windows_span_augmentation_blocks() {
        let track = ChordTrack::parse("0\t1\tC:maj\n1\t2\tG:maj\n")
            .unwrap()
            .augmented(1)
            .unwrap();
        let counts = count_sequences(&track, 2);
        // G:maj closes the original block, C#:maj opens the transposed one
        assert_eq!(counts.get(2).unwrap().count(&seq(&["G:maj", "C#:maj"])), 1);
    }
}
