use std::fmt;

/// Why a chord label was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelProblem {
    /// More than one `:` separator
    TooManySeparators,
    /// Root spelling is not in the pitch table and is not `N` or `X`
    UnknownRoot,
    /// A pitched root without a `:quality` suffix
    MissingQuality,
}

impl fmt::Display for LabelProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelProblem::TooManySeparators => write!(f, "more than one ':' separator"),
            LabelProblem::UnknownRoot => write!(f, "unknown root spelling"),
            LabelProblem::MissingQuality => write!(f, "pitched root needs a quality"),
        }
    }
}

#[derive(Debug)]
pub enum ChordgramError {
    /// Malformed chord label. `line` is set when the label came from an annotation.
    InvalidChordLabel {
        label: String,
        reason: LabelProblem,
        line: Option<usize>,
    },
    /// Augmentation needs at least one entry to know the loop duration
    EmptyTrack,
    /// A start or end time that is not a number
    InvalidTime { line: usize, value: String },
    InvalidConfig(String),
    Io(std::io::Error),
}

impl ChordgramError {
    pub(crate) fn invalid_label(label: &str, reason: LabelProblem) -> Self {
        ChordgramError::InvalidChordLabel {
            label: label.to_string(),
            reason,
            line: None,
        }
    }

    /// Attach the annotation line number to a label error
    pub(crate) fn at_line(self, line_no: usize) -> Self {
        match self {
            ChordgramError::InvalidChordLabel { label, reason, .. } => {
                ChordgramError::InvalidChordLabel {
                    label,
                    reason,
                    line: Some(line_no),
                }
            }
            other => other,
        }
    }
}

impl fmt::Display for ChordgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordgramError::InvalidChordLabel {
                label,
                reason,
                line: Some(line),
            } => write!(f, "Invalid chord label '{}' at line {}: {}", label, line, reason),
            ChordgramError::InvalidChordLabel { label, reason, .. } => {
                write!(f, "Invalid chord label '{}': {}", label, reason)
            }
            ChordgramError::EmptyTrack => write!(f, "Chord track is empty"),
            ChordgramError::InvalidTime { line, value } => {
                write!(f, "Invalid time '{}' at line {}", value, line)
            }
            ChordgramError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ChordgramError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for ChordgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChordgramError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChordgramError {
    fn from(err: std::io::Error) -> Self {
        ChordgramError::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, ChordgramError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_number_in_message() {
        let err = ChordgramError::invalid_label("Q:maj", LabelProblem::UnknownRoot).at_line(7);
        assert_eq!(
            err.to_string(),
            "Invalid chord label 'Q:maj' at line 7: unknown root spelling"
        );
    }

    #[test]
    fn test_at_line_leaves_other_errors_alone() {
        let err = ChordgramError::EmptyTrack.at_line(3);
        assert!(matches!(err, ChordgramError::EmptyTrack));
    }
}
