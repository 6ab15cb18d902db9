use std::fmt;

/// An n-gram of canonical chord labels, in temporal order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence(Vec<String>);

impl Sequence {
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        Sequence(labels.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Split into (observed prefix, unknown last element)
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        self.0
            .split_last()
            .map(|(last, prefix)| (prefix, last.as_str()))
    }

    /// Everything but the last element
    pub fn prefix(&self) -> &[String] {
        self.split_last().map(|(prefix, _)| prefix).unwrap_or(&[])
    }
}

/// Rendered like a list: `[C:maj, F:maj]`
impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_last() {
        let seq = Sequence::from_labels(&["C:maj", "F:maj", "G:7"]);
        let (prefix, last) = seq.split_last().unwrap();
        assert_eq!(prefix, &["C:maj".to_string(), "F:maj".to_string()]);
        assert_eq!(last, "G:7");
        assert!(Sequence::from_labels::<&str>(&[]).split_last().is_none());
    }

    #[test]
    fn test_order_matters() {
        assert_ne!(
            Sequence::from_labels(&["C:maj", "F:maj"]),
            Sequence::from_labels(&["F:maj", "C:maj"])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Sequence::from_labels(&["N", "A:min"]).to_string(), "[N, A:min]");
    }
}
