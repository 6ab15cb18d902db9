//! Report files and console output for analyzed tracks

use anyhow::{Context, Result};
use chordgram_core::model::{ConditionalRow, JointRow, ModelConfig};
use chordgram_core::{Chord, SequenceModel};
use colored::*;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// On-disk report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    config: ModelConfig,
    source_entries: usize,
    augmented_entries: usize,
    joint: &'a [JointRow],
    conditional: &'a [ConditionalRow],
}

/// Plain-text report: joint table first, then conditionals, each line with
/// the count and total behind the probability.
pub fn render_text(model: &SequenceModel) -> String {
    let mut out = String::new();

    out.push_str("Joint probabilities: P(t, t+1, ..., t+n) (where t+1 occurs right after t)\n");
    for row in model.joint_rows() {
        let _ = writeln!(
            out,
            "  P( [{}] ) = {}  ({}/{})",
            row.sequence.join(", "),
            row.probability,
            row.count,
            row.total
        );
    }

    out.push_str("\n\n");

    out.push_str("Conditional probabilities: P(t+n | t, t+1, ..., t+(n-1))\n");
    for row in model.conditional_rows() {
        let _ = writeln!(
            out,
            "  P( {} | [{}] ) = {}  ({}/{})",
            row.unknown,
            row.observed.join(", "),
            row.probability,
            row.count,
            row.total
        );
    }

    out
}

pub fn render_json(model: &SequenceModel) -> Result<String> {
    let joint = model.joint_rows();
    let conditional = model.conditional_rows();
    let report = JsonReport {
        config: model.config(),
        source_entries: model.source_entries(),
        augmented_entries: model.augmented_entries(),
        joint: &joint,
        conditional: &conditional,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write `model` to `path`, creating parent directories as needed
pub fn write_report(path: &Path, model: &SequenceModel, format: ReportFormat) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let contents = match format {
        ReportFormat::Text => render_text(model),
        ReportFormat::Json => render_json(model)?,
    };

    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Sequence rendered with each chord in its palette color
fn paint_sequence(labels: &[String]) -> String {
    let painted: Vec<String> = labels
        .iter()
        .map(|label| match Chord::parse(label) {
            Ok(chord) => chord.paint().to_string(),
            Err(_) => label.clone(),
        })
        .collect();
    format!("[{}]", painted.join(", "))
}

/// Console line for a finished file, optionally followed by its top sequences
pub fn print_success(source: &Path, report: &Path, model: &SequenceModel, top: usize) {
    println!(
        "{} {} {} {} ({} entries, {} after augmentation)",
        "✓".green().bold(),
        source.display(),
        "→".bright_black(),
        report.display().to_string().cyan(),
        model.source_entries(),
        model.augmented_entries()
    );

    if top == 0 {
        return;
    }

    for length in 1..=2 {
        let Some(joint) = model.joint(length) else {
            continue;
        };
        for (seq, obs) in joint.most_probable(top) {
            println!(
                "    {:.3}  {}  {}",
                obs.probability(),
                paint_sequence(seq.labels()),
                format!("({}/{})", obs.count, obs.total).bright_black()
            );
        }
    }
}

pub fn print_failure(source: &Path, error: &anyhow::Error) {
    eprintln!(
        "{} {}: {}",
        "✗".red().bold(),
        source.display(),
        format!("{:#}", error).red()
    );
}

pub fn print_tally(succeeded: usize, failed: usize) {
    let failed_text = format!("{} failed", failed);
    let failed_text = if failed > 0 {
        failed_text.red().bold()
    } else {
        failed_text.normal()
    };
    println!(
        "{} {}, {}",
        "Done:".bold(),
        format!("{} analyzed", succeeded).green(),
        failed_text
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chordgram_core::{ChordTrack, ModelBuilder};

    fn loop_model() -> SequenceModel {
        let track = ChordTrack::parse("0.0\t1.0\tC:maj\n1.0\t2.0\tF:maj\n2.0\t3.0\tC:maj\n").unwrap();
        ModelBuilder::default().build(&track).unwrap()
    }

    #[test]
    fn test_text_report() {
        let text = render_text(&loop_model());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Joint probabilities: P(t, t+1, ..., t+n) (where t+1 occurs right after t)"
        );
        assert!(lines.contains(&"  P( [C:maj] ) = 0.6666666666666666  (2/3)"));
        assert!(lines.contains(&"  P( [C:maj, F:maj, C:maj] ) = 1  (1/1)"));
        assert!(lines.contains(&"Conditional probabilities: P(t+n | t, t+1, ..., t+(n-1))"));
        assert!(lines.contains(&"  P( C:maj | [F:maj] ) = 1  (1/1)"));
        assert!(lines.contains(&"  P( C:maj | [C:maj, F:maj] ) = 1  (1/1)"));
    }

    #[test]
    fn test_json_report() {
        let json = render_json(&loop_model()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["config"]["max_length"], 3);
        assert_eq!(value["source_entries"], 3);
        assert_eq!(value["joint"].as_array().unwrap().len(), 5);
        assert_eq!(value["conditional"][0]["observed"][0], "C:maj");
        assert_eq!(value["conditional"][0]["unknown"], "F:maj");
    }

    #[test]
    fn test_write_report_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("loop.txt");
        write_report(&path, &loop_model(), ReportFormat::Text).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Joint probabilities"));
    }
}
