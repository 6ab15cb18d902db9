//! Directory batch runs
//!
//! Every annotation file under the input root goes through
//! load → augment → count → derive → write on a pool of worker threads.
//! Workers share only the read-only options; a failing file is recorded in its
//! outcome and never stops the others.

use crate::report::{self, ReportFormat};
use anyhow::{Context, Result};
use chordgram_core::{ChordTrack, ModelBuilder, ModelConfig, SequenceModel};
use crossbeam_channel::unbounded;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

/// Settings for one batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: ModelConfig,
    pub format: ReportFormat,
    /// Worker threads (at least one is always used)
    pub jobs: usize,
}

impl BatchOptions {
    pub fn new(input: PathBuf, output: PathBuf, config: ModelConfig) -> Self {
        Self {
            input,
            output,
            config,
            format: ReportFormat::Text,
            jobs: default_jobs(),
        }
    }

    /// Where the report for `source` goes: `<parent dir>-<file stem>.<ext>`
    pub fn report_path(&self, source: &Path) -> PathBuf {
        let parent = source
            .parent()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "root".to_string());
        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "annotation".to_string());

        self.output
            .join(format!("{}-{}.{}", parent, stem, self.format.extension()))
    }
}

pub fn default_jobs() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// A successfully analyzed file
#[derive(Debug)]
pub struct FileSummary {
    pub report_path: PathBuf,
    pub model: SequenceModel,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileSummary>,
}

/// Outcomes of a batch run, sorted by source path
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// Recursively collect annotation files under `root`, skipping hidden entries
/// and the report directory `output` when it lives inside `root`.
///
/// Only an unreadable `root` is an error; unreadable subdirectories are logged
/// and skipped.
pub fn scan_annotations(root: &Path, output: &Path) -> Result<Vec<PathBuf>> {
    // Missing on the first run, in which case there is nothing to skip yet
    let output = output.canonicalize().ok();
    let mut files = Vec::new();
    scan_dir(root, output.as_deref(), &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_dir(dir: &Path, output: Option<&Path>, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        if is_hidden(&path) {
            continue;
        }
        if path.is_dir() {
            if is_output_dir(&path, output) {
                log::debug!("skipping report directory {}", path.display());
                continue;
            }
            if let Err(e) = scan_dir(&path, output, files) {
                log::warn!("skipping {:#}", e);
            }
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn is_output_dir(path: &Path, output: Option<&Path>) -> bool {
    match (output, path.canonicalize()) {
        (Some(output), Ok(path)) => path == output,
        _ => false,
    }
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Analyze one annotation file and write its report
pub fn process_file(path: &Path, options: &BatchOptions) -> Result<FileSummary> {
    let track =
        ChordTrack::load(path).with_context(|| format!("failed to read {}", path.display()))?;
    let model = ModelBuilder::new(options.config)
        .build(&track)
        .with_context(|| format!("failed to analyze {}", path.display()))?;

    let report_path = options.report_path(path);
    report::write_report(&report_path, &model, options.format)?;

    Ok(FileSummary { report_path, model })
}

/// Process every annotation under `options.input` in parallel
pub fn run_batch(options: &BatchOptions) -> Result<BatchSummary> {
    let files = scan_annotations(&options.input, &options.output)?;
    let workers = options.jobs.max(1).min(files.len().max(1));
    log::info!(
        "processing {} files with {} workers (transpositions = {}, max length = {})",
        files.len(),
        workers,
        options.config.transpositions,
        options.config.max_length
    );

    let (job_tx, job_rx) = unbounded::<PathBuf>();
    let (result_tx, result_rx) = unbounded::<FileOutcome>();

    for path in files {
        job_tx.send(path)?;
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for path in job_rx.iter() {
                    let result = process_file(&path, options);
                    match &result {
                        Ok(summary) => log::debug!("{} done", summary.report_path.display()),
                        Err(e) => log::error!("{:#}", e),
                    }
                    // Receiver outlives the scope
                    let _ = result_tx.send(FileOutcome { path, result });
                }
            });
        }
    });
    drop(result_tx);

    let mut outcomes: Vec<FileOutcome> = result_rx.iter().collect();
    outcomes.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(BatchSummary { outcomes })
}

/// Print one line per outcome and the final tally
pub fn print_summary(summary: &BatchSummary, top: usize) {
    for outcome in &summary.outcomes {
        print_outcome(outcome, top);
    }
    report::print_tally(summary.succeeded(), summary.failed());
}

pub fn print_outcome(outcome: &FileOutcome, top: usize) {
    match &outcome.result {
        Ok(file) => report::print_success(&outcome.path, &file.report_path, &file.model, top),
        Err(e) => report::print_failure(&outcome.path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOOP: &str = "0.0\t1.0\tC:maj\n1.0\t2.0\tF:maj\n2.0\t3.0\tC:maj\n";

    fn options(input: &Path, output: &Path) -> BatchOptions {
        let mut options = BatchOptions::new(
            input.to_path_buf(),
            output.to_path_buf(),
            ModelConfig::with_transpositions(1),
        );
        options.jobs = 2;
        options
    }

    #[test]
    fn test_scan_skips_hidden_and_recurses() {
        let dir = tempfile::tempdir().unwrap();
        let song = dir.path().join("song_a");
        fs::create_dir_all(&song).unwrap();
        fs::write(song.join("chords.lab"), LOOP).unwrap();
        fs::write(song.join(".DS_Store"), "junk").unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git").join("HEAD"), "junk").unwrap();
        fs::write(dir.path().join("top.lab"), LOOP).unwrap();

        let files = scan_annotations(dir.path(), &dir.path().join("reports")).unwrap();
        assert_eq!(files, vec![song.join("chords.lab"), dir.path().join("top.lab")]);
    }

    #[test]
    fn test_report_path() {
        let options = options(Path::new("in"), Path::new("out"));
        assert_eq!(
            options.report_path(Path::new("in/Let_It_Be/chords.lab")),
            PathBuf::from("out/Let_It_Be-chords.txt")
        );
    }

    #[test]
    fn test_failures_are_isolated() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let good = input.path().join("good");
        let bad = input.path().join("bad");
        let empty = input.path().join("empty");
        for dir in [&good, &bad, &empty] {
            fs::create_dir_all(dir).unwrap();
        }
        fs::write(good.join("chords.lab"), LOOP).unwrap();
        fs::write(bad.join("chords.lab"), "0.0\t1.0\tQ:maj\n").unwrap();
        fs::write(empty.join("chords.lab"), "just a comment\n").unwrap();

        let summary = run_batch(&options(input.path(), output.path())).unwrap();
        assert_eq!(summary.outcomes.len(), 3);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.failed(), 2);

        let good_outcome = summary
            .outcomes
            .iter()
            .find(|o| o.path.starts_with(&good))
            .unwrap();
        let file = good_outcome.result.as_ref().unwrap();
        assert_eq!(file.model.augmented_entries(), 6);
        assert!(file.report_path.exists());

        assert!(!output.path().join("bad-chords.txt").exists());
        assert!(!output.path().join("empty-chords.txt").exists());
    }

    #[test]
    fn test_empty_input_directory() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let summary = run_batch(&options(input.path(), output.path())).unwrap();
        assert!(summary.outcomes.is_empty());
        assert_eq!(summary.failed(), 0);
    }

    #[test]
    fn test_rerun_with_reports_inside_input() {
        let input = tempfile::tempdir().unwrap();
        let song = input.path().join("song");
        fs::create_dir_all(&song).unwrap();
        fs::write(song.join("chords.lab"), LOOP).unwrap();
        let output = input.path().join("reports");

        let options = options(input.path(), &output);
        for _ in 0..2 {
            let summary = run_batch(&options).unwrap();
            assert_eq!(summary.outcomes.len(), 1);
            assert_eq!(summary.succeeded(), 1);
            assert_eq!(summary.failed(), 0);
        }
        assert!(output.join("song-chords.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let input = tempfile::tempdir().unwrap();
        let good = input.path().join("good");
        let locked = input.path().join("locked");
        fs::create_dir_all(&good).unwrap();
        fs::create_dir_all(&locked).unwrap();
        fs::write(good.join("chords.lab"), LOOP).unwrap();
        fs::write(locked.join("chords.lab"), LOOP).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root
        let readable = fs::read_dir(&locked).is_ok();
        let files = scan_annotations(input.path(), &input.path().join("reports"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let files = files.unwrap();
        assert!(files.contains(&good.join("chords.lab")));
        if !readable {
            assert_eq!(files, vec![good.join("chords.lab")]);
        }
    }

    #[test]
    fn test_missing_input_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_annotations(&dir.path().join("absent"), dir.path()).is_err());
    }
}
