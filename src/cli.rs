use crate::batch::{default_jobs, BatchOptions};
use crate::report::ReportFormat;
use chordgram_core::model::DEFAULT_MAX_LENGTH;
use chordgram_core::ModelConfig;
use clap::Parser;
use std::path::PathBuf;

/// chordgram: chord n-gram probability reports from chord annotations.
///
/// Crawls INPUT recursively; every file holding `start<TAB>end<TAB>label`
/// lines gets one report in OUTPUT.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory crawled for annotation files
    pub input: PathBuf,

    /// Directory receiving the reports
    pub output: PathBuf,

    /// Transposed copies appended to each loop (copy i is shifted up i semitones)
    #[arg(default_value_t = 0)]
    pub transpositions: usize,

    /// Longest n-gram to count
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Worker threads. Defaults to the available parallelism.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Keep running and rebuild reports when annotation files change
    #[arg(long, default_value_t = false)]
    pub watch: bool,

    /// Print the N most probable chords and bigrams of each file
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Disable colored output
    #[arg(long, default_value_t = false)]
    pub no_color: bool,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig::new(self.transpositions, self.max_length)
    }

    /// Check paths and model settings before any work starts
    ///
    /// # Errors
    /// Returns an error if the input is not a directory, the output is the input
    /// directory itself, or the config is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.input.is_dir() {
            anyhow::bail!("input '{}' is not a directory", self.input.display());
        }
        if self.output.canonicalize().ok() == self.input.canonicalize().ok() {
            anyhow::bail!("output must not be the input directory itself");
        }
        self.model_config().validate()?;
        Ok(())
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            input: self.input.clone(),
            output: self.output.clone(),
            config: self.model_config(),
            format: self.format,
            jobs: self.jobs.unwrap_or_else(default_jobs),
        }
    }
}
