//! # Chordgram
//!
//! Batch driver around `chordgram-core`: crawls a directory of chord
//! annotations, builds joint and conditional n-gram tables for each file on a
//! pool of worker threads, and writes one report per file.
//!
//! ## Modules
//!
//! - `cli`: Command-line arguments.
//! - `batch`: Directory scan, worker pool, per-file outcomes.
//! - `report`: Text/JSON report files and colored console output.
//! - `watcher`: Rebuilds reports when annotation files change.

pub mod batch;
pub mod cli;
pub mod report;
pub mod watcher;

pub use batch::{run_batch, BatchOptions, BatchSummary};
pub use cli::Cli;
pub use report::ReportFormat;
