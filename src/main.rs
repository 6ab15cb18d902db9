use anyhow::Result;
use chordgram::batch::{print_summary, run_batch};
use chordgram::watcher::run_watch;
use chordgram::Cli;
use clap::Parser;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    cli.validate()?;
    let options = cli.batch_options();

    let summary = run_batch(&options)?;
    print_summary(&summary, cli.top);

    if cli.watch {
        return run_watch(&options, cli.top);
    }

    if summary.failed() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
