/// ORM texture packer main entry point
mod batch;
mod channels;
mod cli;
mod config;
mod console;
mod discovery;
mod error;
mod grouper;
mod processor;
mod report;
mod texture_io;

use batch::BatchRunner;
use clap::Parser;
use cli::Cli;
use config::StdinPrompter;
use discovery::discover_textures;
use error::PackerError;
use grouper::group_by_directory;
use indicatif::ProgressBar;
use report::{BatchSummary, write_report};
use std::io::{self, IsTerminal};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let progress = ProgressBar::hidden();
    console::init_logging(&progress);

    let cli = Cli::parse();
    let config = config::resolve(&cli, &mut StdinPrompter)?;

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| PackerError::ThreadPool(e.to_string()))?;
        info!("Using {} threads for parallel processing", threads);
    }

    let files = discover_textures(&config.search_path, config.format);
    info!("Files found: {}", files.len());

    let groups = group_by_directory(files)?;
    let mut runner = BatchRunner::new(&config);
    if io::stderr().is_terminal() {
        runner = runner.with_progress(progress);
    }
    let result = runner.run(&groups);

    let summary = BatchSummary::from_reports(&result.reports, result.elapsed);
    summary.log();

    if let Some(path) = &cli.report {
        write_report(path, &config, &summary, &result.reports)?;
    }

    info!("Done!");
    Ok(())
}
