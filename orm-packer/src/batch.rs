/// Parallel fan-out of directory processing across the worker pool.
use crate::config::RunConfiguration;
use crate::grouper::DirectoryFileSet;
use crate::processor::{DirectoryProcessor, DirectoryReport};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rayon::prelude::*;
use std::time::{Duration, Instant};

const PROGRESS_TEMPLATE: &str = "[{bar:40.green/blue}] {pos}/{len} directories ({percent}%) {msg}";
const PROGRESS_CHARS: &str = "▉▊▋▌▍▎▏ ";

/// Reports of every directory plus wall-clock time for the whole batch.
pub struct BatchResult {
    pub reports: Vec<DirectoryReport>,
    pub elapsed: Duration,
}

/// Drives the directory processor over all grouped directories.
pub struct BatchRunner<'a> {
    config: &'a RunConfiguration,
    progress: ProgressBar,
    show_progress: bool,
}

impl<'a> BatchRunner<'a> {
    /// Runner that tracks progress on a bar nobody sees.
    pub fn new(config: &'a RunConfiguration) -> Self {
        Self {
            config,
            progress: ProgressBar::hidden(),
            show_progress: false,
        }
    }

    /// Draws on `progress` while the batch runs. Pass the bar the log writer
    /// suspends, so events and redraws never overlap.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self.show_progress = true;
        self
    }

    /// Processes every directory in parallel with no ordering guarantee.
    /// Reports come back in the order of `groups` regardless of completion order.
    pub fn run(&self, groups: &[DirectoryFileSet]) -> BatchResult {
        let start = Instant::now();
        let processor = DirectoryProcessor::new(self.config);

        let pb = &self.progress;
        pb.set_length(groups.len() as u64);
        pb.set_position(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(PROGRESS_CHARS),
        );
        if self.show_progress {
            pb.set_draw_target(ProgressDrawTarget::stderr());
        }
        pb.set_message("Processing directories");

        let reports: Vec<DirectoryReport> = groups
            .par_iter()
            .map(|group| {
                let report = processor.process(group);
                pb.inc(1);
                report
            })
            .collect();

        let with_failures = reports.iter().filter(|r| r.failure_count() > 0).count();
        pb.finish_with_message(format!(
            "Directories processed, {} with failures",
            with_failures
        ));
        // The finished bar stays on screen; later events print below it.
        pb.set_draw_target(ProgressDrawTarget::hidden());

        BatchResult {
            reports,
            elapsed: start.elapsed(),
        }
    }
}
