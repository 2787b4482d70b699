use std::io::IsTerminal;
use std::sync::atomic::{AtomicU8, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

use crate::runner::ProgressSink;

/// Percentage bar for a run.
///
/// Disabled in quiet mode or when stderr is not a TTY. The position never
/// moves backwards.
pub struct RunProgress {
    progress_bar: ProgressBar,
    percent: AtomicU8,
}

impl RunProgress {
    /// Draws on stderr so stdout stays clean for the report.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let is_tty = std::io::stderr().is_terminal();
        Self::new_with_visibility(quiet, is_tty)
    }

    fn new_with_visibility(quiet: bool, is_tty: bool) -> Self {
        let progress_bar = if quiet || !is_tty {
            ProgressBar::hidden()
        } else {
            Self::create_visible_progress_bar()
        };

        Self {
            progress_bar,
            percent: AtomicU8::new(0),
        }
    }

    fn create_visible_progress_bar() -> ProgressBar {
        let pb = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} Checking [{bar:40.cyan/blue}] {pos}% ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    #[must_use]
    pub fn position(&self) -> u8 {
        self.percent.load(Ordering::SeqCst)
    }

    /// Finishes the progress bar and clears it from the terminal.
    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl ProgressSink for RunProgress {
    fn set_percent(&self, percent: u8) {
        let percent = percent.min(100);
        let previous = self.percent.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            self.progress_bar.set_position(u64::from(percent));
        }
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
