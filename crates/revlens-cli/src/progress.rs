//! Terminal progress bar for the enrichment pipeline.

use indicatif::{ProgressBar, ProgressStyle};
use revlens_sentiment::{LogProgress, ProgressReporter};

/// Resolution of the bar; pipeline fractions are scaled onto it.
const STEPS: u64 = 1000;

const TEMPLATE: &str = "[{bar:30}] {percent:>3}% {msg}";

/// Draws an `indicatif` bar on stderr. When stderr is not a terminal the bar
/// is hidden and updates go to `tracing` instead.
pub(crate) struct ConsoleProgress {
    bar: ProgressBar,
}

impl ConsoleProgress {
    pub(crate) fn new() -> Self {
        Self::with_bar(ProgressBar::new(STEPS))
    }

    fn with_bar(bar: ProgressBar) -> Self {
        let style = ProgressStyle::default_bar().template(TEMPLATE).map_or_else(
            |_| ProgressStyle::default_bar(),
            |style| style.progress_chars("#>-"),
        );
        bar.set_style(style);
        Self { bar }
    }

    /// End a bar that never reached 100%, e.g. after cancellation.
    pub(crate) fn finish(&mut self) {
        if !self.bar.is_finished() {
            self.bar.abandon();
        }
    }
}

impl ProgressReporter for ConsoleProgress {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn report(&mut self, fraction: f64, message: &str) {
        let fraction = fraction.clamp(0.0, 1.0);
        if self.bar.is_hidden() {
            LogProgress.report(fraction, message);
        }
        self.bar.set_position((fraction * STEPS as f64).round() as u64);
        self.bar.set_message(message.to_string());
        if fraction >= 1.0 {
            self.bar.finish();
        }
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
