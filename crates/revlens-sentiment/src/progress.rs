//! Progress reporting seam for the enrichment pipeline.

/// Receives fractional completion and a status line after every record.
///
/// Called once per record, so implementations should be cheap.
pub trait ProgressReporter {
    /// `fraction` is in `[0.0, 1.0]`.
    fn report(&mut self, fraction: f64, message: &str);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _fraction: f64, _message: &str) {}
}

/// Emits each progress update as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&mut self, fraction: f64, message: &str) {
        tracing::debug!(progress = fraction, "{message}");
    }
}
