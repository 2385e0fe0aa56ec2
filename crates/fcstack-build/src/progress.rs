//! Progress reporting for long-running build steps.
//!
//! The orchestrator reports through the [`Progress`] port so tests can
//! observe (or silence) the console output. The default implementation is
//! an [`indicatif`] spinner.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Starts scoped progress spans.
pub trait Progress: Send + Sync {
    /// Begin a span with the given label.
    fn start(&self, label: &str) -> Box<dyn ProgressSpan>;
}

/// A single in-flight progress span.
///
/// Consumed on completion; exactly one of [`succeed`](Self::succeed) or
/// [`fail`](Self::fail) ends the span.
pub trait ProgressSpan: Send {
    /// End the span quietly: the step completed.
    fn succeed(self: Box<Self>);

    /// End the span leaving a visible failure mark.
    fn fail(self: Box<Self>);
}

/// Console spinner backed by [`indicatif`].
#[derive(Debug, Clone, Default)]
pub struct SpinnerProgress;

impl Progress for SpinnerProgress {
    fn start(&self, label: &str) -> Box<dyn ProgressSpan> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::default_spinner());
        bar.set_message(label.to_owned());
        bar.enable_steady_tick(Duration::from_millis(80));
        Box::new(SpinnerSpan {
            bar,
            label: label.to_owned(),
        })
    }
}

/// Span for [`SpinnerProgress`].
struct SpinnerSpan {
    bar: ProgressBar,
    label: String,
}

impl ProgressSpan for SpinnerSpan {
    fn succeed(self: Box<Self>) {
        self.bar.finish_and_clear();
    }

    fn fail(self: Box<Self>) {
        self.bar.abandon_with_message(format!("{} failed", self.label));
    }
}

/// Progress implementation that reports nothing. Used in tests and by
/// embedders that own their console output.
#[derive(Debug, Clone, Default)]
pub struct NoopProgress;

impl Progress for NoopProgress {
    fn start(&self, _label: &str) -> Box<dyn ProgressSpan> {
        Box::new(NoopSpan)
    }
}

struct NoopSpan;

impl ProgressSpan for NoopSpan {
    fn succeed(self: Box<Self>) {}
    fn fail(self: Box<Self>) {}
}
