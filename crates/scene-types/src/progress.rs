//! Progress reporting and cancellation shared by assembly and export.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives `(percent, message)` updates, percent in `[0, 100]`.
pub trait ProgressSink {
    fn report(&mut self, percent: f32, message: &str);
}

impl<F: FnMut(f32, &str)> ProgressSink for F {
    fn report(&mut self, percent: f32, message: &str) {
        self(percent, message)
    }
}

/// Sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: f32, _message: &str) {}
}

/// Wraps a sink and keeps the reported percentage monotonically non-decreasing.
pub struct Progress<'a> {
    sink: &'a mut dyn ProgressSink,
    last: f32,
}

impl<'a> Progress<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self { sink, last: 0.0 }
    }

    /// Report a fraction of the whole run, `0.0..=1.0`.
    pub fn fraction(&mut self, fraction: f64, message: &str) {
        self.percent((fraction * 100.0) as f32, message);
    }

    pub fn percent(&mut self, percent: f32, message: &str) {
        let clamped = if percent.is_nan() {
            self.last
        } else {
            percent.clamp(self.last, 100.0)
        };
        self.last = clamped;
        self.sink.report(clamped, message);
    }

    pub fn finish(&mut self, message: &str) {
        self.percent(100.0, message);
    }

    pub fn last(&self) -> f32 {
        self.last
    }
}

/// Cooperative cancellation flag, checked between bodies.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
