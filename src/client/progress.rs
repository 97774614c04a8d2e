//! Progress reporting for client-side conversions.
//!
//! The indicator state is scoped, not global: [`ProgressScope::enter`] fires
//! the start hook and the `Drop` impl fires the finish hook, so the indicator
//! clears on every exit path — success, error return, or panic unwind.

use tracing::info;

/// Receiver for conversion progress events.
pub trait ProgressSink: Send + Sync {
    /// A conversion named `label` has started.
    fn started(&self, label: &str);

    /// The conversion named `label` has finished (successfully or not).
    fn finished(&self, label: &str);
}

/// Sink that logs progress through `tracing`.
#[derive(Debug, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn started(&self, label: &str) {
        info!(tool = label, "conversion started");
    }

    fn finished(&self, label: &str) {
        info!(tool = label, "conversion finished");
    }
}

/// Sink that reports nothing.
#[derive(Debug, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn started(&self, _label: &str) {}
    fn finished(&self, _label: &str) {}
}

/// RAII guard pairing a started/finished event around one conversion.
pub struct ProgressScope<'a> {
    sink: &'a dyn ProgressSink,
    label: &'a str,
}

impl<'a> ProgressScope<'a> {
    /// Fire the start hook and return the guard.
    pub fn enter(sink: &'a dyn ProgressSink, label: &'a str) -> Self {
        sink.started(label);
        Self { sink, label }
    }
}

impl Drop for ProgressScope<'_> {
    fn drop(&mut self) {
        self.sink.finished(self.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSink {
        started: AtomicUsize,
        finished: AtomicUsize,
    }

    impl ProgressSink for CountingSink {
        fn started(&self, _label: &str) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn finished(&self, _label: &str) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_scope_fires_both_hooks() {
        let sink = CountingSink::default();
        {
            let _scope = ProgressScope::enter(&sink, "PDF Merge");
            assert_eq!(sink.started.load(Ordering::SeqCst), 1);
            assert_eq!(sink.finished.load(Ordering::SeqCst), 0);
        }
        assert_eq!(sink.finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_scope_clears_on_early_return() {
        fn failing(sink: &CountingSink) -> Result<(), ()> {
            let _scope = ProgressScope::enter(sink, "QR Code Generation");
            Err(())
        }

        let sink = CountingSink::default();
        assert!(failing(&sink).is_err());
        assert_eq!(sink.started.load(Ordering::SeqCst), 1);
        assert_eq!(sink.finished.load(Ordering::SeqCst), 1);
    }
}
