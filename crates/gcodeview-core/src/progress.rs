//! Progress reporting and cooperative cancellation.
//!
//! Long-running work reports a completed fraction after each unit of work and
//! polls [`Tracer::interrupted`] between units. Cancellation never preempts a
//! unit that is already in flight.

use crate::types::{FailureCallback, ProgressCallback};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress sink and cancellation source for a reconstruction.
pub trait Tracer {
    /// Report the completed fraction in `[0, 1]`
    fn progress(&mut self, fraction: f32);

    /// Whether the caller asked to stop
    fn interrupted(&self) -> bool;

    /// Report that work was abandoned
    fn failed(&mut self, message: &str);
}

/// Tracer that ignores progress and never interrupts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTracer;

impl Tracer for NullTracer {
    fn progress(&mut self, _fraction: f32) {}

    fn interrupted(&self) -> bool {
        false
    }

    fn failed(&mut self, _message: &str) {}
}

/// Shared cancellation flag.
///
/// Clones observe the same flag, so one clone can be handed to a worker while
/// another stays with the UI.
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Tracer backed by optional callbacks and a [`CancelToken`].
#[derive(Default)]
pub struct CallbackTracer {
    on_progress: Option<ProgressCallback>,
    on_failure: Option<FailureCallback>,
    token: CancelToken,
    last_fraction: f32,
}

impl CallbackTracer {
    pub fn new(token: CancelToken) -> Self {
        Self {
            token,
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn with_failure(mut self, callback: FailureCallback) -> Self {
        self.on_failure = Some(callback);
        self
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Last fraction reported through [`Tracer::progress`]
    pub fn last_fraction(&self) -> f32 {
        self.last_fraction
    }
}

impl Tracer for CallbackTracer {
    fn progress(&mut self, fraction: f32) {
        let fraction = fraction.clamp(0.0, 1.0);
        self.last_fraction = fraction;
        if let Some(callback) = self.on_progress.as_mut() {
            callback(fraction);
        }
    }

    fn interrupted(&self) -> bool {
        self.token.is_cancelled()
    }

    fn failed(&mut self, message: &str) {
        if let Some(callback) = self.on_failure.as_mut() {
            callback(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_null_tracer_never_interrupts() {
        let mut tracer = NullTracer;
        tracer.progress(0.5);
        tracer.failed("ignored");
        assert!(!tracer.interrupted());
    }

    #[test]
    fn test_cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let worker = token.clone();
        assert!(!worker.is_cancelled());
        token.cancel();
        assert!(worker.is_cancelled());
    }

    #[test]
    fn test_callback_tracer_forwards_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let failures = Arc::new(Mutex::new(Vec::new()));
        let seen_cb = Arc::clone(&seen);
        let failures_cb = Arc::clone(&failures);

        let token = CancelToken::new();
        let mut tracer = CallbackTracer::new(token.clone())
            .with_progress(Box::new(move |f| seen_cb.lock().unwrap().push(f)))
            .with_failure(Box::new(move |m| failures_cb.lock().unwrap().push(m.to_string())));

        tracer.progress(0.25);
        tracer.progress(1.5);
        assert_eq!(*seen.lock().unwrap(), vec![0.25, 1.0]);
        assert_eq!(tracer.last_fraction(), 1.0);

        assert!(!tracer.interrupted());
        token.cancel();
        assert!(tracer.interrupted());

        tracer.failed("stopped");
        assert_eq!(*failures.lock().unwrap(), vec!["stopped".to_string()]);
    }
}
