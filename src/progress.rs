use crate::artifact::CompressionOutcome;
use std::sync::{Arc, Mutex, PoisonError};

/// Caller-supplied progress sink, receiving percentages in `[0, 100]`.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Batch-level progress sink, receiving `(input index, percent)`.
pub type BatchProgressFn = Arc<dyn Fn(usize, u8) + Send + Sync>;

/// Called once per image as soon as its outcome is known, in completion order.
pub type CompletionFn = Arc<dyn Fn(usize, &CompressionOutcome) + Send + Sync>;

/// Forwards progress to an optional callback, clamped to `[0, 100]` and never
/// going backwards. Without a callback every report is a no-op.
/// The check and the callback run under one lock.
pub struct ProgressRelay {
    sink: Option<ProgressFn>,
    last: Mutex<Option<u8>>,
}

impl ProgressRelay {
    pub fn new(sink: Option<ProgressFn>) -> Self {
        Self {
            sink,
            last: Mutex::new(None),
        }
    }

    pub fn silent() -> Self {
        Self::new(None)
    }

    pub fn report(&self, percent: u8) {
        let Some(sink) = &self.sink else {
            return;
        };
        let percent = percent.min(100);
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if matches!(*last, Some(previous) if percent <= previous) {
            return;
        }
        *last = Some(percent);
        sink(percent);
    }

    pub fn finish(&self) {
        self.report(100);
    }

    /// Highest value forwarded so far, 0 before the first report.
    pub fn last(&self) -> u8 {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for ProgressRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressRelay")
            .field("attached", &self.sink.is_some())
            .field("last", &self.last())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn recording() -> (ProgressFn, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let sink: ProgressFn = Arc::new(move |p| sink_seen.lock().unwrap().push(p));
        (sink, seen)
    }

    #[test]
    fn test_relay_is_monotonic() {
        let (sink, seen) = recording();
        let relay = ProgressRelay::new(Some(sink));
        relay.report(10);
        relay.report(5);
        relay.report(10);
        relay.report(60);
        relay.report(250);
        relay.finish();
        assert_eq!(*seen.lock().unwrap(), vec![10, 60, 100]);
    }

    #[test]
    fn test_relay_reports_initial_zero() {
        let (sink, seen) = recording();
        let relay = ProgressRelay::new(Some(sink));
        relay.report(0);
        relay.report(0);
        relay.finish();
        assert_eq!(*seen.lock().unwrap(), vec![0, 100]);
    }

    #[test]
    fn test_silent_relay() {
        let relay = ProgressRelay::silent();
        relay.report(40);
        relay.finish();
        assert_eq!(relay.last(), 0);
    }

    #[test]
    fn test_concurrent_reporters_never_go_backwards() {
        let (sink, seen) = recording();
        let relay = ProgressRelay::new(Some(sink));

        thread::scope(|scope| {
            for worker in 0..8u8 {
                let relay = &relay;
                scope.spawn(move || {
                    for step in 0..=12u8 {
                        relay.report(step * 8 + worker % 8);
                    }
                });
            }
        });
        relay.finish();

        let seen = seen.lock().unwrap();
        assert!(seen.windows(2).all(|w| w[0] < w[1]), "{:?}", *seen);
        assert_eq!(seen.last(), Some(&100));
        assert_eq!(relay.last(), 100);
    }
}
