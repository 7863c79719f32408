use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic clock measured from the timer's own origin.
pub trait Timer: Clone + Send + Sync {
    fn now(&self) -> Duration;

    fn elapsed(&self, since: Duration) -> Duration {
        self.now().saturating_sub(since)
    }
}

/// Wall-clock timer backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    pub start: Instant,
}

impl Timer for HighPrecisionTimer {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer that only moves when told to. Clones share the same clock.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    nanos: Arc<AtomicU64>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, at: Duration) {
        self.nanos.store(at.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Timer for ManualTimer {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timer_clones_share_time() {
        let timer = ManualTimer::new();
        let view = timer.clone();
        timer.advance(Duration::from_millis(1500));
        assert_eq!(view.now(), Duration::from_millis(1500));
        assert_eq!(view.elapsed(Duration::from_millis(500)), Duration::from_secs(1));
    }

    #[test]
    fn elapsed_saturates() {
        let timer = ManualTimer::new();
        assert_eq!(timer.elapsed(Duration::from_secs(3)), Duration::ZERO);
    }

    #[test]
    fn high_precision_timer_moves_forward() {
        let timer = HighPrecisionTimer::new();
        let a = timer.now();
        let b = timer.now();
        assert!(b >= a);
    }
}
