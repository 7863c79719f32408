use std::time::Duration;

/// Single-slot deferred payload. Scheduling replaces whatever was pending.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    pending: Option<(Duration, T)>,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `payload` to fire at `due`. Returns the payload it superseded.
    pub fn schedule(&mut self, due: Duration, payload: T) -> Option<T> {
        self.pending
            .replace((due, payload))
            .map(|(_, superseded)| superseded)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    /// Takes the payload once its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        if self.deadline().is_some_and(|due| due <= now) {
            self.pending.take().map(|(_, payload)| payload)
        } else {
            None
        }
    }
}
