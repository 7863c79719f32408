use std::time::Duration;
use tracing::debug;

/// What a single tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Remaining(u32),
    Expired,
    Idle,
}

/// Whole-second session clock counting down from a fixed budget.
///
/// Ticks are scheduled at `start + n * interval`; [`Countdown::due_ticks`]
/// reports how many of those deadlines have passed so a driver can turn them
/// into tick events.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining_secs: u32,
    interval: Duration,
    next_tick_at: Option<Duration>,
    running: bool,
}

impl Countdown {
    pub fn new(interval: Duration) -> Self {
        Self {
            remaining_secs: 0,
            interval,
            next_tick_at: None,
            running: false,
        }
    }

    pub fn start(&mut self, budget_secs: u32, now: Duration) {
        self.remaining_secs = budget_secs;
        self.next_tick_at = Some(now + self.interval);
        self.running = true;
        debug!(budget_secs, "countdown started");
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time of the next scheduled tick, if running.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.next_tick_at.filter(|_| self.running)
    }

    /// Counts tick deadlines at or before `now` and moves the schedule past them.
    pub fn due_ticks(&mut self, now: Duration) -> u32 {
        let mut due = 0;
        if !self.running || self.interval.is_zero() {
            return due;
        }
        while let Some(at) = self.next_tick_at {
            if at > now {
                break;
            }
            due += 1;
            self.next_tick_at = Some(at + self.interval);
        }
        due
    }

    /// Removes one second. Reports `Expired` exactly when the clock reaches zero.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            Tick::Expired
        } else {
            Tick::Remaining(self.remaining_secs)
        }
    }

    /// Stops the clock. Returns `true` only for the call that actually stopped it.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        self.next_tick_at = None;
        if was_running {
            debug!(remaining = self.remaining_secs, "countdown stopped");
        }
        was_running
    }
}
