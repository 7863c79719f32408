use sot_core::TrialResponse;
use std::time::Duration;

/// Mutable bookkeeping for one timed test run.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub current_trial_index: usize,
    pub response_log: Vec<TrialResponse>,
    pub session_start: Option<Duration>,
    pub remaining_seconds: u32,
    pub current_drawn_angle: f64,
}

impl SessionState {
    /// Fresh state for a test phase starting at `now`.
    pub fn started(now: Duration, budget_secs: u32) -> Self {
        Self {
            current_trial_index: 0,
            response_log: Vec::new(),
            session_start: Some(now),
            remaining_seconds: budget_secs,
            current_drawn_angle: 0.0,
        }
    }

    /// Seconds since the test phase began.
    pub fn elapsed_secs(&self, now: Duration) -> f64 {
        self.session_start
            .map_or(0.0, |start| now.saturating_sub(start).as_secs_f64())
    }

    /// Appends a response unless this trial already has one.
    pub fn record(&mut self, response: TrialResponse) -> bool {
        if self
            .response_log
            .iter()
            .any(|r| r.trial_id == response.trial_id)
        {
            return false;
        }
        self.response_log.push(response);
        true
    }
}
