use crate::capture::{ResponseCapture, StepDirection};
use crate::config::ExperimentConfig;
use crate::event::SessionEvent;
use crate::results::{Exporter, ResultRecord, ResultSink};
use crate::session::SessionState;
use crate::trial::{Feedback, Trial};
use sot_core::{
    angular_distance, correct_angle_for, feedback_display_angle, Catalog, SessionPhase,
    TrialResponse, TrialSpec,
};
use sot_timing::{Countdown, Deferred, Tick, Timer};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drives a participant from the welcome screen to the results.
///
/// Events go in through [`handle_event`](Self::handle_event) one at a time;
/// [`update`](Self::update) turns elapsed time into `TimerTick` and
/// `DwellElapsed` events for the driver to feed back in.
pub struct SessionStateMachine<T, K>
where
    T: Timer,
    K: ResultSink,
{
    pub phase: SessionPhase,
    pub timer: T,
    pub config: ExperimentConfig,
    pub catalog: Catalog,
    pub current: Option<Trial>,
    pub session: SessionState,
    capture: ResponseCapture,
    countdown: Countdown,
    dwell: Deferred<usize>,
    exporter: Exporter<K>,
    finish_notice: bool,
}

impl<T, K> SessionStateMachine<T, K>
where
    T: Timer,
    K: ResultSink,
{
    pub fn new(config: ExperimentConfig, catalog: Catalog, timer: T, sink: K) -> Self {
        Self {
            phase: SessionPhase::default(),
            capture: ResponseCapture::new(config.capture_mode, config.step_degrees),
            countdown: Countdown::new(config.tick_interval()),
            timer,
            config,
            catalog,
            current: None,
            session: SessionState::default(),
            dwell: Deferred::new(),
            exporter: Exporter::new(sink),
            finish_notice: false,
        }
    }

    /// Dispatches one event on the current phase. Returns `false` when the
    /// event means nothing in this phase.
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        use SessionEvent::*;

        // input arriving after the budget ran out must not beat the pending ticks
        if self.phase.is_test() && !matches!(event, TimerTick | DwellElapsed) {
            self.catch_up_clock();
            if !self.phase.is_test() {
                debug!(?event, "event arrived after the time budget ran out");
                return false;
            }
        }

        match (self.phase, event) {
            (SessionPhase::Welcome, Begin) => {
                self.enter(SessionPhase::PracticeIntro);
                true
            }

            (SessionPhase::PracticeIntro, Proceed) => {
                self.start_trial(SessionPhase::Practice(0));
                true
            }

            (SessionPhase::TestIntro, Proceed) => {
                self.start_test_phase();
                true
            }

            (phase, Submit) if phase.is_trial() && self.awaiting_answer() => self.submit(),

            (phase, event)
                if phase.is_trial() && event.is_capture_input() && self.awaiting_answer() =>
            {
                self.capture_input(event)
            }

            (SessionPhase::Test(_), TimerTick) => self.tick(),

            (phase, DwellElapsed) if phase.is_trial() && self.showing_feedback() => {
                self.dwell.cancel();
                self.advance();
                true
            }

            _ => false,
        }
    }

    /// Collects the timer and dwell events that are due now.
    pub fn update(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let now = self.timer.now();

        if self.phase.is_test() {
            let ticks = self.countdown.due_ticks(now);
            events.extend(std::iter::repeat_n(SessionEvent::TimerTick, ticks as usize));
        }

        if let Some(index) = self.dwell.poll(now) {
            if self.current.as_ref().is_some_and(|t| t.index == index) {
                events.push(SessionEvent::DwellElapsed);
            } else {
                debug!(index, "stale dwell dropped");
            }
        }

        events
    }

    /// Runs [`update`](Self::update) and dispatches what it returns.
    pub fn pump(&mut self) -> usize {
        let events = self.update();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    /// Earliest moment `update` could produce an event.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.countdown.next_deadline(), self.dwell.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn enter(&mut self, phase: SessionPhase) {
        info!(from = ?self.phase, to = ?phase, "phase change");
        self.phase = phase;
    }

    fn trials_for(&self, phase: SessionPhase) -> &[TrialSpec] {
        match phase {
            SessionPhase::Practice(_) => &self.catalog.practice_trials,
            SessionPhase::Test(_) => &self.catalog.test_trials,
            _ => &[],
        }
    }

    fn start_test_phase(&mut self) {
        let now = self.timer.now();
        let budget = self.config.test_time_budget_secs;
        self.session = SessionState::started(now, budget);
        self.countdown.start(budget, now);
        info!(budget_secs = budget, "timed test started");
        self.start_trial(SessionPhase::Test(0));
    }

    /// Puts trial `phase` on screen, or moves past the list when it is exhausted.
    fn start_trial(&mut self, phase: SessionPhase) {
        let Some(index) = phase.trial_index() else {
            return;
        };
        let Some(spec) = self.trials_for(phase).get(index).cloned() else {
            match phase.after_last_trial() {
                Some(SessionPhase::Completed) => self.complete(),
                Some(next) => {
                    self.current = None;
                    self.enter(next);
                }
                None => {}
            }
            return;
        };

        // a new trial supersedes whatever the previous one left scheduled
        self.dwell.cancel();
        self.capture.reset();
        self.session.current_drawn_angle = 0.0;
        if phase.is_test() {
            self.session.current_trial_index = index;
        }

        debug!(
            trial = %spec.trial_id,
            standing = %spec.standing_id,
            facing = %spec.facing_id,
            pointing = %spec.pointing_id,
            "trial started"
        );
        self.current = Some(Trial::new(index, spec));
        self.enter(phase);
    }

    fn awaiting_answer(&self) -> bool {
        self.current.as_ref().is_some_and(|t| !t.is_answered())
    }

    fn showing_feedback(&self) -> bool {
        self.current.as_ref().is_some_and(|t| t.is_answered())
    }

    fn capture_input(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::PointerDown { dx, dy } => self.capture.pointer_down(dx, dy),
            SessionEvent::PointerMove { dx, dy } => {
                if !self.capture.pointer_move(dx, dy) {
                    return false;
                }
            }
            SessionEvent::PointerUp => self.capture.pointer_up(),
            SessionEvent::PointerLeave => self.capture.pointer_leave(),
            SessionEvent::StepRight => self.capture.step(StepDirection::Increase),
            SessionEvent::StepLeft => self.capture.step(StepDirection::Decrease),
            _ => return false,
        }
        self.session.current_drawn_angle = self.capture.current_angle();
        true
    }

    fn submit(&mut self) -> bool {
        let Some(trial) = self.current.as_ref() else {
            return false;
        };
        let now = self.timer.now();
        let response_angle = self.capture.current_angle();

        let correct = match correct_angle_for(&self.catalog, &trial.spec) {
            Ok(angle) => angle,
            Err(e) => {
                warn!(trial = %trial.spec.trial_id, "trial skipped: {e}");
                self.advance();
                return true;
            }
        };
        let error = angular_distance(response_angle, correct);
        let feedback = Feedback {
            response_angle_deg: response_angle,
            correct_angle_deg: correct,
            angular_error_deg: error,
            display_angle_deg: feedback_display_angle(correct),
        };

        if self.phase.is_test() {
            let response_time = self.session.elapsed_secs(now);
            let response =
                TrialResponse::new(&trial.spec, response_angle, correct, error, response_time);
            info!(
                trial = %response.trial_id,
                response = response_angle,
                correct,
                error,
                time = response_time,
                "test response"
            );
            self.session.record(response);
        } else {
            debug!(
                trial = %trial.spec.trial_id,
                response = response_angle,
                correct,
                error,
                "practice response"
            );
        }

        let index = trial.index;
        if let Some(trial) = self.current.as_mut() {
            trial.feedback = Some(feedback);
        }
        self.dwell.schedule(now + self.config.feedback_dwell(), index);
        true
    }

    fn advance(&mut self) {
        let next = self.phase.next();
        self.current = None;
        if let Some(next) = next {
            self.start_trial(next);
        }
    }

    /// Applies every countdown tick already due, ahead of the next `update`.
    fn catch_up_clock(&mut self) {
        let due = self.countdown.due_ticks(self.timer.now());
        for _ in 0..due {
            if !self.tick() {
                break;
            }
        }
    }

    fn tick(&mut self) -> bool {
        match self.countdown.tick() {
            Tick::Remaining(secs) => {
                self.session.remaining_seconds = secs;
                true
            }
            Tick::Expired => {
                self.session.remaining_seconds = 0;
                info!(
                    answered = self.session.response_log.len(),
                    "time budget exhausted"
                );
                self.complete();
                true
            }
            Tick::Idle => false,
        }
    }

    /// Enters the terminal phase: stops the clock, exports, raises the finish notice.
    fn complete(&mut self) {
        if self.phase.is_completed() {
            return;
        }
        self.countdown.stop();
        self.dwell.cancel();
        self.current = None;
        self.session.remaining_seconds = self.countdown.remaining_secs();
        self.enter(SessionPhase::Completed);

        self.exporter.export(&self.session.response_log);
        self.finish_notice = true;
        info!("test finished");
    }

    /// `true` exactly once, after the results have been exported.
    pub fn take_finish_notice(&mut self) -> bool {
        std::mem::take(&mut self.finish_notice)
    }

    pub fn current_phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn current_trial(&self) -> Option<&Trial> {
        self.current.as_ref()
    }

    pub fn current_spec(&self) -> Option<&TrialSpec> {
        self.current.as_ref().map(|t| &t.spec)
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.current.as_ref().and_then(|t| t.feedback.as_ref())
    }

    pub fn current_angle(&self) -> f64 {
        self.capture.current_angle()
    }

    pub fn capture(&self) -> &ResponseCapture {
        &self.capture
    }

    pub fn remaining_seconds(&self) -> Option<u32> {
        let timed = self.phase.is_test()
            || (self.phase.is_completed() && self.session.session_start.is_some());
        timed.then_some(self.session.remaining_seconds)
    }

    pub fn countdown_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn dwell_pending(&self) -> bool {
        self.dwell.is_pending()
    }

    pub fn responses(&self) -> &[TrialResponse] {
        &self.session.response_log
    }

    pub fn results(&self) -> Option<&ResultRecord> {
        self.exporter.record()
    }

    pub fn sink(&self) -> &K {
        self.exporter.sink()
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_completed()
    }

    /// (1-based trial number, trial count) while a trial is on screen.
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        let index = self.phase.trial_index()?;
        Some((index + 1, self.trials_for(self.phase).len()))
    }
}
