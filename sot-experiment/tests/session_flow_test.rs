//! End-to-end runs of the session state machine on a manual clock.

use sot_core::{Catalog, Result, SessionPhase, TrialSpec};
use sot_experiment::{
    CaptureMode, ExperimentConfig, LineHost, ResultRecord, ResultSink, SessionEvent,
    SessionStateMachine, SurveySink,
};
use sot_timing::{ManualTimer, Timer};
use std::time::Duration;

#[derive(Default)]
struct RecordingSink {
    sent: Vec<ResultRecord>,
    notices: usize,
}

impl ResultSink for RecordingSink {
    fn send(&mut self, record: &ResultRecord) -> Result<()> {
        self.sent.push(record.clone());
        Ok(())
    }

    fn notify_completion(&mut self) -> Result<()> {
        self.notices += 1;
        Ok(())
    }
}

type Machine = SessionStateMachine<ManualTimer, RecordingSink>;

fn machine_with(config: ExperimentConfig, catalog: Catalog) -> (Machine, ManualTimer) {
    let timer = ManualTimer::new();
    let m = SessionStateMachine::new(config, catalog, timer.clone(), RecordingSink::default());
    (m, timer)
}

fn machine() -> (Machine, ManualTimer) {
    machine_with(ExperimentConfig::default(), Catalog::standard())
}

fn wait(m: &mut Machine, timer: &ManualTimer, by: Duration) {
    timer.advance(by);
    m.pump();
}

/// Submits the current trial and sits through the feedback dwell.
fn answer(m: &mut Machine, timer: &ManualTimer) {
    assert!(m.handle_event(SessionEvent::Submit));
    assert!(m.dwell_pending());
    wait(m, timer, Duration::from_secs(2));
}

fn to_test_intro(m: &mut Machine, timer: &ManualTimer) {
    assert!(m.handle_event(SessionEvent::Begin));
    assert_eq!(m.phase, SessionPhase::PracticeIntro);
    assert!(m.handle_event(SessionEvent::Proceed));
    for i in 0..3 {
        assert_eq!(m.phase, SessionPhase::Practice(i));
        answer(m, timer);
    }
    assert_eq!(m.phase, SessionPhase::TestIntro);
}

#[test]
fn normal_completion_logs_every_test_trial_in_order() {
    let (mut m, timer) = machine();
    to_test_intro(&mut m, &timer);
    assert!(m.responses().is_empty(), "practice answers are not logged");

    assert!(m.handle_event(SessionEvent::Proceed));
    assert!(m.countdown_running());
    for i in 0..12 {
        assert_eq!(m.phase, SessionPhase::Test(i));
        answer(&mut m, &timer);
    }

    assert_eq!(m.phase, SessionPhase::Completed);
    let ids: Vec<&str> = m.responses().iter().map(|r| r.trial_id.as_str()).collect();
    let expected: Vec<String> = (1..=12).map(|n| n.to_string()).collect();
    assert_eq!(ids, expected);

    assert!(!m.countdown_running());
    assert_eq!(m.sink().sent.len(), 1);
    assert_eq!(m.sink().sent[0].raw_log.len(), 12);
    assert_eq!(m.sink().notices, 1);
    assert!(m.take_finish_notice());
    assert!(!m.take_finish_notice());
}

#[test]
fn timeout_on_sixth_trial_keeps_five_responses() {
    let (mut m, timer) = machine();
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);
    for _ in 0..5 {
        answer(&mut m, &timer);
    }
    assert_eq!(m.phase, SessionPhase::Test(5));

    // no submit; let the clock run out
    wait(&mut m, &timer, Duration::from_secs(289));
    assert_eq!(m.phase, SessionPhase::Test(5));
    assert_eq!(m.remaining_seconds(), Some(1));

    wait(&mut m, &timer, Duration::from_secs(1));
    assert_eq!(m.phase, SessionPhase::Completed);
    assert_eq!(m.responses().len(), 5);
    assert_eq!(m.remaining_seconds(), Some(0));
    assert!(!m.countdown_running());
    assert_eq!(m.results().unwrap().summary.total_trials, 5);
    assert_eq!(m.sink().sent.len(), 1);
}

#[test]
fn submit_after_the_budget_ran_out_is_not_recorded() {
    let (mut m, timer) = machine();
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);

    // the clock expires between two pumps
    timer.advance(Duration::from_millis(300_500));
    assert!(!m.handle_event(SessionEvent::Submit));
    assert_eq!(m.phase, SessionPhase::Completed);
    assert!(m.responses().is_empty());
    assert_eq!(m.remaining_seconds(), Some(0));

    m.pump();
    assert!(m.responses().is_empty());
    assert_eq!(m.sink().sent.len(), 1);
    assert_eq!(m.sink().notices, 1);
}

#[test]
fn input_applies_overdue_ticks_first() {
    let (mut m, timer) = machine();
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);

    timer.advance(Duration::from_secs(10));
    assert!(m.handle_event(SessionEvent::Submit));
    assert_eq!(m.remaining_seconds(), Some(290));
    assert_eq!(m.responses().len(), 1);

    // already applied, so the next pump has nothing to add
    m.pump();
    assert_eq!(m.remaining_seconds(), Some(290));
}

#[test]
fn ticks_count_down_one_second_at_a_time() {
    let (mut m, timer) = machine();
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);
    assert_eq!(m.remaining_seconds(), Some(300));

    let mut last = 300;
    for _ in 0..10 {
        wait(&mut m, &timer, Duration::from_millis(500));
        let now = m.remaining_seconds().unwrap();
        assert!(now <= last);
        last = now;
    }
    assert_eq!(last, 295);
}

#[test]
fn explicit_ticks_force_completion() {
    let config = ExperimentConfig {
        test_time_budget_secs: 3,
        ..Default::default()
    };
    let (mut m, timer) = machine_with(config, Catalog::standard());
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);
    assert!(m.handle_event(SessionEvent::TimerTick));
    assert!(m.handle_event(SessionEvent::TimerTick));
    assert_eq!(m.phase, SessionPhase::Test(0));
    assert!(m.handle_event(SessionEvent::TimerTick));
    assert_eq!(m.phase, SessionPhase::Completed);
    assert!(m.responses().is_empty());
    assert!(!m.handle_event(SessionEvent::TimerTick));
    assert_eq!(m.sink().sent.len(), 1);
}

#[test]
fn response_time_is_cumulative_from_test_start() {
    let (mut m, timer) = machine();
    to_test_intro(&mut m, &timer);
    timer.advance(Duration::from_secs(7));
    m.handle_event(SessionEvent::Proceed);

    timer.advance(Duration::from_secs(3));
    answer(&mut m, &timer);
    timer.advance(Duration::from_millis(1500));
    answer(&mut m, &timer);

    let times: Vec<f64> = m.responses().iter().map(|r| r.response_time_sec).collect();
    assert_eq!(times, vec![3.0, 6.5]);
}

#[test]
fn practice_feedback_shows_scored_and_mirrored_angles() {
    let (mut m, _timer) = machine();
    m.handle_event(SessionEvent::Begin);
    m.handle_event(SessionEvent::Proceed);
    assert_eq!(m.current_spec().unwrap().trial_id, "p1");

    m.handle_event(SessionEvent::Submit);
    let fb = *m.feedback().unwrap();
    assert!((fb.correct_angle_deg - 135.0).abs() < 1e-9);
    assert!((fb.display_angle_deg - 45.0).abs() < 1e-9);
    assert!((fb.angular_error_deg - 135.0).abs() < 1e-9);
    assert!(m.responses().is_empty());
}

#[test]
fn feedback_dwell_holds_until_it_expires() {
    let (mut m, timer) = machine();
    m.handle_event(SessionEvent::Begin);
    m.handle_event(SessionEvent::Proceed);
    m.handle_event(SessionEvent::Submit);

    wait(&mut m, &timer, Duration::from_millis(1999));
    assert_eq!(m.phase, SessionPhase::Practice(0));
    assert!(m.feedback().is_some());
    assert_eq!(m.next_deadline(), Some(Duration::from_secs(2)));

    wait(&mut m, &timer, Duration::from_millis(1));
    assert_eq!(m.phase, SessionPhase::Practice(1));
    assert!(m.feedback().is_none());
    assert!(!m.dwell_pending());
}

#[test]
fn second_submit_during_dwell_is_ignored() {
    let (mut m, timer) = machine();
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);
    assert!(m.handle_event(SessionEvent::Submit));
    assert!(!m.handle_event(SessionEvent::Submit));
    assert!(!m.handle_event(SessionEvent::StepRight));
    assert_eq!(m.responses().len(), 1);
}

#[test]
fn missing_object_skips_the_trial_without_a_response() {
    let mut catalog = Catalog::standard();
    catalog.test_trials[1] = TrialSpec::new("2", "tree", "bell", "lamp");
    let (mut m, timer) = machine_with(ExperimentConfig::default(), catalog);
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);

    answer(&mut m, &timer);
    assert_eq!(m.phase, SessionPhase::Test(1));
    assert!(m.handle_event(SessionEvent::Submit));
    assert_eq!(m.phase, SessionPhase::Test(2));
    assert!(!m.dwell_pending());

    for _ in 2..12 {
        answer(&mut m, &timer);
    }
    assert_eq!(m.phase, SessionPhase::Completed);
    assert_eq!(m.responses().len(), 11);
    assert!(m.responses().iter().all(|r| r.trial_id != "2"));
}

#[test]
fn repeated_object_skips_the_trial_without_a_response() {
    let mut catalog = Catalog::standard();
    catalog.test_trials[0] = TrialSpec::new("1", "bell", "tree", "bell");
    let (mut m, timer) = machine_with(ExperimentConfig::default(), catalog);
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);

    assert!(m.handle_event(SessionEvent::Submit));
    assert_eq!(m.phase, SessionPhase::Test(1));
    assert!(m.responses().is_empty());
    assert!(!m.dwell_pending());
}

#[test]
fn discrete_steps_feed_the_response_angle() {
    let config = ExperimentConfig {
        capture_mode: CaptureMode::Discrete,
        ..Default::default()
    };
    let (mut m, timer) = machine_with(config, Catalog::standard());
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);

    for _ in 0..5 {
        assert!(m.handle_event(SessionEvent::StepRight));
    }
    assert_eq!(m.current_angle(), 25.0);
    assert_eq!(m.session.current_drawn_angle, 25.0);
    m.handle_event(SessionEvent::Submit);

    let r = &m.responses()[0];
    assert_eq!(r.response_angle_deg, 25.0);
    assert!((r.angular_error_deg - 110.0).abs() < 1e-9);

    wait(&mut m, &timer, Duration::from_secs(2));
    assert_eq!(m.current_angle(), 0.0, "angle resets for the next trial");
    m.handle_event(SessionEvent::StepLeft);
    assert_eq!(m.current_angle(), 355.0);
}

#[test]
fn pointer_drag_sets_the_angle() {
    let (mut m, _timer) = machine();
    m.handle_event(SessionEvent::Begin);
    m.handle_event(SessionEvent::Proceed);

    assert!(!m.handle_event(SessionEvent::PointerMove { dx: 10.0, dy: 0.0 }));
    assert!(m.handle_event(SessionEvent::PointerDown { dx: 10.0, dy: 0.0 }));
    assert_eq!(m.current_angle(), 90.0);
    assert!(m.handle_event(SessionEvent::PointerMove { dx: 0.0, dy: 10.0 }));
    assert_eq!(m.current_angle(), 180.0);
    m.handle_event(SessionEvent::PointerUp);
    assert!(!m.handle_event(SessionEvent::PointerMove { dx: -10.0, dy: 0.0 }));
    assert_eq!(m.current_angle(), 180.0);
}

#[test]
fn signals_outside_their_phase_do_nothing() {
    let (mut m, _timer) = machine();
    assert!(!m.handle_event(SessionEvent::Submit));
    assert!(!m.handle_event(SessionEvent::Proceed));
    assert!(!m.handle_event(SessionEvent::TimerTick));
    assert_eq!(m.phase, SessionPhase::Welcome);

    m.handle_event(SessionEvent::Begin);
    assert!(!m.handle_event(SessionEvent::Begin));
    m.handle_event(SessionEvent::Proceed);
    assert!(!m.handle_event(SessionEvent::TimerTick), "no clock during practice");
    assert!(!m.handle_event(SessionEvent::DwellElapsed));
}

#[test]
fn empty_practice_list_goes_straight_to_test_intro() {
    let mut catalog = Catalog::standard();
    catalog.practice_trials.clear();
    let (mut m, _timer) = machine_with(ExperimentConfig::default(), catalog);
    m.handle_event(SessionEvent::Begin);
    m.handle_event(SessionEvent::Proceed);
    assert_eq!(m.phase, SessionPhase::TestIntro);
}

#[test]
fn timeout_during_feedback_keeps_the_answer() {
    let config = ExperimentConfig {
        test_time_budget_secs: 2,
        ..Default::default()
    };
    let (mut m, timer) = machine_with(config, Catalog::standard());
    to_test_intro(&mut m, &timer);
    m.handle_event(SessionEvent::Proceed);
    timer.advance(Duration::from_millis(500));
    m.handle_event(SessionEvent::Submit);

    wait(&mut m, &timer, Duration::from_millis(1500));
    assert_eq!(m.phase, SessionPhase::Completed);
    assert_eq!(m.responses().len(), 1);
    assert!(!m.dwell_pending());
}

#[test]
fn survey_sink_receives_one_completion_message() {
    let timer = ManualTimer::new();
    let sink = SurveySink::new(LineHost::new(Vec::new()));
    let mut m = SessionStateMachine::new(
        ExperimentConfig {
            test_time_budget_secs: 1,
            ..Default::default()
        },
        Catalog::standard(),
        timer.clone(),
        sink,
    );
    m.handle_event(SessionEvent::Begin);
    m.handle_event(SessionEvent::Proceed);
    for _ in 0..3 {
        m.handle_event(SessionEvent::Submit);
        timer.advance(Duration::from_secs(2));
        m.pump();
    }
    m.handle_event(SessionEvent::Proceed);
    timer.advance(Duration::from_secs(5));
    m.pump();
    m.pump();
    assert!(m.is_finished());

    let out = std::str::from_utf8(m.sink().host().get_ref()).unwrap();
    assert_eq!(out.matches("SOT_complete").count(), 1);
    assert!(out.contains("\"SOT_TotalTrials\""));
    assert!(timer.now() >= Duration::from_secs(11));
}
