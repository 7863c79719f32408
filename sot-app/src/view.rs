use sot_core::SessionPhase;
use sot_experiment::{ResultSink, SessionStateMachine};
use sot_render::{ResultsView, Screen, TrialView};
use sot_timing::Timer;

/// What the window should show for the session's current state.
pub fn screen_for<T, K>(s: &SessionStateMachine<T, K>) -> Screen<'_>
where
    T: Timer,
    K: ResultSink,
{
    match s.phase {
        SessionPhase::Welcome => Screen::Welcome,
        SessionPhase::PracticeIntro => Screen::PracticeIntro {
            trial_count: s.catalog.practice_trials.len(),
        },
        SessionPhase::TestIntro => Screen::TestIntro {
            trial_count: s.catalog.test_trials.len(),
            budget_secs: s.config.test_time_budget_secs,
        },
        SessionPhase::Practice(_) | SessionPhase::Test(_) => match s.current_trial() {
            Some(trial) => Screen::Trial(TrialView {
                catalog: &s.catalog,
                spec: &trial.spec,
                practice: s.phase.is_practice(),
                response_angle: s.current_angle(),
                feedback_angle: s.feedback().map(|f| f.display_angle_deg),
                remaining_secs: s.remaining_seconds(),
                progress: s.trial_progress(),
            }),
            None => Screen::Blank,
        },
        SessionPhase::Completed => {
            let summary = s.results().map(|r| r.summary).unwrap_or_default();
            Screen::Results(ResultsView {
                avg_error_deg: summary.avg_angular_error_deg,
                avg_time_sec: summary.avg_response_time_sec,
            })
        }
    }
}
