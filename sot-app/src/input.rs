//! Keyboard and mouse mapping onto session events.

use sot_core::SessionPhase;
use sot_experiment::SessionEvent;
use sot_render::DialLayout;
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Session(SessionEvent),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Space and Enter advance whatever the current screen asks for; the arrows
/// rotate the dial in discrete mode.
pub fn key_action(phase: SessionPhase, key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Escape => Some(Action::Exit),
        KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter => match phase {
            SessionPhase::Welcome => Some(Action::Session(SessionEvent::Begin)),
            SessionPhase::PracticeIntro | SessionPhase::TestIntro => {
                Some(Action::Session(SessionEvent::Proceed))
            }
            SessionPhase::Practice(_) | SessionPhase::Test(_) => {
                Some(Action::Session(SessionEvent::Submit))
            }
            SessionPhase::Completed => Some(Action::Exit),
        },
        KeyCode::ArrowLeft if phase.is_trial() => Some(Action::Session(SessionEvent::StepLeft)),
        KeyCode::ArrowRight if phase.is_trial() => Some(Action::Session(SessionEvent::StepRight)),
        _ => None,
    }
}

/// Pointer activity at `(x, y)` in window pixels. Presses only count over the
/// dial; moving off it ends a drag.
pub fn pointer_event(dial: &DialLayout, kind: PointerKind, x: f64, y: f64) -> Option<SessionEvent> {
    let inside = dial.contains(x, y);
    let (dx, dy) = dial.pointer_offset(x, y);
    match kind {
        PointerKind::Down if inside => Some(SessionEvent::PointerDown { dx, dy }),
        PointerKind::Down => None,
        PointerKind::Move if inside => Some(SessionEvent::PointerMove { dx, dy }),
        PointerKind::Move => Some(SessionEvent::PointerLeave),
        PointerKind::Up => Some(SessionEvent::PointerUp),
    }
}
