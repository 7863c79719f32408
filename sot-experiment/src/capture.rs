//! Turns pointer drags or arrow-key steps into the participant's dial angle.
//!
//! Both modes share one frame: 0° is straight up on the dial (the facing
//! object) and angles grow clockwise in screen coordinates.

use serde::{Deserialize, Serialize};
use sot_core::normalize_degrees;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    Continuous,
    Discrete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Increase,
    Decrease,
}

/// Dial angle for a pointer at `(dx, dy)` from the dial centre (screen axes).
pub fn pointer_angle(dx: f64, dy: f64) -> f64 {
    let mut angle = dy.atan2(dx).to_degrees();
    angle = (angle + 360.0) % 360.0;
    (angle + 90.0) % 360.0
}

#[derive(Debug, Clone)]
pub struct ResponseCapture {
    mode: CaptureMode,
    step_degrees: f64,
    angle: f64,
    dragging: bool,
}

impl ResponseCapture {
    pub fn new(mode: CaptureMode, step_degrees: f64) -> Self {
        Self {
            mode,
            step_degrees,
            angle: 0.0,
            dragging: false,
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn current_angle(&self) -> f64 {
        self.angle
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Back to 0° with no drag in progress; called at the start of each trial.
    pub fn reset(&mut self) {
        self.angle = 0.0;
        self.dragging = false;
    }

    /// Pointer pressed over the dial. Ignored in discrete mode.
    pub fn pointer_down(&mut self, dx: f64, dy: f64) {
        if self.mode != CaptureMode::Continuous {
            return;
        }
        self.dragging = true;
        self.angle = pointer_angle(dx, dy);
    }

    /// Returns `true` when the angle was updated.
    pub fn pointer_move(&mut self, dx: f64, dy: f64) -> bool {
        if !self.dragging {
            return false;
        }
        self.angle = pointer_angle(dx, dy);
        true
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn pointer_leave(&mut self) {
        self.dragging = false;
    }

    /// One arrow-key step. Ignored in continuous mode.
    pub fn step(&mut self, direction: StepDirection) {
        if self.mode != CaptureMode::Discrete {
            return;
        }
        let delta = match direction {
            StepDirection::Increase => self.step_degrees,
            StepDirection::Decrease => -self.step_degrees,
        };
        self.angle = normalize_degrees(self.angle + delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discrete() -> ResponseCapture {
        ResponseCapture::new(CaptureMode::Discrete, 5.0)
    }

    fn continuous() -> ResponseCapture {
        ResponseCapture::new(CaptureMode::Continuous, 5.0)
    }

    #[test]
    fn five_increases_make_25() {
        let mut c = discrete();
        for _ in 0..5 {
            c.step(StepDirection::Increase);
        }
        assert_eq!(c.current_angle(), 25.0);
    }

    #[test]
    fn decrease_from_zero_wraps() {
        let mut c = discrete();
        c.step(StepDirection::Decrease);
        assert_eq!(c.current_angle(), 355.0);
    }

    #[test]
    fn full_turn_returns_to_zero() {
        let mut c = discrete();
        for _ in 0..72 {
            c.step(StepDirection::Increase);
        }
        assert_eq!(c.current_angle(), 0.0);
    }

    #[test]
    fn tiny_step_below_zero_stays_under_360() {
        let mut c = ResponseCapture::new(CaptureMode::Discrete, 1e-20);
        c.step(StepDirection::Decrease);
        let a = c.current_angle();
        assert!((0.0..360.0).contains(&a), "got {a}");
    }

    #[test]
    fn pointer_cardinals() {
        assert_eq!(pointer_angle(0.0, -10.0), 0.0);
        assert_eq!(pointer_angle(10.0, 0.0), 90.0);
        assert_eq!(pointer_angle(0.0, 10.0), 180.0);
        assert_eq!(pointer_angle(-10.0, 0.0), 270.0);
    }

    #[test]
    fn moves_only_count_while_dragging() {
        let mut c = continuous();
        assert!(!c.pointer_move(10.0, 0.0));
        assert_eq!(c.current_angle(), 0.0);

        c.pointer_down(10.0, 0.0);
        assert_eq!(c.current_angle(), 90.0);
        assert!(c.pointer_move(0.0, 10.0));
        assert_eq!(c.current_angle(), 180.0);

        c.pointer_leave();
        assert!(!c.pointer_move(-10.0, 0.0));
        assert_eq!(c.current_angle(), 180.0);
    }

    #[test]
    fn pointer_up_ends_drag() {
        let mut c = continuous();
        c.pointer_down(1.0, 1.0);
        c.pointer_up();
        assert!(!c.is_dragging());
    }

    #[test]
    fn modes_ignore_each_others_input() {
        let mut d = discrete();
        d.pointer_down(10.0, 0.0);
        assert!(!d.is_dragging());
        assert_eq!(d.current_angle(), 0.0);

        let mut c = continuous();
        c.step(StepDirection::Increase);
        assert_eq!(c.current_angle(), 0.0);
    }

    #[test]
    fn reset_clears_angle_and_drag() {
        let mut c = continuous();
        c.pointer_down(10.0, 0.0);
        c.reset();
        assert_eq!(c.current_angle(), 0.0);
        assert!(!c.is_dragging());
    }
}
