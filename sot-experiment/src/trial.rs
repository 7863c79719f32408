use sot_core::TrialSpec;

/// The trial currently on screen.
#[derive(Debug, Clone)]
pub struct Trial {
    pub index: usize,
    pub spec: TrialSpec,
    pub feedback: Option<Feedback>,
}

impl Trial {
    pub fn new(index: usize, spec: TrialSpec) -> Self {
        Self {
            index,
            spec,
            feedback: None,
        }
    }

    /// Submitted and waiting for the dwell to run out.
    pub fn is_answered(&self) -> bool {
        self.feedback.is_some()
    }
}

/// Shown after a submit for the length of the dwell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub response_angle_deg: f64,
    pub correct_angle_deg: f64,
    pub angular_error_deg: f64,
    /// Where the red line is drawn; mirrored for display only.
    pub display_angle_deg: f64,
}
