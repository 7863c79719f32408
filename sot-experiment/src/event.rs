/// Everything that can drive the session, serialized onto one queue by the driver.
///
/// Pointer offsets are relative to the dial centre, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Begin,
    Proceed,
    Submit,
    PointerDown { dx: f64, dy: f64 },
    PointerMove { dx: f64, dy: f64 },
    PointerUp,
    PointerLeave,
    StepLeft,
    StepRight,
    TimerTick,
    DwellElapsed,
}

impl SessionEvent {
    /// Input that only changes the drawn angle, never the phase.
    pub fn is_capture_input(&self) -> bool {
        matches!(
            self,
            SessionEvent::PointerDown { .. }
                | SessionEvent::PointerMove { .. }
                | SessionEvent::PointerUp
                | SessionEvent::PointerLeave
                | SessionEvent::StepLeft
                | SessionEvent::StepRight
        )
    }
}
