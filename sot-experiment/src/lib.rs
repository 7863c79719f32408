pub mod capture;
pub mod config;
pub mod event;
pub mod results;
pub mod session;
pub mod sinks;
pub mod state;
pub mod trial;

pub use capture::{pointer_angle, CaptureMode, ResponseCapture, StepDirection};
pub use config::ExperimentConfig;
pub use event::SessionEvent;
pub use results::{summarize, Exporter, ResultRecord, ResultSink, Summary};
pub use session::SessionState;
pub use sinks::{JsonFileSink, LineHost, StandaloneSink, SurveyHost, SurveySink};
pub use state::SessionStateMachine;
pub use trial::{Feedback, Trial};
