pub mod catalog;
pub mod error;
pub mod geometry;
pub mod phase;
pub mod scene;
pub mod trial;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use geometry::{
    angular_distance, compute_correct_angle, correct_angle_for, dial_endpoint,
    feedback_display_angle, normalize_degrees,
};
pub use phase::SessionPhase;
pub use scene::{ObjectPosition, Point, SceneObject};
pub use trial::{TrialResponse, TrialSpec};
