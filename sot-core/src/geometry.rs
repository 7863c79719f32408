//! Egocentric angle scoring.
//!
//! Angles are degrees in `[0, 360)` with 0 pointing straight ahead (towards the
//! facing object, drawn as "up" on the dial) and increasing clockwise.

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::scene::Point;
use crate::trial::TrialSpec;

/// Ground-truth direction from `standing` towards `pointing` while facing `facing`.
///
/// The result is mirrored through 180° after the clockwise conversion; this
/// matches the screen (y down) layout against the participant's dial.
pub fn compute_correct_angle(standing: Point, facing: Point, pointing: Point) -> f64 {
    let facing_dir = facing.sub(standing).normalized();
    let pointing_vec = pointing.sub(standing);

    let dot = facing_dir.dot(pointing_vec);
    let cross = facing_dir.cross(pointing_vec);

    let mut angle = cross.atan2(dot).to_degrees();
    angle = -angle;
    angle = (angle + 360.0) % 360.0;
    (180.0 + angle) % 360.0
}

/// Looks up the trial's three objects and scores the correct angle.
///
/// Malformed trials (repeated ids, unknown objects) are errors, never a score.
pub fn correct_angle_for(catalog: &Catalog, trial: &TrialSpec) -> Result<f64> {
    catalog.check_trial(trial)?;
    let standing = catalog.position(&trial.standing_id)?.point();
    let facing = catalog.position(&trial.facing_id)?.point();
    let pointing = catalog.position(&trial.pointing_id)?.point();

    if facing.sub(standing).length() == 0.0 {
        return Err(Error::DegenerateTrial {
            trial_id: trial.trial_id.clone(),
        });
    }

    Ok(compute_correct_angle(standing, facing, pointing))
}

/// Shortest arc between two angles, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}

/// Wraps any angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Angle at which the red "correct answer" line is drawn on the dial.
///
/// Display only: mirrors across the vertical axis of the dial. Scoring always
/// uses the value from [`compute_correct_angle`].
pub fn feedback_display_angle(correct_angle: f64) -> f64 {
    if correct_angle <= 180.0 {
        180.0 - correct_angle
    } else {
        540.0 - correct_angle
    }
}

/// Screen point at `radius` from `center` along a dial angle (0 = up, clockwise).
pub fn dial_endpoint(center: Point, radius: f64, angle: f64) -> Point {
    let radians = (angle - 90.0).to_radians();
    Point::new(
        center.x + radians.cos() * radius,
        center.y + radians.sin() * radius,
    )
}
