//! Property tests for the angle-judgment rules.
//!
//! 1. Correct angles always land in [0, 360)
//! 2. Angular distance is symmetric, zero on equal inputs and within [0, 180]
//! 3. Angular distance is unchanged by whole turns
//! 4. The display mirror stays in range

use proptest::prelude::*;
use sot_core::{angular_distance, compute_correct_angle, feedback_display_angle, Point};

fn coord() -> impl Strategy<Value = f64> {
    0.0f64..100.0
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

fn angle() -> impl Strategy<Value = f64> {
    0.0f64..360.0
}

proptest! {
    #[test]
    fn correct_angle_in_range(standing in point(), facing in point(), pointing in point()) {
        prop_assume!(facing.sub(standing).length() > 1e-6);
        let a = compute_correct_angle(standing, facing, pointing);
        prop_assert!((0.0..360.0).contains(&a), "angle {} out of range", a);
    }

    #[test]
    fn distance_symmetric_and_bounded(a in angle(), b in angle()) {
        let d = angular_distance(a, b);
        prop_assert_eq!(d, angular_distance(b, a));
        prop_assert!((0.0..=180.0).contains(&d));
    }

    #[test]
    fn distance_to_self_is_zero(a in angle()) {
        prop_assert_eq!(angular_distance(a, a), 0.0);
    }

    #[test]
    fn distance_ignores_whole_turns(a in angle(), b in angle()) {
        let d = angular_distance(a, b);
        let shifted = angular_distance(a + 360.0, b);
        prop_assert!((d - shifted).abs() < 1e-9);
    }

    #[test]
    fn display_mirror_in_range(c in angle()) {
        let m = feedback_display_angle(c);
        prop_assert!((0.0..=360.0).contains(&m));
    }
}

#[test]
fn distance_zero_to_half_turn() {
    assert_eq!(angular_distance(0.0, 180.0), 180.0);
}
