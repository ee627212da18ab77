//! Arc kinematics for the differential drive
//!
//! Pure geometry: a pair of per-wheel linear displacements and the heading
//! before the motion determine a circular arc (or straight line), and this
//! module computes the resulting pose delta. No state is held here; the
//! tracker drives these functions when it drains its sample log.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Change in pose produced by one pair of wheel displacements.
#[derive(Debug, Copy, Clone)]
pub struct PoseDelta {
    /// Change in position in the odometry frame.
    ///
    /// Units: meters
    pub translation_m: Vector2<f64>,

    /// Change in heading. Not normalised, a multi-revolution pivot yields
    /// more than 2*pi here.
    ///
    /// Units: radians
    pub heading_rad: f64,

    /// Arc length travelled by the vehicle centre, always non-negative.
    ///
    /// Units: meters
    pub distance_m: f64,
}

/// Slip compensation applied to sharp turns.
///
/// On arcs with a large left/right displacement asymmetry (pivot turns
/// included) the wheels slip and the raw tacho counts overestimate the
/// motion. When the displacement ratio falls outside the open
/// `(gentle_ratio_min, gentle_ratio_max)` window, both displacements are
/// scaled by `factor` before the arc is computed. Window and factor are
/// empirically tuned, see `params/odom.toml`.
#[derive(Debug, Copy, Clone, Deserialize)]
pub struct SlipComp {
    /// Scale factor in (0, 1] applied to both wheel displacements on a
    /// sharp turn.
    pub factor: f64,

    /// Lower edge of the gentle-turn displacement-ratio window.
    pub gentle_ratio_min: f64,

    /// Upper edge of the gentle-turn displacement-ratio window.
    pub gentle_ratio_max: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SlipComp {
    fn default() -> Self {
        Self {
            factor: 0.9,
            gentle_ratio_min: 0.5,
            gentle_ratio_max: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Compute the pose delta produced by the given pair of wheel displacements.
///
/// `dist_left_m`/`dist_right_m` are signed linear displacements of each
/// wheel since the previous sample, `prev_heading_rad` the heading just
/// before the motion and `wheel_track_m` the distance between the wheel
/// ground-contact points.
///
/// Both degenerate divisions (equal displacements, zero left radius) take
/// explicit fallback paths, so the result is well defined for any pair of
/// finite displacements.
pub fn pose_delta(
    dist_left_m: f64,
    dist_right_m: f64,
    prev_heading_rad: f64,
    wheel_track_m: f64,
    slip: &SlipComp,
) -> PoseDelta {
    // Equal displacements make a straight line, which the arc maths below
    // cannot represent (infinite radius)
    if dist_left_m == dist_right_m {
        return PoseDelta {
            translation_m: Vector2::new(
                dist_left_m * prev_heading_rad.sin(),
                dist_left_m * prev_heading_rad.cos(),
            ),
            heading_rad: 0.0,
            distance_m: dist_left_m.abs(),
        };
    }

    // Displacement ratio classifies the turn as gentle or sharp
    let relation = if dist_right_m == 0.0 {
        0.0
    } else {
        dist_left_m / dist_right_m
    };

    let (dist_left_m, dist_right_m) =
        if relation > slip.gentle_ratio_min && relation < slip.gentle_ratio_max {
            (dist_left_m, dist_right_m)
        } else {
            (dist_left_m * slip.factor, dist_right_m * slip.factor)
        };

    // Non-zero: the equal-displacement case returned above, and scaling by
    // the non-zero slip factor preserves the difference's sign
    let dist_diff_m = dist_left_m - dist_right_m;

    // Signed radii of each wheel's circular path about the turn centre
    let radius_left_m = dist_left_m * wheel_track_m / dist_diff_m;
    let radius_right_m = dist_right_m * wheel_track_m / dist_diff_m;

    // The left radius degenerates to zero when pivoting about the left
    // wheel, in which case the right wheel's arc carries the turn angle
    let turn_angle_rad = if radius_left_m != 0.0 {
        dist_left_m / radius_left_m
    } else {
        dist_right_m / radius_right_m
    };

    // Radius of the path traced by the vehicle centre
    let radius_m = (radius_left_m + radius_right_m) / 2.0;

    // Chord between the start and end points of the arc, and its bearing in
    // the odometry frame (isosceles triangle formed by the two radii and
    // the chord)
    let chord_m = (2.0 * radius_m.powi(2) * (1.0 - turn_angle_rad.cos())).sqrt();
    let lambda_rad = (std::f64::consts::PI - turn_angle_rad) / 2.0 - prev_heading_rad;

    PoseDelta {
        translation_m: Vector2::new(chord_m * lambda_rad.cos(), chord_m * lambda_rad.sin()),
        heading_rad: turn_angle_rad,
        distance_m: (radius_m * turn_angle_rad).abs(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::PI;

    /// Test geometry: wheel track of 12, quarter-circle displacements of
    /// 16*pi/10*pi put the turn centre 26 units from the vehicle centre.
    const TRACK: f64 = 12.0;

    fn no_slip() -> SlipComp {
        SlipComp {
            factor: 1.0,
            ..Default::default()
        }
    }

    fn delta(dist_left: f64, dist_right: f64, heading: f64) -> PoseDelta {
        pose_delta(dist_left, dist_right, heading, TRACK, &no_slip())
    }

    fn assert_delta(d: &PoseDelta, x: f64, y: f64, heading: f64, distance: f64) {
        assert_abs_diff_eq!(d.translation_m.x, x, epsilon = 1e-9);
        assert_abs_diff_eq!(d.translation_m.y, y, epsilon = 1e-9);
        assert_abs_diff_eq!(d.heading_rad, heading, epsilon = 1e-9);
        assert_abs_diff_eq!(d.distance_m, distance, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_motion() {
        assert_delta(&delta(0.0, 0.0, 0.0), 0.0, 0.0, 0.0, 0.0);
        assert_delta(&delta(0.0, 0.0, 1.2), 0.0, 0.0, 0.0, 0.0);
    }

    #[test]
    fn test_straight_line() {
        // Forward facing north (heading 0 is +y)
        assert_delta(&delta(42.0, 42.0, 0.0), 0.0, 42.0, 0.0, 42.0);

        // Backward facing north, distance still grows
        assert_delta(&delta(-17.0, -17.0, 0.0), 0.0, -17.0, 0.0, 17.0);

        // Forward facing east
        assert_delta(&delta(5.0, 5.0, 0.5 * PI), 5.0, 0.0, 0.0, 5.0);

        // Forward facing west
        assert_delta(&delta(5.0, 5.0, 1.5 * PI), -5.0, 0.0, 0.0, 5.0);
    }

    #[test]
    fn test_quarter_circle_arcs() {
        // 90 degree right turn, start facing north
        assert_delta(
            &delta(16.0 * PI, 10.0 * PI, 0.0),
            26.0,
            26.0,
            0.5 * PI,
            13.0 * PI,
        );

        // 90 degree left turn, start facing north
        assert_delta(
            &delta(10.0 * PI, 16.0 * PI, 0.0),
            -26.0,
            26.0,
            -0.5 * PI,
            13.0 * PI,
        );

        // 90 degree left turn, start facing east
        assert_delta(
            &delta(10.0 * PI, 16.0 * PI, 0.5 * PI),
            26.0,
            26.0,
            -0.5 * PI,
            13.0 * PI,
        );

        // 90 degree right turn, start facing south
        assert_delta(
            &delta(16.0 * PI, 10.0 * PI, PI),
            -26.0,
            -26.0,
            0.5 * PI,
            13.0 * PI,
        );

        // 90 degree right turn, start facing west
        assert_delta(
            &delta(16.0 * PI, 10.0 * PI, 1.5 * PI),
            -26.0,
            26.0,
            0.5 * PI,
            13.0 * PI,
        );
    }

    #[test]
    fn test_u_turns() {
        // U-turn to the right, start facing north
        assert_delta(&delta(32.0 * PI, 20.0 * PI, 0.0), 52.0, 0.0, PI, 26.0 * PI);

        // U-turn to the right, start facing south
        assert_delta(&delta(32.0 * PI, 20.0 * PI, PI), -52.0, 0.0, PI, 26.0 * PI);
    }

    #[test]
    fn test_45_degree_arc() {
        // 45 degree right turn, start facing south
        assert_delta(
            &delta(8.0 * PI, 5.0 * PI, PI),
            0.5 * 2f64.sqrt() * 26.0 - 26.0,
            -0.5 * 2f64.sqrt() * 26.0,
            0.25 * PI,
            26.0 * 0.25 * PI,
        );
    }

    #[test]
    fn test_270_degree_arcs() {
        // To the right
        assert_delta(
            &delta(48.0 * PI, 30.0 * PI, 0.0),
            26.0,
            -26.0,
            1.5 * PI,
            26.0 * PI * 1.5,
        );

        // To the left
        assert_delta(
            &delta(30.0 * PI, 48.0 * PI, 0.0),
            -26.0,
            -26.0,
            -1.5 * PI,
            26.0 * PI * 1.5,
        );
    }

    #[test]
    fn test_pivot_turns() {
        // Half turn on the spot: zero translation, zero centre arc length
        assert_delta(&delta(6.0 * PI, -6.0 * PI, 0.0), 0.0, 0.0, PI, 0.0);

        // Full turn
        assert_delta(&delta(12.0 * PI, -12.0 * PI, 0.0), 0.0, 0.0, 2.0 * PI, 0.0);

        // Turn and a half: heading delta is deliberately not normalised here
        assert_delta(&delta(18.0 * PI, -18.0 * PI, 0.0), 0.0, 0.0, 3.0 * PI, 0.0);

        // Full turn plus a quarter
        assert_delta(&delta(15.0 * PI, -15.0 * PI, 0.0), 0.0, 0.0, 2.5 * PI, 0.0);
    }

    #[test]
    fn test_reversed_arc() {
        // 90 degree right-hand geometry driven backwards
        assert_delta(
            &delta(-16.0 * PI, -10.0 * PI, 0.0),
            -26.0,
            26.0,
            -0.5 * PI,
            13.0 * PI,
        );
    }

    #[test]
    fn test_sharp_turn_slip_compensation() {
        // One wheel held still is as sharp as turns get. Scaling both
        // displacements leaves the wheel radii unchanged but scales the turn
        // angle and arc length by the factor.
        let slip = SlipComp {
            factor: 0.5,
            gentle_ratio_min: 0.5,
            gentle_ratio_max: 2.0,
        };

        let compensated = pose_delta(4.0, 0.0, 0.0, 2.0, &slip);
        let raw = pose_delta(4.0, 0.0, 0.0, 2.0, &no_slip());

        assert_relative_eq!(raw.heading_rad, 2.0, epsilon = 1e-9);
        assert_relative_eq!(compensated.heading_rad, 1.0, epsilon = 1e-9);
        assert_relative_eq!(raw.distance_m, 2.0, epsilon = 1e-9);
        assert_relative_eq!(compensated.distance_m, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gentle_turn_not_compensated() {
        // Inside the gentle window the factor must have no effect at all
        let slip = SlipComp {
            factor: 0.5,
            gentle_ratio_min: 0.5,
            gentle_ratio_max: 2.0,
        };

        let with_slip = pose_delta(16.0 * PI, 10.0 * PI, 0.0, TRACK, &slip);
        let without = delta(16.0 * PI, 10.0 * PI, 0.0);

        assert_relative_eq!(with_slip.translation_m.x, without.translation_m.x);
        assert_relative_eq!(with_slip.translation_m.y, without.translation_m.y);
        assert_relative_eq!(with_slip.heading_rad, without.heading_rad);
        assert_relative_eq!(with_slip.distance_m, without.distance_m);
    }
}
