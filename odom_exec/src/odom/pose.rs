//! Pose of the vehicle in the odometry frame

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The dead-reckoned pose of the vehicle.
///
/// The odometry frame has its origin wherever the tracker was constructed
/// (or last rebased). Heading 0 points along the +y axis and increasing
/// heading rotates towards +x.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position in the odometry frame.
    ///
    /// Units: meters
    pub position_m: Vector2<f64>,

    /// Heading, the angle from the +y axis towards +x.
    ///
    /// Units: radians, in [0, 2*pi)
    pub heading_rad: f64,

    /// Cumulative path length travelled by the vehicle centre. Never
    /// decreases except through an explicit rebase.
    ///
    /// Units: meters
    pub distance_m: f64,
}
