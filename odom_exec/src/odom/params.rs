//! Parameters structure for the odometry module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::kinematics::SlipComp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for dead-reckoning odometry.
#[derive(Debug, Deserialize)]
pub struct Params {
    // ---- GEOMETRY ----
    /// Diameter of the drive wheels.
    ///
    /// Units: meters
    pub wheel_diameter_m: f64,

    /// Distance between the two wheel ground-contact points.
    ///
    /// Units: meters
    pub wheel_track_m: f64,

    // ---- ENCODERS ----
    /// Override for the left encoder's counts per wheel rotation. Omit to
    /// use the device-reported constant.
    ///
    /// Units: counts/rotation
    #[serde(default)]
    pub ticks_per_rot_left: Option<f64>,

    /// Override for the right encoder's counts per wheel rotation. Omit to
    /// use the device-reported constant.
    ///
    /// Units: counts/rotation
    #[serde(default)]
    pub ticks_per_rot_right: Option<f64>,

    // ---- SLIP COMPENSATION ----
    /// Sharp-turn slip compensation, see [`SlipComp`].
    #[serde(default)]
    pub slip_comp: SlipComp,
}
