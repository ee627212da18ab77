//! # Odometry module
//!
//! Dead-reckoned pose estimation for the two-wheel differential drive.
//!
//! The module is split into a pure geometry half ([`kinematics`]) and a
//! stateful half ([`OdomTracker`]) which samples the mechanisms driver's
//! tacho counters into a FIFO log and lazily integrates that log into a
//! cached [`Pose`] whenever the pose is read or redefined.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
pub mod kinematics;
mod params;
mod pose;
mod tracker;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use kinematics::{PoseDelta, SlipComp};
pub use params::*;
pub use pose::*;
pub use tracker::*;

use crate::mech::MechError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during odometry operation.
#[derive(Debug, thiserror::Error)]
pub enum OdomError {
    #[error("Slip compensation factor must lie in (0, 1], got {0}")]
    InvalidSlipCompFactor(f64),

    #[error("Gentle-turn ratio window ({0}, {1}) is empty")]
    EmptyGentleTurnWindow(f64, f64),

    #[error("Mechanisms error: {0}")]
    Mech(#[from] MechError),
}
