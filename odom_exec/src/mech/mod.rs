//! # Mechanisms interface
//!
//! This module defines the boundary between the odometry software and the
//! two-wheel drive mechanisms driver. The driver owns the motor hardware
//! (or a simulation of it, see [`SimMech`]) and exposes tacho counters and
//! simple speed/duration demands per wheel.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod sim;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
pub use sim::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The two drive wheels of the vehicle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Wheel {
    Left,
    Right,
}

/// Output ports a drive motor may be attached to.
///
/// The brick has exactly four motor outputs, so an invalid port name is not
/// representable. The only invalid configuration left is assigning both
/// wheels to the same port, which [`PortPair::new`] rejects.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MotorPort {
    OutA,
    OutB,
    OutC,
    OutD,
}

/// Possible errors that can occur at the mechanisms boundary.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    #[error("The left and right drive motors cannot share port {0:?}")]
    DuplicatePort(MotorPort),

    #[error("Device I/O failure: {0}")]
    DeviceIo(#[from] std::io::Error),

    #[error("Cannot wait on the {0:?} wheel, it is running with no duration set")]
    UnboundedWait(Wheel),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A validated pair of distinct motor ports, left wheel then right wheel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PortPair {
    pub left: MotorPort,
    pub right: MotorPort,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Interface to the two-wheel drive mechanisms driver.
///
/// Speeds are given in tacho counts per second. Tick counters are reset-free
/// and monotonic within a direction of travel.
pub trait Mech {
    /// Current tacho counter of the given wheel's motor.
    fn ticks(&mut self, wheel: Wheel) -> Result<i64, MechError>;

    /// Tacho counts per full wheel rotation reported by the device.
    fn ticks_per_rot(&self, wheel: Wheel) -> f64;

    /// Run the wheel at the given speed for the given duration, then stop.
    fn run_for(&mut self, wheel: Wheel, speed_tps: f64, duration_s: f64) -> Result<(), MechError>;

    /// Run the wheel at the given speed until commanded otherwise.
    fn run_continuous(&mut self, wheel: Wheel, speed_tps: f64) -> Result<(), MechError>;

    /// Halt the wheel immediately.
    fn stop(&mut self, wheel: Wheel) -> Result<(), MechError>;

    /// Block the caller until the wheel reports not-running.
    fn wait_until_stopped(&mut self, wheel: Wheel) -> Result<(), MechError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PortPair {
    /// Build a port pair, rejecting a duplicated port.
    pub fn new(left: MotorPort, right: MotorPort) -> Result<Self, MechError> {
        if left == right {
            return Err(MechError::DuplicatePort(left));
        }

        Ok(Self { left, right })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_port_pair_rejects_duplicate() {
        assert!(PortPair::new(MotorPort::OutB, MotorPort::OutC).is_ok());

        match PortPair::new(MotorPort::OutB, MotorPort::OutB) {
            Err(MechError::DuplicatePort(MotorPort::OutB)) => (),
            other => panic!("Expected DuplicatePort error, got {:?}", other),
        }
    }
}
