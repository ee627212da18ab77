//! # Simulated mechanisms driver
//!
//! Stands in for the motor hardware behind the [`Mech`] interface so the
//! odometry stack can be exercised without a vehicle. Time is virtual: the
//! tacho counters only advance when [`SimMech::step`] is called, which makes
//! runs exactly reproducible.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use super::{Mech, MechError, MotorPort, PortPair, Wheel};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the simulated mechanisms driver.
#[derive(Debug, Deserialize)]
pub struct SimMechParams {
    /// Output port of the left drive motor
    pub left_port: MotorPort,

    /// Output port of the right drive motor
    pub right_port: MotorPort,

    /// Tacho counts per full wheel rotation reported by the simulated motors.
    ///
    /// Units: counts/rotation
    pub ticks_per_rot: f64,
}

/// Simulated two-wheel mechanisms driver.
pub struct SimMech {
    ports: PortPair,
    wheels: [SimWheel; 2],
    ticks_per_rot: f64,
}

/// State of one simulated wheel.
#[derive(Debug, Copy, Clone)]
struct SimWheel {
    /// Fractional tacho accumulator, rounded on read
    ticks: f64,

    cmd: WheelCmd,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Commanded state of one simulated wheel.
#[derive(Debug, Copy, Clone)]
enum WheelCmd {
    Stopped,
    Timed { speed_tps: f64, remaining_s: f64 },
    Continuous { speed_tps: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimMech {
    /// Build a simulated driver from the given parameters.
    pub fn new(params: &SimMechParams) -> Result<Self, MechError> {
        let ports = PortPair::new(params.left_port, params.right_port)?;

        Ok(Self {
            ports,
            wheels: [SimWheel {
                ticks: 0.0,
                cmd: WheelCmd::Stopped,
            }; 2],
            ticks_per_rot: params.ticks_per_rot,
        })
    }

    /// The ports the simulated motors are attached to.
    pub fn ports(&self) -> PortPair {
        self.ports
    }

    /// Advance the virtual clock by `dt_s` seconds.
    ///
    /// Both wheels share the clock: a timed demand runs out after its
    /// remaining duration regardless of which wheel a caller is waiting on.
    pub fn step(&mut self, dt_s: f64) {
        for wheel in self.wheels.iter_mut() {
            match wheel.cmd {
                WheelCmd::Stopped => (),
                WheelCmd::Timed {
                    speed_tps,
                    remaining_s,
                } => {
                    wheel.ticks += speed_tps * remaining_s.min(dt_s);
                    wheel.cmd = if remaining_s <= dt_s {
                        WheelCmd::Stopped
                    } else {
                        WheelCmd::Timed {
                            speed_tps,
                            remaining_s: remaining_s - dt_s,
                        }
                    };
                }
                WheelCmd::Continuous { speed_tps } => {
                    wheel.ticks += speed_tps * dt_s;
                }
            }
        }
    }

    fn wheel(&self, wheel: Wheel) -> &SimWheel {
        &self.wheels[Self::index(wheel)]
    }

    fn wheel_mut(&mut self, wheel: Wheel) -> &mut SimWheel {
        &mut self.wheels[Self::index(wheel)]
    }

    fn index(wheel: Wheel) -> usize {
        match wheel {
            Wheel::Left => 0,
            Wheel::Right => 1,
        }
    }
}

impl Mech for SimMech {
    fn ticks(&mut self, wheel: Wheel) -> Result<i64, MechError> {
        Ok(self.wheel(wheel).ticks.round() as i64)
    }

    fn ticks_per_rot(&self, _wheel: Wheel) -> f64 {
        self.ticks_per_rot
    }

    fn run_for(&mut self, wheel: Wheel, speed_tps: f64, duration_s: f64) -> Result<(), MechError> {
        self.wheel_mut(wheel).cmd = WheelCmd::Timed {
            speed_tps,
            remaining_s: duration_s,
        };
        Ok(())
    }

    fn run_continuous(&mut self, wheel: Wheel, speed_tps: f64) -> Result<(), MechError> {
        self.wheel_mut(wheel).cmd = WheelCmd::Continuous { speed_tps };
        Ok(())
    }

    fn stop(&mut self, wheel: Wheel) -> Result<(), MechError> {
        self.wheel_mut(wheel).cmd = WheelCmd::Stopped;
        Ok(())
    }

    /// Run the virtual clock forward until the wheel stops.
    ///
    /// A wheel running with no duration set would never stop (the sim has no
    /// external stopper), so waiting on one is a structured error rather
    /// than a hang.
    fn wait_until_stopped(&mut self, wheel: Wheel) -> Result<(), MechError> {
        match self.wheel(wheel).cmd {
            WheelCmd::Stopped => Ok(()),
            WheelCmd::Timed { remaining_s, .. } => {
                self.step(remaining_s);
                Ok(())
            }
            WheelCmd::Continuous { .. } => Err(MechError::UnboundedWait(wheel)),
        }
    }
}
