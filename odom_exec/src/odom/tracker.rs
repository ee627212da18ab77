//! Implementation of the odometry tracker
//!
//! The tracker sits between the mechanisms driver and anything that wants to
//! know where the vehicle is. Raw tacho counts are sampled into a FIFO log
//! of per-wheel deltas; the log is only drained through the arc kinematics
//! into the cached pose when the pose is actually read or redefined, so
//! sampling stays cheap on the drive path.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::Vector2;
use std::collections::VecDeque;

// Internal
use super::{kinematics, DriveCommand, OdomError, Params, Pose};
use crate::mech::{Mech, Wheel};
use util::maths;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Absolute tacho-counter snapshot of both wheels at one instant.
#[derive(Debug, Copy, Clone, Default)]
struct TickSample {
    left: i64,
    right: i64,
}

/// Tacho-counter change of each wheel between two successive samples.
#[derive(Debug, Copy, Clone)]
struct TickLogEntry {
    delta_left: i64,
    delta_right: i64,
}

/// Dead-reckoning odometry tracker over a two-wheel mechanisms driver.
///
/// All operations take `&mut self`, so exclusive access is enforced by the
/// borrow checker; wrap the tracker in a mutex if it must be shared across
/// threads.
pub struct OdomTracker<M: Mech> {
    mech: M,

    params: Params,

    /// Resolved counts per rotation, parameter override or device-reported
    ticks_per_rot_left: f64,
    ticks_per_rot_right: f64,

    last_sample: TickSample,
    pending_log: VecDeque<TickLogEntry>,
    cached_pose: Pose,

    motion: MotionState,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Motion state of the tracker, driven by drive and stop commands.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MotionState {
    Idle,
    Moving,
}

/// The pose field redefined by a rebase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PoseField {
    X,
    Y,
    Heading,
    Distance,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<M: Mech> OdomTracker<M> {
    /// Construct a tracker over the given mechanisms driver.
    ///
    /// Validates the parameters, resolves the encoder constants and takes
    /// the baseline tick snapshot. The tracker starts `Idle` at the origin
    /// pose.
    pub fn new(mut mech: M, params: Params) -> Result<Self, OdomError> {
        if !(params.slip_comp.factor > 0.0 && params.slip_comp.factor <= 1.0) {
            return Err(OdomError::InvalidSlipCompFactor(params.slip_comp.factor));
        }
        if params.slip_comp.gentle_ratio_min >= params.slip_comp.gentle_ratio_max {
            return Err(OdomError::EmptyGentleTurnWindow(
                params.slip_comp.gentle_ratio_min,
                params.slip_comp.gentle_ratio_max,
            ));
        }

        let ticks_per_rot_left = params
            .ticks_per_rot_left
            .unwrap_or_else(|| mech.ticks_per_rot(Wheel::Left));
        let ticks_per_rot_right = params
            .ticks_per_rot_right
            .unwrap_or_else(|| mech.ticks_per_rot(Wheel::Right));

        let last_sample = TickSample {
            left: mech.ticks(Wheel::Left)?,
            right: mech.ticks(Wheel::Right)?,
        };

        debug!(
            "OdomTracker baseline: left = {}, right = {}",
            last_sample.left, last_sample.right
        );

        Ok(Self {
            mech,
            params,
            ticks_per_rot_left,
            ticks_per_rot_right,
            last_sample,
            pending_log: VecDeque::new(),
            cached_pose: Pose::default(),
            motion: MotionState::Idle,
        })
    }

    // -------------------------------------------------------------------
    // POSE ACCESS
    // -------------------------------------------------------------------

    /// Sample the encoders, drain the log and return the up-to-date pose.
    pub fn pose(&mut self) -> Result<Pose, OdomError> {
        self.record_sample()?;
        Ok(self.flush())
    }

    /// Current position in the odometry frame.
    ///
    /// Units: meters
    pub fn position_m(&mut self) -> Result<Vector2<f64>, OdomError> {
        Ok(self.pose()?.position_m)
    }

    /// Current x coordinate.
    ///
    /// Units: meters
    pub fn x_m(&mut self) -> Result<f64, OdomError> {
        Ok(self.pose()?.position_m.x)
    }

    /// Current y coordinate.
    ///
    /// Units: meters
    pub fn y_m(&mut self) -> Result<f64, OdomError> {
        Ok(self.pose()?.position_m.y)
    }

    /// Current heading.
    ///
    /// Units: radians, in [0, 2*pi)
    pub fn heading_rad(&mut self) -> Result<f64, OdomError> {
        Ok(self.pose()?.heading_rad)
    }

    /// Cumulative path length travelled.
    ///
    /// Units: meters
    pub fn distance_m(&mut self) -> Result<f64, OdomError> {
        Ok(self.pose()?.distance_m)
    }

    /// Redefine one field of the pose without implying physical travel.
    ///
    /// Motion accumulated up to the call is flushed into the pose first, so
    /// the new value replaces a fully up-to-date field and nothing pending
    /// is lost. A heading rebase is normalised into [0, 2*pi). Returns the
    /// rebased pose.
    pub fn rebase(&mut self, field: PoseField, value: f64) -> Result<Pose, OdomError> {
        self.record_sample()?;
        let mut pose = self.flush();

        match field {
            PoseField::X => pose.position_m.x = value,
            PoseField::Y => pose.position_m.y = value,
            PoseField::Heading => pose.heading_rad = maths::norm_angle_2pi(value),
            PoseField::Distance => pose.distance_m = value,
        }

        self.cached_pose = pose;

        debug!("Pose rebased: {:?} = {}", field, value);

        Ok(pose)
    }

    /// Last commanded motion state.
    pub fn motion(&self) -> MotionState {
        self.motion
    }

    /// Direct access to the underlying mechanisms driver.
    ///
    /// Used by simulation hosts to advance the virtual clock between
    /// non-blocking commands.
    pub fn mech_mut(&mut self) -> &mut M {
        &mut self.mech
    }

    // -------------------------------------------------------------------
    // MOTION COMMANDS
    // -------------------------------------------------------------------

    /// Execute a drive command.
    ///
    /// A sample is recorded before the new demand is issued so the log gains
    /// a boundary per commanded segment, and any previous demand is halted
    /// so the new one starts from rest. Blocking follows
    /// [`DriveCommand::is_blocking`]; a blocking command takes the closing
    /// sample once both wheels report stopped.
    pub fn drive(&mut self, cmd: DriveCommand) -> Result<(), OdomError> {
        self.record_sample()?;

        self.mech.stop(Wheel::Left)?;
        self.mech.stop(Wheel::Right)?;

        match cmd.duration_s {
            Some(duration_s) => {
                self.mech.run_for(Wheel::Left, cmd.speed_left_tps, duration_s)?;
                self.mech
                    .run_for(Wheel::Right, cmd.speed_right_tps, duration_s)?;
            }
            None => {
                self.mech.run_continuous(Wheel::Left, cmd.speed_left_tps)?;
                self.mech
                    .run_continuous(Wheel::Right, cmd.speed_right_tps)?;
            }
        }

        self.motion = MotionState::Moving;
        trace!("Drive command issued: {:?}", cmd);

        if cmd.is_blocking() {
            self.mech.wait_until_stopped(Wheel::Left)?;
            self.mech.wait_until_stopped(Wheel::Right)?;
            self.motion = MotionState::Idle;

            // Closing sample so the whole commanded segment sits in one log
            // entry
            self.record_sample()?;
        }

        Ok(())
    }

    /// Halt both wheels immediately.
    pub fn stop(&mut self) -> Result<(), OdomError> {
        self.record_sample()?;

        self.mech.stop(Wheel::Left)?;
        self.mech.stop(Wheel::Right)?;
        self.motion = MotionState::Idle;

        Ok(())
    }

    // -------------------------------------------------------------------
    // INTERNAL
    // -------------------------------------------------------------------

    /// Read both counters and append the per-wheel delta to the pending log.
    ///
    /// Both reads complete before any state is mutated: a failed read leaves
    /// the baseline and the log untouched, so a retried call cannot lose or
    /// double-count motion.
    fn record_sample(&mut self) -> Result<(), OdomError> {
        let left = self.mech.ticks(Wheel::Left)?;
        let right = self.mech.ticks(Wheel::Right)?;

        // Zero-motion entries are retained: the log keeps exactly one entry
        // per sample point, preserving sample ordering should timing data be
        // attached to entries later
        self.pending_log.push_back(TickLogEntry {
            delta_left: left - self.last_sample.left,
            delta_right: right - self.last_sample.right,
        });
        self.last_sample = TickSample { left, right };

        Ok(())
    }

    /// Drain the pending log through the arc kinematics into the cached pose.
    ///
    /// This is the only place accumulated motion mutates the cached pose.
    /// Entries are consumed in FIFO order, each integrated with the heading
    /// produced by its predecessors. Once the log is empty the heading is
    /// normalised into [0, 2*pi) and the cache replaced in one go.
    fn flush(&mut self) -> Pose {
        let mut pose = self.cached_pose;

        while let Some(entry) = self.pending_log.pop_front() {
            let dist_left_m = self.ticks_to_dist_m(entry.delta_left, self.ticks_per_rot_left);
            let dist_right_m = self.ticks_to_dist_m(entry.delta_right, self.ticks_per_rot_right);

            let delta = kinematics::pose_delta(
                dist_left_m,
                dist_right_m,
                pose.heading_rad,
                self.params.wheel_track_m,
                &self.params.slip_comp,
            );

            pose.position_m += delta.translation_m;
            pose.heading_rad += delta.heading_rad;
            pose.distance_m += delta.distance_m;
        }

        pose.heading_rad = maths::norm_angle_2pi(pose.heading_rad);
        self.cached_pose = pose;

        pose
    }

    /// Convert a tick delta into linear wheel travel.
    ///
    /// Units: meters
    fn ticks_to_dist_m(&self, delta_ticks: i64, ticks_per_rot: f64) -> f64 {
        delta_ticks as f64 / ticks_per_rot * self.params.wheel_diameter_m * std::f64::consts::PI
    }
}
