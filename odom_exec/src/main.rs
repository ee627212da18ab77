//! Main Deimos odometry executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session and logger
//!     - Load parameters
//!     - Construct the simulated mechanisms driver and the odometry tracker
//!     - Drive a square pattern, reporting the dead-reckoned pose per leg
//!     - Demonstrate an unbounded run with an explicit stop
//!     - Rebase the pose back onto the origin (dock recalibration)
//!     - Save the pose trace into the session directory

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::info;
use std::f64::consts::PI;

// Internal
use odom_lib::{
    mech::{SimMech, SimMechParams},
    odom::{DriveCommand, OdomTracker, Params, PoseField},
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Cruise speed demand for straight legs.
///
/// Units: tacho counts/second
const CRUISE_SPEED_TPS: f64 = 360.0;

/// Wheel speed demand during pivot turns.
///
/// Units: tacho counts/second
const TURN_SPEED_TPS: f64 = 180.0;

/// Duration of each straight leg of the square.
///
/// Units: seconds
const LEG_DURATION_S: f64 = 2.0;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("odom_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Deimos Odometry Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let odom_params: Params =
        util::params::load("odom.toml").wrap_err("Could not load odometry params")?;
    let sim_params: SimMechParams =
        util::params::load("sim_mech.toml").wrap_err("Could not load sim mech params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE MODULES ----

    let mech = SimMech::new(&sim_params).wrap_err("Failed to initialise the mech driver")?;
    info!("SimMech initialised on ports {:?}", mech.ports());

    // Wheel travel needed on each side for a quarter pivot, accounting for
    // the slip compensation the tracker will apply to the sharp turn
    let quarter_turn_travel_m =
        (PI / 4.0) * odom_params.wheel_track_m / odom_params.slip_comp.factor;
    let turn_rate_ms =
        TURN_SPEED_TPS / sim_params.ticks_per_rot * PI * odom_params.wheel_diameter_m;
    let turn_duration_s = quarter_turn_travel_m / turn_rate_ms;

    let mut tracker =
        OdomTracker::new(mech, odom_params).wrap_err("Failed to initialise the odometry tracker")?;
    info!("OdomTracker initialised\n");

    // ---- SQUARE DRIVE ----

    info!("Driving a square, pose after each segment:");

    let mut pose_trace = Vec::new();

    for leg in 1..=4 {
        // Straight leg, duration-bounded commands block by default
        tracker
            .drive(DriveCommand::timed(
                CRUISE_SPEED_TPS,
                CRUISE_SPEED_TPS,
                LEG_DURATION_S,
            ))
            .wrap_err("Straight leg failed")?;

        let pose = tracker.pose().wrap_err("Could not read the pose")?;
        info!(
            "Leg {}: x = {:.3} m, y = {:.3} m, heading = {:.3} rad, odometer = {:.3} m",
            leg, pose.position_m.x, pose.position_m.y, pose.heading_rad, pose.distance_m
        );
        pose_trace.push(pose);

        // Quarter pivot to the right
        tracker
            .drive(DriveCommand::timed(
                TURN_SPEED_TPS,
                -TURN_SPEED_TPS,
                turn_duration_s,
            ))
            .wrap_err("Pivot turn failed")?;
        pose_trace.push(tracker.pose().wrap_err("Could not read the pose")?);
    }

    // ---- UNBOUNDED RUN ----

    // An unbounded command does not block; the sim clock is advanced by hand
    // and the run ended with an explicit stop
    info!("\nUnbounded run for one second, then stop");

    tracker
        .drive(DriveCommand::continuous(CRUISE_SPEED_TPS, CRUISE_SPEED_TPS))
        .wrap_err("Unbounded run failed")?;
    tracker.mech_mut().step(1.0);
    tracker.stop().wrap_err("Stop failed")?;

    let pose = tracker.pose().wrap_err("Could not read the pose")?;
    info!(
        "After stop: x = {:.3} m, y = {:.3} m, heading = {:.3} rad, odometer = {:.3} m",
        pose.position_m.x, pose.position_m.y, pose.heading_rad, pose.distance_m
    );
    pose_trace.push(pose);

    // ---- REBASE ----

    // Pretend the vehicle was lifted back onto the dock: redefine x and y
    // without implying physical travel. The odometer is left untouched.
    info!("\nRebasing position onto the origin");

    tracker
        .rebase(PoseField::X, 0.0)
        .wrap_err("Could not rebase x")?;
    let pose = tracker
        .rebase(PoseField::Y, 0.0)
        .wrap_err("Could not rebase y")?;
    info!(
        "After rebase: x = {:.3} m, y = {:.3} m, odometer = {:.3} m",
        pose.position_m.x, pose.position_m.y, pose.distance_m
    );
    pose_trace.push(pose);

    // ---- SAVE TRACE ----

    let trace_json = serde_json::to_string_pretty(&pose_trace)
        .wrap_err("Could not serialise the pose trace")?;

    let mut trace_path = session.session_root.clone();
    trace_path.push("pose_trace.json");
    std::fs::write(&trace_path, trace_json).wrap_err("Could not write the pose trace")?;

    info!("Pose trace written to {:?}", trace_path);

    Ok(())
}
