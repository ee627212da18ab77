//! Drive commands passed into the odometry tracker

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command to drive the two wheels.
#[derive(Clone, Copy, Debug)]
pub struct DriveCommand {
    /// Speed demand for the left wheel.
    ///
    /// Units: tacho counts/second
    pub speed_left_tps: f64,

    /// Speed demand for the right wheel.
    ///
    /// Units: tacho counts/second
    pub speed_right_tps: f64,

    /// How long to run for, or `None` to run until commanded otherwise.
    ///
    /// Units: seconds
    pub duration_s: Option<f64>,

    /// Explicit blocking override. `None` selects the default for the
    /// command shape, see [`DriveCommand::is_blocking`].
    pub blocking: Option<bool>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCommand {
    /// A duration-bounded command with default blocking behaviour.
    pub fn timed(speed_left_tps: f64, speed_right_tps: f64, duration_s: f64) -> Self {
        Self {
            speed_left_tps,
            speed_right_tps,
            duration_s: Some(duration_s),
            blocking: None,
        }
    }

    /// An unbounded command with default blocking behaviour.
    pub fn continuous(speed_left_tps: f64, speed_right_tps: f64) -> Self {
        Self {
            speed_left_tps,
            speed_right_tps,
            duration_s: None,
            blocking: None,
        }
    }

    /// Determine whether this command shall block until motion completes.
    ///
    /// A duration-bounded command blocks by default; an unbounded one does
    /// not (it would block forever unless something else stops the wheels).
    /// An explicit `blocking` value overrides either default.
    pub fn is_blocking(&self) -> bool {
        match self.blocking {
            Some(blocking) => blocking,
            None => self.duration_s.is_some(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_blocking_rule() {
        // Timed commands block by default
        assert!(DriveCommand::timed(100.0, 100.0, 1.0).is_blocking());

        // Unbounded commands do not
        assert!(!DriveCommand::continuous(100.0, 100.0).is_blocking());

        // Explicit overrides win in both directions
        let mut cmd = DriveCommand::timed(100.0, 100.0, 1.0);
        cmd.blocking = Some(false);
        assert!(!cmd.is_blocking());

        let mut cmd = DriveCommand::continuous(100.0, 100.0);
        cmd.blocking = Some(true);
        assert!(cmd.is_blocking());
    }
}
