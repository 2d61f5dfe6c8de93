//! # Drive control module
//!
//! Drive control keeps the vehicle on the track using two PID controllers. The steering
//! controller acts on the cross-track error reported by the simulator and the speed controller
//! acts on the difference between the vehicle's speed and the target speed.
//!
//! The steering demand is saturated to the maximum turn angle of the vehicle and then normalised
//! into `[-1, 1]`, as expected by the simulator. The throttle demand is passed through as is.
//!
//! In drive mode the gains are fixed and loaded from `drive_ctrl.toml`. The same actuation law is
//! used by [`crate::tune_ctrl`], where the steering controller is owned by the gain tuner.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::sim::{ActuationCmd, Telemetry};
use util::maths;

use crate::pid_ctrl::PidController;

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during DriveCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum DriveCtrlError {
    #[error("Could not load the parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Could not create the archive: {0}")]
    ArchiveInitError(String),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the actuation demands for a tick of telemetry.
///
/// Both controllers are updated with this tick's errors. Returns the demand
/// and whether the steering demand had to be saturated.
pub fn calc_actuation(
    steer_pid: &mut PidController,
    speed_pid: &mut PidController,
    tlm: &Telemetry,
    params: &Params
) -> (ActuationCmd, bool) {
    let max_turn_angle_rad = params.max_turn_angle_rad();

    steer_pid.update(tlm.cross_track_error);
    let steer_dem_rad = -steer_pid.total_error();
    let steer_saturated = steer_dem_rad.abs() > max_turn_angle_rad;

    speed_pid.update(tlm.speed - params.target_speed);
    let throttle = -speed_pid.total_error();

    let cmd = ActuationCmd {
        steering_angle: maths::normalise(steer_dem_rad, max_turn_angle_rad),
        throttle
    };

    (cmd, steer_saturated)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn tlm(cte: f64, speed: f64) -> Telemetry {
        Telemetry {
            cross_track_error: cte,
            speed,
            steering_angle: 0.0
        }
    }

    #[test]
    fn test_steering_opposes_error() {
        let params = Params::default();
        let mut steer = PidController::new(0.2, 0.0, 0.0);
        let mut speed = PidController::new(0.0, 0.0, 0.0);

        let (cmd, saturated) = calc_actuation(&mut steer, &mut speed, &tlm(0.5, 20.0), &params);

        assert!(!saturated);
        assert!(cmd.steering_angle < 0.0);
        assert!((cmd.steering_angle + 0.1 / params.max_turn_angle_rad()).abs() < 1e-12);

        let (cmd, _) = calc_actuation(&mut steer, &mut speed, &tlm(-1.0, 20.0), &params);
        assert!(cmd.steering_angle > 0.0);
    }

    #[test]
    fn test_steering_is_saturated() {
        let params = Params::default();
        let mut steer = PidController::new(0.2, 0.002, 8.0);
        let mut speed = PidController::default();

        let (cmd, saturated) = calc_actuation(&mut steer, &mut speed, &tlm(50.0, 0.0), &params);
        assert!(saturated);
        assert_eq!(cmd.steering_angle, -1.0);

        let (cmd, saturated) = calc_actuation(&mut steer, &mut speed, &tlm(-1e12, 0.0), &params);
        assert!(saturated);
        assert_eq!(cmd.steering_angle, 1.0);
    }

    #[test]
    fn test_steering_stays_normalised() {
        let params = Params::default();
        let mut steer = PidController::new(0.2, 0.002, 8.0);
        let mut speed = PidController::default();

        // Sustained one-sided error winds the integral up without limit
        for i in 0..5000 {
            let cte = if i % 7 == 0 { -3.0 } else { 2.5 + (i as f64) * 1e-3 };
            let (cmd, _) = calc_actuation(&mut steer, &mut speed, &tlm(cte, 10.0), &params);

            assert!(cmd.steering_angle >= -1.0 && cmd.steering_angle <= 1.0);
        }
    }

    #[test]
    fn test_throttle_tracks_target_speed() {
        let params = Params::default();
        let mut steer = PidController::default();
        let mut speed = PidController::new(0.2, 0.004, 6.0);

        // Too slow, accelerate
        let (cmd, _) = calc_actuation(&mut steer, &mut speed, &tlm(0.0, 15.0), &params);
        assert!((cmd.throttle - (0.2 * 5.0 + 0.004 * 5.0)).abs() < 1e-12);

        // Too fast, and the throttle is not clamped
        let mut speed = PidController::new(0.2, 0.004, 6.0);
        let (cmd, _) = calc_actuation(&mut steer, &mut speed, &tlm(0.0, 120.0), &params);
        assert!(cmd.throttle < -1.0);
    }
}
