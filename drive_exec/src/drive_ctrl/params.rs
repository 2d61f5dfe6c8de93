//! Drive control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for drive control
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Speed the speed controller tries to hold.
    pub target_speed: f64,

    /// Maximum turn angle of the vehicle in degrees. Steering demands are
    /// saturated to this angle before being normalised.
    pub max_turn_angle_deg: f64,

    /// Steering controller proportional gain
    pub steer_k_p: f64,

    /// Steering controller integral gain
    pub steer_k_i: f64,

    /// Steering controller derivative gain
    pub steer_k_d: f64,

    /// Speed controller proportional gain
    pub speed_k_p: f64,

    /// Speed controller integral gain
    pub speed_k_i: f64,

    /// Speed controller derivative gain
    pub speed_k_d: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn max_turn_angle_rad(&self) -> f64 {
        self.max_turn_angle_deg.to_radians()
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            target_speed: 20.0,
            max_turn_angle_deg: 25.0,
            steer_k_p: 0.2,
            steer_k_i: 0.002,
            steer_k_d: 8.0,
            speed_k_p: 0.2,
            speed_k_i: 0.004,
            speed_k_d: 6.0,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
