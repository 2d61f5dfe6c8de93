//! # PID controller
//!
//! A discrete PID controller stepped once per simulation tick. The tick is the unit of time, so
//! the integral is a plain running sum of the errors and the derivative is the difference between
//! consecutive errors.
//!
//! The integral is never bounded or decayed. Under a sustained one-sided error it will wind up
//! without limit, the callers are responsible for saturating whatever the controller outputs.
//! Non-finite errors are not checked for and propagate into the output.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// The most recent error, only meaningful once initialised
    last_error: f64,

    /// The integral accumulation
    integral_error: f64,

    /// Difference between the two most recent errors
    differential_error: f64,

    /// True once an error has been observed since construction or the last reset
    initialised: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p, k_i, k_d,
            ..Default::default()
        }
    }

    /// Clear the accumulated error state.
    ///
    /// The gains are kept. The next update will be treated as the first one,
    /// so it produces no derivative term.
    pub fn reset_errors(&mut self) {
        self.initialised = false;
        self.integral_error = 0.0;
        self.differential_error = 0.0;
    }

    /// Replace the gains without touching the error state.
    pub fn set_gains(&mut self, k_p: f64, k_i: f64, k_d: f64) {
        self.k_p = k_p;
        self.k_i = k_i;
        self.k_d = k_d;
    }

    /// Update the error terms with a new error observation.
    pub fn update(&mut self, error: f64) {
        self.differential_error = match self.initialised {
            true => error - self.last_error,
            false => 0.0
        };
        self.initialised = true;

        self.last_error = error;
        self.integral_error += error;
    }

    /// Get the controller output for the current error state.
    ///
    /// The output has the same sign as the error, callers negate it to get a
    /// corrective demand.
    pub fn total_error(&self) -> f64 {
        self.last_error * self.k_p
            + self.integral_error * self.k_i
            + self.differential_error * self.k_d
    }

    /// The current gains as `[k_p, k_i, k_d]`.
    pub fn gains(&self) -> [f64; 3] {
        [self.k_p, self.k_i, self.k_d]
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    pub fn integral_error(&self) -> f64 {
        self.integral_error
    }

    pub fn differential_error(&self) -> f64 {
        self.differential_error
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
