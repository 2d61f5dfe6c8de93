//! # Gain tuner module
//!
//! The gain tuner searches the gain space of a single PID controller using coordinate ascent,
//! also known as "twiddle". The controller is run for a sequence of fixed length episodes, each
//! made of a warm-up window, where transients from the previous reset are allowed to settle, and
//! a measurement window, where the squared error of every tick is added to the episode's cost.
//!
//! At the end of each episode one gain is perturbed based on whether the cost improved, the
//! controller's errors are cleared and the simulation is reset. Only one gain is perturbed at a
//! time, and each gain's step size grows when perturbing it helped and shrinks when it didn't.
//!
//! The search never finishes on its own, it keeps refining the gains until the executable is
//! stopped.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod search;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use search::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of tuned parameters, `[k_p, k_i, k_d]`.
pub const NUM_PARAMS: usize = 3;

/// Multiplicative factor applied to a step when it is grown or shrunk.
pub const STEP_SCALE: f64 = 1.1;
