//! Gain tuner parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use super::NUM_PARAMS;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the gain tuner
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Params {
    /// Number of ticks in each of the warm-up and measurement windows. An
    /// episode lasts twice this many ticks.
    pub window_ticks: u32,

    /// Gains `[k_p, k_i, k_d]` the search starts from.
    pub initial_params: [f64; NUM_PARAMS],

    /// Initial step size for each gain.
    pub initial_steps: [f64; NUM_PARAMS],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            window_ticks: 125,
            initial_params: [0.0; NUM_PARAMS],
            initial_steps: [1.0; NUM_PARAMS],
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
