//! # Tune control module
//!
//! Tune control drives the vehicle in the same way as [`crate::drive_ctrl`], except that the
//! steering controller is owned by a [`GainTuner`](crate::gain_tuner::GainTuner). Whenever an
//! episode ends the module answers with a reset instead of a steer message so that the next set
//! of gains is evaluated from the start of the track.
//!
//! The speed controller keeps the gains from the drive parameters and is cleared on every reset.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during TuneCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum TuneCtrlError {
    #[error("Could not load the drive parameters: {0}")]
    DriveParamLoadError(util::params::LoadError),

    #[error("Could not load the gain tuner parameters: {0}")]
    TunerParamLoadError(util::params::LoadError),

    #[error("The episode window must be at least one tick long")]
    InvalidWindow,

    #[error("Could not create the archive: {0}")]
    ArchiveInitError(String),
}
