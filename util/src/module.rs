//! Module interfaces
//!
//! Each control module in `drive_exec` implements [`State`]. The executable
//! initialises the module once after the session has been created, and then
//! calls [`State::proc`] once for every telemetry frame received from the
//! simulator, in the order the frames arrive.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// The module's internal state.
pub trait State {
    /// Data required during initialisation, usually parameter file paths.
    type InitData;
    /// An error which can occur during initialisation.
    type InitError;

    /// Data consumed on each tick.
    type InputData;
    /// Data produced on each tick.
    type OutputData;
    /// A report on the status of the tick's processing.
    type StatusReport;
    /// An error which can occur during a tick.
    type ProcError;

    /// Initialise the module, loading parameters and opening archives within
    /// the given session.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Process a single tick.
    ///
    /// This is not reentrant, ticks must be passed in one at a time in the
    /// order they were received.
    ///
    /// # Outputs
    /// - On success a tuple of the output data and status report.
    /// - On error a `ProcError` instance.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
