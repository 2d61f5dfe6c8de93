//! # Frame handling
//!
//! Maps one frame from the simulator onto at most one response, running the control module on
//! telemetry frames.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::sim::{FrameError, Inbound, Outbound, Telemetry};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The outcome of handling a single frame.
#[derive(Debug, PartialEq)]
pub enum Handled<R> {
    /// The frame needs no response.
    NoResponse,

    /// The vehicle is under manual control, the control module was not run.
    Manual,

    /// The control module processed a tick of telemetry.
    Tick {
        response: Outbound,
        report: R
    }
}

/// Errors which can occur while handling a frame.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Invalid frame: {0}")]
    FrameError(FrameError),

    #[error("The control module failed to process the tick: {0}")]
    ProcError(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<R> Handled<R> {
    /// The message to send back to the simulator, if any.
    pub fn response(&self) -> Option<Outbound> {
        match self {
            Handled::NoResponse => None,
            Handled::Manual => Some(Outbound::Manual),
            Handled::Tick { response, .. } => Some(*response)
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Handle a single frame from the simulator with the given control module.
pub fn handle_frame<S>(ctrl: &mut S, frame: &str) -> Result<Handled<S::StatusReport>, HandlerError>
where
    S: State<InputData = Telemetry, OutputData = Outbound>,
    S::ProcError: std::fmt::Display
{
    let tlm = match Inbound::from_frame(frame).map_err(HandlerError::FrameError)? {
        Inbound::Ignored => return Ok(Handled::NoResponse),
        Inbound::Manual => return Ok(Handled::Manual),
        Inbound::Telemetry(t) => t
    };

    let (response, report) = ctrl.proc(&tlm)
        .map_err(|e| HandlerError::ProcError(e.to_string()))?;

    Ok(Handled::Tick { response, report })
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
