//! # Simulator Interface
//!
//! The simulator talks in event frames, a `42` prefix followed by a JSON array holding the event
//! name and its data object:
//!
//! ```text
//! 42["telemetry",{"cte":"0.7598","speed":"0.4380","steering_angle":"0.0000"}]
//! 42["steer",{"steering_angle":-0.1,"throttle":0.3}]
//! 42["reset",{}]
//! 42["manual",{}]
//! ```
//!
//! The `4` marks a message and the `2` marks an event. Frames without the prefix are not events
//! and need no answer. An event without data means the simulator is being driven manually, in
//! which case the `manual` frame is returned and the controllers are not run.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod records;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use serde_json::{json, Value};

pub use records::*;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Prefix of every event frame.
pub const EVENT_PREFIX: &str = "42";

/// Name of the inbound telemetry event.
pub const TELEMETRY_EVENT: &str = "telemetry";

/// Name of the outbound steering event.
pub const STEER_EVENT: &str = "steer";

/// Name of the outbound simulation reset event.
pub const RESET_EVENT: &str = "reset";

/// Name of the outbound manual driving event.
pub const MANUAL_EVENT: &str = "manual";

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A frame received from the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inbound {
    /// Not an event frame, or an event other than telemetry. Nothing is sent back.
    Ignored,

    /// An event with no data, the vehicle is under manual control.
    Manual,

    /// Telemetry for one simulation tick.
    Telemetry(Telemetry),
}

/// A frame to be sent to the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outbound {
    /// Steering and throttle demands for this tick.
    Steer(ActuationCmd),

    /// Discard the current simulation state and start a new episode.
    Reset,

    /// Neutral response to a manual driving frame.
    Manual,
}

/// Errors which can occur while parsing a frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("The frame payload is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("The frame payload does not start with an event name")]
    MissingEventName,

    #[error("The telemetry data is invalid: {0}")]
    InvalidTelemetry(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Inbound {
    /// Parse a raw frame from the simulator.
    pub fn from_frame(frame: &str) -> Result<Self, FrameError> {
        if frame.len() <= EVENT_PREFIX.len() || !frame.starts_with(EVENT_PREFIX) {
            return Ok(Inbound::Ignored);
        }

        let payload = match event_payload(frame) {
            Some(p) => p,
            None => return Ok(Inbound::Manual),
        };

        let val: Value = serde_json::from_str(payload).map_err(FrameError::InvalidJson)?;

        match val[0].as_str() {
            Some(TELEMETRY_EVENT) => (),
            Some(_) => return Ok(Inbound::Ignored),
            None => return Err(FrameError::MissingEventName),
        }

        Telemetry::deserialize(&val[1])
            .map(Inbound::Telemetry)
            .map_err(FrameError::InvalidTelemetry)
    }
}

impl Outbound {
    /// Encode this message as a frame for the simulator.
    pub fn to_frame(&self) -> String {
        let body = match self {
            Outbound::Steer(cmd) => json!([
                STEER_EVENT,
                {
                    "steering_angle": cmd.steering_angle,
                    "throttle": cmd.throttle
                }
            ]),
            Outbound::Reset => json!([RESET_EVENT, {}]),
            Outbound::Manual => json!([MANUAL_EVENT, {}]),
        };

        format!("{}{}", EVENT_PREFIX, body)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Get the JSON array in the frame, or `None` if the frame carries no data.
fn event_payload(frame: &str) -> Option<&str> {
    if frame.contains("null") {
        return None;
    }

    let start = frame.find('[')?;
    let end = frame.rfind(']')?;

    if end < start {
        return None;
    }

    Some(&frame[start..=end])
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
