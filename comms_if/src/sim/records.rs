//! # Simulator records
//!
//! Plain data records exchanged with the simulator on each tick.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Deserializer, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Telemetry sent by the simulator once per tick.
///
/// The simulator encodes every value as a string (`"cte":"0.7598"`), plain JSON numbers are also
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Lateral deviation of the vehicle from the target path.
    #[serde(rename = "cte", deserialize_with = "num_or_str")]
    pub cross_track_error: f64,

    /// Current vehicle speed.
    #[serde(deserialize_with = "num_or_str")]
    pub speed: f64,

    /// Current steering angle of the vehicle in degrees.
    #[serde(deserialize_with = "num_or_str")]
    pub steering_angle: f64,
}

/// Actuation demand sent back to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ActuationCmd {
    /// Normalised steering demand in `[-1, 1]`.
    pub steering_angle: f64,

    /// Throttle demand, negative values brake.
    pub throttle: f64,
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(f64),
    Str(String),
}

fn num_or_str<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_telemetry_from_strings() {
        let tlm: Telemetry = serde_json::from_str(
            r#"{"cte":"0.7598","speed":"0.4380","steering_angle":"0.0000","throttle":"0.0"}"#,
        )
        .unwrap();

        assert_eq!(
            tlm,
            Telemetry {
                cross_track_error: 0.7598,
                speed: 0.4380,
                steering_angle: 0.0
            }
        );
    }

    #[test]
    fn test_telemetry_from_numbers() {
        let tlm: Telemetry =
            serde_json::from_str(r#"{"cte":-1.5,"speed":20,"steering_angle":3.25}"#).unwrap();

        assert_eq!(tlm.cross_track_error, -1.5);
        assert_eq!(tlm.speed, 20.0);
        assert_eq!(tlm.steering_angle, 3.25);
    }

    #[test]
    fn test_telemetry_rejects_bad_values() {
        assert!(serde_json::from_str::<Telemetry>(
            r#"{"cte":"left","speed":"1","steering_angle":"0"}"#
        )
        .is_err());
        assert!(serde_json::from_str::<Telemetry>(r#"{"cte":"1","speed":"1"}"#).is_err());
    }
}
