//! # Communications interface crate.
//!
//! Provides the interfaces between the drive controller and the simulator.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Simulator frame definitions (telemetry in, steering/reset/manual out)
pub mod sim;

/// Network module
pub mod net;
