//! # Drive Library
//!
//! Control software for driving a vehicle around a simulated track, either with fixed PID gains
//! or while tuning the steering gains online.

/// Drive control - steering and throttle with fixed gains.
pub mod drive_ctrl;

/// Frame handling - runs a control module on frames from the simulator.
pub mod frame_handler;

/// Gain tuner - twiddle search over the gains of a PID controller.
pub mod gain_tuner;

/// PID controller
pub mod pid_ctrl;

/// Simulator server - the network connection to the simulator relay.
pub mod sim_server;

/// Tune control - drive control with the steering gains under tuning.
pub mod tune_ctrl;
