//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::convert::Infallible;
use log::trace;
use serde::Serialize;

// Internal
use super::{calc_actuation, DriveCtrlError, Params};
use crate::pid_ctrl::PidController;
use comms_if::sim::{Outbound, Telemetry};
use util::{
    params,
    module::State,
    archive::{Archived, Archiver},
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive control module state
pub struct DriveCtrl {
    pub(crate) params: Params,

    steer_pid: PidController,
    speed_pid: PidController,

    pub(crate) report: StatusReport,

    num_ticks: u64,

    /// Record of the last processed tick, taken by the next archive write
    last_tick: Option<TickRecord>,
    arch_ticks: Archiver,
}

/// Status report for DriveCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// True if the steering demand was beyond the maximum turn angle
    pub steer_saturated: bool,
}

/// A single row of the tick archive.
#[derive(Clone, Copy, Serialize, Debug)]
struct TickRecord {
    tick: u64,
    cross_track_error: f64,
    speed: f64,
    steering_angle: f64,
    steer_dem: f64,
    throttle_dem: f64,
    steer_saturated: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {
    /// Create a new instance with the given parameters and no archive.
    pub fn new(params: Params) -> Self {
        Self {
            steer_pid: PidController::new(
                params.steer_k_p, params.steer_k_i, params.steer_k_d
            ),
            speed_pid: PidController::new(
                params.speed_k_p, params.speed_k_i, params.speed_k_d
            ),
            params,
            report: StatusReport::default(),
            num_ticks: 0,
            last_tick: None,
            arch_ticks: Archiver::default(),
        }
    }

    pub fn steer_pid(&self) -> &PidController {
        &self.steer_pid
    }

    pub fn speed_pid(&self) -> &PidController {
        &self.speed_pid
    }

    pub fn num_ticks(&self) -> u64 {
        self.num_ticks
    }
}

impl Default for DriveCtrl {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl State for DriveCtrl {
    type InitData = &'static str;
    type InitError = DriveCtrlError;

    type InputData = Telemetry;
    type OutputData = Outbound;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the DriveCtrl module.
    ///
    /// Expected init data is the path to the parameter file. Both controllers
    /// are recreated with the loaded gains.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(DriveCtrlError::ParamLoadError)?;

        *self = Self::new(params);

        self.arch_ticks = Archiver::from_path(session, "drive_ctrl/ticks.csv")
            .map_err(|e| DriveCtrlError::ArchiveInitError(e.to_string()))?;

        Ok(())
    }

    /// Compute the steering and throttle for one tick of telemetry.
    ///
    /// Drive mode always answers with a steer message.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport::default();
        self.num_ticks += 1;

        let (cmd, steer_saturated) = calc_actuation(
            &mut self.steer_pid,
            &mut self.speed_pid,
            input_data,
            &self.params
        );
        self.report.steer_saturated = steer_saturated;

        trace!(
            "CTE: {} Speed: {} Angle: {} -> steer: {} throttle: {}",
            input_data.cross_track_error,
            input_data.speed,
            input_data.steering_angle,
            cmd.steering_angle,
            cmd.throttle
        );

        self.last_tick = Some(TickRecord {
            tick: self.num_ticks,
            cross_track_error: input_data.cross_track_error,
            speed: input_data.speed,
            steering_angle: input_data.steering_angle,
            steer_dem: cmd.steering_angle,
            throttle_dem: cmd.throttle,
            steer_saturated,
        });

        Ok((Outbound::Steer(cmd), self.report))
    }
}

impl Archived for DriveCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(record) = self.last_tick.take() {
            self.arch_ticks.serialise(record)?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
