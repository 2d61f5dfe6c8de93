//! Implementations for the TuneCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::convert::Infallible;
use log::trace;
use serde::Serialize;

// Internal
use super::TuneCtrlError;
use crate::{
    drive_ctrl::{self, calc_actuation},
    gain_tuner::{self, BestGains, EpisodeReport, GainTuner, TunerEvent},
    pid_ctrl::PidController};
use comms_if::sim::{Outbound, Telemetry};
use util::{
    params,
    module::State,
    archive::{Archived, Archiver},
    session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tune control module state
pub struct TuneCtrl {
    pub(crate) drive_params: drive_ctrl::Params,

    tuner: GainTuner,
    speed_pid: PidController,

    /// Report of an episode which ended on the last tick, taken by the next
    /// archive write
    last_episode: Option<EpisodeReport>,
    arch_episodes: Archiver,
}

/// Data needed to initialise TuneCtrl.
#[derive(Debug, Clone)]
pub struct InitData {
    /// Path to the drive control parameters, relative to the params directory
    pub drive_params_path: &'static str,

    /// Path to the gain tuner parameters, relative to the params directory
    pub tuner_params_path: &'static str,

    /// Replaces the window length from the tuner parameters if set
    pub window_override: Option<u32>,
}

/// Status report for TuneCtrl processing.
#[derive(Clone, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// True if the steering demand was beyond the maximum turn angle
    pub steer_saturated: bool,

    /// Set if this tick ended an episode
    pub episode: Option<EpisodeReport>,

    /// Set if the episode that just ended has the lowest cost so far
    pub new_best: Option<BestGains>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TuneCtrl {
    /// Create a new instance with no archive.
    pub fn new(
        drive_params: drive_ctrl::Params,
        tuner_params: &gain_tuner::Params
    ) -> Self {
        Self {
            tuner: GainTuner::new(tuner_params),
            speed_pid: PidController::new(
                drive_params.speed_k_p,
                drive_params.speed_k_i,
                drive_params.speed_k_d
            ),
            drive_params,
            last_episode: None,
            arch_episodes: Archiver::default(),
        }
    }

    pub fn tuner(&self) -> &GainTuner {
        &self.tuner
    }

    pub fn speed_pid(&self) -> &PidController {
        &self.speed_pid
    }
}

impl Default for TuneCtrl {
    fn default() -> Self {
        Self::new(
            drive_ctrl::Params::default(),
            &gain_tuner::Params::default()
        )
    }
}

impl State for TuneCtrl {
    type InitData = InitData;
    type InitError = TuneCtrlError;

    type InputData = Telemetry;
    type OutputData = Outbound;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the TuneCtrl module.
    ///
    /// The steering gains in the drive parameters are not used, the search
    /// starts from the tuner's initial parameters instead.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let drive_params: drive_ctrl::Params = params::load(init_data.drive_params_path)
            .map_err(TuneCtrlError::DriveParamLoadError)?;
        let mut tuner_params: gain_tuner::Params = params::load(init_data.tuner_params_path)
            .map_err(TuneCtrlError::TunerParamLoadError)?;

        if let Some(w) = init_data.window_override {
            tuner_params.window_ticks = w;
        }
        if tuner_params.window_ticks == 0 {
            return Err(TuneCtrlError::InvalidWindow);
        }

        *self = Self::new(drive_params, &tuner_params);

        self.arch_episodes = Archiver::from_path(session, "gain_tuner/episodes.csv")
            .map_err(|e| TuneCtrlError::ArchiveInitError(e.to_string()))?;

        Ok(())
    }

    /// Compute the actuation for one tick of telemetry and record the
    /// steering error with the tuner.
    ///
    /// On the tick that ends an episode the actuation is discarded and a reset
    /// is requested instead.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let mut report = StatusReport::default();

        let (cmd, steer_saturated) = calc_actuation(
            self.tuner.controller_mut(),
            &mut self.speed_pid,
            input_data,
            &self.drive_params
        );
        report.steer_saturated = steer_saturated;

        trace!(
            "Episode tick {}: CTE: {} Speed: {} Angle: {} -> steer: {} throttle: {}",
            self.tuner.tick_count() + 1,
            input_data.cross_track_error,
            input_data.speed,
            input_data.steering_angle,
            cmd.steering_angle,
            cmd.throttle
        );

        match self.tuner.record(input_data.cross_track_error) {
            TunerEvent::Continue => Ok((Outbound::Steer(cmd), report)),
            TunerEvent::EpisodeEnd(episode) => {
                self.speed_pid.reset_errors();

                if episode.transition.is_new_best() {
                    report.new_best = self.tuner.best_gains();
                }

                self.last_episode = Some(episode.clone());
                report.episode = Some(episode);

                Ok((Outbound::Reset, report))
            }
        }
    }
}

impl Archived for TuneCtrl {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(episode) = self.last_episode.take() {
            self.arch_episodes.serialise(episode)?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::gain_tuner::Transition;

    fn tune_ctrl(window_ticks: u32) -> TuneCtrl {
        TuneCtrl::new(
            drive_ctrl::Params::default(),
            &gain_tuner::Params {
                window_ticks,
                ..Default::default()
            }
        )
    }

    fn tlm(cte: f64) -> Telemetry {
        Telemetry {
            cross_track_error: cte,
            speed: 12.0,
            steering_angle: 0.0
        }
    }

    #[test]
    fn test_reset_on_episode_boundary() {
        let window = 5;
        let mut ctrl = tune_ctrl(window);

        for tick in 1..=(3 * 2 * window) {
            let (out, report) = ctrl.proc(&tlm(0.3)).unwrap();

            if tick % (2 * window) == 0 {
                assert_eq!(out, Outbound::Reset, "tick {}", tick);
                assert!(report.episode.is_some());
            }
            else {
                assert!(matches!(out, Outbound::Steer(_)), "tick {}", tick);
                assert!(report.episode.is_none());
                assert!(report.new_best.is_none());
            }
        }

        assert_eq!(ctrl.tuner().num_episodes(), 3);
    }

    #[test]
    fn test_first_episode_is_baseline() {
        let mut ctrl = tune_ctrl(2);

        ctrl.proc(&tlm(1.0)).unwrap();
        ctrl.proc(&tlm(1.0)).unwrap();
        ctrl.proc(&tlm(0.5)).unwrap();
        let (out, report) = ctrl.proc(&tlm(2.0)).unwrap();

        assert_eq!(out, Outbound::Reset);

        let episode = report.episode.unwrap();
        assert_eq!(episode.cost, 0.25 + 4.0);
        assert_eq!(episode.transition, Transition::Baseline);

        let best = report.new_best.unwrap();
        assert_eq!([best.k_p, best.k_i, best.k_d], [0.0, 0.0, 0.0]);
        assert_eq!(ctrl.tuner().controller().gains(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_controllers_cleared_on_reset() {
        let mut ctrl = tune_ctrl(1);

        ctrl.proc(&tlm(1.0)).unwrap();
        assert!(ctrl.speed_pid().is_initialised());

        let (out, _) = ctrl.proc(&tlm(1.0)).unwrap();
        assert_eq!(out, Outbound::Reset);
        assert!(!ctrl.speed_pid().is_initialised());
        assert_eq!(ctrl.speed_pid().integral_error(), 0.0);
        assert!(!ctrl.tuner().controller().is_initialised());
    }

    #[test]
    fn test_speed_gains_from_drive_params() {
        let ctrl = TuneCtrl::default();

        assert_eq!(ctrl.speed_pid().gains(), [0.2, 0.004, 6.0]);
        assert_eq!(ctrl.tuner().controller().gains(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_episode_archived_once() {
        let mut ctrl = tune_ctrl(1);

        ctrl.proc(&tlm(1.0)).unwrap();
        ctrl.proc(&tlm(1.0)).unwrap();
        assert!(ctrl.last_episode.is_some());

        ctrl.write().unwrap();
        assert!(ctrl.last_episode.is_none());
    }
}
