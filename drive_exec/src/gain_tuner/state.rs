//! Episode bookkeeping for the gain tuner

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use serde::Serialize;

// Internal
use super::{Params, Phase, Transition, TwiddleSearch};
use crate::pid_ctrl::PidController;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tunes the gains of the PID controller it owns.
///
/// Every tick the controller is driven by the caller through
/// [`GainTuner::controller_mut`] and the error is then passed to
/// [`GainTuner::record`].
#[derive(Debug, Clone)]
pub struct GainTuner {
    /// The controller being tuned
    pid: PidController,

    search: TwiddleSearch,

    /// Length of the warm-up and measurement windows
    window_ticks: u32,

    /// Number of completed episodes
    num_episodes: u64,

    /// Sum of squared errors over the measurement window so far
    episode_cost: f64,

    /// Ticks elapsed in the current episode
    tick_count: u32,

    /// Gains which produced the best cost so far
    best_gains: Option<BestGains>,
}

/// Outcome of recording a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TunerEvent {
    /// The episode continues.
    Continue,

    /// This tick ended the episode. The controller has been given new gains
    /// and its errors cleared, the simulation must be reset.
    EpisodeEnd(EpisodeReport),
}

/// Summary of a completed episode and the decision taken on it.
///
/// All values other than `episode` and `cost` are those after the decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeReport {
    /// Episode number, starting at 1
    pub episode: u64,

    /// Sum of squared errors over the measurement window
    pub cost: f64,

    pub best_cost: f64,

    pub transition: Transition,

    pub phase: Phase,

    pub active_index: usize,

    pub k_p: f64,
    pub k_i: f64,
    pub k_d: f64,

    pub step_k_p: f64,
    pub step_k_i: f64,
    pub step_k_d: f64,
}

/// The gains of the lowest cost episode so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestGains {
    /// The episode the gains were evaluated in
    pub episode: u64,

    pub cost: f64,

    pub k_p: f64,
    pub k_i: f64,
    pub k_d: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GainTuner {
    /// Create a new tuner, the controller starts with the initial parameters.
    pub fn new(params: &Params) -> Self {
        let [k_p, k_i, k_d] = params.initial_params;

        Self {
            pid: PidController::new(k_p, k_i, k_d),
            search: TwiddleSearch::new(params.initial_params, params.initial_steps),
            window_ticks: params.window_ticks,
            num_episodes: 0,
            episode_cost: 0.0,
            tick_count: 0,
            best_gains: None,
        }
    }

    /// Record the error observed on this tick.
    ///
    /// Errors in the first window of the episode are ignored, those in the
    /// second window are squared and added to the episode's cost. The tick
    /// which completes the second window ends the episode.
    pub fn record(&mut self, error: f64) -> TunerEvent {
        self.tick_count += 1;

        if self.tick_count > self.window_ticks {
            self.episode_cost += error * error;
        }

        if self.tick_count >= self.window_ticks.saturating_mul(2) {
            TunerEvent::EpisodeEnd(self.end_episode())
        }
        else {
            TunerEvent::Continue
        }
    }

    pub fn controller(&self) -> &PidController {
        &self.pid
    }

    pub fn controller_mut(&mut self) -> &mut PidController {
        &mut self.pid
    }

    pub fn search(&self) -> &TwiddleSearch {
        &self.search
    }

    pub fn window_ticks(&self) -> u32 {
        self.window_ticks
    }

    pub fn num_episodes(&self) -> u64 {
        self.num_episodes
    }

    pub fn episode_cost(&self) -> f64 {
        self.episode_cost
    }

    pub fn tick_count(&self) -> u32 {
        self.tick_count
    }

    /// The best gains found so far, `None` until the first episode ends.
    pub fn best_gains(&self) -> Option<BestGains> {
        self.best_gains
    }

    /// Run the search on the finished episode and prepare the controller
    /// for the next one.
    fn end_episode(&mut self) -> EpisodeReport {
        let cost = self.episode_cost;

        debug!(
            "Before decision: best_cost: {:?}, phase: {:?}, index: {}, params: {:?}, steps: {:?}",
            self.search.best_cost(),
            self.search.phase(),
            self.search.index(),
            self.search.params(),
            self.search.steps()
        );

        let [tested_k_p, tested_k_i, tested_k_d] = self.pid.gains();
        let transition = self.search.transition(cost);

        if transition.is_new_best() {
            self.best_gains = Some(BestGains {
                episode: self.num_episodes + 1,
                cost,
                k_p: tested_k_p,
                k_i: tested_k_i,
                k_d: tested_k_d,
            });
        }

        let [k_p, k_i, k_d] = self.search.params();
        let [step_k_p, step_k_i, step_k_d] = self.search.steps();
        self.pid.set_gains(k_p, k_i, k_d);
        self.pid.reset_errors();

        self.num_episodes += 1;
        self.episode_cost = 0.0;
        self.tick_count = 0;

        let report = EpisodeReport {
            episode: self.num_episodes,
            cost,
            best_cost: self.search.best_cost().unwrap_or(cost),
            transition,
            phase: self.search.phase(),
            active_index: self.search.index(),
            k_p, k_i, k_d,
            step_k_p, step_k_i, step_k_d,
        };

        info!(
            "Episode {} cost {:.6} (best {:.6}), {:?}, next gains: [{}, {}, {}], steps: [{}, {}, {}]",
            report.episode,
            report.cost,
            report.best_cost,
            report.transition,
            k_p, k_i, k_d,
            step_k_p, step_k_i, step_k_d
        );

        report
    }
}

impl Default for GainTuner {
    fn default() -> Self {
        Self::new(&Params::default())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn tuner(window_ticks: u32) -> GainTuner {
        GainTuner::new(&Params {
            window_ticks,
            ..Default::default()
        })
    }

    /// Run a full episode where every tick sees the same error.
    fn run_episode(tuner: &mut GainTuner, error: f64) -> EpisodeReport {
        loop {
            tuner.controller_mut().update(error);
            if let TunerEvent::EpisodeEnd(r) = tuner.record(error) {
                return r
            }
        }
    }

    #[test]
    fn test_defaults() {
        let t = GainTuner::default();

        assert_eq!(t.window_ticks(), 125);
        assert_eq!(t.controller().gains(), [0.0, 0.0, 0.0]);
        assert_eq!(t.search().steps(), [1.0, 1.0, 1.0]);
        assert_eq!(t.search().phase(), Phase::Initial);
    }

    #[test]
    fn test_warm_up_is_not_counted() {
        let mut t = tuner(4);

        for _ in 0..4 {
            assert_eq!(t.record(3.0), TunerEvent::Continue);
        }
        assert_eq!(t.episode_cost(), 0.0);
        assert_eq!(t.tick_count(), 4);

        assert_eq!(t.record(2.0), TunerEvent::Continue);
        assert_eq!(t.episode_cost(), 4.0);
    }

    #[test]
    fn test_boundary_on_last_measurement_tick() {
        let mut t = tuner(3);
        let errors = [9.0, 9.0, 9.0, 1.0, -2.0];

        for e in errors.iter() {
            assert_eq!(t.record(*e), TunerEvent::Continue);
        }

        match t.record(0.5) {
            TunerEvent::EpisodeEnd(r) => {
                assert_eq!(r.episode, 1);
                assert_eq!(r.cost, 1.0 + 4.0 + 0.25);
                assert_eq!(r.best_cost, r.cost);
                assert_eq!(r.transition, Transition::Baseline);
                assert_eq!(r.phase, Phase::Increased);
                assert_eq!(r.active_index, 0);
                assert_eq!([r.k_p, r.k_i, r.k_d], [1.0, 0.0, 0.0]);
            },
            e => panic!("Expected the episode to end, got {:?}", e)
        }

        assert_eq!(t.tick_count(), 0);
        assert_eq!(t.episode_cost(), 0.0);
        assert_eq!(t.num_episodes(), 1);
    }

    #[test]
    fn test_boundary_updates_and_resets_controller() {
        let mut t = tuner(2);

        let r = run_episode(&mut t, 0.5);

        assert_eq!(t.controller().gains(), [r.k_p, r.k_i, r.k_d]);
        assert!(!t.controller().is_initialised());
        assert_eq!(t.controller().integral_error(), 0.0);
        assert_eq!(t.controller().differential_error(), 0.0);
    }

    #[test]
    fn test_episode_sequence_follows_search() {
        let mut t = tuner(1);

        // Window of one tick means each episode is two ticks, cost is the
        // square of the second error.
        let r1 = run_episode(&mut t, 10f64.sqrt());
        let r2 = run_episode(&mut t, 8f64.sqrt());
        let r3 = run_episode(&mut t, 3.0);

        assert_eq!(r1.transition, Transition::Baseline);
        assert_eq!(r2.transition, Transition::IncreaseImproved);
        assert_eq!(r3.transition, Transition::IncreaseWorse);

        assert_eq!(r3.episode, 3);
        assert_eq!(r3.phase, Phase::Decreased);
        assert_eq!(r3.active_index, 1);
        assert_eq!([r3.k_p, r3.k_i, r3.k_d], [1.0, -1.0, 0.0]);
        assert_eq!(t.controller().gains(), [1.0, -1.0, 0.0]);
        assert!((r3.step_k_p - 1.1).abs() < 1e-12);
        assert!((r3.best_cost - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_gains_are_the_tested_gains() {
        let mut t = tuner(1);
        assert_eq!(t.best_gains(), None);

        run_episode(&mut t, 2.0);
        let best = t.best_gains().unwrap();
        assert_eq!(best.episode, 1);
        assert_eq!([best.k_p, best.k_i, best.k_d], [0.0, 0.0, 0.0]);

        // Episode 2 runs with k_p = 1 and improves
        run_episode(&mut t, 1.0);
        let best = t.best_gains().unwrap();
        assert_eq!(best.episode, 2);
        assert_eq!(best.cost, 1.0);
        assert_eq!([best.k_p, best.k_i, best.k_d], [1.0, 0.0, 0.0]);

        // Episode 3 runs with k_i = 1 and is worse, the best is unchanged
        run_episode(&mut t, 3.0);
        assert_eq!(t.best_gains().unwrap().episode, 2);
    }
}
