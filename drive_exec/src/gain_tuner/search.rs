//! Coordinate ascent ("twiddle") search state machine

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{NUM_PARAMS, STEP_SCALE};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Which perturbation of the active parameter is waiting to be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// No episode has completed yet, so there is no cost to compare against.
    Initial,

    /// The active parameter was last moved up by its step.
    Increased,

    /// The active parameter was last moved down by its step.
    Decreased,
}

/// The branch taken at an episode boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transition {
    /// The first episode's cost becomes the baseline and the first parameter
    /// is increased.
    Baseline,

    /// Increasing the parameter lowered the cost. The step grows and the next
    /// parameter is increased.
    IncreaseImproved,

    /// Increasing the parameter did not lower the cost, try decreasing it
    /// instead.
    IncreaseWorse,

    /// Decreasing the parameter lowered the cost. The step flips sign and
    /// grows, and the next parameter is increased.
    DecreaseImproved,

    /// Neither direction helped. The parameter is restored, the step shrinks,
    /// and the next parameter is increased.
    DecreaseWorse,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State of the twiddle search over `[k_p, k_i, k_d]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwiddleSearch {
    /// Current candidate parameters
    params: [f64; NUM_PARAMS],

    /// Perturbation size for each parameter
    steps: [f64; NUM_PARAMS],

    /// The parameter currently being perturbed
    index: usize,

    phase: Phase,

    /// Lowest cost seen so far, `None` until the first episode completes
    best_cost: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Transition {
    /// Select the branch for the given phase.
    ///
    /// `improved` must only be true if the episode's cost was strictly lower
    /// than the best cost so far.
    pub fn select(phase: Phase, improved: bool) -> Self {
        match (phase, improved) {
            (Phase::Initial, _) => Transition::Baseline,
            (Phase::Increased, true) => Transition::IncreaseImproved,
            (Phase::Increased, false) => Transition::IncreaseWorse,
            (Phase::Decreased, true) => Transition::DecreaseImproved,
            (Phase::Decreased, false) => Transition::DecreaseWorse,
        }
    }

    /// True if this branch set a new best cost.
    pub fn is_new_best(&self) -> bool {
        matches!(
            self,
            Transition::Baseline
            | Transition::IncreaseImproved
            | Transition::DecreaseImproved
        )
    }
}

impl TwiddleSearch {
    /// Start a new search from the given parameters and step sizes.
    pub fn new(params: [f64; NUM_PARAMS], steps: [f64; NUM_PARAMS]) -> Self {
        Self {
            params,
            steps,
            index: 0,
            phase: Phase::Initial,
            best_cost: None,
        }
    }

    /// Evaluate the cost of the episode that has just finished and move to
    /// the next candidate parameters.
    pub fn transition(&mut self, cost: f64) -> Transition {
        let improved = self.best_cost.map_or(false, |best| cost < best);
        let transition = Transition::select(self.phase, improved);

        match transition {
            Transition::Baseline => {
                self.best_cost = Some(cost);
                self.index = 0;
                self.increase_active();
            },
            Transition::IncreaseImproved => {
                self.best_cost = Some(cost);
                self.steps[self.index] *= STEP_SCALE;
                self.advance();
            },
            Transition::IncreaseWorse => {
                self.phase = Phase::Decreased;
                self.params[self.index] -= 2.0 * self.steps[self.index];
            },
            Transition::DecreaseImproved => {
                self.best_cost = Some(cost);
                self.steps[self.index] *= -STEP_SCALE;
                self.advance();
            },
            Transition::DecreaseWorse => {
                self.params[self.index] += self.steps[self.index];
                self.steps[self.index] /= STEP_SCALE;
                self.advance();
            },
        }

        transition
    }

    /// Current candidate parameters `[k_p, k_i, k_d]`.
    pub fn params(&self) -> [f64; NUM_PARAMS] {
        self.params
    }

    pub fn steps(&self) -> [f64; NUM_PARAMS] {
        self.steps
    }

    /// Index of the parameter currently being perturbed.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn best_cost(&self) -> Option<f64> {
        self.best_cost
    }

    /// Move on to the next parameter and increase it.
    fn advance(&mut self) {
        self.index = (self.index + 1) % NUM_PARAMS;
        self.increase_active();
    }

    fn increase_active(&mut self) {
        self.phase = Phase::Increased;
        self.params[self.index] += self.steps[self.index];
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn assert_close(actual: [f64; NUM_PARAMS], expected: [f64; NUM_PARAMS]) {
        for i in 0..NUM_PARAMS {
            assert!(
                (actual[i] - expected[i]).abs() < 1e-12,
                "{:?} != {:?}",
                actual,
                expected
            );
        }
    }

    fn fresh() -> TwiddleSearch {
        TwiddleSearch::new([0.0; NUM_PARAMS], [1.0; NUM_PARAMS])
    }

    #[test]
    fn test_select() {
        assert_eq!(Transition::select(Phase::Initial, false), Transition::Baseline);
        assert_eq!(Transition::select(Phase::Initial, true), Transition::Baseline);
        assert_eq!(Transition::select(Phase::Increased, true), Transition::IncreaseImproved);
        assert_eq!(Transition::select(Phase::Increased, false), Transition::IncreaseWorse);
        assert_eq!(Transition::select(Phase::Decreased, true), Transition::DecreaseImproved);
        assert_eq!(Transition::select(Phase::Decreased, false), Transition::DecreaseWorse);

        assert!(Transition::Baseline.is_new_best());
        assert!(Transition::DecreaseImproved.is_new_best());
        assert!(!Transition::IncreaseWorse.is_new_best());
        assert!(!Transition::DecreaseWorse.is_new_best());
    }

    #[test]
    fn test_baseline() {
        let mut s = fresh();
        assert_eq!(s.phase(), Phase::Initial);
        assert_eq!(s.best_cost(), None);

        assert_eq!(s.transition(10.0), Transition::Baseline);
        assert_eq!(s.best_cost(), Some(10.0));
        assert_eq!(s.params(), [1.0, 0.0, 0.0]);
        assert_eq!(s.steps(), [1.0, 1.0, 1.0]);
        assert_eq!(s.phase(), Phase::Increased);
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn test_scripted_table() {
        let mut s = fresh();

        s.transition(10.0);

        // Improved while increased
        assert_eq!(s.transition(8.0), Transition::IncreaseImproved);
        assert_eq!(s.best_cost(), Some(8.0));
        assert_close(s.steps(), [1.1, 1.0, 1.0]);
        assert_eq!(s.index(), 1);
        assert_eq!(s.params(), [1.0, 1.0, 0.0]);
        assert_eq!(s.phase(), Phase::Increased);

        // Worse while increased
        assert_eq!(s.transition(9.0), Transition::IncreaseWorse);
        assert_eq!(s.best_cost(), Some(8.0));
        assert_eq!(s.phase(), Phase::Decreased);
        assert_eq!(s.index(), 1);
        assert_eq!(s.params(), [1.0, -1.0, 0.0]);

        // Improved while decreased
        assert_eq!(s.transition(7.0), Transition::DecreaseImproved);
        assert_eq!(s.best_cost(), Some(7.0));
        assert_close(s.steps(), [1.1, -1.1, 1.0]);
        assert_eq!(s.index(), 2);
        assert_eq!(s.params(), [1.0, -1.0, 1.0]);
        assert_eq!(s.phase(), Phase::Increased);

        // An equal cost is not an improvement
        assert_eq!(s.transition(7.0), Transition::IncreaseWorse);
        assert_eq!(s.params(), [1.0, -1.0, -1.0]);
        assert_eq!(s.phase(), Phase::Decreased);

        // Worse while decreased, restore and shrink then wrap to the first parameter
        assert_eq!(s.transition(12.0), Transition::DecreaseWorse);
        assert_eq!(s.best_cost(), Some(7.0));
        assert_close(s.steps(), [1.1, -1.1, 1.0 / 1.1]);
        assert_eq!(s.index(), 0);
        assert_close(s.params(), [2.1, -1.0, 0.0]);
        assert_eq!(s.phase(), Phase::Increased);
    }

    #[test]
    fn test_flipped_step_moves_other_way() {
        let mut s = fresh();
        s.transition(10.0);
        s.transition(11.0);
        s.transition(5.0);

        // Step 0 has flipped, so the next time parameter 0 is increased it moves down
        assert_close(s.steps(), [-1.1, 1.0, 1.0]);
        assert_close(s.params(), [-1.0, 1.0, 0.0]);

        s.transition(6.0);
        s.transition(6.0);
        s.transition(6.0);
        s.transition(6.0);
        assert_eq!(s.index(), 0);
        assert_close(s.params(), [-2.1, 0.0, 0.0]);
    }

    #[test]
    fn test_nan_cost_is_never_an_improvement() {
        let mut s = fresh();
        s.transition(10.0);

        assert_eq!(s.transition(f64::NAN), Transition::IncreaseWorse);
        assert_eq!(s.transition(f64::NAN), Transition::DecreaseWorse);
        assert_eq!(s.best_cost(), Some(10.0));
    }

    #[test]
    fn test_steps_never_reach_zero() {
        let mut s = fresh();
        s.transition(1.0);

        // Nothing ever improves so every step keeps shrinking
        for _ in 0..3000 {
            s.transition(2.0);
            for step in s.steps().iter() {
                assert!(*step != 0.0);
            }
        }

        assert!(s.steps().iter().all(|s| s.abs() < 1e-10));
    }
}
