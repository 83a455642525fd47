//! ε-greedy exploration with a step-based decay schedule

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    error::Error,
    q_learning::q_table::tie_broken_argmax,
    types::Action,
};

/// Linear decay of the exploration rate over a fixed number of steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    pub start: f64,
    pub end: f64,
    pub decay_steps: u64,
}

impl EpsilonSchedule {
    pub fn new(start: f64, end: f64, decay_steps: u64) -> Self {
        Self {
            start,
            end,
            decay_steps,
        }
    }

    /// Exploration probability after `step` training selections.
    ///
    /// Interpolates linearly from `start` to `end` over `decay_steps` steps
    /// and stays at `end` from then on.
    pub fn epsilon(&self, step: u64) -> f64 {
        if step >= self.decay_steps {
            return self.end;
        }
        let frac = step as f64 / self.decay_steps.max(1) as f64;
        self.start + frac * (self.end - self.start)
    }
}

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Action selector owning the step counter and the random source.
///
/// Training selections go through [`EpsilonScheduler::next_action`], which
/// advances the step exactly once per call. Policy playback goes through
/// [`EpsilonScheduler::exploit`], which leaves the schedule untouched.
#[derive(Debug, Clone)]
pub struct EpsilonScheduler {
    schedule: EpsilonSchedule,
    step: u64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl EpsilonScheduler {
    pub fn new(schedule: EpsilonSchedule, seed: Option<u64>) -> Self {
        Self {
            schedule,
            step: 0,
            rng: build_rng(seed),
            rng_seed: seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn schedule(&self) -> EpsilonSchedule {
        self.schedule
    }

    /// Number of training selections made so far.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Restore a step counter read back from storage.
    pub(crate) fn set_step(&mut self, step: u64) {
        self.step = step;
    }

    /// Current exploration probability.
    pub fn epsilon(&self) -> f64 {
        self.schedule.epsilon(self.step)
    }

    /// ε-greedy action selection for training.
    ///
    /// `q_values[i]` is the estimate for `candidates[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] if there are no candidates.
    pub fn next_action(&mut self, candidates: &[Action], q_values: &[f64]) -> Result<Action> {
        if candidates.is_empty() {
            return Err(Error::EmptyActionSet);
        }

        let epsilon = self.epsilon();
        self.step += 1;

        if self.rng.random::<f64>() < epsilon {
            // Explore: random action
            let action = candidates.choose(&mut self.rng).ok_or(Error::EmptyActionSet)?;
            log::debug!("explore (ε={epsilon:.3}) -> {action}");
            Ok(action.clone())
        } else {
            // Exploit: greedy action based on Q-values
            let (action, value) = tie_broken_argmax(candidates, q_values, &mut self.rng)?;
            log::debug!("exploit (ε={epsilon:.3}) -> {action} ({value:.4})");
            Ok(action)
        }
    }

    /// Greedy selection for policy playback; never explores or advances the step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyActionSet`] if there are no candidates.
    pub fn exploit(&mut self, candidates: &[Action], q_values: &[f64]) -> Result<Action> {
        tie_broken_argmax(candidates, q_values, &mut self.rng).map(|(action, _)| action)
    }

    /// Mutable access to the random source, for table-level tie-breaking.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Explicit re-initialisation: step back to zero, random source reseeded.
    pub fn reset(&mut self) {
        self.step = 0;
        self.rng = build_rng(self.rng_seed);
    }
}
