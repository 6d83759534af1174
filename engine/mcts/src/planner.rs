//! Planner facade: an evaluator, a config and a seeded RNG bundled together.
//!
//! Each call builds a fresh tree; nothing is carried over between decisions.

use gomoku_core::Board;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, RolloutEvaluator};
use crate::search::{ActionProbabilities, MctsSearch, SearchError};

/// Runs searches with a fixed evaluator.
#[derive(Debug)]
pub struct Planner<E: Evaluator> {
    evaluator: E,
    config: MctsConfig,
    rng: ChaCha20Rng,
}

impl Planner<RolloutEvaluator> {
    /// Planner with uniform priors and random-playout values.
    pub fn rollout(config: MctsConfig) -> Self {
        Self::new(RolloutEvaluator::new(), config)
    }
}

impl<E: Evaluator> Planner<E> {
    pub fn new(evaluator: E, config: MctsConfig) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(config.seed);
        Self {
            evaluator,
            config,
            rng,
        }
    }

    /// Planner driven by an external evaluator such as a policy/value model.
    pub fn guided(evaluator: E, config: MctsConfig) -> Self {
        Self::new(evaluator, config)
    }

    /// Search from `board` and return the root visit distribution.
    ///
    /// `board` is only read; playouts run on copies.
    pub fn get_action_probabilities(
        &mut self,
        board: &Board,
    ) -> Result<ActionProbabilities, SearchError> {
        let mut search = MctsSearch::new(board, &self.evaluator, self.config.clone())?;
        search.run(&mut self.rng)
    }

    /// Re-seed the RNG from the config so the next search repeats the first.
    pub fn reset(&mut self) {
        self.rng = ChaCha20Rng::seed_from_u64(self.config.seed);
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Replace the config; the RNG is re-seeded from the new seed.
    pub fn set_config(&mut self, config: MctsConfig) {
        self.config = config;
        self.reset();
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}
