//! Turns a planner's visit distribution into a move.

use gomoku_core::Board;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Gamma};
use tracing::debug;

use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, RolloutEvaluator};
use crate::planner::Planner;
use crate::search::{ActionProbabilities, SearchError};

/// Offset between the planner's seed and the move-sampling seed.
const MOVE_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Chosen move together with the search it came from.
#[derive(Debug, Clone)]
pub struct MoveChoice {
    pub action: usize,
    /// Distribution the move was drawn from (after temperature and noise)
    pub move_probabilities: Vec<(usize, f32)>,
    pub search: ActionProbabilities,
}

/// Plays moves with MCTS.
///
/// Temperature 0 picks the most visited action. Otherwise the move is
/// sampled from visit counts raised to `1 / temperature`, optionally mixed
/// with Dirichlet noise.
#[derive(Debug)]
pub struct MctsPlayer<E: Evaluator> {
    planner: Planner<E>,
    rng: ChaCha20Rng,
}

impl MctsPlayer<RolloutEvaluator> {
    pub fn rollout(config: MctsConfig) -> Self {
        Self::new(Planner::rollout(config))
    }
}

impl<E: Evaluator> MctsPlayer<E> {
    pub fn new(planner: Planner<E>) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(planner.config().seed ^ MOVE_SEED_OFFSET);
        Self { planner, rng }
    }

    pub fn planner(&self) -> &Planner<E> {
        &self.planner
    }

    /// Re-seed both the planner and the move sampler.
    pub fn reset(&mut self) {
        self.planner.reset();
        self.rng = ChaCha20Rng::seed_from_u64(self.planner.config().seed ^ MOVE_SEED_OFFSET);
    }

    /// Search `board` and pick a move without playing it.
    pub fn choose_action(&mut self, board: &Board) -> Result<MoveChoice, SearchError> {
        let search = self.planner.get_action_probabilities(board)?;
        if search.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        let config = self.planner.config();
        let mut move_probabilities = apply_temperature(&search, config.temperature);

        if config.uses_noise() {
            let noise = dirichlet_noise(
                move_probabilities.len(),
                config.dirichlet_alpha,
                &mut self.rng,
            )?;
            let eps = config.dirichlet_epsilon;
            for ((_, p), n) in move_probabilities.iter_mut().zip(noise) {
                *p = (1.0 - eps) * *p + eps * n;
            }
        }

        let action = if config.temperature < 1e-6 && !config.uses_noise() {
            search.best_action().ok_or(SearchError::NoLegalMoves)?
        } else {
            let probs: Vec<f32> = move_probabilities.iter().map(|(_, p)| *p).collect();
            move_probabilities[sample_index(&probs, &mut self.rng)?].0
        };

        debug!(
            action,
            root_value = search.value,
            visits = search.visits_of(action),
            "MCTS move chosen"
        );

        Ok(MoveChoice {
            action,
            move_probabilities,
            search,
        })
    }

    /// Choose a move and apply it to `board`.
    pub fn play(&mut self, board: &mut Board) -> Result<MoveChoice, SearchError> {
        let choice = self.choose_action(board)?;
        board.apply_move(choice.action)?;
        Ok(choice)
    }
}

/// Visit counts raised to `1 / temperature` and normalised.
///
/// Temperature 0 puts all mass on the most visited action.
fn apply_temperature(search: &ActionProbabilities, temperature: f32) -> Vec<(usize, f32)> {
    if temperature < 1e-6 {
        let best = search.best_action();
        return search
            .actions
            .iter()
            .map(|&a| (a, if Some(a) == best { 1.0 } else { 0.0 }))
            .collect();
    }

    // Work in log space; visits^(1/T) overflows f32 for small T
    let logits: Vec<f32> = search
        .visit_counts
        .iter()
        .map(|&n| (n as f32).ln() / temperature)
        .collect();
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let weights: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f32 = weights.iter().sum();

    search
        .actions
        .iter()
        .zip(weights)
        .map(|(&a, w)| (a, w / total))
        .collect()
}

/// Sample an index from a probability distribution.
fn sample_index(probs: &[f32], rng: &mut ChaCha20Rng) -> Result<usize, SearchError> {
    let r: f32 = rng.gen();
    let mut cumsum = 0.0;

    for (i, &p) in probs.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return Ok(i);
        }
    }

    // Fallback to last non-zero entry (handles floating point issues)
    probs
        .iter()
        .rposition(|&p| p > 0.0)
        .ok_or(SearchError::NoLegalMoves)
}

/// Generate Dirichlet-distributed noise using Gamma variates.
fn dirichlet_noise(n: usize, alpha: f32, rng: &mut ChaCha20Rng) -> Result<Vec<f32>, SearchError> {
    let gamma = Gamma::new(alpha as f64, 1.0)
        .map_err(|e| SearchError::InvalidConfig(format!("dirichlet_alpha {alpha}: {e}")))?;
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    let sum: f32 = samples.iter().sum();
    if sum > 0.0 {
        for s in &mut samples {
            *s /= sum;
        }
    } else if n > 0 {
        samples.fill(1.0 / n as f32);
    }

    Ok(samples)
}
