//! Evaluator trait for position evaluation.
//!
//! The evaluator provides move priors and a value estimate for the player to
//! move. The rollout evaluator estimates the value by random play; a learned
//! model plugs in through [`FnEvaluator`] or its own `Evaluator` impl.

use gomoku_core::{outcome_value, Board};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result of evaluating a position.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// (action, prior) pairs, one per legal action.
    /// Priors are expected to sum to ~1.0.
    pub priors: Vec<(usize, f32)>,

    /// Value estimate for the player to move.
    /// Range: -1.0 (certain loss) to +1.0 (certain win).
    pub value: f32,
}

impl Evaluation {
    /// Equal priors over every legal action of `board`.
    pub fn uniform(board: &Board, value: f32) -> Self {
        let legal = board.legal_actions();
        let prob = if legal.is_empty() {
            0.0
        } else {
            1.0 / legal.len() as f32
        };
        Self {
            priors: legal.iter().map(|&a| (a, prob)).collect(),
            value,
        }
    }
}

/// Trait for position evaluators.
///
/// Implementations:
/// - UniformEvaluator: uniform priors, neutral value (for testing)
/// - RolloutEvaluator: uniform priors, value from one random playout
/// - FnEvaluator: any closure, e.g. a policy/value model
pub trait Evaluator: Send + Sync {
    /// Evaluate a non-terminal position.
    ///
    /// `rng` is the search's generator; evaluators that need randomness draw
    /// from it so searches stay reproducible.
    fn evaluate(&self, board: &Board, rng: &mut ChaCha20Rng) -> Result<Evaluation, EvaluatorError>;
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn evaluate(&self, board: &Board, rng: &mut ChaCha20Rng) -> Result<Evaluation, EvaluatorError> {
        (**self).evaluate(board, rng)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&self, board: &Board, rng: &mut ChaCha20Rng) -> Result<Evaluation, EvaluatorError> {
        (**self).evaluate(board, rng)
    }
}

/// Uniform evaluator that assigns equal probability to all legal moves.
/// Value is always 0.0 (neutral). Useful for testing MCTS without a model.
#[derive(Debug, Clone, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, board: &Board, _rng: &mut ChaCha20Rng) -> Result<Evaluation, EvaluatorError> {
        Ok(Evaluation::uniform(board, 0.0))
    }
}

/// Random rollout evaluator: uniform priors, and a value found by playing
/// uniformly random legal moves until the game ends.
#[derive(Debug, Clone, Default)]
pub struct RolloutEvaluator {
    /// Maximum rollout length; `None` means one move per board cell.
    pub max_moves: Option<usize>,
}

impl RolloutEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_moves(max_moves: usize) -> Self {
        Self {
            max_moves: Some(max_moves),
        }
    }

    /// Play random moves on a copy of `board` and score the outcome for
    /// the player to move at `board`. A rollout cut off before the end
    /// scores 0.
    pub fn rollout(&self, board: &Board, rng: &mut ChaCha20Rng) -> Result<f32, EvaluatorError> {
        let perspective = board.current_player();
        let limit = self.max_moves.unwrap_or_else(|| board.num_actions());

        let mut sim = board.clone();
        let mut result = sim.check_winner();
        let mut moves = 0;

        while !result.is_terminal() && moves < limit {
            let action = *sim
                .legal_actions()
                .choose(rng)
                .ok_or_else(|| EvaluatorError::InvalidState("no legal moves in rollout".into()))?;
            sim.apply_move(action)
                .map_err(|e| EvaluatorError::InvalidState(e.to_string()))?;
            result = sim.check_winner();
            moves += 1;
        }

        Ok(outcome_value(result, perspective))
    }
}

impl Evaluator for RolloutEvaluator {
    fn evaluate(&self, board: &Board, rng: &mut ChaCha20Rng) -> Result<Evaluation, EvaluatorError> {
        let value = self.rollout(board, rng)?;
        Ok(Evaluation::uniform(board, value))
    }
}

/// Evaluator backed by a closure, for guided search with an external model.
///
/// ```
/// use gomoku_core::Board;
/// use mcts::{Evaluation, FnEvaluator};
///
/// let evaluator = FnEvaluator::new(|board: &Board| Ok(Evaluation::uniform(board, 0.1)));
/// # let _ = evaluator;
/// ```
pub struct FnEvaluator<F> {
    func: F,
}

impl<F> FnEvaluator<F>
where
    F: Fn(&Board) -> Result<Evaluation, EvaluatorError> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> std::fmt::Debug for FnEvaluator<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnEvaluator").finish_non_exhaustive()
    }
}

impl<F> Evaluator for FnEvaluator<F>
where
    F: Fn(&Board) -> Result<Evaluation, EvaluatorError> + Send + Sync,
{
    fn evaluate(&self, board: &Board, _rng: &mut ChaCha20Rng) -> Result<Evaluation, EvaluatorError> {
        (self.func)(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_core::Player;
    use rand::SeedableRng;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(42)
    }

    #[test]
    fn test_uniform_evaluator() {
        let eval = UniformEvaluator::new();
        let mut board = Board::new(3, 3, 3).unwrap();
        for action in [0, 4, 8, 2, 6] {
            board.apply_move(action).unwrap();
        }

        let result = eval.evaluate(&board, &mut rng()).unwrap();

        let actions: Vec<usize> = result.priors.iter().map(|(a, _)| *a).collect();
        assert_eq!(actions, vec![1, 3, 5, 7]);
        for (_, p) in &result.priors {
            assert!((p - 0.25).abs() < 1e-6);
        }
        assert!(result.value.abs() < 1e-6);
    }

    #[test]
    fn test_uniform_evaluation_on_full_board() {
        let mut board = Board::new(1, 1, 1).unwrap();
        board.apply_move(0).unwrap();

        let result = Evaluation::uniform(&board, 0.0);
        assert!(result.priors.is_empty());
    }

    #[test]
    fn test_rollout_value_range() {
        let eval = RolloutEvaluator::new();
        let board = Board::new(5, 5, 4).unwrap();
        let mut rng = rng();

        for _ in 0..20 {
            let result = eval.evaluate(&board, &mut rng).unwrap();
            assert_eq!(result.priors.len(), 25);
            assert!(
                result.value == 1.0 || result.value == 0.0 || result.value == -1.0,
                "unexpected rollout value {}",
                result.value
            );
        }
    }

    #[test]
    fn test_rollout_forced_win_for_player_to_move() {
        // X X .
        // O O X    X to move, cell 2 is the only legal move and wins
        // O X O
        let mut board = Board::new(3, 3, 3).unwrap();
        for action in [0, 3, 1, 4, 5, 6, 7, 8] {
            board.apply_move(action).unwrap();
        }
        assert_eq!(board.current_player(), Player::Black);
        assert_eq!(board.legal_actions(), &[2]);

        let value = RolloutEvaluator::new().rollout(&board, &mut rng()).unwrap();
        assert!((value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rollout_cut_off_is_neutral() {
        let board = Board::new(5, 5, 5).unwrap();
        let value = RolloutEvaluator::with_max_moves(0)
            .rollout(&board, &mut rng())
            .unwrap();
        assert!(value.abs() < 1e-6);
    }

    #[test]
    fn test_rollout_is_deterministic_for_seed() {
        let eval = RolloutEvaluator::new();
        let board = Board::new(6, 6, 4).unwrap();

        let a: Vec<f32> = {
            let mut rng = rng();
            (0..10).map(|_| eval.rollout(&board, &mut rng).unwrap()).collect()
        };
        let b: Vec<f32> = {
            let mut rng = rng();
            (0..10).map(|_| eval.rollout(&board, &mut rng).unwrap()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_rollout_leaves_board_untouched() {
        let board = Board::new(4, 4, 3).unwrap();
        let before = board.clone();
        RolloutEvaluator::new().rollout(&board, &mut rng()).unwrap();
        assert_eq!(board.legal_actions(), before.legal_actions());
        assert_eq!(board.moves_played(), 0);
    }

    #[test]
    fn test_fn_evaluator() {
        let eval = FnEvaluator::new(|board: &Board| {
            if board.moves_played() > 2 {
                return Err(EvaluatorError::EvaluationFailed("too deep".into()));
            }
            Ok(Evaluation::uniform(board, 0.5))
        });

        let mut board = Board::new(3, 3, 3).unwrap();
        let result = eval.evaluate(&board, &mut rng()).unwrap();
        assert!((result.value - 0.5).abs() < 1e-6);

        for action in [0, 1, 2] {
            board.apply_move(action).unwrap();
        }
        assert!(matches!(
            eval.evaluate(&board, &mut rng()),
            Err(EvaluatorError::EvaluationFailed(_))
        ));
    }

    #[test]
    fn test_boxed_evaluator() {
        let eval: Box<dyn Evaluator> = Box::new(UniformEvaluator::new());
        let board = Board::new(3, 3, 3).unwrap();
        assert_eq!(eval.evaluate(&board, &mut rng()).unwrap().priors.len(), 9);
    }
}
