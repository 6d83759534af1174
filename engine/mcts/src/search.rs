//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm, one playout at a time:
//! 1. Selection: descend by selection score, replaying actions on a board copy
//! 2. Evaluation: score terminal positions directly, otherwise ask the evaluator
//! 3. Expansion: add one child per action in the evaluator's priors
//! 4. Backpropagation: update running means along the path, flipping sign per ply

use gomoku_core::{Board, BoardError, GameResult};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::evaluator::{Evaluation, Evaluator, EvaluatorError};
use crate::node::NodeId;
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Invalid evaluator output: {0}")]
    InvalidEvaluatorOutput(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Game is already over: {0:?}")]
    GameOver(GameResult),
}

/// Result of an MCTS search: the root's visit distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionProbabilities {
    /// Root actions that received at least one visit, in root insertion order
    pub actions: Vec<usize>,

    /// Visit share of each action in `actions`
    pub probabilities: Vec<f32>,

    /// Raw visit counts, parallel to `actions`
    pub visit_counts: Vec<u32>,

    /// Value estimate at the root for the player to move
    pub value: f32,

    /// Number of playouts performed
    pub simulations: u32,
}

impl ActionProbabilities {
    /// Iterate (action, probability) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.actions
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    /// Probability of `action`, 0.0 if it was never visited.
    pub fn probability_of(&self, action: usize) -> f32 {
        self.iter()
            .find(|(a, _)| *a == action)
            .map_or(0.0, |(_, p)| p)
    }

    /// Visit count of `action`, 0 if it was never visited.
    pub fn visits_of(&self, action: usize) -> u32 {
        self.actions
            .iter()
            .position(|&a| a == action)
            .map_or(0, |i| self.visit_counts[i])
    }

    /// Most visited action. Ties go to the earlier action.
    pub fn best_action(&self) -> Option<usize> {
        self.actions
            .iter()
            .zip(&self.visit_counts)
            .fold(None, |best: Option<(usize, u32)>, (&action, &visits)| match best {
                Some((_, best_visits)) if visits <= best_visits => best,
                _ => Some((action, visits)),
            })
            .map(|(action, _)| action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// MCTS search state for one top-level decision.
pub struct MctsSearch<'a, E: Evaluator + ?Sized> {
    tree: MctsTree,
    board: &'a Board,
    evaluator: &'a E,
    config: MctsConfig,
}

impl<'a, E: Evaluator + ?Sized> MctsSearch<'a, E> {
    /// Create a new search rooted at `board`.
    ///
    /// Fails if the config is invalid, the game is already decided, or
    /// there is nothing to play.
    pub fn new(board: &'a Board, evaluator: &'a E, config: MctsConfig) -> Result<Self, SearchError> {
        config.validate()?;

        let result = board.check_winner();
        if result.is_terminal() {
            return Err(SearchError::GameOver(result));
        }
        if board.legal_actions().is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        Ok(Self {
            tree: MctsTree::new(),
            board,
            evaluator,
            config,
        })
    }

    /// Run the configured number of playouts and report the root distribution.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<ActionProbabilities, SearchError> {
        let root = self.tree.root();

        // The root is expanded up front; its evaluation is not backed up, so
        // every playout below lands in exactly one root child.
        if self.tree.get(root).is_leaf() {
            let eval = self.evaluate(self.board, rng)?;
            self.tree.expand(root, &eval.priors);
        }

        for _ in 0..self.config.num_simulations {
            self.simulate(rng)?;
        }

        let result = self.result();
        debug!(
            simulations = result.simulations,
            root_value = result.value,
            best_action = ?result.best_action(),
            tree_nodes = self.tree.len(),
            "MCTS search complete"
        );
        Ok(result)
    }

    /// Run a single playout (select -> evaluate/expand -> backpropagate).
    fn simulate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let mut board = self.board.clone();
        let (leaf_id, depth) = self.select(&mut board)?;

        let value = match board.check_winner() {
            // The last move won, so the player to move at the leaf has lost
            GameResult::Win(_) => -1.0,
            GameResult::Draw => 0.0,
            GameResult::InProgress => {
                let eval = self.evaluate(&board, rng)?;
                self.tree.expand(leaf_id, &eval.priors);
                eval.value
            }
        };

        self.tree.backpropagate(leaf_id, value);

        trace!(
            leaf = leaf_id.0,
            depth,
            value,
            "MCTS simulation complete"
        );

        Ok(())
    }

    /// Descend from the root to a leaf, applying each chosen action to `board`.
    ///
    /// At the root, unvisited children are taken in insertion order before
    /// the selection score is consulted.
    fn select(&self, board: &mut Board) -> Result<(NodeId, u32), SearchError> {
        let root = self.tree.root();
        let mut current = root;
        let mut depth = 0;

        loop {
            if self.tree.get(current).is_leaf() {
                break;
            }

            let choice = if current == root {
                self.tree
                    .first_unvisited_child(current)
                    .or_else(|| self.tree.select_child(current, self.config.c_puct))
            } else {
                self.tree.select_child(current, self.config.c_puct)
            };

            match choice {
                Some((action, child_id)) => {
                    board.apply_move(action)?;
                    current = child_id;
                    depth += 1;
                }
                None => break,
            }
        }

        Ok((current, depth))
    }

    /// Ask the evaluator about `board` and check the answer against it.
    fn evaluate(&self, board: &Board, rng: &mut ChaCha20Rng) -> Result<Evaluation, SearchError> {
        let eval = self.evaluator.evaluate(board, rng)?;
        validate_evaluation(&eval, board)?;
        Ok(eval)
    }

    fn result(&self) -> ActionProbabilities {
        let root = self.tree.get(self.tree.root());
        let counts = self.tree.root_visit_counts();
        let total: u32 = counts.iter().map(|(_, n)| n).sum();

        let mut actions = Vec::with_capacity(counts.len());
        let mut probabilities = Vec::with_capacity(counts.len());
        let mut visit_counts = Vec::with_capacity(counts.len());
        for (action, visits) in counts.into_iter().filter(|(_, n)| *n > 0) {
            actions.push(action);
            probabilities.push(visits as f32 / total as f32);
            visit_counts.push(visits);
        }

        ActionProbabilities {
            actions,
            probabilities,
            visit_counts,
            value: root.action_value,
            simulations: root.visit_count,
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree {
        &self.tree
    }
}

/// Check that an evaluation covers exactly the legal actions of `board`
/// with finite, non-negative priors and a value in [-1, 1].
pub fn validate_evaluation(eval: &Evaluation, board: &Board) -> Result<(), SearchError> {
    if !(-1.0..=1.0).contains(&eval.value) {
        return Err(SearchError::InvalidEvaluatorOutput(format!(
            "value {} is outside [-1, 1]",
            eval.value
        )));
    }

    let mut seen = vec![false; board.num_actions()];
    for &(action, prior) in &eval.priors {
        if !board.is_legal(action) {
            return Err(SearchError::InvalidEvaluatorOutput(format!(
                "prior for illegal action {action}"
            )));
        }
        if std::mem::replace(&mut seen[action], true) {
            return Err(SearchError::InvalidEvaluatorOutput(format!(
                "duplicate prior for action {action}"
            )));
        }
        if !prior.is_finite() || prior < 0.0 {
            return Err(SearchError::InvalidEvaluatorOutput(format!(
                "prior {prior} for action {action} is not a probability"
            )));
        }
    }

    if eval.priors.len() != board.legal_actions().len() {
        let missing = board
            .legal_actions()
            .iter()
            .find(|&&a| !seen[a])
            .copied();
        return Err(SearchError::InvalidEvaluatorOutput(format!(
            "priors cover {} of {} legal actions (first missing: {:?})",
            eval.priors.len(),
            board.legal_actions().len(),
            missing
        )));
    }

    Ok(())
}

/// Convenience function to run a single MCTS search.
pub fn run_mcts<E: Evaluator + ?Sized>(
    board: &Board,
    evaluator: &E,
    config: MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<ActionProbabilities, SearchError> {
    let mut search = MctsSearch::new(board, evaluator, config)?;
    search.run(rng)
}
