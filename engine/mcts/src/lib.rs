//! Monte Carlo Tree Search (MCTS) for two-player n-in-a-row games.
//!
//! # Overview
//!
//! MCTS builds a search tree by running playouts. Each playout consists of
//! four phases:
//!
//! 1. **Selection**: descend from the root, choosing the child maximising
//!    `-Q(child) + c_puct * P(child) / (1 + N(child))`
//! 2. **Evaluation**: a won position scores -1 for the player to move, a draw
//!    scores 0, anything else is handed to the [`Evaluator`]
//! 3. **Expansion**: the evaluated leaf gets one child per legal action,
//!    carrying the evaluator's prior
//! 4. **Backpropagation**: every node on the path folds the value into its
//!    running mean, with the sign flipped at each ply
//!
//! Values are always stored from the point of view of the player to move at
//! the node.
//!
//! # Usage
//!
//! ```rust
//! use gomoku_core::Board;
//! use mcts::{MctsConfig, Planner};
//!
//! let mut board = Board::new(3, 3, 3).unwrap();
//! for action in [0, 3, 1, 4] {
//!     board.apply_move(action).unwrap();
//! }
//!
//! let mut planner = Planner::rollout(MctsConfig::for_testing().with_simulations(200));
//! let probs = planner.get_action_probabilities(&board).unwrap();
//!
//! assert_eq!(probs.best_action(), Some(2));
//! board.apply_move(2).unwrap();
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_simulations`: playouts per search (default: 400)
//! - `c_puct`: exploration constant (default: 5.0)
//! - `temperature`: move selection temperature (1.0 = proportional, 0.0 = greedy)
//! - `dirichlet_alpha` / `dirichlet_epsilon`: exploration noise for [`MctsPlayer`]
//! - `seed`: RNG seed; equal seeds give equal searches
//!
//! # Evaluators
//!
//! - [`RolloutEvaluator`]: uniform priors, value from a random playout
//! - [`UniformEvaluator`]: uniform priors, value 0 (for testing)
//! - [`FnEvaluator`]: wraps a closure, e.g. a policy/value model
//!
//! # Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                      MctsPlayer                             |
//! |   temperature / Dirichlet noise -> chosen move              |
//! +------------------------------+------------------------------+
//!                                |
//! +------------------------------v------------------------------+
//! |                        Planner                              |
//! |   evaluator + config + seeded ChaCha20Rng                   |
//! +------------------------------+------------------------------+
//!                                |
//! +------------------------------v------------------------------+
//! |                       MctsSearch                            |
//! |  +-------------+  +-------------+  +---------------------+  |
//! |  |  MctsTree   |  | Board copy  |  |     Evaluator       |  |
//! |  |  (arena)    |  | per playout |  |  (priors / value)   |  |
//! |  +-------------+  +-------------+  +---------------------+  |
//! +-------------------------------------------------------------+
//! ```

pub mod config;
pub mod evaluator;
pub mod node;
pub mod planner;
pub mod player;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use evaluator::{
    Evaluation, Evaluator, EvaluatorError, FnEvaluator, RolloutEvaluator, UniformEvaluator,
};
pub use node::{MctsNode, NodeId};
pub use planner::Planner;
pub use player::{MctsPlayer, MoveChoice};
pub use search::{run_mcts, validate_evaluation, ActionProbabilities, MctsSearch, SearchError};
pub use tree::{MctsTree, TreeStats};
