//! Core board types for two-player n-in-a-row games (Gomoku, Tic-Tac-Toe
//! and friends) on a rectangular grid.
//!
//! This crate provides:
//! - `Board`: cell occupancy, legal actions, move application and win/draw
//!   detection around the last move
//! - `FeaturePlanes`: a plane-stack encoding of a position for learned evaluators
//! - `outcome_value`: maps a finished game to +1 / 0 / -1 for one player
//!
//! # Usage
//!
//! ```rust
//! use gomoku_core::{Board, GameResult, Player};
//!
//! let mut board = Board::new(3, 3, 3).unwrap();
//! for action in [0, 3, 1, 4, 2] {
//!     board.apply_move(action).unwrap();
//! }
//! assert_eq!(board.check_winner(), GameResult::Win(Player::Black));
//! ```

pub mod board;
pub mod error;
pub mod game_utils;
pub mod observation;

// Re-export main types for convenience
pub use board::{Board, Cell, GameResult, Player};
pub use error::BoardError;
pub use game_utils::outcome_value;
pub use observation::{FeaturePlanes, NUM_PLANES};
