//! N-in-a-row board.
//!
//! The board is stored in row-major order, action `row * width + col`:
//! ```text
//! 3x3 board:
//!   [0][1][2]
//!   [3][4][5]
//!   [6][7][8]
//! ```
//!
//! Win detection only looks at the four lines through the most recent move,
//! so checking a position costs O(win_length) instead of a full board scan.

use std::fmt;

use gomoku_config::BoardConfig;
use tracing::debug;

use crate::error::BoardError;

/// One of the two players. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

/// Occupancy of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// The player occupying this cell, if any.
    #[inline]
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// Result of inspecting a position with [`Board::check_winner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// Moves remain and nobody has completed a line.
    InProgress,
    /// The given player completed a line with the last move.
    Win(Player),
    /// The board is full and nobody won.
    Draw,
}

impl GameResult {
    /// Whether the game is over (win or draw).
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameResult::InProgress)
    }

    /// The winning player. `None` for draws and unfinished games.
    #[inline]
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Win(player) => Some(player),
            _ => None,
        }
    }
}

/// Line directions as (row step, column step):
/// horizontal, vertical, main diagonal, anti-diagonal.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Mutable game state on a fixed-size grid.
///
/// Cloning is a plain copy of the cell and legal-action vectors; search code
/// relies on that to play out simulations without touching the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    win_length: usize,
    cells: Vec<Cell>,
    /// Unplayed cell indices, kept sorted ascending.
    legal_actions: Vec<usize>,
    last_action: Option<usize>,
    current_player: Player,
}

impl Board {
    /// Create an empty board.
    ///
    /// Fails when either dimension is smaller than `win_length` or when
    /// `win_length` is zero.
    pub fn new(width: usize, height: usize, win_length: usize) -> Result<Self, BoardError> {
        if win_length == 0 {
            return Err(BoardError::Construction(
                "win length must be at least 1".to_string(),
            ));
        }
        if width < win_length || height < win_length {
            return Err(BoardError::Construction(format!(
                "{}x{} board cannot hold a line of {}",
                width, height, win_length
            )));
        }

        debug!(width, height, win_length, "Created board");

        let size = width * height;
        Ok(Self {
            width,
            height,
            win_length,
            cells: vec![Cell::Empty; size],
            legal_actions: (0..size).collect(),
            last_action: None,
            current_player: Player::Black,
        })
    }

    /// Create an empty board from the `[board]` config section.
    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        Self::new(config.width, config.height, config.win_length)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Total number of cells, i.e. the size of the action space.
    #[inline]
    pub fn num_actions(&self) -> usize {
        self.cells.len()
    }

    /// Unplayed actions in ascending order.
    #[inline]
    pub fn legal_actions(&self) -> &[usize] {
        &self.legal_actions
    }

    #[inline]
    pub fn is_legal(&self, action: usize) -> bool {
        self.legal_actions.binary_search(&action).is_ok()
    }

    /// The most recently played action, `None` before the first move.
    #[inline]
    pub fn last_action(&self) -> Option<usize> {
        self.last_action
    }

    /// The player to move.
    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    #[inline]
    pub fn moves_played(&self) -> usize {
        self.cells.len() - self.legal_actions.len()
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at a linear action index.
    pub fn cell_at(&self, action: usize) -> Result<Cell, BoardError> {
        self.cells.get(action).copied().ok_or_else(|| {
            BoardError::OutOfRange(format!(
                "action {} on a board of {} cells",
                action,
                self.cells.len()
            ))
        })
    }

    /// Cell at (row, col).
    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, BoardError> {
        let action = self.location_to_action(row, col)?;
        Ok(self.cells[action])
    }

    /// Place a stone for the current player and hand the turn over.
    ///
    /// The board is left untouched when the action is rejected.
    pub fn apply_move(&mut self, action: usize) -> Result<(), BoardError> {
        if action >= self.cells.len() {
            return Err(BoardError::InvalidAction {
                action,
                reason: "outside the board",
            });
        }
        let slot = self
            .legal_actions
            .binary_search(&action)
            .map_err(|_| BoardError::InvalidAction {
                action,
                reason: "cell already played",
            })?;

        self.legal_actions.remove(slot);
        self.cells[action] = self.current_player.into();
        self.last_action = Some(action);
        self.current_player = self.current_player.opponent();
        Ok(())
    }

    /// Inspect the lines through the last move for a win, then check for a
    /// full board.
    pub fn check_winner(&self) -> GameResult {
        let Some(action) = self.last_action else {
            return GameResult::InProgress;
        };

        let row = (action / self.width) as isize;
        let col = (action % self.width) as isize;
        let occupant = self.cells[action];

        if let Some(player) = occupant.player() {
            for (dr, dc) in DIRECTIONS {
                let run = 1
                    + self.run_length(row, col, dr, dc, occupant)
                    + self.run_length(row, col, -dr, -dc, occupant);
                if run >= self.win_length {
                    return GameResult::Win(player);
                }
            }
        }

        if self.legal_actions.is_empty() {
            GameResult::Draw
        } else {
            GameResult::InProgress
        }
    }

    /// Count consecutive `cell`s stepping away from (row, col), exclusive.
    fn run_length(&self, row: isize, col: isize, dr: isize, dc: isize, cell: Cell) -> usize {
        let (height, width) = (self.height as isize, self.width as isize);
        let mut count = 0;
        let (mut r, mut c) = (row + dr, col + dc);

        while r >= 0 && r < height && c >= 0 && c < width {
            if self.cells[(r * width + c) as usize] != cell {
                break;
            }
            count += 1;
            r += dr;
            c += dc;
        }

        count
    }

    /// Convert a linear action index into (row, col).
    pub fn action_to_location(&self, action: usize) -> Result<(usize, usize), BoardError> {
        if action >= self.cells.len() {
            return Err(BoardError::OutOfRange(format!(
                "action {} on a {}x{} board",
                action, self.width, self.height
            )));
        }
        Ok((action / self.width, action % self.width))
    }

    /// Convert (row, col) into a linear action index.
    pub fn location_to_action(&self, row: usize, col: usize) -> Result<usize, BoardError> {
        if row >= self.height || col >= self.width {
            return Err(BoardError::OutOfRange(format!(
                "location ({}, {}) on a {}x{} board",
                row, col, self.width, self.height
            )));
        }
        Ok(row * self.width + col)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: Vec<&str> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".",
                    Cell::Black => "X",
                    Cell::White => "O",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
