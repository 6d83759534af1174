//! Feature planes describing a board for a learned evaluator.
//!
//! Four `height x width` planes, all from the point of view of the player
//! to move:
//! - plane 0: stones of the player to move
//! - plane 1: stones of the opponent
//! - plane 2: the last move (one-hot, all zero before the first move)
//! - plane 3: all ones when Black is to move, all zeros otherwise

use crate::board::{Board, Player};
use crate::game_utils::encode_f32_slices;

/// Number of planes in a [`FeaturePlanes`] observation.
pub const NUM_PLANES: usize = 4;

/// Model input for a board position, stored plane-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePlanes {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl FeaturePlanes {
    /// Build the planes for the position on `board`.
    pub fn from_board(board: &Board) -> Self {
        let area = board.num_actions();
        let mut data = vec![0.0; NUM_PLANES * area];
        let to_move = board.current_player();

        for (i, cell) in board.cells().iter().enumerate() {
            match cell.player() {
                Some(player) if player == to_move => data[i] = 1.0,
                Some(_) => data[area + i] = 1.0,
                None => {}
            }
        }

        if let Some(last) = board.last_action() {
            data[2 * area + last] = 1.0;
        }

        if to_move == Player::Black {
            data[3 * area..].fill(1.0);
        }

        Self {
            width: board.width(),
            height: board.height(),
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// One plane as a row-major `height * width` slice.
    ///
    /// Panics if `index >= NUM_PLANES`.
    pub fn plane(&self, index: usize) -> &[f32] {
        let area = self.width * self.height;
        &self.data[index * area..(index + 1) * area]
    }

    /// All planes, plane-major.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Encode as little-endian f32 bytes for a model runtime.
    pub fn encode(&self, out: &mut Vec<u8>) {
        encode_f32_slices(out, [&self.data[..]]);
    }

    /// Total observation size in floats.
    pub fn obs_size(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_planes() {
        let board = Board::new(4, 3, 3).unwrap();
        let planes = FeaturePlanes::from_board(&board);

        assert_eq!(planes.obs_size(), 4 * 12);
        assert!(planes.plane(0).iter().all(|&v| v == 0.0));
        assert!(planes.plane(1).iter().all(|&v| v == 0.0));
        assert!(planes.plane(2).iter().all(|&v| v == 0.0));
        // Black to move
        assert!(planes.plane(3).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_planes_follow_player_to_move() {
        let mut board = Board::new(3, 3, 3).unwrap();
        board.apply_move(4).unwrap(); // Black
        board.apply_move(0).unwrap(); // White
        board.apply_move(8).unwrap(); // Black, White to move

        let planes = FeaturePlanes::from_board(&board);

        // White to move: own stones first
        assert_eq!(planes.plane(0)[0], 1.0);
        assert_eq!(planes.plane(0).iter().sum::<f32>(), 1.0);
        assert_eq!(planes.plane(1)[4], 1.0);
        assert_eq!(planes.plane(1)[8], 1.0);
        assert_eq!(planes.plane(1).iter().sum::<f32>(), 2.0);

        // Last move was 8
        assert_eq!(planes.plane(2)[8], 1.0);
        assert_eq!(planes.plane(2).iter().sum::<f32>(), 1.0);

        assert!(planes.plane(3).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_encode_length() {
        let board = Board::new(5, 5, 4).unwrap();
        let planes = FeaturePlanes::from_board(&board);

        let mut buf = Vec::new();
        planes.encode(&mut buf);
        assert_eq!(buf.len(), 4 * 25 * 4);

        let last = f32::from_le_bytes(buf[buf.len() - 4..].try_into().unwrap());
        assert_eq!(last, 1.0);
    }
}
