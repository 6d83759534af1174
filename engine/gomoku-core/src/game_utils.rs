//! Shared helpers for turning positions into numbers.

use crate::board::{GameResult, Player};

/// Value of a finished game from `perspective`'s point of view.
///
/// # Returns
/// * `1.0` if `perspective` won
/// * `-1.0` if `perspective` lost
/// * `0.0` for draws or games still in progress
///
/// # Example
/// ```
/// use gomoku_core::{outcome_value, GameResult, Player};
///
/// assert_eq!(outcome_value(GameResult::Win(Player::Black), Player::Black), 1.0);
/// assert_eq!(outcome_value(GameResult::Win(Player::Black), Player::White), -1.0);
/// assert_eq!(outcome_value(GameResult::Draw, Player::White), 0.0);
/// ```
#[inline]
pub fn outcome_value(result: GameResult, perspective: Player) -> f32 {
    match result {
        GameResult::Win(winner) if winner == perspective => 1.0,
        GameResult::Win(_) => -1.0,
        GameResult::Draw | GameResult::InProgress => 0.0,
    }
}

/// Encode multiple f32 slices to bytes in little-endian format.
///
/// # Example
/// ```
/// use gomoku_core::game_utils::encode_f32_slices;
///
/// let own = [1.0f32, 0.0, 0.0];
/// let other = [0.0f32, 1.0, 0.0];
///
/// let mut buf = Vec::new();
/// encode_f32_slices(&mut buf, [&own[..], &other[..]]);
/// assert_eq!(buf.len(), 24);
/// ```
pub fn encode_f32_slices<'a>(out: &mut Vec<u8>, slices: impl IntoIterator<Item = &'a [f32]>) {
    for slice in slices {
        for &value in slice {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}
