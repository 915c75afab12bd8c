use crate::bitboard::{FILE_A, FILE_H};
use crate::board::Color;
use crate::utils::per_square;

/// Squares a pawn of `color` on `square` attacks diagonally.
/// File masks stop captures from wrapping across the board edge.
#[inline]
pub fn pawn_attacks_from(square: usize, color: Color) -> u64 {
    let bb = 1u64 << square;
    match color {
        Color::White => ((bb & !FILE_A) << 7) | ((bb & !FILE_H) << 9),
        Color::Black => ((bb & !FILE_H) >> 7) | ((bb & !FILE_A) >> 9),
    }
}

/// Indexed `[color][square]`.
pub fn pawn_attack_table() -> [[u64; 64]; 2] {
    [
        per_square(|sq| pawn_attacks_from(sq, Color::White)),
        per_square(|sq| pawn_attacks_from(sq, Color::Black)),
    ]
}

/// Every square holding a pawn of `color` that would attack `target`.
/// Mirror of `pawn_attacks_from`: look from the target back toward the pawn.
#[inline]
pub fn pawn_attack_sources(target: u64, color: Color) -> u64 {
    match color {
        Color::White => ((target & !FILE_H) >> 7) | ((target & !FILE_A) >> 9),
        Color::Black => ((target & !FILE_A) << 7) | ((target & !FILE_H) << 9),
    }
}
