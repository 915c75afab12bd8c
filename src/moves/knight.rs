use crate::utils::per_square;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Jump targets for a knight on `square`, ignoring occupancy.
pub fn knight_attacks_from(square: usize) -> u64 {
    leaper_attacks(square, &KNIGHT_OFFSETS)
}

pub fn knight_attack_table() -> [u64; 64] {
    per_square(knight_attacks_from)
}

/// Shared by knights and kings: every (rank, file) offset that stays on the board.
pub(crate) fn leaper_attacks(square: usize, offsets: &[(i8, i8)]) -> u64 {
    let rank = (square / 8) as i8;
    let file = (square % 8) as i8;
    offsets
        .iter()
        .map(|&(dr, df)| (rank + dr, file + df))
        .filter(|(r, f)| (0..8).contains(r) && (0..8).contains(f))
        .fold(0u64, |bb, (r, f)| bb | 1u64 << (r * 8 + f))
}
