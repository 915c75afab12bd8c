use crate::moves::knight::leaper_attacks;
use crate::utils::per_square;

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub fn king_attacks_from(square: usize) -> u64 {
    leaper_attacks(square, &KING_OFFSETS)
}

pub fn king_attack_table() -> [u64; 64] {
    per_square(king_attacks_from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_target_counts() {
        assert_eq!(king_attacks_from(0).count_ones(), 3); // a1
        assert_eq!(king_attacks_from(4).count_ones(), 5); // e1
        assert_eq!(king_attacks_from(27).count_ones(), 8); // d4
        assert_eq!(king_attacks_from(0), 0x302);
    }

    #[test]
    fn h_file_king_does_not_wrap() {
        let h5 = 39;
        assert_eq!(king_attacks_from(h5) & crate::bitboard::FILE_A, 0);
    }
}
