use crate::utils::square_index;
use serde::{Deserialize, Serialize};

/// The two sliding move patterns that get magic tables. Queens use both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slider {
    Rook,
    Bishop,
}

const ROOK_DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];

impl Slider {
    pub const ALL: [Slider; 2] = [Slider::Rook, Slider::Bishop];

    /// (rank step, file step) for each ray.
    #[inline]
    pub fn directions(self) -> &'static [(isize, isize); 4] {
        match self {
            Slider::Rook => &ROOK_DIRECTIONS,
            Slider::Bishop => &BISHOP_DIRECTIONS,
        }
    }

    /// True attacks by ray casting; see [`slider_attacks`].
    #[inline]
    pub fn attacks(self, square: usize, blockers: u64) -> u64 {
        slider_attacks(square, blockers, self.directions())
    }

    /// Relevant-blocker mask; see [`relevant_mask`].
    #[inline]
    pub fn mask(self, square: usize) -> u64 {
        relevant_mask(square, self.directions())
    }

    pub fn name(self) -> &'static str {
        match self {
            Slider::Rook => "rook",
            Slider::Bishop => "bishop",
        }
    }
}

/// Walk one ray from (rank, file), exclusive, calling `on_square` until it
/// returns false or the ray leaves the board.
#[inline]
fn scan_ray(
    rank: isize,
    file: isize,
    (dr, df): (isize, isize),
    mut on_square: impl FnMut(usize, bool) -> bool,
) {
    let (mut r, mut f) = (rank + dr, file + df);
    while (0..=7).contains(&r) && (0..=7).contains(&f) {
        let is_last = !(0..=7).contains(&(r + dr)) || !(0..=7).contains(&(f + df));
        if !on_square(square_index(r as usize, f as usize), is_last) {
            break;
        }
        r += dr;
        f += df;
    }
}

/// Attack set for a slider on `square`: each ray runs until the board edge or
/// the first blocker. The blocker itself is included, it may be capturable.
pub fn slider_attacks(square: usize, blockers: u64, directions: &[(isize, isize)]) -> u64 {
    let rank = (square / 8) as isize;
    let file = (square % 8) as isize;
    let mut attacks = 0u64;

    for &dir in directions {
        scan_ray(rank, file, dir, |sq, _| {
            attacks |= 1 << sq;
            (blockers >> sq) & 1 == 0 // stop if blocker found
        });
    }

    attacks
}

/// Squares whose occupancy can change the attack set: every ray square except
/// the final one on each ray. The edge square is always reached last, so it
/// never blocks anything.
pub fn relevant_mask(square: usize, directions: &[(isize, isize)]) -> u64 {
    let rank = (square / 8) as isize;
    let file = (square % 8) as isize;
    let mut mask = 0u64;

    for &dir in directions {
        scan_ray(rank, file, dir, |sq, is_last| {
            if !is_last {
                mask |= 1 << sq;
            }
            true
        });
    }

    mask
}

#[inline]
pub fn rook_attacks_per_square(square: usize, blockers: u64) -> u64 {
    Slider::Rook.attacks(square, blockers)
}

#[inline]
pub fn bishop_attacks_per_square(square: usize, blockers: u64) -> u64 {
    Slider::Bishop.attacks(square, blockers)
}

/// Every subset of `mask` (the full power set, empty set first), produced
/// with the carry-rippler trick.
pub fn enumerate_blockers(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1usize << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

/// True attack bitboard for each blocker configuration, index-aligned with `blockers`.
pub fn attack_bitboards(slider: Slider, square: usize, blockers: &[u64]) -> Vec<u64> {
    blockers.iter().map(|&b| slider.attacks(square, b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::{FILE_A, FILE_H, RANK_1, RANK_8};

    fn bit(sq: usize) -> u64 {
        1u64 << sq
    }

    #[test]
    fn rook_attacks_from_d4_no_blockers() {
        let result = rook_attacks_per_square(27, 0);

        let expected = bit(3)   // d1
            | bit(11)           // d2
            | bit(19)           // d3
            | bit(35)           // d5
            | bit(43)           // d6
            | bit(51)           // d7
            | bit(59)           // d8
            | bit(24)           // a4
            | bit(25)           // b4
            | bit(26)           // c4
            | bit(28)           // e4
            | bit(29)           // f4
            | bit(30)           // g4
            | bit(31); // h4

        assert_eq!(result, expected);
    }

    #[test]
    fn bishop_attacks_blocked_ne() {
        let blockers = bit(36); // e5 blocks NE
        let result = bishop_attacks_per_square(27, blockers);

        let expected = bit(36) // e5 (included)
            | bit(20)          // e3
            | bit(13)          // f2
            | bit(6)           // g1
            | bit(18)          // c3
            | bit(9)           // b2
            | bit(0)           // a1
            | bit(34)          // c5
            | bit(41)          // b6
            | bit(48); // a7

        assert_eq!(result, expected);
    }

    #[test]
    fn rook_attacks_blocked_east_includes_blocker() {
        let result = rook_attacks_per_square(27, bit(28) | bit(29));
        assert_ne!(result & bit(28), 0);
        assert_eq!(result & bit(29), 0);
    }

    #[test]
    fn rook_mask_a1_is_twelve_bits_without_edges() {
        let mask = Slider::Rook.mask(0);
        assert_eq!(mask.count_ones(), 12);
        assert_eq!(mask & bit(0), 0);
        assert_eq!(mask & bit(7), 0); // h1
        assert_eq!(mask & bit(56), 0); // a8
    }

    #[test]
    fn bishop_mask_d4_is_nine_bits() {
        assert_eq!(Slider::Bishop.mask(27).count_ones(), 9);
    }

    #[test]
    fn masks_exclude_square_and_unblockable_edges() {
        let edges = FILE_A | FILE_H | RANK_1 | RANK_8;
        for sq in 0..64 {
            let bishop = Slider::Bishop.mask(sq);
            assert_eq!(bishop & bit(sq), 0);
            assert_eq!(bishop & edges, 0, "bishop mask touches edge at {sq}");

            let rook = Slider::Rook.mask(sq);
            assert_eq!(rook & bit(sq), 0);
            // each ray's last square is dropped; removing a masked square never
            // changes what the piece sees past it on an empty board
            let full = Slider::Rook.attacks(sq, 0);
            assert_eq!(rook & !full, 0);
            assert_eq!((full & !rook).count_ones() as usize, edge_terminals(sq));
        }
    }

    fn edge_terminals(sq: usize) -> usize {
        let (r, f) = (sq / 8, sq % 8);
        [r < 7, r > 0, f < 7, f > 0].iter().filter(|&&open| open).count()
    }

    #[test]
    fn enumerate_blockers_is_full_power_set() {
        let mask = bit(1) | bit(9) | bit(40);
        let mut subsets = enumerate_blockers(mask);
        assert_eq!(subsets.len(), 8);
        subsets.sort_unstable();
        subsets.dedup();
        assert_eq!(subsets.len(), 8);
        assert!(subsets.iter().all(|&s| s & !mask == 0));
    }

    #[test]
    fn enumerate_blockers_of_empty_mask_is_single_empty_set() {
        assert_eq!(enumerate_blockers(0), vec![0]);
    }
}
