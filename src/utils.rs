/// Remove and return the least significant set bit's index.
#[inline(always)]
pub fn pop_lsb(bb: &mut u64) -> u8 {
    debug_assert!(*bb != 0, "pop_lsb on empty bitboard");
    let sq = bb.trailing_zeros() as u8;
    *bb &= *bb - 1;
    sq
}

#[inline(always)]
pub fn square_index(rank: usize, file: usize) -> usize {
    rank * 8 + file
}

/// Build a 64-entry table by calling `f` for each square.
pub(crate) fn per_square(f: impl Fn(usize) -> u64) -> [u64; 64] {
    std::array::from_fn(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_lsb_drains_low_to_high() {
        let mut bb = 0b1010_0000u64;
        assert_eq!(pop_lsb(&mut bb), 5);
        assert_eq!(pop_lsb(&mut bb), 7);
        assert_eq!(bb, 0);
    }
}
