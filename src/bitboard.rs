/// Bitboard file masks (a1 = bit 0 … h8 = bit 63).
pub const FILE_A: u64 = 0x0101_0101_0101_0101;
pub const FILE_H: u64 = 0x8080_8080_8080_8080;

pub const RANK_1: u64 = 0x0000_0000_0000_00FF;
pub const RANK_2: u64 = 0x0000_0000_0000_FF00;
pub const RANK_7: u64 = 0x00FF_0000_0000_0000;
pub const RANK_8: u64 = 0xFF00_0000_0000_0000;

/// Small helpers on raw `u64` bitboards.
pub trait BitboardExt {
    /// Index of the least significant set bit. Undefined for an empty board.
    fn lsb(self) -> u8;
    fn popcount(self) -> u32;
    fn has(self, sq: u8) -> bool;
}

impl BitboardExt for u64 {
    #[inline(always)]
    fn lsb(self) -> u8 {
        debug_assert!(self != 0, "lsb of empty bitboard");
        self.trailing_zeros() as u8
    }

    #[inline(always)]
    fn popcount(self) -> u32 {
        self.count_ones()
    }

    #[inline(always)]
    fn has(self, sq: u8) -> bool {
        (self >> sq) & 1 != 0
    }
}
