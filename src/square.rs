use std::fmt;
use std::str::FromStr;

/// A board square, 0 = a1 … 63 = h8 (file = idx % 8, rank = idx / 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Build a square from a raw index. Indices outside 0..64 are a programmer error.
    #[inline(always)]
    pub const fn from_index(idx: u8) -> Self {
        assert!(idx < 64, "square index out of range");
        Square(idx)
    }

    #[inline(always)]
    pub const fn from_rank_file(rank: u8, file: u8) -> Self {
        Square::from_index(rank * 8 + file)
    }

    #[inline(always)]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline(always)]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    #[inline(always)]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Single-bit bitboard for this square.
    #[inline(always)]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }
}

impl TryFrom<u8> for Square {
    type Error = String;

    fn try_from(idx: u8) -> Result<Self, Self::Error> {
        if idx < 64 {
            Ok(Square(idx))
        } else {
            Err(format!("Square index {} out of range", idx))
        }
    }
}

impl FromStr for Square {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(format!("Invalid square: {}", s));
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        if file > 7 || rank > 7 {
            return Err(format!("Invalid square: {}", s));
        }
        Ok(Square::from_rank_file(rank, file))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{}{}", file, rank)
    }
}
