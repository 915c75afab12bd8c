use crate::board::{BoardFlags, Color, Piece};
use crate::square::Square;
use arrayvec::ArrayVec;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Capacity of a fixed move buffer. Comfortably above the pseudo-legal count
/// of any reachable position, promotion-heavy ones included.
pub const MAX_MOVES: usize = 320;

/// Stack-allocated move list; pushing past `MAX_MOVES` panics.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

pub trait MoveBuffer: Deref<Target = [Move]> + DerefMut {
    fn push(&mut self, mv: Move);
    fn clear(&mut self);
}

impl MoveBuffer for Vec<Move> {
    fn push(&mut self, mv: Move) {
        Vec::push(self, mv);
    }
    fn clear(&mut self) {
        Vec::clear(self);
    }
}

impl<const N: usize> MoveBuffer for ArrayVec<Move, N> {
    fn push(&mut self, mv: Move) {
        ArrayVec::push(self, mv);
    }
    fn clear(&mut self) {
        ArrayVec::clear(self);
    }
}

// Move flag encoding (4 bits)
// Bits 0-1: Special move type (00=quiet, 01=double pawn, 10=kingside castle, 11=queenside castle)
// Bit 2: Capture flag
// Bit 3: Promotion flag
pub const QUIET_MOVE: u8 = 0b0000;
pub const DOUBLE_PAWN_PUSH: u8 = 0b0001;
pub const KINGSIDE_CASTLE: u8 = 0b0010;
pub const QUEENSIDE_CASTLE: u8 = 0b0011;
pub const CAPTURE: u8 = 0b0100;
pub const EN_PASSANT: u8 = 0b0101;
pub const PROMOTION: u8 = 0b1000;
pub const PROMOTION_CAPTURE: u8 = 0b1100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub promotion: Option<Piece>,
    pub flags: u8,
}

impl Move {
    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        (self.flags & CAPTURE) != 0
    }

    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.flags == EN_PASSANT
    }

    #[inline(always)]
    pub fn is_castling(&self) -> bool {
        self.flags == KINGSIDE_CASTLE || self.flags == QUEENSIDE_CASTLE
    }

    #[inline(always)]
    pub fn is_kingside_castle(&self) -> bool {
        self.flags == KINGSIDE_CASTLE
    }

    #[inline(always)]
    pub fn is_queenside_castle(&self) -> bool {
        self.flags == QUEENSIDE_CASTLE
    }

    #[inline(always)]
    pub fn is_promotion(&self) -> bool {
        (self.flags & PROMOTION) != 0
    }

    #[inline(always)]
    pub fn is_double_pawn_push(&self) -> bool {
        self.flags == DOUBLE_PAWN_PUSH
    }

    #[inline(always)]
    pub fn is_quiet(&self) -> bool {
        self.flags == QUIET_MOVE
    }

    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

/// Everything `unmake_move` needs to put the board back exactly as it was.
///
/// Returned by `make_move` and consumed by `unmake_move`. Not `Clone`, so a
/// record can be replayed at most once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "an Undo must be passed back to unmake_move"]
pub struct Undo {
    pub mv: Move,
    pub color: Color,
    /// Captured piece and the square it stood on (differs from `mv.to` for en passant).
    pub capture: Option<(Piece, Square)>,
    pub castling_rook: Option<(Square /*rook_from*/, Square /*rook_to*/)>,

    pub prev_flags: BoardFlags,
    pub prev_en_passant: Option<Square>,
    pub prev_threatened: [u64; 2],
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;

        if let Some(promo) = self.promotion {
            let c = match promo {
                Piece::Queen => 'q',
                Piece::Rook => 'r',
                Piece::Bishop => 'b',
                Piece::Knight => 'n',
                _ => '?',
            };
            write!(f, "{}", c)?;
        }

        // "{:#}" adds a tag for special moves
        if f.alternate() {
            if self.is_castling() {
                write!(f, " (castle)")?;
            } else if self.is_en_passant() {
                write!(f, " (ep)")?;
            } else if self.is_capture() {
                write!(f, " (x)")?;
            }
        }
        Ok(())
    }
}
