mod fen;
pub mod flags;
pub mod setup;

use crate::bitboard::BitboardExt;
use crate::square::Square;
use std::fmt;
use std::str::FromStr;

pub use flags::*;
pub use setup::Setup;

/// Starting position constants
// White side (ranks 1 & 2)
const WHITE_PAWN_MASK: u64 = 0x0000_0000_0000_FF00;
const WHITE_ROOK_MASK: u64 = (1 << 0) | (1 << 7);
const WHITE_KNIGHT_MASK: u64 = (1 << 1) | (1 << 6);
const WHITE_BISHOP_MASK: u64 = (1 << 2) | (1 << 5);
const WHITE_QUEEN_MASK: u64 = 1 << 3;
const WHITE_KING_MASK: u64 = 1 << 4;

// Black side (ranks 7 & 8)
const BLACK_PAWN_MASK: u64 = 0x00FF_0000_0000_0000;
const BLACK_ROOK_MASK: u64 = (1 << 56) | (1 << 63);
const BLACK_KNIGHT_MASK: u64 = (1 << 57) | (1 << 62);
const BLACK_BISHOP_MASK: u64 = (1 << 58) | (1 << 61);
const BLACK_QUEEN_MASK: u64 = 1 << 59;
const BLACK_KING_MASK: u64 = 1 << 60;

// Empty square value, no piece 0-13 will coincide with 255
pub(crate) const EMPTY_SQ: u8 = 0xFF;

/// Which side is to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White,
    Black,
}

/// Piece enum to hold all types of pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

pub const COLORS: [Color; 2] = [Color::White, Color::Black];
pub const PIECES: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// Core board representation using bitboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Piece planes indexed `[color][piece]`
    pub piece_bb: [[u64; 6]; 2],
    /// Occupancy fields
    pub occ_white: u64,
    pub occ_black: u64,
    pub occ_all: u64,
    /// Lookup table for each square: 0xFF = empty, otherwise (color<<3)|piece
    pub piece_on_sq: [u8; 64],
    /// Castling rights (bits 0-3), white-to-move (bit 4), threat cache valid (bit 5)
    pub flags: BoardFlags,
    /// En passant target square, or None if the last move was not a double push.
    pub en_passant: Option<Square>,
    /// Squares attacked by each color. Only `threatened[side not to move]` is
    /// meaningful, and only while `THREATS_CACHED` is set.
    pub threatened: [u64; 2],
}

impl Board {
    #[inline(always)]
    pub(crate) fn bb(&self, color: Color, piece: Piece) -> u64 {
        self.piece_bb[color as usize][piece as usize]
    }

    #[inline(always)]
    pub(crate) fn set_bb(&mut self, color: Color, piece: Piece, new_bb: u64) {
        let ci = color as usize;
        let pi = piece as usize;

        let old_bb = self.piece_bb[ci][pi];
        let delta = old_bb ^ new_bb;
        if delta == 0 {
            return;
        }

        self.piece_bb[ci][pi] = new_bb;

        if color == Color::White {
            self.occ_white ^= delta;
        } else {
            self.occ_black ^= delta;
        }
        self.occ_all = self.occ_white | self.occ_black;

        let mut bits_to_update = delta;
        while bits_to_update != 0 {
            let sq_idx = bits_to_update.trailing_zeros() as u8;
            if new_bb.has(sq_idx) {
                self.place_piece_at_sq(color, piece, Square::from_index(sq_idx));
            } else {
                self.clear_square(Square::from_index(sq_idx));
            }
            bits_to_update &= bits_to_update - 1;
        }
    }

    #[inline(always)]
    pub(crate) fn clear_square(&mut self, sq: Square) {
        self.piece_on_sq[sq.index() as usize] = EMPTY_SQ;
    }

    #[inline(always)]
    pub(crate) fn place_piece_at_sq(&mut self, color: Color, piece: Piece, sq: Square) {
        self.piece_on_sq[sq.index() as usize] = (color as u8) << 3 | (piece as u8);
    }

    /// Create an empty board (all bitboards zero, White to move, no rights).
    pub fn new_empty() -> Self {
        Board {
            piece_bb: [[0u64; 6]; 2],
            occ_white: 0,
            occ_black: 0,
            occ_all: 0,
            piece_on_sq: [EMPTY_SQ; 64],
            flags: WHITE_TO_MOVE,
            en_passant: None,
            threatened: [0; 2],
        }
    }

    /// Standard initial position.
    pub fn new() -> Self {
        let mut b = Board::new_empty();
        b.set_bb(Color::White, Piece::Pawn, WHITE_PAWN_MASK);
        b.set_bb(Color::White, Piece::Bishop, WHITE_BISHOP_MASK);
        b.set_bb(Color::White, Piece::Knight, WHITE_KNIGHT_MASK);
        b.set_bb(Color::White, Piece::Rook, WHITE_ROOK_MASK);
        b.set_bb(Color::White, Piece::Queen, WHITE_QUEEN_MASK);
        b.set_bb(Color::White, Piece::King, WHITE_KING_MASK);

        b.set_bb(Color::Black, Piece::Pawn, BLACK_PAWN_MASK);
        b.set_bb(Color::Black, Piece::Bishop, BLACK_BISHOP_MASK);
        b.set_bb(Color::Black, Piece::Knight, BLACK_KNIGHT_MASK);
        b.set_bb(Color::Black, Piece::Rook, BLACK_ROOK_MASK);
        b.set_bb(Color::Black, Piece::Queen, BLACK_QUEEN_MASK);
        b.set_bb(Color::Black, Piece::King, BLACK_KING_MASK);

        b.flags = WHITE_TO_MOVE | CASTLE_ALL;
        b
    }

    /// Build a board from an externally parsed position.
    ///
    /// Castling rights whose king or rook is not on its home square are dropped,
    /// and an en passant target is dropped unless a pawn that just double-pushed
    /// sits in front of it. The result must satisfy [`Board::validate`].
    pub fn from_setup(setup: &Setup) -> Result<Self, String> {
        let mut b = Board::new_empty();
        for (idx, slot) in setup.placement.iter().enumerate() {
            if let Some((color, piece)) = *slot {
                let bb = b.bb(color, piece) | (1u64 << idx);
                b.set_bb(color, piece, bb);
            }
        }

        b.set_side_to_move(setup.side_to_move);
        b.flags |= setup.castling & CASTLE_ALL & b.consistent_castling_rights();

        if let Some(ep) = setup.en_passant {
            if b.is_plausible_en_passant(ep) {
                b.en_passant = Some(ep);
            } else {
                tracing::debug!(%ep, "dropping en passant target without a capturable pawn");
            }
        }

        b.validate()?;
        Ok(b)
    }

    /// Rights the current placement could support (king and rook on home squares).
    fn consistent_castling_rights(&self) -> BoardFlags {
        let mut rights = 0;
        let wk = self.bb(Color::White, Piece::King).has(4);
        let bk = self.bb(Color::Black, Piece::King).has(60);
        let wr = self.bb(Color::White, Piece::Rook);
        let br = self.bb(Color::Black, Piece::Rook);
        if wk && wr.has(7) {
            rights |= CASTLE_WK;
        }
        if wk && wr.has(0) {
            rights |= CASTLE_WQ;
        }
        if bk && br.has(63) {
            rights |= CASTLE_BK;
        }
        if bk && br.has(56) {
            rights |= CASTLE_BQ;
        }
        rights
    }

    fn is_plausible_en_passant(&self, ep: Square) -> bool {
        let mover = self.side_to_move();
        let (expected_rank, pawn_sq) = match mover {
            Color::White => (5, ep.index().wrapping_sub(8)),
            Color::Black => (2, ep.index() + 8),
        };
        ep.rank() == expected_rank
            && !self.occ_all.has(ep.index())
            && self.bb(mover.opposite(), Piece::Pawn).has(pawn_sq)
    }

    #[inline(always)]
    /// Bitboard of all pieces (both colors).
    pub fn occupied(&self) -> u64 {
        self.occ_all
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        if self.flags & WHITE_TO_MOVE != 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    #[inline(always)]
    pub fn set_side_to_move(&mut self, color: Color) {
        match color {
            Color::White => self.flags |= WHITE_TO_MOVE,
            Color::Black => self.flags &= !WHITE_TO_MOVE,
        }
        self.flags &= !THREATS_CACHED;
    }

    #[inline(always)]
    pub fn castling_rights(&self) -> BoardFlags {
        self.flags & CASTLE_ALL
    }

    #[inline(always)]
    pub fn has_castling(&self, flag: BoardFlags) -> bool {
        self.flags & flag & CASTLE_ALL != 0
    }

    #[inline(always)]
    pub fn threats_cached(&self) -> bool {
        self.flags & THREATS_CACHED != 0
    }

    /// Validate the structural invariants: one piece per square, occupancy
    /// equal to the union of the planes, exactly one king per side.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen: u64 = 0;
        for &c in &COLORS {
            let mut side = 0u64;
            for &p in &PIECES {
                let bb = self.bb(c, p);
                if (seen & bb) != 0 {
                    return Err(format!("Bitboard {:?} {:?} overlaps with another piece", c, p));
                }
                seen |= bb;
                side |= bb;
            }
            if side != self.occupancy(c) {
                return Err(format!("{:?} occupancy does not match its piece planes", c));
            }
            let kings = self.bb(c, Piece::King).popcount();
            if kings != 1 {
                return Err(format!("{:?} has {} kings, expected exactly one", c, kings));
            }
        }
        if seen != self.occ_all {
            return Err("Total occupancy does not match piece planes".to_string());
        }
        for idx in 0..64u8 {
            let expected = self.piece_from_planes(idx);
            if self.piece_at(Square::from_index(idx)) != expected {
                return Err(format!("Square table disagrees with planes at {}", Square::from_index(idx)));
            }
        }
        Ok(())
    }

    fn piece_from_planes(&self, idx: u8) -> Option<(Color, Piece)> {
        for &c in &COLORS {
            for &p in &PIECES {
                if self.bb(c, p).has(idx) {
                    return Some((c, p));
                }
            }
        }
        None
    }

    #[inline(always)]
    /// Bitboard of all pieces for one side.
    pub fn occupancy(&self, color: Color) -> u64 {
        match color {
            Color::White => self.occ_white,
            Color::Black => self.occ_black,
        }
    }

    /// Shorthand for the opponent's occupancy.
    pub fn opponent_occupancy(&self, color: Color) -> u64 {
        self.occupancy(color.opposite())
    }

    #[inline(always)]
    /// Single-slot accessor for a given piece & color.
    pub fn pieces(&self, piece: Piece, color: Color) -> u64 {
        self.bb(color, piece)
    }

    /// Returns the piece and color at a given square, or None if empty.
    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        let val = self.piece_on_sq[sq.index() as usize];
        if val == EMPTY_SQ {
            None
        } else {
            Some((Color::from_u8((val >> 3) & 1), Piece::from_u8(val & 0b111)))
        }
    }

    #[inline(always)]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline(always)]
    pub fn has_kingside_castle(&self, color: Color) -> bool {
        match color {
            Color::White => self.has_castling(CASTLE_WK),
            Color::Black => self.has_castling(CASTLE_BK),
        }
    }

    #[inline(always)]
    pub fn has_queenside_castle(&self, color: Color) -> bool {
        match color {
            Color::White => self.has_castling(CASTLE_WQ),
            Color::Black => self.has_castling(CASTLE_BQ),
        }
    }

    /// Square the king of `color` sits on. A missing king breaks the board invariant.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Square {
        let king_bb = self.pieces(Piece::King, color);
        if king_bb == 0 {
            panic!(
                "King missing for {:?}! \nFEN: {}\nOcc: {:#x}",
                color,
                self.to_fen(),
                self.occupied()
            );
        }
        Square::from_index(king_bb.lsb())
    }
}

impl Color {
    #[inline(always)]
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Decode a 0/1 value into a Color.
    #[inline(always)]
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => Color::White,
            1 => Color::Black,
            _ => panic!("Invalid Color encoding: {}", v),
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opposite()
    }
}

impl Piece {
    /// Decode a 0–5 value into a Piece.
    #[inline(always)]
    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            0 => Piece::Pawn,
            1 => Piece::Knight,
            2 => Piece::Bishop,
            3 => Piece::Rook,
            4 => Piece::Queen,
            5 => Piece::King,
            _ => panic!("Invalid Piece encoding: {}", v),
        }
    }
}

/// An all-zero board (no pieces) with White to move.
impl Default for Board {
    fn default() -> Self {
        Board::new_empty()
    }
}

impl FromStr for Board {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let setup = Setup::from_fen(s)?;
        Board::from_setup(&setup)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen())
    }
}
