use super::{BoardFlags, Color, Piece};
use crate::square::Square;

/// A parsed position, ready to be turned into a [`Board`](super::Board).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    /// Piece on each square, a1 = 0 … h8 = 63.
    pub placement: [Option<(Color, Piece)>; 64],
    pub side_to_move: Color,
    /// Castling rights using the `CASTLE_*` bits.
    pub castling: BoardFlags,
    pub en_passant: Option<Square>,
}

impl Setup {
    pub fn empty() -> Self {
        Setup {
            placement: [None; 64],
            side_to_move: Color::White,
            castling: 0,
            en_passant: None,
        }
    }

    /// Put a piece on a square, replacing whatever was there.
    pub fn put(&mut self, sq: Square, color: Color, piece: Piece) -> &mut Self {
        self.placement[sq.index() as usize] = Some((color, piece));
        self
    }
}

impl Default for Setup {
    fn default() -> Self {
        Setup::empty()
    }
}
