use crate::board::{Board, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ, Color, EMPTY_SQ, Piece, THREATS_CACHED};
use crate::moves::types::{Move, Undo};
use crate::square::Square;
use tracing::trace;

/// Precomputed castling rook moves by king destination index.
#[inline(always)]
fn rook_castle_squares(king_to_idx: u8) -> Option<(Square, Square)> {
    match king_to_idx {
        6 => Some((Square::from_index(7), Square::from_index(5))), // White O-O
        2 => Some((Square::from_index(0), Square::from_index(3))), // White O-O-O
        62 => Some((Square::from_index(63), Square::from_index(61))), // Black O-O
        58 => Some((Square::from_index(56), Square::from_index(59))), // Black O-O-O
        _ => None,
    }
}

#[inline(always)]
fn rights_mask_to_clear_for_rook(color: Color, rook_sq: u8) -> u8 {
    match (color, rook_sq) {
        (Color::White, 0) => CASTLE_WQ,  // a1
        (Color::White, 7) => CASTLE_WK,  // h1
        (Color::Black, 56) => CASTLE_BQ, // a8
        (Color::Black, 63) => CASTLE_BK, // h8
        _ => 0,
    }
}

/// Helper: clear a piece bit and table entry at `idx`.
#[inline(always)]
fn remove_piece(board: &mut Board, color: Color, piece: Piece, idx: usize) {
    let new_bb = board.bb(color, piece) & !(1u64 << idx);
    board.set_bb(color, piece, new_bb);
}

/// Helper: set a piece bit and table entry at `idx`.
#[inline(always)]
fn place_piece(board: &mut Board, color: Color, piece: Piece, idx: usize) {
    let new_bb = board.bb(color, piece) | (1u64 << idx);
    board.set_bb(color, piece, new_bb);
}

/// Apply `mv` to `board` and return the record that reverses it.
///
/// The move must be pseudo-legal for the side to move; king safety is not
/// checked here. Every make drops the cached threat map.
pub fn make_move(board: &mut Board, mv: Move) -> Undo {
    let color = board.side_to_move();
    let piece = mv.piece;
    let from_idx = mv.from.index() as usize;
    let to_idx = mv.to.index() as usize;
    debug_assert_eq!(
        board.piece_at(mv.from),
        Some((color, piece)),
        "make_move: {} does not start on a {:?} {:?}",
        mv,
        color,
        piece
    );

    let prev_flags = board.flags;
    let prev_en_passant = board.en_passant;
    let prev_threatened = board.threatened;
    board.en_passant = None;

    // Capture
    let mut capture = None;

    if mv.is_en_passant() {
        let cap_sq = if color == Color::White {
            to_idx - 8
        } else {
            to_idx + 8
        };
        capture = Some((Piece::Pawn, Square::from_index(cap_sq as u8)));
        remove_piece(board, color.opposite(), Piece::Pawn, cap_sq);
    } else {
        let occupant = board.piece_on_sq[to_idx];
        if occupant != EMPTY_SQ {
            let cap_piece = Piece::from_u8(occupant & 0b111);
            debug_assert_eq!(occupant >> 3, color.opposite() as u8, "capture of own piece");
            capture = Some((cap_piece, mv.to));
            remove_piece(board, color.opposite(), cap_piece, to_idx);
        }
    }

    let castling_rook = if mv.is_castling() {
        rook_castle_squares(to_idx as u8)
    } else {
        None
    };

    if mv.is_double_pawn_push() {
        let ep_sq = if color == Color::White {
            from_idx + 8
        } else {
            from_idx - 8
        };
        board.en_passant = Some(Square::from_index(ep_sq as u8));
    }

    // Compute all rights to clear for this move
    let mut mask_to_clear: u8 = 0;

    // (i) King moved → clear both for that color
    if piece == Piece::King {
        mask_to_clear |= match color {
            Color::White => CASTLE_WK | CASTLE_WQ,
            Color::Black => CASTLE_BK | CASTLE_BQ,
        };
    }

    // (ii) Rook moved from a corner → clear that side's right
    if piece == Piece::Rook {
        mask_to_clear |= rights_mask_to_clear_for_rook(color, mv.from.index());
    }

    // (iii) Captured a rook on its original corner → clear that side's right
    if let Some((Piece::Rook, cap_sq)) = capture {
        mask_to_clear |= rights_mask_to_clear_for_rook(color.opposite(), cap_sq.index());
    }

    board.flags &= !(mask_to_clear | THREATS_CACHED);

    remove_piece(board, color, piece, from_idx);
    if let Some(prom) = mv.promotion {
        debug_assert!(piece == Piece::Pawn, "Only pawns can promote");
        place_piece(board, color, prom, to_idx);
    } else {
        place_piece(board, color, piece, to_idx);
    }

    if let Some((rook_from, rook_to)) = castling_rook {
        remove_piece(board, color, Piece::Rook, rook_from.index() as usize);
        place_piece(board, color, Piece::Rook, rook_to.index() as usize);
    }

    board.set_side_to_move(color.opposite());

    #[cfg(debug_assertions)]
    debug_assert_consistent(board);

    trace!(mv = %mv, "make");
    Undo {
        mv,
        color,
        capture,
        castling_rook,
        prev_flags,
        prev_en_passant,
        prev_threatened,
    }
}

/// Reverse a `make_move`. The board comes back bit-identical, threat cache included.
pub fn unmake_move(board: &mut Board, undo: Undo) {
    let Undo {
        mv,
        color,
        capture,
        castling_rook,
        prev_flags,
        prev_en_passant,
        prev_threatened,
    } = undo;
    let from_idx = mv.from.index() as usize;
    let to_idx = mv.to.index() as usize;

    // ---- Undo the moved piece (and promotion if any) ----
    let landed = mv.promotion.unwrap_or(mv.piece);
    remove_piece(board, color, landed, to_idx);
    place_piece(board, color, mv.piece, from_idx);

    // ---- Undo capture (en passant restores the pawn behind the target) ----
    if let Some((cap_piece, cap_sq)) = capture {
        place_piece(board, color.opposite(), cap_piece, cap_sq.index() as usize);
    }

    if let Some((rook_from, rook_to)) = castling_rook {
        remove_piece(board, color, Piece::Rook, rook_to.index() as usize);
        place_piece(board, color, Piece::Rook, rook_from.index() as usize);
    }

    board.flags = prev_flags;
    board.en_passant = prev_en_passant;
    board.threatened = prev_threatened;

    #[cfg(debug_assertions)]
    debug_assert_consistent(board);

    trace!(mv = %mv, "unmake");
}

impl Board {
    /// Method form of [`make_move`].
    #[inline]
    pub fn make(&mut self, mv: Move) -> Undo {
        make_move(self, mv)
    }

    /// Method form of [`unmake_move`].
    #[inline]
    pub fn unmake(&mut self, undo: Undo) {
        unmake_move(self, undo)
    }
}

/// Cheap checks run after every make/unmake in debug builds.
#[cfg(debug_assertions)]
#[inline]
pub(crate) fn debug_assert_consistent(board: &Board) {
    debug_assert_eq!(board.occ_white & board.occ_black, 0, "colors overlap");
    debug_assert_eq!(board.occ_all, board.occ_white | board.occ_black);

    if let Some(ep) = board.en_passant {
        match board.side_to_move() {
            // Black just double-pushed → EP should be on rank 6 (0-based 5)
            Color::White => debug_assert!(ep.rank() == 5, "EP must be on rank 6 when White is to move, got {}", ep),
            // White just double-pushed → EP should be on rank 3 (0-based 2)
            Color::Black => debug_assert!(ep.rank() == 2, "EP must be on rank 3 when Black is to move, got {}", ep),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::types::{CAPTURE, DOUBLE_PAWN_PUSH, EN_PASSANT, KINGSIDE_CASTLE, PROMOTION_CAPTURE, QUIET_MOVE};
    use std::str::FromStr;

    fn sq(name: &str) -> Square {
        Square::from_str(name).unwrap()
    }

    fn mv(from: &str, to: &str, piece: Piece, promotion: Option<Piece>, flags: u8) -> Move {
        Move {
            from: sq(from),
            to: sq(to),
            piece,
            promotion,
            flags,
        }
    }

    #[test]
    fn double_push_sets_en_passant_and_flips_side() {
        let mut board = Board::new();
        let before = board.clone();
        let undo = make_move(&mut board, mv("e2", "e4", Piece::Pawn, None, DOUBLE_PAWN_PUSH));

        assert_eq!(board.en_passant, Some(sq("e3")));
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.piece_at(sq("e4")), Some((Color::White, Piece::Pawn)));

        unmake_move(&mut board, undo);
        assert_eq!(board, before);
    }

    #[test]
    fn quiet_move_clears_en_passant() {
        let mut board = Board::from_str("4k3/8/8/8/4Pp2/8/8/4K3 b - e3 0 1").unwrap();
        let undo = make_move(&mut board, mv("e8", "d8", Piece::King, None, QUIET_MOVE));
        assert_eq!(board.en_passant, None);
        unmake_move(&mut board, undo);
        assert_eq!(board.en_passant, Some(sq("e3")));
    }

    #[test]
    fn en_passant_removes_pawn_behind_target() {
        let mut board = Board::from_str("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let before = board.clone();
        let undo = board.make(mv("e5", "d6", Piece::Pawn, None, EN_PASSANT));

        assert_eq!(board.piece_at(sq("d5")), None);
        assert_eq!(board.piece_at(sq("d6")), Some((Color::White, Piece::Pawn)));
        assert_eq!(undo.capture, Some((Piece::Pawn, sq("d5"))));

        board.unmake(undo);
        assert_eq!(board, before);
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut board = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let before = board.clone();
        let undo = make_move(&mut board, mv("e1", "g1", Piece::King, None, KINGSIDE_CASTLE));

        assert_eq!(board.piece_at(sq("f1")), Some((Color::White, Piece::Rook)));
        assert_eq!(board.piece_at(sq("h1")), None);
        assert_eq!(board.castling_rights(), CASTLE_BK | CASTLE_BQ);

        unmake_move(&mut board, undo);
        assert_eq!(board, before);
    }

    #[test]
    fn capturing_corner_rook_clears_opponent_right() {
        let mut board = Board::from_str("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let _undo = make_move(&mut board, mv("a1", "a8", Piece::Rook, None, CAPTURE));
        assert_eq!(board.castling_rights(), CASTLE_WK | CASTLE_BK);
    }

    #[test]
    fn promotion_capture_restores_pawn_and_victim() {
        let mut board = Board::from_str("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let before = board.clone();
        let undo = make_move(&mut board, mv("a7", "b8", Piece::Pawn, Some(Piece::Queen), PROMOTION_CAPTURE));

        assert_eq!(board.piece_at(sq("b8")), Some((Color::White, Piece::Queen)));
        assert_eq!(board.pieces(Piece::Pawn, Color::White), 0);

        unmake_move(&mut board, undo);
        assert_eq!(board, before);
    }

    #[test]
    fn make_drops_threat_cache_and_unmake_restores_it() {
        let mut board = Board::new();
        board.threatened = [0, 0xFFFF];
        board.flags |= THREATS_CACHED;
        let undo = make_move(&mut board, mv("g1", "f3", Piece::Knight, None, QUIET_MOVE));
        assert!(!board.threats_cached());

        unmake_move(&mut board, undo);
        assert!(board.threats_cached());
        assert_eq!(board.threatened, [0, 0xFFFF]);
    }
}
