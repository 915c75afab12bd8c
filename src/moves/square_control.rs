use crate::board::{Board, Color, Piece};
use crate::moves::pawn::pawn_attack_sources;
use crate::moves::tables::AttackTables;
use crate::square::Square;

/// Returns a bitboard showing all the squares that *piece* could attack from *square*
pub fn attacks_from(piece: Piece, color: Color, square: u8, blockers: u64, tables: &AttackTables) -> u64 {
    let sq = square as usize;

    match piece {
        Piece::Knight => tables.knight_attacks(sq),
        Piece::King => tables.king_attacks(sq),
        Piece::Pawn => tables.pawn_attacks(sq, color),
        Piece::Bishop => tables.bishop_attacks(sq, blockers),
        Piece::Rook => tables.rook_attacks(sq, blockers),
        Piece::Queen => tables.queen_attacks(sq, blockers),
    }
}

/// Whether any piece of `attacker` attacks `square`, looking outward from the
/// square: a pawn attacks it if the pawn sits on a mirrored diagonal, a slider
/// if the slider's ray from the square reaches it.
pub fn is_square_attacked(board: &Board, square: Square, attacker: Color, tables: &AttackTables) -> bool {
    let index = square.index() as usize;

    if pawn_attack_sources(square.bit(), attacker) & board.pieces(Piece::Pawn, attacker) != 0 {
        return true;
    }
    if tables.knight_attacks(index) & board.pieces(Piece::Knight, attacker) != 0 {
        return true;
    }
    if tables.king_attacks(index) & board.pieces(Piece::King, attacker) != 0 {
        return true;
    }

    let occupied = board.occupied();
    let queens = board.pieces(Piece::Queen, attacker);

    let rook_attacks = tables.rook_attacks(index, occupied);
    if rook_attacks & (board.pieces(Piece::Rook, attacker) | queens) != 0 {
        return true;
    }

    let bishop_attacks = tables.bishop_attacks(index, occupied);
    bishop_attacks & (board.pieces(Piece::Bishop, attacker) | queens) != 0
}

#[inline(always)]
pub fn in_check(board: &Board, side: Color, tables: &AttackTables) -> bool {
    let king_sq = board.king_square(side);
    is_square_attacked(board, king_sq, side.opposite(), tables)
}
