use crate::bitboard::{RANK_1, RANK_2, RANK_7, RANK_8};
use crate::board::{Board, Color, Piece, THREATS_CACHED};
use crate::moves::tables::AttackTables;
use crate::moves::types::{
    CAPTURE, DOUBLE_PAWN_PUSH, EN_PASSANT, KINGSIDE_CASTLE, Move, MoveBuffer, PROMOTION,
    PROMOTION_CAPTURE, QUEENSIDE_CASTLE, QUIET_MOVE,
};
use crate::square::Square;
use crate::utils::pop_lsb;

// Castling constants (white; black is the same pattern << 56)
const KINGSIDE_BETWEEN: u64 = 0x0000_0000_0000_0060; // f1 g1
const QUEENSIDE_BETWEEN: u64 = 0x0000_0000_0000_000E; // b1 c1 d1
const KINGSIDE_KING_PATH: u64 = 0x0000_0000_0000_0070; // e1 f1 g1
const QUEENSIDE_KING_PATH: u64 = 0x0000_0000_0000_001C; // c1 d1 e1

// Promotion Array
const PROMOS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

#[inline(always)]
fn back_rank_shift(color: Color) -> u32 {
    match color {
        Color::White => 0,
        Color::Black => 56,
    }
}

/// Helper functionality to push latest found move
#[inline(always)]
fn push_piece_moves(
    from: u8,
    mut targets: u64,
    enemy: u64,
    move_piece: Piece,
    move_list: &mut impl MoveBuffer,
) {
    while targets != 0 {
        let to = pop_lsb(&mut targets);
        let is_cap = (enemy >> to) & 1 != 0;
        move_list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(to),
            piece: move_piece,
            promotion: None,
            flags: if is_cap { CAPTURE } else { QUIET_MOVE },
        });
    }
}

#[inline(always)]
fn push_promotions(from: u8, to: u8, flags: u8, move_list: &mut impl MoveBuffer) {
    for &promo in PROMOS.iter() {
        move_list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(to),
            piece: Piece::Pawn,
            promotion: Some(promo),
            flags,
        });
    }
}

/// Moves for every knight, bishop, rook or queen of the side to move.
/// The enemy king is never a capture target.
fn generate_piece_moves(
    board: &Board,
    piece: Piece,
    attacks: impl Fn(usize, u64) -> u64,
    move_list: &mut impl MoveBuffer,
) {
    let color = board.side_to_move();
    let friendly = board.occupancy(color);
    let enemy_king = board.pieces(Piece::King, color.opposite());
    let enemy_without_king = board.opponent_occupancy(color) & !enemy_king;
    let blockers = board.occupied();

    let mut bb = board.pieces(piece, color);
    while bb != 0 {
        let from = pop_lsb(&mut bb);
        let targets = attacks(from as usize, blockers) & !friendly & !enemy_king;
        push_piece_moves(from, targets, enemy_without_king, piece, move_list);
    }
}

pub fn generate_knight_moves(board: &Board, tables: &AttackTables, move_list: &mut impl MoveBuffer) {
    generate_piece_moves(board, Piece::Knight, |sq, _| tables.knight_attacks(sq), move_list);
}

pub fn generate_bishop_moves(board: &Board, tables: &AttackTables, move_list: &mut impl MoveBuffer) {
    generate_piece_moves(board, Piece::Bishop, |sq, occ| tables.bishop_attacks(sq, occ), move_list);
}

pub fn generate_rook_moves(board: &Board, tables: &AttackTables, move_list: &mut impl MoveBuffer) {
    generate_piece_moves(board, Piece::Rook, |sq, occ| tables.rook_attacks(sq, occ), move_list);
}

pub fn generate_queen_moves(board: &Board, tables: &AttackTables, move_list: &mut impl MoveBuffer) {
    generate_piece_moves(board, Piece::Queen, |sq, occ| tables.queen_attacks(sq, occ), move_list);
}

/// King steps plus castling. Castling needs the rights bit, the rook at home,
/// an empty path, and no opponent attack on the king's start, transit or
/// destination square.
pub fn generate_king_moves(board: &Board, tables: &AttackTables, move_list: &mut impl MoveBuffer) {
    let color = board.side_to_move();
    let king_bb = board.pieces(Piece::King, color);

    if king_bb == 0 {
        return;
    } // illegal position safeguard

    let from = king_bb.trailing_zeros() as u8; // only one king
    let friendly = board.occupancy(color);
    let enemy_king = board.pieces(Piece::King, color.opposite());
    let enemy = board.opponent_occupancy(color) & !enemy_king;

    let targets = tables.king_attacks(from as usize) & !friendly & !enemy_king;
    push_piece_moves(from, targets, enemy, Piece::King, move_list);

    let can_kingside = board.has_kingside_castle(color);
    let can_queenside = board.has_queenside_castle(color);
    if !can_kingside && !can_queenside {
        return;
    }

    let shift = back_rank_shift(color);
    let home = 4 + shift as u8;
    if from != home {
        return;
    }

    let occ = board.occupied();
    let rooks = board.pieces(Piece::Rook, color);
    // Only paid for when a castle is actually on the table.
    let mut threats = None;
    let mut threatened = || *threats.get_or_insert_with(|| opponent_threats(board, tables));

    if can_kingside
        && (occ & (KINGSIDE_BETWEEN << shift)) == 0
        && (rooks >> (home + 3)) & 1 != 0
        && threatened() & (KINGSIDE_KING_PATH << shift) == 0
    {
        move_list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(from + 2), // g-file
            piece: Piece::King,
            promotion: None,
            flags: KINGSIDE_CASTLE,
        });
    }

    if can_queenside
        && (occ & (QUEENSIDE_BETWEEN << shift)) == 0
        && (rooks >> (home - 4)) & 1 != 0
        && threatened() & (QUEENSIDE_KING_PATH << shift) == 0
    {
        move_list.push(Move {
            from: Square::from_index(from),
            to: Square::from_index(from - 2), // c-file
            piece: Piece::King,
            promotion: None,
            flags: QUEENSIDE_CASTLE,
        });
    }
}

pub fn generate_pawn_moves(board: &Board, tables: &AttackTables, move_list: &mut impl MoveBuffer) {
    let color = board.side_to_move();
    let pawns = board.pieces(Piece::Pawn, color);
    let enemy_without_king =
        board.opponent_occupancy(color) & !board.pieces(Piece::King, color.opposite());
    let empty = !board.occupied();

    // Rank masks
    let (start_rank, pre_promo_rank, promo_rank) = match color {
        Color::White => (RANK_2, RANK_7, RANK_8),
        Color::Black => (RANK_7, RANK_2, RANK_1),
    };
    let forward = |bb: u64| match color {
        Color::White => bb << 8,
        Color::Black => bb >> 8,
    };
    let back = |to: u8, ranks: u8| match color {
        Color::White => to - 8 * ranks,
        Color::Black => to + 8 * ranks,
    };

    // ===== 1) Quiet single pushes (exclude promotion rank) =====
    let single_pushes = forward(pawns) & empty;
    let mut bb = single_pushes & !promo_rank;
    while bb != 0 {
        let to = pop_lsb(&mut bb);
        move_list.push(Move {
            from: Square::from_index(back(to, 1)),
            to: Square::from_index(to),
            piece: Piece::Pawn,
            promotion: None,
            flags: QUIET_MOVE,
        });
    }

    // ===== 2) Double pushes, both squares empty =====
    let mut bb = forward(forward(pawns & start_rank) & empty) & empty;
    while bb != 0 {
        let to = pop_lsb(&mut bb);
        move_list.push(Move {
            from: Square::from_index(back(to, 2)),
            to: Square::from_index(to),
            piece: Piece::Pawn,
            promotion: None,
            flags: DOUBLE_PAWN_PUSH,
        });
    }

    // ===== 3) Captures; promotion captures fan out to four moves =====
    let mut attackers = pawns;
    while attackers != 0 {
        let from = pop_lsb(&mut attackers);
        let mut targets = tables.pawn_attacks(from as usize, color) & enemy_without_king;
        while targets != 0 {
            let to = pop_lsb(&mut targets);
            if (promo_rank >> to) & 1 != 0 {
                push_promotions(from, to, PROMOTION_CAPTURE, move_list);
            } else {
                move_list.push(Move {
                    from: Square::from_index(from),
                    to: Square::from_index(to),
                    piece: Piece::Pawn,
                    promotion: None,
                    flags: CAPTURE,
                });
            }
        }
    }

    // ===== 4) Promotion pushes =====
    let mut bb = forward(pawns & pre_promo_rank) & empty;
    while bb != 0 {
        let to = pop_lsb(&mut bb);
        push_promotions(back(to, 1), to, PROMOTION, move_list);
    }

    // ===== 5) En passant: target set and the double-pushed pawn still there =====
    if let Some(ep_sq) = board.en_passant {
        let ep = ep_sq.index();
        let enemy_pawns = board.pieces(Piece::Pawn, color.opposite());
        if (empty >> ep) & 1 != 0 && (enemy_pawns >> back(ep, 1)) & 1 != 0 {
            let mut atk = pawns & tables.pawn_attacks(ep as usize, color.opposite());
            while atk != 0 {
                let from = pop_lsb(&mut atk);
                move_list.push(Move {
                    from: Square::from_index(from),
                    to: ep_sq,
                    piece: Piece::Pawn,
                    promotion: None,
                    flags: EN_PASSANT,
                });
            }
        }
    }
}

/// Every square `color` attacks with the current occupancy, own pieces
/// included as targets. Pawns count their diagonals only.
pub fn attack_map(board: &Board, tables: &AttackTables, color: Color) -> u64 {
    let occ = board.occupied();
    let mut attacks = 0u64;

    let mut bb = board.pieces(Piece::Pawn, color);
    while bb != 0 {
        attacks |= tables.pawn_attacks(pop_lsb(&mut bb) as usize, color);
    }
    let mut bb = board.pieces(Piece::Knight, color);
    while bb != 0 {
        attacks |= tables.knight_attacks(pop_lsb(&mut bb) as usize);
    }
    let mut bb = board.pieces(Piece::Bishop, color) | board.pieces(Piece::Queen, color);
    while bb != 0 {
        attacks |= tables.bishop_attacks(pop_lsb(&mut bb) as usize, occ);
    }
    let mut bb = board.pieces(Piece::Rook, color) | board.pieces(Piece::Queen, color);
    while bb != 0 {
        attacks |= tables.rook_attacks(pop_lsb(&mut bb) as usize, occ);
    }
    let mut bb = board.pieces(Piece::King, color);
    while bb != 0 {
        attacks |= tables.king_attacks(pop_lsb(&mut bb) as usize);
    }

    attacks
}

/// Threat-map phase: cache the attack map of the side not to move.
/// Any make or side change invalidates it.
pub fn refresh_threats(board: &mut Board, tables: &AttackTables) {
    if board.threats_cached() {
        return;
    }
    let them = board.side_to_move().opposite();
    board.threatened[them as usize] = attack_map(board, tables, them);
    board.flags |= THREATS_CACHED;
}

/// Opponent attack map: the cached one when valid, otherwise computed now.
#[inline]
pub fn opponent_threats(board: &Board, tables: &AttackTables) -> u64 {
    let them = board.side_to_move().opposite();
    if board.threats_cached() {
        board.threatened[them as usize]
    } else {
        attack_map(board, tables, them)
    }
}

/// All pseudo-legal moves for the side to move, in piece order pawn, knight,
/// bishop, rook, queen, king. Clears `moves` first.
pub fn generate_pseudo_legal(board: &Board, tables: &AttackTables, moves: &mut impl MoveBuffer) {
    moves.clear();
    generate_pawn_moves(board, tables, moves);
    generate_knight_moves(board, tables, moves);
    generate_bishop_moves(board, tables, moves);
    generate_rook_moves(board, tables, moves);
    generate_queen_moves(board, tables, moves);
    generate_king_moves(board, tables, moves);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::tables::test_tables as tables;
    use crate::moves::types::MoveList;
    use std::str::FromStr;

    fn pseudo(fen: &str) -> MoveList {
        let board = Board::from_str(fen).unwrap();
        let mut moves = MoveList::new();
        generate_pseudo_legal(&board, tables(), &mut moves);
        moves
    }

    #[test]
    fn start_position_has_twenty_moves_in_piece_order() {
        let mut moves = MoveList::new();
        generate_pseudo_legal(&Board::new(), tables(), &mut moves);
        assert_eq!(moves.len(), 20);
        assert!(moves[..16].iter().all(|m| m.piece == Piece::Pawn));
        assert!(moves[16..].iter().all(|m| m.piece == Piece::Knight));
        assert_eq!(moves.iter().filter(|m| m.is_double_pawn_push()).count(), 8);
    }

    #[test]
    fn promotion_push_and_capture_fan_out() {
        // b7 pawn can push to b8 or take a8/c8
        let moves = pseudo("r1n1k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        let promos: Vec<_> = moves.iter().filter(|m| m.is_promotion()).collect();
        assert_eq!(promos.len(), 12);
        assert_eq!(promos.iter().filter(|m| m.flags == PROMOTION_CAPTURE).count(), 8);
        assert!(promos.iter().all(|m| m.promotion.is_some()));
    }

    #[test]
    fn black_pawns_push_down_the_board() {
        let moves = pseudo("4k3/3p4/8/8/8/8/8/4K3 b - - 0 1");
        let pawn: Vec<_> = moves.iter().filter(|m| m.piece == Piece::Pawn).map(|m| m.to_uci()).collect();
        assert_eq!(pawn, vec!["d7d6", "d7d5"]);
    }

    #[test]
    fn en_passant_requires_the_captured_pawn() {
        let moves = pseudo("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        assert_eq!(moves.iter().filter(|m| m.is_en_passant()).count(), 1);

        // same target square but nothing on d5
        let mut board = Board::from_str("4k3/8/8/4P3/8/8/8/4K3 w - - 0 1").unwrap();
        board.en_passant = Some(Square::from_str("d6").unwrap());
        let mut list = MoveList::new();
        generate_pseudo_legal(&board, tables(), &mut list);
        assert!(list.iter().all(|m| !m.is_en_passant()));
    }

    #[test]
    fn enemy_king_is_never_a_target() {
        let moves = pseudo("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1");
        let rook: Vec<_> = moves.iter().filter(|m| m.piece == Piece::Rook).collect();
        assert_eq!(rook.len(), 11); // e2..e7, a1..d1, f1
        assert!(rook.iter().all(|m| m.to.index() != 60));
    }

    #[test]
    fn castling_blocked_by_attacked_transit_square() {
        // black rook on f8 covers f1
        let moves = pseudo("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(!moves.iter().any(|m| m.is_kingside_castle()));
        assert!(moves.iter().any(|m| m.is_queenside_castle()));
    }

    #[test]
    fn queenside_castle_ignores_attacks_on_b_file() {
        // b1 is attacked but the king never crosses it
        let moves = pseudo("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(moves.iter().any(|m| m.is_queenside_castle()));
    }

    #[test]
    fn refresh_threats_fills_cache_for_opponent() {
        let mut board = Board::new();
        assert!(!board.threats_cached());
        refresh_threats(&mut board, tables());
        assert!(board.threats_cached());
        assert_eq!(board.threatened[Color::Black as usize], attack_map(&board, tables(), Color::Black));
        assert_eq!(opponent_threats(&board, tables()), board.threatened[Color::Black as usize]);
        // black's pawns cover the whole sixth rank
        assert_eq!(board.threatened[Color::Black as usize] & 0x0000_FF00_0000_0000, 0x0000_FF00_0000_0000);
    }
}
