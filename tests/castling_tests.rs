mod common;

use common::{board, tables, uci};
use magpie::board::{CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use magpie::moves::types::Move;
use magpie::moves::{Legality, generate_moves};

fn castles(fen: &str) -> Vec<String> {
    let mut b = board(fen);
    let mut moves: Vec<Move> = Vec::new();
    generate_moves(&mut b, tables(), &mut moves, Legality::Legal);
    let castling: Vec<Move> = moves.into_iter().filter(|m| m.is_castling()).collect();
    uci(&castling)
}

fn find(fen: &str, name: &str) -> (magpie::board::Board, Move) {
    let mut b = board(fen);
    let mut moves: Vec<Move> = Vec::new();
    generate_moves(&mut b, tables(), &mut moves, Legality::Legal);
    let mv = moves
        .into_iter()
        .find(|m| m.to_uci() == name)
        .unwrap_or_else(|| panic!("{name} not legal in {fen}"));
    (b, mv)
}

#[test]
fn both_sides_available_when_clear() {
    assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"), vec!["e1c1", "e1g1"]);
    assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1"), vec!["e8c8", "e8g8"]);
}

#[test]
fn no_castling_out_of_check() {
    assert!(castles("r3k2r/8/8/8/1b6/8/8/R3K2R w KQkq - 0 1").is_empty());
}

#[test]
fn no_castling_through_attacked_square() {
    // Rf8 covers f1, so only queenside remains
    assert_eq!(castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1c1"]);
    // Rd8 covers d1
    assert_eq!(castles("3rk3/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1g1"]);
}

#[test]
fn no_castling_into_attacked_square() {
    assert_eq!(castles("4k1r1/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1c1"]);
}

#[test]
fn attacked_b_file_square_does_not_block_queenside() {
    // b1 is only passed by the rook
    assert_eq!(castles("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1c1", "e1g1"]);
}

#[test]
fn occupied_path_blocks_castling() {
    assert_eq!(castles("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1"), Vec::<String>::new());
    assert_eq!(castles("rn2k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1"), vec!["e8g8"]);
}

#[test]
fn missing_rights_mean_no_castling() {
    assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1"), vec!["e1g1"]);
    assert!(castles("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").is_empty());
}

#[test]
fn king_move_clears_both_rights() {
    let (mut b, mv) = find("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1f1");
    let undo = b.make(mv);
    assert_eq!(b.castling_rights(), CASTLE_BK | CASTLE_BQ);
    b.unmake(undo);
    assert_eq!(b.castling_rights(), CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ);
}

#[test]
fn rook_move_clears_one_right() {
    let (mut b, mv) = find("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "h8h5");
    let _undo = b.make(mv);
    assert_eq!(b.castling_rights(), CASTLE_WK | CASTLE_WQ | CASTLE_BQ);
}

#[test]
fn rook_captured_on_home_square_clears_right() {
    let (mut b, mv) = find("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "a1a8");
    let _undo = b.make(mv);
    assert_eq!(b.castling_rights(), CASTLE_WK | CASTLE_BK);
}

#[test]
fn castling_relocates_rook() {
    let (mut b, mv) = find("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "e8c8");
    assert!(mv.is_queenside_castle());
    let undo = b.make(mv);
    assert_eq!(b.to_fen(), "2kr3r/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    b.unmake(undo);
    assert_eq!(b.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
}
