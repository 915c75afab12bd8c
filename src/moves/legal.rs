use crate::board::Board;
use crate::moves::execute::{make_move, unmake_move};
use crate::moves::movegen::{generate_pseudo_legal, refresh_threats};
use crate::moves::square_control::in_check;
use crate::moves::tables::AttackTables;
use crate::moves::types::{Move, MoveBuffer};

/// Which moves `generate_moves` should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legality {
    /// King safety unchecked.
    Pseudo,
    /// Only moves that do not leave the mover's king attacked.
    Legal,
}

/// Push every move of `pseudo` that keeps the mover's king safe into `out`
/// (cleared first). `board` is left exactly as it was.
pub fn legalize(board: &mut Board, tables: &AttackTables, pseudo: &[Move], out: &mut impl MoveBuffer) {
    out.clear();
    for &mv in pseudo {
        if is_legal_move(board, mv, tables) {
            out.push(mv);
        }
    }
}

/// Threat phase first, then move generation. Legal mode filters the
/// pseudo-legal list with make/unmake; the threat phase only computes
/// attacks, so filtering never re-enters itself.
pub fn generate_moves(board: &mut Board, tables: &AttackTables, out: &mut impl MoveBuffer, mode: Legality) {
    refresh_threats(board, tables);
    match mode {
        Legality::Pseudo => generate_pseudo_legal(board, tables, out),
        Legality::Legal => {
            let mut scratch = Vec::with_capacity(64);
            generate_pseudo_legal(board, tables, &mut scratch);
            legalize(board, tables, &scratch, out);
        }
    }
}

/// Legal moves into `moves`, using `scratch` for the pseudo-legal list.
/// Lets hot loops such as perft reuse buffers per ply.
pub fn generate_legal(
    board: &mut Board,
    tables: &AttackTables,
    moves: &mut impl MoveBuffer,
    scratch: &mut impl MoveBuffer,
) {
    refresh_threats(board, tables);
    generate_pseudo_legal(board, tables, scratch);
    legalize(board, tables, &**scratch, moves);
}

/// Check if a pseudo-legal move is legal (doesn't leave own king in check).
/// Castling path safety is already enforced at generation time.
#[inline]
pub fn is_legal_move(board: &mut Board, mv: Move, tables: &AttackTables) -> bool {
    let mover = board.side_to_move();
    let undo = make_move(board, mv);
    let illegal = in_check(board, mover, tables);
    unmake_move(board, undo);
    !illegal
}
