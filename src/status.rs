use crate::board::Board;
use crate::moves::legal::generate_legal;
use crate::moves::square_control::in_check;
use crate::moves::tables::AttackTables;
use crate::moves::types::MoveList;

// Terminal states are ordinary outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InPlay,
    Stalemate,
    Checkmate,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InPlay
    }
}

/// Classify the side to move: no legal move and in check is checkmate, no
/// legal move otherwise is stalemate. Move-count and repetition draws are
/// outside this crate.
pub fn position_status(board: &mut Board, tables: &AttackTables) -> GameStatus {
    let mut legal = MoveList::new();
    let mut scratch = MoveList::new();
    generate_legal(board, tables, &mut legal, &mut scratch);
    if !legal.is_empty() {
        return GameStatus::InPlay;
    }

    if in_check(board, board.side_to_move(), tables) {
        GameStatus::Checkmate
    } else {
        GameStatus::Stalemate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::tables::test_tables;
    use std::str::FromStr;

    #[test]
    fn start_position_is_in_play() {
        let status = position_status(&mut Board::new(), test_tables());
        assert_eq!(status, GameStatus::InPlay);
        assert!(!status.is_over());
    }

    #[test]
    fn back_rank_mate() {
        let mut board = Board::from_str("3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(position_status(&mut board, test_tables()), GameStatus::Checkmate);
    }

    #[test]
    fn cornered_king_stalemate() {
        let mut board = Board::from_str("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(position_status(&mut board, test_tables()), GameStatus::Stalemate);
    }
}
