// src/board/flags.rs

/// Packed board flags: castling rights, side to move and the threat-cache bit.
pub type BoardFlags = u8;

pub const CASTLE_WK: BoardFlags = 0b0000_0001;
pub const CASTLE_WQ: BoardFlags = 0b0000_0010;
pub const CASTLE_BK: BoardFlags = 0b0000_0100;
pub const CASTLE_BQ: BoardFlags = 0b0000_1000;
pub const CASTLE_ALL: BoardFlags = CASTLE_WK | CASTLE_WQ | CASTLE_BK | CASTLE_BQ;

/// Set when White is to move.
pub const WHITE_TO_MOVE: BoardFlags = 0b0001_0000;

/// Set while `Board::threatened[side not to move]` matches the current position.
pub const THREATS_CACHED: BoardFlags = 0b0010_0000;
