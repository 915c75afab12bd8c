#![allow(dead_code)]

use magpie::board::Board;
use magpie::moves::AttackTables;
use magpie::moves::magic::{MagicTableSeed, generate_magic_tables};
use magpie::moves::types::Move;
use once_cell::sync::Lazy;
use std::str::FromStr;

/// One constant seed for repeatable results (0x45 == 69 decimal)
pub const TEST_SEED: u64 = 0x45;

pub static TABLES: Lazy<AttackTables> = Lazy::new(|| {
    let magic = generate_magic_tables(MagicTableSeed::Fixed(TEST_SEED)).expect("Failed to generate magic tables");
    AttackTables::new(magic)
});

pub fn tables() -> &'static AttackTables {
    &TABLES
}

pub fn board(fen: &str) -> Board {
    Board::from_str(fen).unwrap_or_else(|e| panic!("bad test FEN {fen}: {e}"))
}

pub fn uci(moves: &[Move]) -> Vec<String> {
    let mut out: Vec<String> = moves.iter().map(|m| m.to_uci()).collect();
    out.sort();
    out
}

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
pub const KIWI_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
