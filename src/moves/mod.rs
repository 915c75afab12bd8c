pub mod execute;
pub mod king;
pub mod knight;
pub mod legal;
pub mod magic;
pub mod movegen;
pub mod pawn;
pub mod perft;
pub mod square_control;
pub mod tables;
pub mod types;

pub use legal::{Legality, generate_legal, generate_moves, legalize};
pub use tables::AttackTables;
pub use types::{Move, MoveList, Undo};
