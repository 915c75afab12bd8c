pub mod bitboard;
pub mod board;
#[cfg(feature = "cli")]
pub mod logger;
pub mod moves;
pub mod square;
pub mod status;
pub mod utils;
