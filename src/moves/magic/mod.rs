//! Magic bitboards for rook, bishop and queen attacks: relevant masks,
//! the per-square multiplier search, and persistence of the found magics.

pub mod attacks;
pub mod error;
pub mod loader;
pub mod precompute;
pub mod search;
pub mod structs;

pub use attacks::Slider;
pub use error::MagicError;
pub use loader::{load_magic_tables, load_magics, save_magics};
pub use precompute::{MagicTableSeed, generate_magic_tables};
pub use search::SearchBudget;
pub use structs::{MagicEntry, MagicTables, SavedMagics};
