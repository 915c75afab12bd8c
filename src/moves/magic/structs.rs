use super::search::magic_index;
use serde::{Deserialize, Serialize};

/// A single magic bitboard entry used to compute sliding piece attacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicEntry {
    /// The magic number used to hash blocker bitboards into attack indices.
    pub magic: u64,

    /// The number of bits to shift after multiplication to get the table index.
    pub shift: u32,

    /// Relevant-blocker mask for this square (no edges, not the square itself).
    pub mask: u64,

    /// The precomputed attack table indexed by (blockers * magic) >> shift.
    pub table: Box<[u64]>,
}

impl MagicEntry {
    #[inline(always)]
    pub fn attacks(&self, occupancy: u64) -> u64 {
        self.table[magic_index(occupancy & self.mask, self.magic, self.shift)]
    }
}

#[derive(Debug, Clone)]
pub struct RookMagicTables {
    pub entries: Vec<MagicEntry>,
}

#[derive(Debug, Clone)]
pub struct BishopMagicTables {
    pub entries: Vec<MagicEntry>,
}

/// Rook and bishop lookup tables for all 64 squares. Immutable once built.
#[derive(Debug, Clone)]
pub struct MagicTables {
    pub rook: RookMagicTables,
    pub bishop: BishopMagicTables,
}

impl RookMagicTables {
    /// Returns the rook attack bitboard for a given square and blockers.
    #[inline(always)]
    pub fn get_attacks(&self, square: usize, blockers: u64) -> u64 {
        self.entries[square].attacks(blockers)
    }
}

impl BishopMagicTables {
    /// Returns the bishop attack bitboard for a given square and blockers.
    #[inline(always)]
    pub fn get_attacks(&self, square: usize, blockers: u64) -> u64 {
        self.entries[square].attacks(blockers)
    }
}

impl MagicTables {
    /// Returns queen attacks by combining rook and bishop magic lookups.
    #[inline(always)]
    pub fn queen_attacks(&self, square: usize, blockers: u64) -> u64 {
        self.rook.get_attacks(square, blockers) | self.bishop.get_attacks(square, blockers)
    }

    /// The persistable part of the tables: magic and shift per square.
    pub fn to_saved(&self) -> SavedMagics {
        let pairs = |entries: &[MagicEntry]| {
            entries
                .iter()
                .map(|e| SavedMagic {
                    magic: e.magic,
                    shift: e.shift,
                })
                .collect()
        };
        SavedMagics {
            version: SavedMagics::VERSION,
            rook: pairs(&self.rook.entries),
            bishop: pairs(&self.bishop.entries),
        }
    }

    /// Total attack-table slots across both piece types.
    pub fn table_len(&self) -> usize {
        self.rook
            .entries
            .iter()
            .chain(&self.bishop.entries)
            .map(|e| e.table.len())
            .sum()
    }
}

/// One persisted (magic, shift) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMagic {
    pub magic: u64,
    pub shift: u32,
}

/// On-disk form of the magic parameters: 64 rook and 64 bishop pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMagics {
    pub version: u32,
    pub rook: Vec<SavedMagic>,
    pub bishop: Vec<SavedMagic>,
}

impl SavedMagics {
    pub const VERSION: u32 = 1;
}
