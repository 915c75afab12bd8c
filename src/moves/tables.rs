use crate::board::Color;
use crate::moves::king::king_attack_table;
use crate::moves::knight::knight_attack_table;
use crate::moves::magic::{MagicError, MagicTables, load_magic_tables};
use crate::moves::pawn::pawn_attack_table;

/// Every precomputed attack lookup the generator needs. Built once, then
/// shared by reference; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct AttackTables {
    pub knight: [u64; 64],
    pub king: [u64; 64],
    /// Indexed `[color][square]`.
    pub pawn: [[u64; 64]; 2],
    pub magic: MagicTables,
}

impl AttackTables {
    pub fn new(magic: MagicTables) -> Self {
        AttackTables {
            knight: knight_attack_table(),
            king: king_attack_table(),
            pawn: pawn_attack_table(),
            magic,
        }
    }

    /// Leaper tables plus magics from [`load_magic_tables`].
    pub fn load() -> Result<Self, MagicError> {
        Ok(Self::new(load_magic_tables()?))
    }

    #[inline(always)]
    pub fn knight_attacks(&self, square: usize) -> u64 {
        self.knight[square]
    }

    #[inline(always)]
    pub fn king_attacks(&self, square: usize) -> u64 {
        self.king[square]
    }

    #[inline(always)]
    pub fn pawn_attacks(&self, square: usize, color: Color) -> u64 {
        self.pawn[color as usize][square]
    }

    #[inline(always)]
    pub fn rook_attacks(&self, square: usize, occupancy: u64) -> u64 {
        self.magic.rook.get_attacks(square, occupancy)
    }

    #[inline(always)]
    pub fn bishop_attacks(&self, square: usize, occupancy: u64) -> u64 {
        self.magic.bishop.get_attacks(square, occupancy)
    }

    #[inline(always)]
    pub fn queen_attacks(&self, square: usize, occupancy: u64) -> u64 {
        self.magic.queen_attacks(square, occupancy)
    }
}

/// Tables from a fixed seed, built once per test binary.
#[cfg(test)]
pub(crate) fn test_tables() -> &'static AttackTables {
    use crate::moves::magic::{MagicTableSeed, generate_magic_tables};
    use std::sync::OnceLock;

    static TABLES: OnceLock<AttackTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let magic = generate_magic_tables(MagicTableSeed::Fixed(0x45)).expect("Failed to generate magic tables");
        AttackTables::new(magic)
    })
}
