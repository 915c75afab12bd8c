use super::attacks::{Slider, attack_bitboards, enumerate_blockers};
use super::error::MagicError;
use super::search::{SearchBudget, find_magic_number_for_square, try_fill_table};
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables, SavedMagic, SavedMagics};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};

/// Seed used by the loader when `deterministic_magic` is enabled.
pub const DEFAULT_SEED: u64 = 0x45;

/// Largest table a persisted shift may ask for (2^20 slots).
const MAX_INDEX_BITS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicTableSeed {
    /// Fresh OS entropy; different magics every run.
    Random,
    /// Reproducible search.
    Fixed(u64),
}

impl MagicTableSeed {
    fn rng(self) -> StdRng {
        match self {
            MagicTableSeed::Random => StdRng::from_os_rng(),
            MagicTableSeed::Fixed(seed) => StdRng::seed_from_u64(seed),
        }
    }
}

/// Search magics for all 128 slider squares with the default budget.
pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, MagicError> {
    generate_magic_tables_with(seed, SearchBudget::default(), |_, _| {})
}

/// Search magics for every rook square then every bishop square.
/// `on_square` runs after each square is solved.
#[instrument(level = "info", skip(on_square))]
pub fn generate_magic_tables_with(
    seed: MagicTableSeed,
    budget: SearchBudget,
    mut on_square: impl FnMut(Slider, usize),
) -> Result<MagicTables, MagicError> {
    let mut rng = seed.rng();
    let mut rook = Vec::with_capacity(64);
    let mut bishop = Vec::with_capacity(64);

    for slider in Slider::ALL {
        let entries = match slider {
            Slider::Rook => &mut rook,
            Slider::Bishop => &mut bishop,
        };
        for square in 0..64 {
            let mask = slider.mask(square);
            let blockers = enumerate_blockers(mask);
            let attacks = attack_bitboards(slider, square, &blockers);
            let found = find_magic_number_for_square(slider, square, mask, &blockers, &attacks, budget, &mut rng)?;
            entries.push(MagicEntry {
                magic: found.magic,
                shift: found.shift,
                mask,
                table: found.table,
            });
            on_square(slider, square);
        }
    }

    let tables = MagicTables {
        rook: RookMagicTables { entries: rook },
        bishop: BishopMagicTables { entries: bishop },
    };
    info!(slots = tables.table_len(), "magic tables generated");
    Ok(tables)
}

/// Rebuild lookup tables from persisted (magic, shift) pairs. Every pair is
/// re-verified against the true attacks; any collision means the data is bad.
pub fn build_from_saved(saved: &SavedMagics) -> Result<MagicTables, MagicError> {
    if saved.version != SavedMagics::VERSION {
        return Err(MagicError::Corrupt {
            reason: format!("format version {} (expected {})", saved.version, SavedMagics::VERSION),
        });
    }

    let rook = build_entries(Slider::Rook, &saved.rook)?;
    let bishop = build_entries(Slider::Bishop, &saved.bishop)?;

    Ok(MagicTables {
        rook: RookMagicTables { entries: rook },
        bishop: BishopMagicTables { entries: bishop },
    })
}

fn build_entries(slider: Slider, pairs: &[SavedMagic]) -> Result<Vec<MagicEntry>, MagicError> {
    if pairs.len() != 64 {
        return Err(MagicError::Corrupt {
            reason: format!("{} {} entries (expected 64)", pairs.len(), slider.name()),
        });
    }

    pairs
        .iter()
        .enumerate()
        .map(|(square, saved)| {
            let mask = slider.mask(square);
            if !(64 - MAX_INDEX_BITS..64).contains(&saved.shift) {
                return Err(MagicError::Corrupt {
                    reason: format!("{} square {}: shift {} out of range", slider.name(), square, saved.shift),
                });
            }
            let blockers = enumerate_blockers(mask);
            let attacks = attack_bitboards(slider, square, &blockers);
            let table = try_fill_table(&blockers, &attacks, saved.magic, saved.shift).ok_or_else(|| {
                MagicError::Corrupt {
                    reason: format!("{} square {}: magic {:#018x} collides", slider.name(), square, saved.magic),
                }
            })?;
            Ok(MagicEntry {
                magic: saved.magic,
                shift: saved.shift,
                mask,
                table,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::tables::test_tables;

    fn shared() -> &'static MagicTables {
        &test_tables().magic
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        // shared tables come from the same seed
        let again = generate_magic_tables(MagicTableSeed::Fixed(DEFAULT_SEED)).unwrap();
        assert_eq!(again.to_saved(), shared().to_saved());
    }

    #[test]
    fn saved_magics_rebuild_identical_tables() {
        let rebuilt = build_from_saved(&shared().to_saved()).unwrap();
        for sq in 0..64 {
            assert_eq!(rebuilt.rook.entries[sq], shared().rook.entries[sq]);
            assert_eq!(rebuilt.bishop.entries[sq], shared().bishop.entries[sq]);
        }
    }

    #[test]
    fn colliding_magic_is_corrupt() {
        let mut saved = shared().to_saved();
        saved.rook[0].magic = 0;
        let err = build_from_saved(&saved).unwrap_err();
        assert!(matches!(err, MagicError::Corrupt { .. }), "{err}");
    }

    #[test]
    fn oversized_shift_request_is_corrupt() {
        let mut saved = shared().to_saved();
        saved.bishop[9].shift = 2;
        assert!(matches!(build_from_saved(&saved), Err(MagicError::Corrupt { .. })));
    }

    #[test]
    fn short_entry_list_is_corrupt() {
        let mut saved = shared().to_saved();
        saved.bishop.pop();
        assert!(matches!(build_from_saved(&saved), Err(MagicError::Corrupt { .. })));
    }

    #[test]
    fn wrong_version_is_corrupt() {
        let mut saved = shared().to_saved();
        saved.version += 1;
        assert!(matches!(build_from_saved(&saved), Err(MagicError::Corrupt { .. })));
    }

    #[test]
    fn progress_callback_sees_every_square() {
        let mut seen = 0;
        generate_magic_tables_with(MagicTableSeed::Fixed(3), SearchBudget::default(), |_, _| seen += 1).unwrap();
        assert_eq!(seen, 128);
    }
}
