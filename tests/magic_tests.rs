mod common;

use common::{TEST_SEED, tables};
use magpie::moves::magic::attacks::{Slider, enumerate_blockers};
use magpie::moves::magic::loader::load_startup_magics;
use magpie::moves::magic::precompute::generate_magic_tables_with;
use magpie::moves::magic::structs::SavedMagic;
use magpie::moves::magic::{MagicError, MagicTableSeed, SavedMagics, SearchBudget, load_magics, save_magics};
use std::path::PathBuf;

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("magpie-it-{}-{}", std::process::id(), name))
}

#[test]
fn every_blocker_subset_resolves_to_true_attacks() {
    let magic = &tables().magic;
    for square in 0..64 {
        for slider in Slider::ALL {
            let entry = match slider {
                Slider::Rook => &magic.rook.entries[square],
                Slider::Bishop => &magic.bishop.entries[square],
            };
            assert_eq!(entry.mask, slider.mask(square));
            assert!(64 - entry.shift <= entry.mask.count_ones() + 2, "{} {square} too wide", slider.name());
            for blockers in enumerate_blockers(entry.mask) {
                assert_eq!(
                    entry.attacks(blockers),
                    slider.attacks(square, blockers),
                    "{} square {square} blockers {blockers:#x}",
                    slider.name()
                );
            }
        }
    }
}

#[test]
fn bits_outside_the_mask_are_ignored() {
    let magic = &tables().magic;
    // d4 rook: edge squares and far pieces never change the lookup
    let d4 = 27;
    let near = (1u64 << 29) | (1u64 << 43);
    let noise = (1u64 << 0) | (1u64 << 63) | (1u64 << 31) | (1u64 << 59);
    assert_eq!(magic.rook.get_attacks(d4, near), magic.rook.get_attacks(d4, near | noise));
    assert_eq!(magic.queen_attacks(d4, near), magic.rook.get_attacks(d4, near) | magic.bishop.get_attacks(d4, near));
}

#[test]
fn persisted_magics_load_back_identically() {
    let path = temp_file("roundtrip.bin");
    let magic = &tables().magic;
    save_magics(&path, magic).unwrap();

    let loaded = load_magics(&path).unwrap();
    assert_eq!(loaded.to_saved(), magic.to_saved());
    assert_eq!(loaded.table_len(), magic.table_len());

    let again = load_startup_magics(Some(&path)).unwrap();
    assert_eq!(again.to_saved(), magic.to_saved());
    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_startup_file_is_not_replaced_by_a_search() {
    let path = temp_file("never-written.bin");
    let err = load_startup_magics(Some(&path)).unwrap_err();
    assert!(matches!(err, MagicError::Io { .. }), "{err}");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_magics(temp_file("absent.bin")).unwrap_err();
    assert!(matches!(err, MagicError::Io { .. }), "{err}");
}

#[test]
fn truncated_file_fails_to_decode() {
    let path = temp_file("truncated.bin");
    let full = bincode::serialize(&tables().magic.to_saved()).unwrap();
    std::fs::write(&path, &full[..full.len() / 2]).unwrap();
    let err = load_magics(&path).unwrap_err();
    assert!(matches!(err, MagicError::Decode { .. }), "{err}");
    std::fs::remove_file(&path).ok();
}

#[test]
fn tampered_magic_is_rejected_on_load() {
    let path = temp_file("tampered.bin");
    let mut saved = tables().magic.to_saved();
    saved.bishop[35] = SavedMagic {
        magic: 1,
        shift: saved.bishop[35].shift,
    };
    std::fs::write(&path, bincode::serialize(&saved).unwrap()).unwrap();

    let err = load_magics(&path).unwrap_err();
    assert!(matches!(err, MagicError::Corrupt { .. }), "{err}");
    std::fs::remove_file(&path).ok();
}

#[test]
fn unknown_format_version_is_rejected() {
    let path = temp_file("version.bin");
    let saved = SavedMagics {
        version: SavedMagics::VERSION + 1,
        ..tables().magic.to_saved()
    };
    std::fs::write(&path, bincode::serialize(&saved).unwrap()).unwrap();
    assert!(matches!(load_magics(&path), Err(MagicError::Corrupt { .. })));
    std::fs::remove_file(&path).ok();
}

#[test]
fn starved_search_reports_exhaustion() {
    let budget = SearchBudget {
        attempts_per_shift: 1,
        max_extra_bits: 0,
    };
    let mut solved = 0;
    let err = generate_magic_tables_with(MagicTableSeed::Fixed(TEST_SEED), budget, |_, _| solved += 1).unwrap_err();
    assert!(matches!(err, MagicError::SearchExhausted { attempts: 1, .. }), "{err}");
    assert!(solved < 128);
}
