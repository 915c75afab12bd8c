use super::attacks::Slider;
use super::error::MagicError;
use rand::RngCore;
use tracing::{debug, trace};

/// Limits for the per-square magic search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Random candidates tried at each index width before widening.
    pub attempts_per_shift: u64,
    /// How many index bits beyond `popcount(mask)` may be added.
    pub max_extra_bits: u32,
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget {
            attempts_per_shift: 1_000_000,
            max_extra_bits: 2,
        }
    }
}

/// A magic that passed, with its filled attack table.
#[derive(Debug)]
pub struct FoundMagic {
    pub magic: u64,
    pub shift: u32,
    pub table: Box<[u64]>,
}

#[inline(always)]
// Generate a sparse 64-bit number by AND-ing three random values.
// Few set bits makes collisions in the high index bits less likely.
pub fn random_sparse_u64<R: RngCore>(rng: &mut R) -> u64 {
    rng.next_u64() & rng.next_u64() & rng.next_u64()
}

#[inline(always)]
pub fn magic_index(blockers: u64, magic: u64, shift: u32) -> usize {
    (blockers.wrapping_mul(magic) >> shift) as usize
}

/// Hash every blocker set into a table of `1 << (64 - shift)` slots. Fails on
/// the first slot claimed by two different attack sets; equal attack sets may
/// share a slot.
pub fn try_fill_table(blockers: &[u64], attacks: &[u64], magic: u64, shift: u32) -> Option<Box<[u64]>> {
    debug_assert_eq!(blockers.len(), attacks.len());
    debug_assert!(shift > 0 && shift < 64);

    let size = 1usize << (64 - shift);
    let mut table = vec![0u64; size];
    let mut used = vec![false; size];

    for (&blocker, &attack) in blockers.iter().zip(attacks) {
        let index = magic_index(blocker, magic, shift);
        if !used[index] {
            used[index] = true;
            table[index] = attack;
        } else if table[index] != attack {
            return None;
        }
    }

    Some(table.into_boxed_slice())
}

/// Search for a collision-free magic for one square.
///
/// Starts at `shift = 64 - popcount(mask)` (one index bit per relevant
/// square) and adds an index bit each time `attempts_per_shift` candidates
/// fail, up to `max_extra_bits`.
pub fn find_magic_number_for_square<R: RngCore>(
    slider: Slider,
    square: usize,
    mask: u64,
    blockers: &[u64],
    attacks: &[u64],
    budget: SearchBudget,
    rng: &mut R,
) -> Result<FoundMagic, MagicError> {
    let base_shift = 64 - mask.count_ones();
    let mut total_attempts = 0u64;

    for extra in 0..=budget.max_extra_bits {
        let shift = base_shift.saturating_sub(extra).max(1);
        for attempt in 0..budget.attempts_per_shift {
            let magic = random_sparse_u64(rng);
            // Cheap reject: the top byte of mask*magic must carry enough bits to spread indices.
            if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
                continue;
            }
            if let Some(table) = try_fill_table(blockers, attacks, magic, shift) {
                trace!(slider = slider.name(), square, shift, attempt, "magic found");
                return Ok(FoundMagic { magic, shift, table });
            }
        }
        total_attempts += budget.attempts_per_shift;
        debug!(
            slider = slider.name(),
            square,
            shift,
            "attempt budget exhausted, widening index by one bit"
        );
    }

    Err(MagicError::SearchExhausted {
        slider,
        square,
        attempts: total_attempts,
    })
}
