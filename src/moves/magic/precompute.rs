//! Generates magic bitboard tables from scratch: relevant-occupancy masks,
//! blocker subset enumeration (carry-rippler), and per-square magic search.

use super::attacks::{bishop_attacks_per_square, rook_attacks_per_square};
use super::search::find_magic_number_for_square;
use super::structs::{BishopMagicTables, MagicEntry, MagicTables, RookMagicTables};
use rand::{RngCore, SeedableRng, rngs::StdRng};

/// Controls how the magic-number search seeds its RNG.
pub enum MagicTableSeed {
    /// Reproducible search, used by tests and `deterministic_magic` builds.
    Fixed(u64),
    Random,
}

fn make_rng(seed: MagicTableSeed) -> StdRng {
    match seed {
        MagicTableSeed::Fixed(s) => StdRng::seed_from_u64(s),
        MagicTableSeed::Random => {
            let mut seed_bytes = [0u8; 32];
            rand::rng().fill_bytes(&mut seed_bytes);
            StdRng::from_seed(seed_bytes)
        }
    }
}

/// Relevant occupancy mask for a rook on `square`: same rank/file, excluding
/// the board edge (the edge square is always reachable regardless of what
/// sits on it, so it never needs to vary the index).
fn rook_relevant_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;

    for r in (rank + 1)..7 {
        mask |= 1u64 << (r * 8 + file);
    }
    for r in (1..rank).rev() {
        mask |= 1u64 << (r * 8 + file);
    }
    for f in (file + 1)..7 {
        mask |= 1u64 << (rank * 8 + f);
    }
    for f in (1..file).rev() {
        mask |= 1u64 << (rank * 8 + f);
    }
    mask
}

/// Relevant occupancy mask for a bishop on `square`, same edge-exclusion idea.
fn bishop_relevant_mask(square: usize) -> u64 {
    let rank = (square / 8) as i32;
    let file = (square % 8) as i32;
    let mut mask = 0u64;

    for &(dr, df) in &[(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while (1..=6).contains(&r) && (1..=6).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Enumerates every subset of `mask`'s set bits via the carry-rippler trick.
fn subsets_of(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1usize << mask.count_ones().min(20));
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

fn build_entry(
    square: usize,
    mask: u64,
    attacks_fn: impl Fn(usize, u64) -> u64,
    rng: &mut StdRng,
) -> Result<MagicEntry, String> {
    let bits = mask.count_ones();
    let shift = 64 - bits;

    let blockers = subsets_of(mask);
    let attacks: Vec<u64> = blockers.iter().map(|&b| attacks_fn(square, b)).collect();

    let magic = find_magic_number_for_square(&blockers, &attacks, shift, rng)?;

    let mut table = vec![0u64; 1usize << bits];
    for (b, a) in blockers.iter().zip(attacks.iter()) {
        let index = ((b.wrapping_mul(magic)) >> shift) as usize;
        table[index] = *a;
    }

    Ok(MagicEntry {
        magic,
        shift,
        mask,
        table: table.into_boxed_slice(),
    })
}

/// Builds complete rook and bishop magic tables for all 64 squares.
pub fn generate_magic_tables(seed: MagicTableSeed) -> Result<MagicTables, String> {
    let mut rng = make_rng(seed);

    let mut rook_entries = Vec::with_capacity(64);
    let mut bishop_entries = Vec::with_capacity(64);

    for square in 0..64 {
        let rook_mask = rook_relevant_mask(square);
        rook_entries.push(build_entry(
            square,
            rook_mask,
            rook_attacks_per_square,
            &mut rng,
        )?);

        let bishop_mask = bishop_relevant_mask(square);
        bishop_entries.push(build_entry(
            square,
            bishop_mask,
            bishop_attacks_per_square,
            &mut rng,
        )?);
    }

    Ok(MagicTables {
        rook: RookMagicTables {
            entries: rook_entries,
        },
        bishop: BishopMagicTables {
            entries: bishop_entries,
        },
    })
}
