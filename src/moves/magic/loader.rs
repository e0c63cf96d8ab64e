//! Caches a single set of magic tables behind a `OnceCell`, built once per
//! process and cloned out to callers (cheap: a handful of `Arc`-free boxed
//! slices, cloned only at startup).

use super::precompute::{MagicTableSeed, generate_magic_tables};
use super::structs::MagicTables;
use once_cell::sync::OnceCell;

#[cfg(feature = "deterministic_magic")]
const MAGIC_SEED: u64 = 0xC001_D00D_1234_5678;

fn seed() -> MagicTableSeed {
    #[cfg(feature = "deterministic_magic")]
    {
        MagicTableSeed::Fixed(MAGIC_SEED)
    }
    #[cfg(not(feature = "deterministic_magic"))]
    {
        MagicTableSeed::Random
    }
}

/// Returns the process-wide magic tables, generating them on first call.
pub fn load_magic_tables() -> MagicTables {
    static TABLES: OnceCell<MagicTables> = OnceCell::new();
    TABLES
        .get_or_init(|| generate_magic_tables(seed()).expect("magic table generation failed"))
        .clone()
}
