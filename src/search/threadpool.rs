//! Lazy-SMP thread pool (spec §4.J / §5): one main worker plus N-1 helper
//! workers, each with its own cloned `Board` and `SearchContext`, searching
//! independently against one shared transposition table. Workers are
//! spawned fresh for each `go` and joined at its end via `std::thread::scope`
//! rather than kept alive on a condition variable — the spec's `idle_loop`
//! behavior without pulling in an extra crate for it (see SPEC_FULL.md §5).

use crate::board::Board;
use crate::moves::magic::MagicTables;
use crate::search::context::SearchContext;
use crate::search::search::{SearchReport, iterative_deepening};
use crate::search::time_manager::TimeBudget;
use crate::search::tt::TranspositionTable;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

pub struct PoolLimits {
    pub max_depth: i32,
    pub budget: TimeBudget,
    pub threads: usize,
}

/// Runs Lazy-SMP search to completion (or until `stop` is set externally,
/// e.g. by the UCI `stop` command) and returns the main worker's result.
///
/// `stop` is shared with the caller so a UCI `stop`/`ponderhit` can
/// interrupt an in-flight search from another thread; this function also
/// sets it on return so any helper that hasn't noticed yet unwinds promptly.
pub fn search_parallel(
    board: &Board,
    tables: &MagicTables,
    tt: &TranspositionTable,
    limits: PoolLimits,
    stop: &AtomicBool,
) -> SearchReport {
    tt.new_search();
    let threads = limits.threads.max(1);
    let results: Mutex<Vec<(usize, SearchReport)>> = Mutex::new(Vec::with_capacity(threads));

    thread::scope(|scope| {
        for tid in 0..threads {
            let mut worker_board = board.clone();
            let is_main = tid == 0;
            // Helpers diversify their starting depth (spec §4.J) and seed a
            // small PRNG for the depth-skip jitter inside iterative_deepening.
            let start_depth: i32 = if is_main { 1 } else { 1 + (tid % 3) as i32 };
            let jitter_seed: u64 = if is_main {
                0
            } else {
                (tid as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1
            };
            let budget = limits.budget;
            let max_depth = limits.max_depth;
            let results_ref = &results;

            scope.spawn(move || {
                let mut ctx = SearchContext::new();
                let report = iterative_deepening(
                    &mut worker_board,
                    tables,
                    tt,
                    &mut ctx,
                    max_depth,
                    budget,
                    stop,
                    is_main,
                    start_depth,
                    jitter_seed,
                    is_main,
                );
                results_ref.lock().unwrap().push((tid, report));
            });
        }
    });

    // Every worker has returned; make sure `stop` reflects that so a
    // subsequent probe from the UCI thread sees a settled state.
    stop.store(true, Ordering::Relaxed);

    let results = results.into_inner().unwrap();
    results
        .into_iter()
        .find(|(tid, _)| *tid == 0)
        .map(|(_, report)| report)
        .unwrap_or_default()
}
