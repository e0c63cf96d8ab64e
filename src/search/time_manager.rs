//! Time allocation (spec §4.K) and the cooperative stop/cancellation
//! protocol shared between the main thread and Lazy-SMP helpers (spec §5).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Limits as parsed from a UCI `go` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoLimits {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: u64,
    pub binc: u64,
    pub movestogo: Option<u64>,
    pub movetime: Option<u64>,
    pub depth: Option<i32>,
    pub nodes: Option<u64>,
    pub infinite: bool,
    pub ponder: bool,
}

/// `optimum`/`maximum` time budget for the side to move, in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    pub optimum: Duration,
    pub maximum: Duration,
    /// No time control at all (`infinite`, or only `depth`/`nodes` given).
    pub unbounded: bool,
}

/// Computes optimum/maximum search time exactly per spec §4.K.
pub fn allocate(limits: &GoLimits, white_to_move: bool, move_overhead_ms: u64) -> TimeBudget {
    if let Some(ms) = limits.movetime {
        let budget = Duration::from_millis(ms.saturating_sub(move_overhead_ms).max(1));
        return TimeBudget {
            optimum: budget,
            maximum: budget,
            unbounded: false,
        };
    }

    if limits.infinite || (limits.wtime.is_none() && limits.btime.is_none()) {
        return TimeBudget {
            optimum: Duration::from_secs(u64::MAX / 2),
            maximum: Duration::from_secs(u64::MAX / 2),
            unbounded: true,
        };
    }

    let (my_time, my_inc) = if white_to_move {
        (limits.wtime.unwrap_or(0), limits.winc)
    } else {
        (limits.btime.unwrap_or(0), limits.binc)
    };

    let safe = my_time.saturating_sub(move_overhead_ms);
    let moves_to_go = limits.movestogo.unwrap_or(30).max(1);

    let mut optimum_ms = safe / moves_to_go + (my_inc * 3) / 4;
    let mut maximum_ms = (safe / 3).min(optimum_ms.saturating_mul(5));

    // Extreme low time: scale everything down hard so we never flag.
    if safe < 1000 {
        optimum_ms = optimum_ms.min(safe / 4).max(1);
        maximum_ms = maximum_ms.min(safe / 2).max(optimum_ms);
    }

    optimum_ms = optimum_ms.max(1);
    maximum_ms = maximum_ms.max(optimum_ms);

    TimeBudget {
        optimum: Duration::from_millis(optimum_ms),
        maximum: Duration::from_millis(maximum_ms),
        unbounded: false,
    }
}

/// Wraps the wall-clock deadline and the shared `stop` flag that every
/// recursive search call polls. Only the main thread's `TimeManager`
/// actually measures elapsed time and sets `stop`; helper threads observe
/// it read-only (spec §5 "Helpers never self-terminate by time").
pub struct TimeManager {
    pub start_time: Instant,
    budget: TimeBudget,
    pub stopped_on_time: bool,
}

impl TimeManager {
    pub fn new(budget: TimeBudget) -> Self {
        Self {
            start_time: Instant::now(),
            budget,
            stopped_on_time: false,
        }
    }

    pub fn unbounded() -> Self {
        Self::new(TimeBudget {
            optimum: Duration::from_secs(u64::MAX / 2),
            maximum: Duration::from_secs(u64::MAX / 2),
            unbounded: true,
        })
    }

    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    #[inline(always)]
    pub fn optimum(&self) -> Duration {
        self.budget.optimum
    }

    #[inline(always)]
    pub fn maximum(&self) -> Duration {
        self.budget.maximum
    }

    #[inline(always)]
    pub fn is_unbounded(&self) -> bool {
        self.budget.unbounded
    }

    /// Hard deadline check, polled cheaply from inside the search
    /// recursion (main thread only). Sets `stop` on expiry.
    #[inline(always)]
    pub fn check_hard_limit(&mut self, stop: &AtomicBool) {
        if self.budget.unbounded {
            return;
        }
        if self.elapsed() >= self.budget.maximum {
            self.stopped_on_time = true;
            stop.store(true, Ordering::Relaxed);
        }
    }

    /// Soft (optimum) stop used between iterative-deepening depths: once
    /// elapsed time exceeds `optimum` and the best move has been stable,
    /// there is no point starting another iteration.
    pub fn should_stop_iterating(&self, pv_stable: bool) -> bool {
        if self.budget.unbounded {
            return false;
        }
        let elapsed = self.elapsed();
        if elapsed >= self.budget.maximum {
            return true;
        }
        elapsed >= self.budget.optimum && pv_stable
    }
}

/// Cheap, cooperative interrupt shared by every recursive search call.
/// Sampled every 64 nodes (a node-count bitmask, per spec §4.I.2 step 2).
/// Only the main thread carries a `deadline`; helper threads pass `None`
/// and rely solely on observing `stop` (spec §5).
pub struct SearchControl<'a> {
    pub stop: &'a AtomicBool,
    pub deadline: Option<Instant>,
}

impl<'a> SearchControl<'a> {
    pub const NODE_CHECK_MASK: u64 = 63;

    #[inline(always)]
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Call on the node-count bitmask boundary. Returns the (possibly
    /// newly-set) stop state.
    #[inline(always)]
    pub fn poll(&self) -> bool {
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            self.stop.store(true, Ordering::Relaxed);
        }
        self.should_stop()
    }
}
