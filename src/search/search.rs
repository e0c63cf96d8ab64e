//! Principal-variation search: quiescence, alpha-beta, and the
//! iterative-deepening driver shared by the single-thread entry point
//! (`search`, used by the WASM build) and the Lazy-SMP thread pool
//! (`search::threadpool`).

use crate::board::Board;
use crate::moves::execute::{
    generate_legal, make_move_basic, make_null_move, undo_move_basic, undo_null_move,
};
use crate::moves::magic::MagicTables;
use crate::moves::square_control::in_check;
use crate::moves::types::Move;
use crate::search::context::SearchContext;
use crate::search::eval::static_eval;
use crate::search::picker::MovePicker;
use crate::search::see::SeeExt;
use crate::search::time_manager::{SearchControl, TimeBudget, TimeManager};
use crate::search::tt::{NodeType, TranspositionTable};
use arrayvec::ArrayVec;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const INF: i32 = 32000;
pub const MATE_SCORE: i32 = 31000;
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;
const MAX_Q_SEARCH_DEPTH: usize = 64;
const MAX_PLY: usize = 128;
const DRAW_SCORE: i32 = 0;
const MAX_EXTENSIONS: i32 = 16;

// --- Tuning Constants ---

const RAZOR_DEPTH_LIMIT: i32 = 3;
const RAZOR_MARGIN_BASE: i32 = 300;
const RAZOR_MARGIN_MULT: i32 = 200;

const RFP_DEPTH_LIMIT: i32 = 9;
const RFP_MARGIN_BASE: i32 = 80;
const RFP_MARGIN_MULT: i32 = 90;

const FP_DEPTH_LIMIT: i32 = 7;
const FP_MARGIN_BASE: i32 = 100;
const FP_MARGIN_MULT: i32 = 100;
const FP_HISTORY_THRESHOLD: i32 = 512;

const LMP_DEPTH_LIMIT: i32 = 14;
const LMP_BASE_MOVES: i32 = 3;
const LMP_MOVE_MULTIPLIER: i32 = 6;

const SEE_PRUNE_DEPTH_LIMIT: i32 = 4;
const SEE_PRUNE_MARGIN: i32 = 50;

const IIR_MIN_DEPTH: i32 = 4;

const LMR_MIN_DEPTH: i32 = 2;
const LMR_MIN_MOVES: i32 = 4;

const PV_EXTENSION_MIN_DEPTH: i32 = 6;

// --- TT Score Adjustment Helpers ---
fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}
// -----------------------------------

/// Tiny xorshift64 PRNG used only for Lazy-SMP helper-thread depth/skip
/// jitter (spec §4.J) — not cryptographic, just decorrelation between
/// workers sharing the same TT.
#[inline]
fn xorshift64(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

#[allow(clippy::too_many_arguments, clippy::only_used_in_recursion)]
pub fn quiescence(
    board: &mut Board,
    tables: &MagicTables,
    ctx: &mut SearchContext,
    tt: &TranspositionTable,
    ply: usize,
    mut alpha: i32,
    beta: i32,
    nodes: &mut u64,
    ctrl: &SearchControl,
) -> i32 {
    if ply > MAX_Q_SEARCH_DEPTH + MAX_PLY {
        return static_eval(board, tables, alpha, beta);
    }
    if ply > ctx.sel_depth {
        ctx.sel_depth = ply;
    }

    let stand_pat = static_eval(board, tables, alpha, beta);

    if stand_pat >= beta {
        return beta;
    }
    if stand_pat >= alpha {
        alpha = stand_pat;
    }

    // Probe the TT purely for move ordering; qsearch doesn't use TT cutoffs.
    let tt_move = tt
        .probe(board.zobrist, 0, alpha, beta, ply as i32)
        .and_then(|(mv, _, _, _)| mv);

    let empty_killers = [None, None];
    let empty_history = [[0i32; 64]; 64];
    let mut picker = MovePicker::new([tt_move, None, None], empty_killers, None, None, true);

    while let Some(mv) = picker.next(
        board,
        tables,
        &empty_history,
        &ctx.capture_history,
        &ctx.continuation_history,
        &ctx.continuation_history_2ply,
        None,
        None,
    ) {
        *nodes += 1;
        if *nodes & SearchControl::NODE_CHECK_MASK == 0 && ctrl.poll() {
            return stand_pat;
        }

        let mut captured_value = 0;
        if let Some(piece) = board.piece_type_at(mv.to) {
            captured_value = piece.value();
        }

        let is_prom = mv.is_promotion();
        let is_ep = mv.is_en_passant();

        // Delta pruning: skip captures that can't possibly reach alpha even
        // with a generous safety margin. Promotions/en-passant bypass this
        // because their true value isn't `captured_value`.
        if !is_prom && !is_ep && stand_pat + captured_value + 200 < alpha {
            continue;
        }

        if !is_prom && !is_ep && !board.static_exchange_eval(mv, 0, tables) {
            continue;
        }

        let undo = make_move_basic(board, mv);
        let score = -quiescence(board, tables, ctx, tt, ply + 1, -beta, -alpha, nodes, ctrl);
        undo_move_basic(board, undo);

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }
    alpha
}

#[allow(clippy::too_many_arguments, clippy::only_used_in_recursion)]
pub fn alpha_beta(
    board: &mut Board,
    tables: &MagicTables,
    ctx: &mut SearchContext,
    tt: &TranspositionTable,
    depth: i32,
    ply: usize,
    mut alpha: i32,
    mut beta: i32,
    nodes: &mut u64,
    ctrl: &SearchControl,
    prev_move: Option<Move>,
    prev_prev_move: Option<Move>,
    extensions_used_in: i32,
) -> (i32, Option<Move>) {
    if *nodes & SearchControl::NODE_CHECK_MASK == 0 && ctrl.poll() {
        return (0, None);
    }
    *nodes += 1;
    if ply > ctx.sel_depth {
        ctx.sel_depth = ply;
    }
    ctx.clear_pv(ply);

    let is_pv = beta - alpha > 1;

    if ply > 0 && board.is_repetition() {
        return (DRAW_SCORE, None);
    }

    // Mate-distance pruning.
    alpha = alpha.max(-MATE_SCORE + ply as i32);
    beta = beta.min(MATE_SCORE - ply as i32 - 1);
    if alpha >= beta {
        return (alpha, None);
    }

    if ply >= MAX_PLY - 1 {
        return (static_eval(board, tables, alpha, beta), None);
    }

    let hash = board.zobrist;
    let mut hash_move = None;
    let mut tt_moves: [Option<Move>; 3] = [None; 3];
    tt.get_moves(hash, &mut tt_moves);

    if let Some((tt_move, raw_score, tt_depth, tt_bound)) =
        tt.probe(hash, depth as u8, alpha, beta, ply as i32)
    {
        if let Some(tm) = tt_move {
            hash_move = Some(tm);
        }

        if !is_pv && tt_depth >= depth as u8 && ply > 0 {
            let tt_score = score_from_tt(raw_score, ply as i32);
            match tt_bound {
                0 => return (tt_score, tt_move),
                1 if tt_score >= beta => return (tt_score, tt_move),
                2 if tt_score <= alpha => return (tt_score, tt_move),
                _ => {}
            }
        }
    }

    let in_check_now = in_check(board, board.side_to_move, tables);

    if depth <= 0 && !in_check_now {
        let score = quiescence(board, tables, ctx, tt, ply, alpha, beta, nodes, ctrl);
        return (score, None);
    }

    let mut extensions_used = extensions_used_in;
    let base_extension = if in_check_now && extensions_used < MAX_EXTENSIONS {
        extensions_used += 1;
        1
    } else {
        0
    };

    let raw_static_eval = if in_check_now {
        0
    } else if let Some(e) = tt.probe_eval(hash) {
        e
    } else {
        static_eval(board, tables, alpha, beta)
    };
    let correction = if in_check_now {
        0
    } else {
        ctx.correction_history.probe(board.side_to_move, board)
    };
    let corrected_eval = raw_static_eval + correction;

    // Razoring: hopeless position near the horizon, fall straight to qsearch.
    if depth <= RAZOR_DEPTH_LIMIT && !in_check_now && !is_pv && ply > 0 {
        let margin = RAZOR_MARGIN_BASE + RAZOR_MARGIN_MULT * depth;
        if corrected_eval + margin < alpha {
            let score = quiescence(board, tables, ctx, tt, ply, alpha, alpha + 1, nodes, ctrl);
            if score < alpha {
                return (score, None);
            }
        }
    }

    if depth < RFP_DEPTH_LIMIT && !in_check_now && !is_pv && ply > 0 {
        let margin = RFP_MARGIN_BASE + RFP_MARGIN_MULT * depth;
        if corrected_eval - margin >= beta {
            return (beta, None);
        }
    }

    let mut mate_threat = false;
    if depth >= 4
        && !in_check_now
        && !is_pv
        && board.has_major_pieces(board.side_to_move)
        && corrected_eval >= beta
    {
        let eval_bonus = ((corrected_eval - beta) / 200).clamp(0, 3);
        let r = 3 + depth / 4 + eval_bonus;

        let undo = make_null_move(board);
        let (val, _) = alpha_beta(
            board,
            tables,
            ctx,
            tt,
            (depth - r - 1).max(0),
            ply + 1,
            -beta,
            -beta + 1,
            nodes,
            ctrl,
            None,
            prev_move,
            extensions_used,
        );
        let score = -val;
        undo_null_move(board, undo);

        if ctrl.should_stop() {
            return (0, None);
        }

        if score >= beta {
            if score < MATE_THRESHOLD {
                return (beta, None);
            }
            // Don't trust null-move mate scores; fall through to a normal search.
        } else if score <= -MATE_THRESHOLD {
            mate_threat = true;
        }
    }

    // Internal iterative reduction: no hash move to seed ordering with.
    let mut depth = depth;
    if hash_move.is_none() && depth >= IIR_MIN_DEPTH {
        depth -= if is_pv { 1 } else { 2 };
        depth = depth.max(1);
    }

    let mate_killer = ctx.mate_killers[ply];
    let counter_move = prev_move.and_then(|pm| {
        ctx.counter_moves[pm.piece as usize][pm.to.index() as usize]
    });

    let mut picker = MovePicker::new(
        tt_moves,
        ctx.killer_moves[ply],
        mate_killer,
        counter_move,
        false,
    );

    let mut best_move = None;
    let mut best_score = -INF;
    let original_alpha = alpha;
    let mut move_count = 0;
    // Counts every legal move the picker yields, even ones later skipped by
    // SEE/FP/LMP pruning. `move_count == 0` alone would misreport mate/
    // stalemate if pruning happened to discard every legal move (e.g. every
    // legal move is a capture that fails SEE pruning at low depth).
    let mut legal_moves_seen = 0;
    let mut quiets_tried: ArrayVec<Move, 64> = ArrayVec::new();

    while let Some(mv) = picker.next(
        board,
        tables,
        &ctx.history[board.side_to_move as usize],
        &ctx.capture_history,
        &ctx.continuation_history,
        &ctx.continuation_history_2ply,
        prev_move,
        prev_prev_move,
    ) {
        legal_moves_seen += 1;
        if depth < FP_DEPTH_LIMIT
            && !in_check_now
            && !is_pv
            && !mv.is_capture()
            && !mv.is_promotion()
            && move_count > 0
        {
            let margin = FP_MARGIN_BASE + FP_MARGIN_MULT * depth;
            let history = ctx.history_score(board.side_to_move, mv);
            if history < FP_HISTORY_THRESHOLD && corrected_eval + margin <= alpha {
                continue;
            }
        }

        if depth < LMP_DEPTH_LIMIT
            && !in_check_now
            && !is_pv
            && !mv.is_capture()
            && !mv.is_promotion()
            && alpha == original_alpha
        {
            let lmp_threshold = LMP_BASE_MOVES + LMP_MOVE_MULTIPLIER * depth;
            if move_count > lmp_threshold as usize {
                break;
            }
        }

        if depth <= SEE_PRUNE_DEPTH_LIMIT
            && !in_check_now
            && !is_pv
            && mv.is_capture()
            && !board.static_exchange_eval(mv, -SEE_PRUNE_MARGIN * depth, tables)
        {
            continue;
        }

        let see_gives_check_ok = !mv.is_capture() || board.static_exchange_eval(mv, 0, tables);
        let captured_piece = if mv.is_capture() {
            board.piece_type_at(mv.to)
        } else {
            None
        };

        let undo = make_move_basic(board, mv);
        move_count += 1;

        let gives_check = in_check(board, board.side_to_move, tables);

        let mut this_extension = base_extension;
        if extensions_used < MAX_EXTENSIONS {
            if gives_check && see_gives_check_ok {
                this_extension += 1;
                extensions_used += 1;
            } else if mate_threat {
                this_extension += 1;
                extensions_used += 1;
            } else if is_pv && move_count == 1 && depth >= PV_EXTENSION_MIN_DEPTH {
                this_extension += 1;
                extensions_used += 1;
            }
        }

        let mut score;

        if move_count == 1 {
            let (val, _) = alpha_beta(
                board,
                tables,
                ctx,
                tt,
                depth - 1 + this_extension,
                ply + 1,
                -beta,
                -alpha,
                nodes,
                ctrl,
                Some(mv),
                prev_move,
                extensions_used,
            );
            score = -val;
        } else {
            let mut r = 0;
            if depth > LMR_MIN_DEPTH
                && move_count > LMR_MIN_MOVES as usize
                && !mv.is_capture()
                && !mv.is_promotion()
                && !in_check_now
                && !gives_check
            {
                r = 1 + (depth / 8) + (move_count as i32 / 20);

                let history = ctx.history_score(board.side_to_move, mv);
                if history > FP_HISTORY_THRESHOLD {
                    r -= 1;
                }
                if is_pv {
                    r -= 1;
                }
                if !is_pv {
                    r += 1; // cut-node widening
                }

                r = r.clamp(0, depth - 2);
            }

            let (val, _) = alpha_beta(
                board,
                tables,
                ctx,
                tt,
                depth - 1 - r,
                ply + 1,
                -alpha - 1,
                -alpha,
                nodes,
                ctrl,
                Some(mv),
                prev_move,
                extensions_used,
            );
            score = -val;

            if score > alpha && r > 0 {
                let (val, _) = alpha_beta(
                    board,
                    tables,
                    ctx,
                    tt,
                    depth - 1,
                    ply + 1,
                    -alpha - 1,
                    -alpha,
                    nodes,
                    ctrl,
                    Some(mv),
                    prev_move,
                    extensions_used,
                );
                score = -val;
            }

            if score > alpha && score < beta {
                let (val, _) = alpha_beta(
                    board,
                    tables,
                    ctx,
                    tt,
                    depth - 1 + this_extension,
                    ply + 1,
                    -beta,
                    -alpha,
                    nodes,
                    ctrl,
                    Some(mv),
                    prev_move,
                    extensions_used,
                );
                score = -val;
            }
        }

        undo_move_basic(board, undo);

        if ctrl.should_stop() {
            return (0, None);
        }

        if !mv.is_capture() {
            quiets_tried.push(mv);
        }

        if score > best_score {
            best_score = score;
            if score > alpha {
                alpha = score;
                best_move = Some(mv);
                ctx.update_pv(ply, mv);
            }
            if score >= beta {
                let tt_score = score_to_tt(beta, ply as i32);
                tt.save(
                    hash,
                    Some(mv),
                    tt_score,
                    depth as u8,
                    NodeType::LowerBound as u8,
                    ply as i32,
                    raw_static_eval,
                );

                if !mv.is_capture() {
                    ctx.update_killer(ply, mv);
                    if score.abs() >= MATE_THRESHOLD {
                        ctx.update_mate_killer(ply, mv);
                    }
                    ctx.update_history(board.side_to_move, mv, depth, 1);
                    if let Some(pm) = prev_move {
                        ctx.update_counter_move(pm.piece, pm.to.index() as usize, mv);
                        ctx.continuation_history.update(
                            pm.piece,
                            pm.to.index() as usize,
                            mv.piece,
                            mv.to.index() as usize,
                            ((depth * depth + 2 * depth).min(1024)),
                        );
                    }
                    if let Some(ppm) = prev_prev_move {
                        ctx.continuation_history_2ply.update(
                            ppm.piece,
                            ppm.to.index() as usize,
                            mv.piece,
                            mv.to.index() as usize,
                            ((depth * depth + 2 * depth).min(1024)),
                        );
                    }
                    // Penalize earlier quiets that failed to cut.
                    for &quiet in quiets_tried.iter().take(quiets_tried.len().saturating_sub(1)) {
                        ctx.update_history(board.side_to_move, quiet, depth, -1);
                    }
                } else if let Some(cap) = captured_piece {
                    ctx.update_capture_history(mv.piece, mv.to.index() as usize, cap, depth, 1);
                }

                return (beta, Some(mv));
            }
        }
    }

    if legal_moves_seen == 0 {
        if in_check_now {
            return (-MATE_SCORE + ply as i32, None);
        }
        return (0, None);
    }

    if ctrl.should_stop() {
        return (0, None);
    }

    // Every legal move was pruned (SEE/FP/LMP): fall back to a shallow
    // re-search of the best-looking move rather than reporting a false
    // fail-low with no best_move, so the TT save below stays meaningful.
    if move_count == 0 {
        return (corrected_eval.clamp(original_alpha, beta), None);
    }

    let node_type = if best_score >= beta {
        NodeType::LowerBound
    } else if best_score > original_alpha {
        NodeType::Exact
    } else {
        NodeType::UpperBound
    };

    let tt_score = score_to_tt(best_score, ply as i32);
    tt.save(
        hash,
        best_move,
        tt_score,
        depth as u8,
        node_type as u8,
        ply as i32,
        raw_static_eval,
    );

    if !in_check_now && best_move.is_none_or(|m| !m.is_capture()) {
        let diff = best_score - raw_static_eval;
        ctx.correction_history
            .update(board.side_to_move, board, diff, depth);
    }

    (best_score, best_move)
}

/// Result of running iterative deepening to completion (or until `stop`).
#[derive(Debug, Clone, Default)]
pub struct SearchReport {
    pub score: i32,
    pub best_move: Option<Move>,
    pub ponder_move: Option<Move>,
    pub nodes: u64,
    pub depth_reached: i32,
    pub sel_depth: usize,
}

/// One worker's iterative deepening loop (spec §4.I.1 / §4.J).
///
/// `is_main` controls whether this call enforces the wall-clock deadline
/// and prints `info` lines; helper threads pass `is_main = false` and rely
/// on the shared `stop` flag. `start_depth` and `jitter_seed` implement the
/// Lazy-SMP depth/skip diversification from spec §4.J (`jitter_seed == 0`
/// disables jitter, used by the single-thread `search()` entry point).
#[allow(clippy::too_many_arguments)]
pub fn iterative_deepening(
    board: &mut Board,
    tables: &MagicTables,
    tt: &TranspositionTable,
    ctx: &mut SearchContext,
    max_depth: i32,
    budget: TimeBudget,
    stop: &AtomicBool,
    is_main: bool,
    start_depth: i32,
    jitter_seed: u64,
    emit_info: bool,
) -> SearchReport {
    let mut nodes = 0u64;
    let mut last_completed_best_move = None;
    let mut last_completed_ponder = None;
    let mut last_completed_best_score = 0;
    let mut last_completed_depth = 0;
    let time = TimeManager::new(budget);
    let mut last_iter_duration = Duration::from_millis(0);
    let mut rng_state = jitter_seed.max(1);
    let mut prev_score = 0;
    let mut stable_iterations = 0;

    let deadline = if is_main && !budget.unbounded {
        Some(time.start_time + budget.maximum)
    } else {
        None
    };
    let ctrl = SearchControl { stop, deadline };

    let depth_start = start_depth.max(1);

    for depth in depth_start..=max_depth {
        if stop.load(Ordering::Relaxed) {
            break;
        }

        if is_main
            && depth > depth_start
            && !budget.unbounded
        {
            let total_elapsed = time.elapsed();
            let predicted_next = last_iter_duration * 3;
            if total_elapsed + predicted_next > budget.maximum {
                break;
            }
        }

        // Helper-thread jitter: past depth 4, probabilistically skip this
        // iteration so workers explore different depths (spec §4.J).
        if jitter_seed != 0 && !is_main && depth > 4 {
            let roll = xorshift64(&mut rng_state) % 4;
            if roll == 0 {
                continue;
            }
        }

        let iter_start = Instant::now();
        ctx.decay_history();

        let mut alpha = -INF;
        let mut beta = INF;
        let mut delta = 20;

        if depth > 4 {
            alpha = (last_completed_best_score - delta).max(-INF);
            beta = (last_completed_best_score + delta).min(INF);
        }

        let mut score;
        let mut mv;

        loop {
            let result = alpha_beta(
                board, tables, ctx, tt, depth, 0, alpha, beta, &mut nodes, &ctrl, None, None, 0,
            );
            score = result.0;
            mv = result.1;

            if stop.load(Ordering::Relaxed) {
                break;
            }

            if score <= alpha {
                beta = (alpha + beta) / 2;
                alpha = (alpha - delta).max(-INF);
                delta += delta / 2 + 2;
                continue;
            }
            if score >= beta {
                beta = (beta + delta).min(INF);
                delta += delta / 2 + 2;
                continue;
            }
            break;
        }

        last_iter_duration = iter_start.elapsed();

        if stop.load(Ordering::Relaxed) {
            break;
        }

        stable_iterations = if mv == last_completed_best_move && depth > depth_start {
            stable_iterations + 1
        } else {
            0
        };

        last_completed_best_score = score;
        last_completed_best_move = mv;
        last_completed_depth = depth;
        last_completed_ponder = ctx.pv_table[0].get(1).copied();
        prev_score = score;
        let _ = prev_score;

        if emit_info && let Some(valid_mv) = last_completed_best_move {
            let score_str = if last_completed_best_score.abs() >= MATE_THRESHOLD {
                let moves = (MATE_SCORE - last_completed_best_score.abs() + 1) / 2;
                if last_completed_best_score > 0 {
                    format!("mate {}", moves)
                } else {
                    format!("mate -{}", moves)
                }
            } else {
                format!("cp {}", last_completed_best_score)
            };

            let pv_str = if ctx.pv_table[0].is_empty() {
                valid_mv.to_uci()
            } else {
                ctx.pv_table[0]
                    .iter()
                    .map(|m| m.to_uci())
                    .collect::<Vec<_>>()
                    .join(" ")
            };

            println!(
                "info depth {} seldepth {} score {} nodes {} time {} hashfull {} pv {}",
                depth,
                ctx.sel_depth,
                score_str,
                nodes,
                time.elapsed().as_millis(),
                tt.hashfull(),
                pv_str
            );
        }

        if score.abs() >= MATE_THRESHOLD {
            break;
        }

        if is_main && time.should_stop_iterating(stable_iterations >= 3) {
            break;
        }
    }

    if last_completed_best_move.is_none() {
        // No completed iteration (immediate stop, or no legal moves).
        // Fall back to the first legal move per spec's error-handling design.
        let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
        let mut scratch: ArrayVec<Move, 256> = ArrayVec::new();
        generate_legal(board, tables, &mut moves, &mut scratch);
        last_completed_best_move = moves.first().copied();
    }

    SearchReport {
        score: last_completed_best_score,
        best_move: last_completed_best_move,
        ponder_move: last_completed_ponder,
        nodes,
        depth_reached: last_completed_depth,
        sel_depth: ctx.sel_depth,
    }
}

/// Single-thread search entry point (used by the WASM build, which has no
/// thread-spawning capability, and by tests). Native UCI play should go
/// through `search::threadpool` for Lazy-SMP parallelism.
pub fn search(
    board: &mut Board,
    tables: &MagicTables,
    tt: &TranspositionTable,
    max_depth: i32,
    time_limit: Option<Duration>,
) -> (i32, Option<Move>) {
    tt.new_search();
    let mut ctx = SearchContext::new();
    let stop = AtomicBool::new(false);
    let budget = match time_limit {
        Some(d) => TimeBudget {
            optimum: d,
            maximum: d,
            unbounded: false,
        },
        None => TimeBudget {
            optimum: Duration::from_secs(u64::MAX / 2),
            maximum: Duration::from_secs(u64::MAX / 2),
            unbounded: true,
        },
    };
    let report = iterative_deepening(
        board, tables, tt, &mut ctx, max_depth, budget, &stop, true, 1, 0, true,
    );
    (report.score, report.best_move)
}
