use vantage::board::{Board, Color, Piece};
use vantage::book::PolyglotBook;
use vantage::engine_options::EngineOptions;
use vantage::moves::execute::{generate_legal, make_move_basic};
use vantage::moves::magic::MagicTables;
use vantage::moves::magic::loader::load_magic_tables;
use vantage::moves::types::Move;
use vantage::search::search::search;
use vantage::search::threadpool::{PoolLimits, search_parallel};
use vantage::search::time_manager::{GoLimits, allocate};
use vantage::search::tt::TranspositionTable;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

/// Handle to an in-flight `go`, so `stop`/`quit`/a new `position` can
/// interrupt it without blocking the UCI stdin loop while it searches.
struct SearchHandle {
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl SearchHandle {
    fn join(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.thread.join();
    }
}

fn main() {
    if let Some(log_dir) = std::env::var_os("VANTAGE_LOG_DIR") {
        vantage::logger::init_logging(
            std::path::Path::new(&log_dir).join("vantage.log"),
            "vantage=info",
        );
    }

    let magic_tables = Arc::new(load_magic_tables());
    let mut board = Board::new();
    let mut tt = Arc::new(TranspositionTable::new(512));
    let mut options = EngineOptions::default();
    let mut in_flight: Option<SearchHandle> = None;

    let book = Arc::new(PolyglotBook::load(&options.book_file).ok());
    if book.is_some() {
        println!("info string Opening Book loaded successfully");
    } else {
        println!("info string No opening book found (book.bin), running engine only");
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => break,
        };

        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let command = parts[0];

        // Any command that mutates shared state or ends the process first
        // waits out a running search, matching the UCI assumption that the
        // GUI won't send `position`/`ucinewgame` while a search is active.
        if matches!(
            command,
            "ucinewgame" | "position" | "quit" | "setoption"
        ) && let Some(handle) = in_flight.take()
        {
            handle.join();
        }

        match command {
            "uci" => handle_uci(),
            "isready" => println!("readyok"),
            "ucinewgame" => {
                board = Board::new();
                tt.clear();
            }
            "position" => {
                if let Some(new_board) = handle_position(&parts, &magic_tables) {
                    board = new_board;
                }
            }
            "go" => {
                if let Some(handle) = in_flight.take() {
                    handle.join();
                }
                in_flight = Some(spawn_go(
                    &parts,
                    &board,
                    Arc::clone(&magic_tables),
                    Arc::clone(&tt),
                    Arc::clone(&book),
                    &options,
                ));
            }
            "stop" => {
                if let Some(handle) = in_flight.take() {
                    handle.join();
                }
            }
            "ponderhit" => {
                // Ponder search is not distinguished from a normal search in
                // this engine (spec §6 treats ponder as a UCI-surface
                // concern); accepted for protocol compliance, no-op here.
            }
            "fen" => {
                println!("{}", board.to_fen());
            }
            "quit" => break,
            "d" | "display" => {
                println!("{}", board);
            }
            "test" | "bench" => {
                run_epd_tests("../bench_arena/bk.epd", &magic_tables);
            }
            "setoption" => handle_setoption(&parts, &mut tt, &mut options),
            _ => {}
        }
    }

    if let Some(handle) = in_flight.take() {
        handle.join();
    }
}

fn handle_uci() {
    println!("id name Vantage 1.0");
    println!("id author Vaishak Menon");
    println!("option name Hash type spin default 512 min 1 max 4096");
    println!("option name Threads type spin default 1 min 1 max 128");
    println!("option name MultiPV type spin default 1 min 1 max 256");
    println!("option name Ponder type check default false");
    println!("option name Move Overhead type spin default 30 min 0 max 5000");
    println!("option name Book File type string default book.bin");
    println!("option name SyzygyPath type string default <empty>");
    println!("uciok");
}

/// Handles `setoption name <N> value <V>`. Unknown options are reported and
/// ignored; a bad value keeps the previous one rather than failing.
fn handle_setoption(parts: &[&str], tt: &mut Arc<TranspositionTable>, options: &mut EngineOptions) {
    let name_idx = parts.iter().position(|&p| p == "name");
    let value_idx = parts.iter().position(|&p| p == "value");
    let (Some(name_idx), Some(value_idx)) = (name_idx, value_idx) else {
        println!("info string malformed setoption command");
        return;
    };
    let name = parts[name_idx + 1..value_idx].join(" ");
    let value = parts[value_idx + 1..].join(" ");

    match name.as_str() {
        "Hash" => match value.parse::<usize>() {
            Ok(mb) => {
                options.set_hash_mb(mb);
                *tt = Arc::new(TranspositionTable::new(options.hash_mb));
            }
            Err(_) => println!("info string invalid Hash value '{}'", value),
        },
        "Threads" => match value.parse::<usize>() {
            Ok(n) => options.set_threads(n),
            Err(_) => println!("info string invalid Threads value '{}'", value),
        },
        "MultiPV" => match value.parse::<usize>() {
            Ok(n) => options.set_multi_pv(n),
            Err(_) => println!("info string invalid MultiPV value '{}'", value),
        },
        "Ponder" => options.ponder = value == "true",
        "Move Overhead" => match value.parse::<u64>() {
            Ok(ms) => options.set_move_overhead_ms(ms),
            Err(_) => println!("info string invalid Move Overhead value '{}'", value),
        },
        "Book File" => options.book_file = value,
        "SyzygyPath" => options.syzygy_path = value,
        _ => println!("info string unknown option '{}'", name),
    }
}

fn handle_position(parts: &[&str], tables: &MagicTables) -> Option<Board> {
    let mut board = if parts.len() > 1 && parts[1] == "startpos" {
        Board::new()
    } else if parts.len() > 1 && parts[1] == "fen" {
        let fen_start = 2;
        let mut fen_end = parts.len();
        for (i, &part) in parts.iter().enumerate().skip(fen_start) {
            if part == "moves" {
                fen_end = i;
                break;
            }
        }

        let fen_string = parts[fen_start..fen_end].join(" ");
        Board::from_str(&fen_string).ok()?
    } else {
        Board::new()
    };

    if let Some(moves_idx) = parts.iter().position(|&p| p == "moves") {
        for move_str in &parts[moves_idx + 1..] {
            if let Some(mv) = parse_uci_move(&board, move_str, tables) {
                make_move_basic(&mut board, mv);
            } else {
                eprintln!("Invalid move: {}", move_str);
                return None;
            }
        }
    }

    Some(board)
}

fn parse_uci_move(board: &Board, move_str: &str, tables: &MagicTables) -> Option<Move> {
    if move_str.len() < 4 {
        return None;
    }

    let chars: Vec<char> = move_str.chars().collect();

    let from_file = (chars[0] as u8).wrapping_sub(b'a');
    let from_rank = (chars[1] as u8).wrapping_sub(b'1');
    let to_file = (chars[2] as u8).wrapping_sub(b'a');
    let to_rank = (chars[3] as u8).wrapping_sub(b'1');

    if from_file > 7 || from_rank > 7 || to_file > 7 || to_rank > 7 {
        return None;
    }

    let from_square = (from_rank * 8 + from_file) as usize;
    let to_square = (to_rank * 8 + to_file) as usize;

    let promo_piece = if move_str.len() >= 5 {
        match chars[4] {
            'q' => Some(vantage::board::Piece::Queen),
            'r' => Some(vantage::board::Piece::Rook),
            'b' => Some(vantage::board::Piece::Bishop),
            'n' => Some(vantage::board::Piece::Knight),
            _ => None,
        }
    } else {
        None
    };

    let mut moves = Vec::with_capacity(256);
    let mut scratch = Vec::with_capacity(256);
    let mut board_copy = board.clone();
    generate_legal(&mut board_copy, tables, &mut moves, &mut scratch);

    for mv in moves {
        if (mv.from.index() as usize) == from_square && (mv.to.index() as usize) == to_square {
            if promo_piece.is_some() {
                if mv.promotion == promo_piece {
                    return Some(mv);
                }
            } else if mv.promotion.is_none() {
                return Some(mv);
            }
        }
    }
    None
}

fn parse_go_limits(parts: &[&str]) -> GoLimits {
    let mut limits = GoLimits::default();
    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                if i + 1 < parts.len() {
                    limits.depth = parts[i + 1].parse().ok();
                }
                i += 2;
            }
            "nodes" => {
                if i + 1 < parts.len() {
                    limits.nodes = parts[i + 1].parse().ok();
                }
                i += 2;
            }
            "movetime" => {
                if i + 1 < parts.len() {
                    limits.movetime = parts[i + 1].parse().ok();
                }
                i += 2;
            }
            "wtime" => {
                if i + 1 < parts.len() {
                    limits.wtime = parts[i + 1].parse().ok();
                }
                i += 2;
            }
            "btime" => {
                if i + 1 < parts.len() {
                    limits.btime = parts[i + 1].parse().ok();
                }
                i += 2;
            }
            "winc" => {
                if i + 1 < parts.len() {
                    limits.winc = parts[i + 1].parse().unwrap_or(0);
                }
                i += 2;
            }
            "binc" => {
                if i + 1 < parts.len() {
                    limits.binc = parts[i + 1].parse().unwrap_or(0);
                }
                i += 2;
            }
            "movestogo" => {
                if i + 1 < parts.len() {
                    limits.movestogo = parts[i + 1].parse().ok();
                }
                i += 2;
            }
            "ponder" => {
                limits.ponder = true;
                i += 1;
            }
            "infinite" => {
                limits.infinite = true;
                i += 1;
            }
            _ => i += 1,
        }
    }
    limits
}

/// Spawns the search for one `go` command on a background thread so the
/// UCI stdin loop stays responsive to `stop` while it runs (spec §5/§6).
fn spawn_go(
    parts: &[&str],
    board: &Board,
    tables: Arc<MagicTables>,
    tt: Arc<TranspositionTable>,
    book: Arc<Option<PolyglotBook>>,
    options: &EngineOptions,
) -> SearchHandle {
    let go_limits = parse_go_limits(parts);
    let board = board.clone();
    let threads = options.threads;
    let move_overhead_ms = options.move_overhead_ms;
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);

    let thread = std::thread::spawn(move || {
        if let Some(b) = book.as_ref()
            && let Some(book_move) = b.probe(&board)
        {
            println!("info string Book move found");
            println!("bestmove {}", book_move.to_uci());
            return;
        }

        let budget = allocate(&go_limits, board.side_to_move == Color::White, move_overhead_ms);
        let max_depth = go_limits.depth.unwrap_or(64).min(128);

        let report = search_parallel(
            &board,
            &tables,
            &tt,
            PoolLimits {
                max_depth,
                budget,
                threads,
            },
            &thread_stop,
        );

        match report.best_move {
            Some(m) => match report.ponder_move {
                Some(p) => println!("bestmove {} ponder {}", m.to_uci(), p.to_uci()),
                None => println!("bestmove {}", m.to_uci()),
            },
            None => println!("bestmove 0000"),
        }
    });

    SearchHandle { stop, thread }
}

// --- EPD Test Runner ---
fn run_epd_tests(path: &str, tables: &MagicTables) {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => match File::open(format!("bench_arena/{}", path.split('/').last().unwrap())) {
            Ok(f) => f,
            Err(_) => {
                println!("Error: Could not find EPD file at '{}' or local.", path);
                return;
            }
        },
    };

    println!("Running Tactical Tests from {} (1s per position)...", path);
    println!("----------------------------------------------------");

    let reader = BufReader::new(file);
    let mut solved = 0;
    let mut total = 0;

    for (line_idx, line_res) in reader.lines().enumerate() {
        let line = line_res.unwrap_or_default();
        if line.trim().is_empty() {
            continue;
        }

        if let Some(bm_idx) = line.find(" bm ") {
            let fen = &line[..bm_idx].trim();
            let rest = &line[bm_idx + 4..];
            let move_end = rest.find(';').unwrap_or(rest.len());
            let san_move = rest[..move_end].trim();

            let mut board = match Board::from_str(fen) {
                Ok(b) => b,
                Err(_) => {
                    println!("Error parsing FEN on line {}", line_idx + 1);
                    continue;
                }
            };

            let expected_uci = san_to_uci(&mut board, san_move, tables);

            let time_limit = Some(Duration::from_millis(1000));
            let depth = 64;

            let tt = TranspositionTable::new(128);
            let (_score, best_move) = search(&mut board, tables, &tt, depth, time_limit);

            let result_str = match best_move {
                Some(m) => m.to_uci(),
                None => "none".to_string(),
            };

            let passed = if let Some(ref exp) = expected_uci {
                *exp == result_str
            } else {
                false
            };

            if passed {
                solved += 1;
            }
            total += 1;

            println!("Test #{}: {}", total, if passed { "PASS" } else { "FAIL" });
            if !passed {
                println!(
                    "   Expected: {} | Got: {}",
                    expected_uci.unwrap_or(san_move.to_string()),
                    result_str
                );
            }
        }
    }

    println!("----------------------------------------------------");
    println!("Result: {}/{} Solved", solved, total);
}

// --- Helper: Convert SAN to UCI ---
fn san_to_uci(board: &mut Board, san: &str, tables: &MagicTables) -> Option<String> {
    let mut moves = Vec::with_capacity(256);
    let mut scratch = Vec::with_capacity(256);
    generate_legal(board, tables, &mut moves, &mut scratch);

    let clean_san = san.replace("+", "").replace("#", "").replace("x", "");

    if clean_san == "O-O" {
        return moves
            .iter()
            .find(|m| {
                let from = m.from.index() as i8;
                let to = m.to.index() as i8;
                (to - from).abs() == 2 && to > from
            })
            .map(|m| m.to_uci());
    }
    if clean_san == "O-O-O" {
        return moves
            .iter()
            .find(|m| {
                let from = m.from.index() as i8;
                let to = m.to.index() as i8;
                (to - from).abs() == 2 && to < from
            })
            .map(|m| m.to_uci());
    }

    if clean_san.len() < 2 {
        return None;
    }
    let target_str = &clean_san[clean_san.len() - 2..];

    let file = (target_str.chars().nth(0)? as u8).wrapping_sub(b'a');
    let rank = (target_str.chars().nth(1)? as u8).wrapping_sub(b'1');
    if file > 7 || rank > 7 {
        return None;
    }
    let target_sq = (rank * 8 + file) as usize;

    let first_char = clean_san.chars().next()?;
    let piece_type = match first_char {
        'N' => Piece::Knight,
        'B' => Piece::Bishop,
        'R' => Piece::Rook,
        'Q' => Piece::Queen,
        'K' => Piece::King,
        _ => Piece::Pawn,
    };

    let disambig_char = if piece_type == Piece::Pawn {
        if clean_san.len() > 2 && first_char.is_lowercase() {
            Some(first_char)
        } else {
            None
        }
    } else {
        let content = &clean_san[1..clean_san.len() - 2];
        if !content.is_empty() {
            content.chars().next()
        } else {
            None
        }
    };

    let candidates: Vec<&Move> = moves
        .iter()
        .filter(|m| {
            if (m.to.index() as usize) != target_sq {
                return false;
            }

            if let Some((_, p)) = board.piece_at(m.from) {
                if p != piece_type {
                    return false;
                }
            } else {
                return false;
            }

            if let Some(d) = disambig_char {
                let from_sq = m.from.index();
                let from_file = from_sq % 8;
                let from_rank = from_sq / 8;

                if d >= 'a' && d <= 'h' {
                    if from_file != (d as u8 - b'a') {
                        return false;
                    }
                } else if d >= '1' && d <= '8' {
                    if from_rank != (d as u8 - b'1') {
                        return false;
                    }
                }
            }
            true
        })
        .collect();

    if !candidates.is_empty() {
        Some(candidates[0].to_uci())
    } else {
        None
    }
}
