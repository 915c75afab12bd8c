use crate::board::Board;
use crate::moves::{
    execute::{make_move, unmake_move},
    legal::generate_legal,
    square_control::in_check,
    tables::AttackTables,
    types::Move,
};
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

const MAX_LOG_DEPTH: u32 = 3; // only trace details for shallow nodes
const MAX_PERFT_DEPTH: usize = 20; // support perft up to depth 20

/// Tallies over the moves of the last ply plus the leaf positions they reach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounters {
    pub nodes: u64,
    pub captures: u64,
    pub ep_captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounters {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn add(&mut self, o: &PerftCounters) {
        self.nodes += o.nodes;
        self.captures += o.captures;
        self.ep_captures += o.ep_captures;
        self.castles += o.castles;
        self.promotions += o.promotions;
        self.checks += o.checks;
        self.checkmates += o.checkmates;
    }
}

// One buffer per ply, plus one for the leaf mate check at full depth
const BUFFER_PLIES: usize = MAX_PERFT_DEPTH + 1;

fn create_move_buffer_array() -> [Vec<Move>; BUFFER_PLIES] {
    std::array::from_fn(|_| Vec::with_capacity(64))
}

fn create_pseudo_buffer_array() -> [Vec<Move>; BUFFER_PLIES] {
    std::array::from_fn(|_| Vec::with_capacity(256))
}

#[inline]
fn check_depth(depth: u32) {
    if depth as usize > MAX_PERFT_DEPTH {
        panic!("Depth {} exceeds MAX_PERFT_DEPTH {}", depth, MAX_PERFT_DEPTH);
    }
}

// Recursive perft implementation with per-ply buffers
fn perft_recursive(
    board: &mut Board,
    tables: &AttackTables,
    depth: u32,
    ply: usize,
    move_buffers: &mut [Vec<Move>],
    pseudo_buffers: &mut [Vec<Move>],
) -> u64 {
    if depth == 0 {
        return 1;
    }

    // Generate moves (reusing buffers)
    {
        let moves = &mut move_buffers[ply];
        let pseudo = &mut pseudo_buffers[ply];
        generate_legal(board, tables, moves, pseudo);
    }

    // Bulk count: the legal list length is the leaf count one ply down
    let move_count = move_buffers[ply].len();
    if depth == 1 {
        return move_count as u64;
    }

    let mut node_count = 0;
    for i in 0..move_count {
        let mv = move_buffers[ply][i];
        let undo = make_move(board, mv);

        // Child uses ply+1 buffers
        node_count += perft_recursive(board, tables, depth - 1, ply + 1, move_buffers, pseudo_buffers);

        unmake_move(board, undo);
    }

    node_count
}

/// Number of leaf positions `depth` plies below `board`.
#[instrument(skip(board, tables), fields(depth))]
pub fn perft(board: &mut Board, tables: &AttackTables, depth: u32) -> u64 {
    check_depth(depth);

    // Allocate buffers once
    let mut move_buffers = create_move_buffer_array();
    let mut pseudo_buffers = create_pseudo_buffer_array();

    perft_recursive(board, tables, depth, 0, &mut move_buffers, &mut pseudo_buffers)
}

/// Per-root-move leaf counts. Prints one `move: count` line per root move
/// and a total, and returns the pairs in generation order.
#[instrument(skip(board, tables), fields(depth))]
pub fn perft_divide(board: &mut Board, tables: &AttackTables, depth: u32) -> Vec<(Move, u64)> {
    check_depth(depth);
    if depth == 0 {
        return Vec::new();
    }

    // Allocate buffers once
    let mut move_buffers = create_move_buffer_array();
    let mut pseudo_buffers = create_pseudo_buffer_array();

    // Generate root moves
    {
        let moves = &mut move_buffers[0];
        let pseudo = &mut pseudo_buffers[0];
        generate_legal(board, tables, moves, pseudo);

        if depth <= MAX_LOG_DEPTH {
            debug!(depth, moves = moves.len(), "divide: root legal moves");
        }
    }

    let mut total = 0;
    let move_count = move_buffers[0].len();
    let mut out = Vec::with_capacity(move_count);

    for i in 0..move_count {
        let mv = move_buffers[0][i];

        let undo = make_move(board, mv);
        let count = perft_recursive(board, tables, depth - 1, 1, &mut move_buffers, &mut pseudo_buffers);
        unmake_move(board, undo);

        if depth <= MAX_LOG_DEPTH {
            debug!(%mv, nodes = count, "divide: root child total");
        }

        println!("{}: {}", mv, count);
        total += count;
        out.push((mv, count));
    }

    debug!(depth, total, "divide: total");
    println!("Total: {}", total);
    out
}

// Recursive implementation with per-ply buffers for breakdown
fn perft_count_recursive(
    board: &mut Board,
    tables: &AttackTables,
    depth: u32,
    ply: usize,
    out: &mut PerftCounters,
    move_buffers: &mut [Vec<Move>],
    pseudo_buffers: &mut [Vec<Move>],
) {
    if depth == 0 {
        out.nodes += 1;

        // Leaf: check/mate status
        let side_in_check = in_check(board, board.side_to_move(), tables);
        if side_in_check {
            out.checks += 1;

            let tmp = &mut move_buffers[ply];
            let scratch = &mut pseudo_buffers[ply];
            generate_legal(board, tables, tmp, scratch);
            if tmp.is_empty() {
                out.checkmates += 1;
            }
        }
        return;
    }

    // Generate moves
    {
        let moves = &mut move_buffers[ply];
        let pseudo = &mut pseudo_buffers[ply];
        generate_legal(board, tables, moves, pseudo);
    }

    let move_count = move_buffers[ply].len();
    for i in 0..move_count {
        let mv = move_buffers[ply][i];

        // --- breakdown tags on the last ply only ---
        if depth == 1 {
            if mv.is_capture() {
                out.captures += 1;
                if mv.is_en_passant() {
                    out.ep_captures += 1;
                }
            }
            if mv.is_castling() {
                out.castles += 1;
            }
            if mv.promotion.is_some() {
                out.promotions += 1;
            }
        }

        let undo = make_move(board, mv);
        perft_count_recursive(board, tables, depth - 1, ply + 1, out, move_buffers, pseudo_buffers);
        unmake_move(board, undo);
    }
}

/// Leaf count plus capture / en passant / castle / promotion / check / mate
/// tallies at `depth`.
#[instrument(skip(board, tables, out), fields(depth))]
pub fn perft_count_with_breakdown(board: &mut Board, tables: &AttackTables, depth: u32, out: &mut PerftCounters) {
    check_depth(depth);

    let mut move_buffers = create_move_buffer_array();
    let mut pseudo_buffers = create_pseudo_buffer_array();

    perft_count_recursive(board, tables, depth, 0, out, &mut move_buffers, &mut pseudo_buffers);
}

/// Breakdown counters per root move.
pub fn perft_divide_with_breakdown(board: &mut Board, tables: &AttackTables, depth: u32) -> Vec<(Move, PerftCounters)> {
    check_depth(depth);
    if depth == 0 {
        return Vec::new();
    }

    // Allocate buffers once
    let mut move_buffers = create_move_buffer_array();
    let mut pseudo_buffers = create_pseudo_buffer_array();

    // Generate root moves
    {
        let moves = &mut move_buffers[0];
        let pseudo = &mut pseudo_buffers[0];
        generate_legal(board, tables, moves, pseudo);
    }

    let move_count = move_buffers[0].len();
    let mut out = Vec::with_capacity(move_count);

    for i in 0..move_count {
        let mv = move_buffers[0][i];
        let mut pc = PerftCounters::zero();

        if depth == 1 {
            // the root move is itself the last ply
            if mv.is_capture() {
                pc.captures = 1;
                pc.ep_captures = mv.is_en_passant() as u64;
            }
            pc.castles = mv.is_castling() as u64;
            pc.promotions = mv.promotion.is_some() as u64;
        }

        let undo = make_move(board, mv);
        perft_count_recursive(board, tables, depth - 1, 1, &mut pc, &mut move_buffers, &mut pseudo_buffers);
        unmake_move(board, undo);

        out.push((mv, pc));
    }
    out
}

/// One reference position with known leaf counts, `expected[d - 1]` at depth `d`.
#[derive(Debug, Clone, Copy)]
pub struct PerftPosition {
    pub name: &'static str,
    pub fen: &'static str,
    pub expected: &'static [u64],
}

/// The standard move generation suite.
pub const PERFT_SUITE: [PerftPosition; 6] = [
    PerftPosition {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        expected: &[20, 400, 8_902, 197_281, 4_865_609, 119_060_324],
    },
    PerftPosition {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected: &[48, 2_039, 97_862, 4_085_603, 193_690_690],
    },
    PerftPosition {
        name: "position3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected: &[14, 191, 2_812, 43_238, 674_624, 11_030_083],
    },
    PerftPosition {
        name: "position4",
        fen: "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        expected: &[6, 264, 9_467, 422_333, 15_833_292],
    },
    PerftPosition {
        name: "position5",
        fen: "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        expected: &[44, 1_486, 62_379, 2_103_487, 89_941_194],
    },
    PerftPosition {
        name: "position6",
        fen: "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
        expected: &[46, 2_079, 89_890, 3_894_594, 164_075_551],
    },
];

/// Result of one (position, depth) check in [`run_suite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteOutcome {
    pub name: &'static str,
    pub depth: u32,
    pub expected: u64,
    pub actual: u64,
}

impl SuiteOutcome {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

/// Run every suite position at depths `1..=max_depth` (capped by the known
/// counts). Mismatches are logged and reported, not raised.
#[instrument(skip(tables))]
pub fn run_suite(tables: &AttackTables, max_depth: u32) -> Result<Vec<SuiteOutcome>, String> {
    let mut outcomes = Vec::new();
    for pos in PERFT_SUITE.iter() {
        let mut board = Board::from_str(pos.fen).map_err(|e| format!("{}: {}", pos.name, e))?;
        for (d, &expected) in pos.expected.iter().enumerate().take(max_depth as usize) {
            let depth = d as u32 + 1;
            let actual = perft(&mut board, tables, depth);
            let outcome = SuiteOutcome {
                name: pos.name,
                depth,
                expected,
                actual,
            };
            if outcome.passed() {
                info!(name = pos.name, depth, nodes = actual, "suite ok");
            } else {
                warn!(name = pos.name, depth, expected, actual, "suite mismatch");
            }
            outcomes.push(outcome);
        }
    }
    Ok(outcomes)
}
