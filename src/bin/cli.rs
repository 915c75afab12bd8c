use indicatif::{ProgressBar, ProgressStyle};
use magpie::board::Board;
use magpie::logger::{DEFAULT_FILTER, init_logging};
use magpie::moves::magic::loader::{load_startup_magics, save_magics};
use magpie::moves::magic::precompute::generate_magic_tables_with;
use magpie::moves::magic::{MagicError, MagicTableSeed, SearchBudget};
use magpie::moves::perft::{perft, perft_divide, run_suite};
use magpie::moves::{AttackTables, Legality, MoveList, generate_moves};
use magpie::status::position_status;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Instant;

const USAGE: &str = "\
usage: magpie [--magics <path>] [--fen <fen>] [--log <path>] <command>

commands:
  perft <depth>                    leaf count from the position
  divide <depth>                   leaf count per root move
  suite [max-depth]                reference positions (default depth 4)
  legal                            list legal moves and game status
  magics [--seed <n>] [--out <path>]
                                   search new magics and save them";

const MAX_CLI_DEPTH: u32 = 20;

#[derive(Debug, Default)]
struct Options {
    magics: Option<PathBuf>,
    fen: Option<String>,
    log: Option<PathBuf>,
    seed: Option<u64>,
    out: Option<PathBuf>,
    command: Vec<String>,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut args = args;

    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or_else(|| format!("{} needs a value", name));
        match arg.as_str() {
            "--magics" => opts.magics = Some(PathBuf::from(value("--magics")?)),
            "--fen" => opts.fen = Some(value("--fen")?),
            "--log" => opts.log = Some(PathBuf::from(value("--log")?)),
            "--out" => opts.out = Some(PathBuf::from(value("--out")?)),
            "--seed" => {
                let raw = value("--seed")?;
                opts.seed = Some(raw.parse().map_err(|_| format!("bad seed: {}", raw))?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if arg.starts_with("--") => return Err(format!("unknown flag {}\n\n{}", arg, USAGE)),
            _ => opts.command.push(arg),
        }
    }
    Ok(opts)
}

fn parse_depth(raw: Option<&String>, default: Option<u32>) -> Result<u32, String> {
    let depth = match (raw, default) {
        (Some(s), _) => s.parse().map_err(|_| format!("bad depth: {}", s))?,
        (None, Some(d)) => d,
        (None, None) => return Err("missing depth".to_string()),
    };
    if depth > MAX_CLI_DEPTH {
        return Err(format!("depth {} is above the limit of {}", depth, MAX_CLI_DEPTH));
    }
    Ok(depth)
}

fn tables_for(opts: &Options) -> Result<AttackTables, MagicError> {
    let magic = load_startup_magics(opts.magics.as_deref())?;
    Ok(AttackTables::new(magic))
}

fn board_for(opts: &Options) -> Result<Board, String> {
    match &opts.fen {
        Some(fen) => Board::from_str(fen),
        None => Ok(Board::new()),
    }
}

fn search_magics(opts: &Options) -> Result<(), String> {
    let seed = opts.seed.map_or(MagicTableSeed::Random, MagicTableSeed::Fixed);
    let out = opts.out.clone().unwrap_or_else(magpie::moves::magic::loader::magic_file_path);

    let pb = ProgressBar::new(128);
    pb.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let started = Instant::now();
    let tables = generate_magic_tables_with(seed, SearchBudget::default(), |slider, square| {
        pb.set_message(format!("{} {}", slider.name(), square));
        pb.inc(1);
    })
    .map_err(|e| e.to_string())?;
    pb.finish_with_message(format!("done in {:.1}s", started.elapsed().as_secs_f64()));

    save_magics(&out, &tables).map_err(|e| e.to_string())?;
    println!("saved {} ({} table slots)", out.display(), tables.table_len());
    Ok(())
}

fn run(opts: Options) -> Result<(), String> {
    let Some(command) = opts.command.first() else {
        return Err(USAGE.to_string());
    };

    if command == "magics" {
        return search_magics(&opts);
    }

    let tables = tables_for(&opts).map_err(|e| e.to_string())?;
    let mut board = board_for(&opts)?;
    let arg = opts.command.get(1);

    match command.as_str() {
        "perft" => {
            let depth = parse_depth(arg, None)?;
            let started = Instant::now();
            let nodes = perft(&mut board, &tables, depth);
            let secs = started.elapsed().as_secs_f64().max(1e-9);
            println!("d{depth}: nodes={nodes} time={secs:.3}s nps={}", (nodes as f64 / secs) as u64);
        }
        "divide" => {
            let depth = parse_depth(arg, None)?;
            perft_divide(&mut board, &tables, depth);
        }
        "suite" => {
            let depth = parse_depth(arg, Some(4))?;
            let outcomes = run_suite(&tables, depth)?;
            let mut failed = 0;
            for o in &outcomes {
                let mark = if o.passed() { "ok" } else { "FAIL" };
                println!("{:<10} d{} {:>12} {:>12} {}", o.name, o.depth, o.expected, o.actual, mark);
                failed += usize::from(!o.passed());
            }
            if failed > 0 {
                return Err(format!("{} of {} suite checks failed", failed, outcomes.len()));
            }
        }
        "legal" => {
            let mut moves = MoveList::new();
            generate_moves(&mut board, &tables, &mut moves, Legality::Legal);
            for mv in &moves {
                println!("{:#}", mv);
            }
            println!("{} legal moves, {:?}", moves.len(), position_status(&mut board, &tables));
        }
        other => return Err(format!("unknown command {}\n\n{}", other, USAGE)),
    }
    Ok(())
}

fn main() -> ExitCode {
    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(o) => o,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    if let Some(path) = &opts.log
        && let Err(e) = init_logging(path, DEFAULT_FILTER)
    {
        eprintln!("cannot open log file {}: {}", path.display(), e);
        return ExitCode::from(2);
    }

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::FAILURE
        }
    }
}
