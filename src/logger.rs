use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt};

static GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Default filter when neither `RUST_LOG` nor the caller gives one.
pub const DEFAULT_FILTER: &str = "magpie=info";

/// Route `tracing` output to `path` through a non-blocking writer.
///
/// `filter` uses `EnvFilter` syntax, e.g. `"magpie::moves::perft=debug,info"`;
/// `RUST_LOG` wins when set. Only the first call in a process installs a
/// subscriber; later calls return `Ok(())` without touching anything.
pub fn init_logging<P: AsRef<Path>>(path: P, filter: &str) -> io::Result<()> {
    if GUARD.get().is_some() {
        return Ok(());
    }

    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    // Dropping the guard would stop the writer thread; keep it for the process lifetime.
    if GUARD.set(guard).is_err() {
        return Ok(());
    }

    let env_filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_ansi(false) // plain text in files
        .with_target(true)
        .with_line_number(true)
        .with_writer(non_blocking)
        .finish();

    // Someone else may already own the global subscriber (test harnesses do).
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}
