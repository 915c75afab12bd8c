use super::error::MagicError;
use super::precompute::build_from_saved;
use super::structs::{MagicTables, SavedMagics};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the persisted magic file.
pub const MAGIC_FILE_ENV: &str = "MAGPIE_MAGIC_FILE";
pub const DEFAULT_MAGIC_FILE: &str = "magics.bin";

pub fn magic_file_path() -> PathBuf {
    std::env::var_os(MAGIC_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MAGIC_FILE))
}

/// Write the (magic, shift) pairs of `tables` to `path` with bincode.
pub fn save_magics<P: AsRef<Path>>(path: P, tables: &MagicTables) -> Result<(), MagicError> {
    let path = path.as_ref();
    let io_err = |source| MagicError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, &tables.to_saved()).map_err(|source| MagicError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)?;

    info!(path = %path.display(), "magic numbers saved");
    Ok(())
}

/// Read persisted magics from `path` and rebuild verified lookup tables.
pub fn load_magics<P: AsRef<Path>>(path: P) -> Result<MagicTables, MagicError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| MagicError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let saved: SavedMagics =
        bincode::deserialize_from(BufReader::new(file)).map_err(|source| MagicError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let tables = build_from_saved(&saved)?;
    info!(path = %path.display(), "magic numbers loaded");
    Ok(tables)
}

/// Build the process-wide tables according to the enabled features:
/// `load_magic` reads [`magic_file_path`], `deterministic_magic` searches with
/// [`DEFAULT_SEED`](super::precompute::DEFAULT_SEED), otherwise the search is seeded from OS entropy.
pub fn load_magic_tables() -> Result<MagicTables, MagicError> {
    #[cfg(feature = "load_magic")]
    {
        load_magics(magic_file_path())
    }

    #[cfg(all(not(feature = "load_magic"), feature = "deterministic_magic"))]
    {
        use super::precompute::{DEFAULT_SEED, MagicTableSeed, generate_magic_tables};
        generate_magic_tables(MagicTableSeed::Fixed(DEFAULT_SEED))
    }

    #[cfg(all(not(feature = "load_magic"), not(feature = "deterministic_magic")))]
    {
        use super::precompute::{MagicTableSeed, generate_magic_tables};
        generate_magic_tables(MagicTableSeed::Random)
    }
}

/// Tables for process startup. An explicit `path` must load; without one the
/// file at [`magic_file_path`] is used when present, otherwise
/// [`load_magic_tables`] decides. A file that exists but fails to load is an
/// error, never a reason to search instead.
pub fn load_startup_magics(path: Option<&Path>) -> Result<MagicTables, MagicError> {
    if let Some(path) = path {
        return load_magics(path);
    }
    let default = magic_file_path();
    if default.exists() {
        return load_magics(default);
    }
    warn!(path = %default.display(), "no saved magics, using the configured loader");
    load_magic_tables()
}
