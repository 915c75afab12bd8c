use super::attacks::Slider;
use std::fmt;
use std::path::PathBuf;

/// Configuration failures around the magic tables. All of them are fatal at
/// startup: there is no degraded mode without valid tables.
#[derive(Debug)]
pub enum MagicError {
    /// The magic file could not be read or written.
    Io { path: PathBuf, source: std::io::Error },
    /// The magic file is not a valid encoding.
    Decode { path: PathBuf, source: bincode::Error },
    /// The magic file decoded but its contents are unusable.
    Corrupt { reason: String },
    /// No collision-free magic was found for a square within the search budget.
    SearchExhausted { slider: Slider, square: usize, attempts: u64 },
}

impl fmt::Display for MagicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MagicError::Io { path, source } => {
                write!(f, "magic file {}: {}", path.display(), source)
            }
            MagicError::Decode { path, source } => {
                write!(f, "magic file {} is not decodable: {}", path.display(), source)
            }
            MagicError::Corrupt { reason } => write!(f, "magic data is corrupt: {}", reason),
            MagicError::SearchExhausted { slider, square, attempts } => write!(
                f,
                "no {} magic found for square {} after {} attempts",
                slider.name(),
                square,
                attempts
            ),
        }
    }
}

impl std::error::Error for MagicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MagicError::Io { source, .. } => Some(source),
            MagicError::Decode { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
