use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the turn engine.
///
/// Recoverable in-game failures (nothing to pick up, inventory full, no
/// damage dealt) are ordinary log messages, never errors. This enum covers
/// persistence only.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No save file exists at the given path.
    #[error("no saved game at {path}")]
    SaveNotFound {
        /// The path that was probed.
        path: PathBuf,
    },

    /// A save file exists but could not be decoded.
    #[error("saved game at {path} is corrupt: {source}")]
    SaveCorrupt {
        /// The save file's path.
        path: PathBuf,
        /// The underlying decode failure.
        source: serde_json::Error,
    },

    /// The game state could not be encoded for saving.
    #[error("could not encode the game state: {0}")]
    Encode(#[from] serde_json::Error),

    /// The save file could not be read or written.
    #[error("save file I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
