use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by panels, the terminal backend and the profile store.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot remove {requested} line(s): only {available} added line(s) present")]
    Underflow { requested: usize, available: usize },
    #[error("invalid color `{0}` (expected #rrggbb or a palette name)")]
    InvalidColor(String),
    #[error("unknown style `{0}`")]
    UnknownStyle(String),
    #[error("unknown alignment `{0}`")]
    UnknownAlignment(String),
    #[error("FastFlag profile not found: {0}")]
    ProfileNotFound(String),
    #[error("FastFlag profile already exists: {0}")]
    ProfileExists(String),
    #[error("input stream closed")]
    InputClosed,
    #[error("input interrupted")]
    Interrupted,
    #[error("line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine home directory")]
    NoHomeDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
