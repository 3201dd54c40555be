//! The engine's public error type (§7).
//!
//! Internal plumbing uses `anyhow` for ad hoc context, same as the
//! reference indexer; but everything that crosses the engine boundary —
//! what the CLI and server surface to a caller — comes back as this
//! closed, typed enum so callers can match on `kind()` instead of
//! string-sniffing a message.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ParseFailure,
    UnsupportedLanguage,
    Io,
    IndexCorruption,
    ConcurrentRunRefused,
    Config,
}

#[derive(Debug, Error)]
pub enum EngineError {
    /// File-local and recovered by the caller: the file is skipped and a
    /// warning accumulates in the report rather than aborting the run.
    #[error("failed to parse {path}: {source}")]
    ParseFailure { path: PathBuf, #[source] source: anyhow::Error },

    /// No plugin claims the extension. Not counted as a failure; files
    /// matching this are skipped silently.
    #[error("no language plugin registered for {path}")]
    UnsupportedLanguage { path: PathBuf },

    #[error("io error at {path}: {source}")]
    Io { path: PathBuf, #[source] source: std::io::Error },

    /// Record length mismatch or unknown version in the on-disk index.
    /// Fatal for the run — the analyzer refuses to write and recommends
    /// an index rebuild.
    #[error("index at {path} is corrupt: {reason}")]
    IndexCorruption { path: PathBuf, reason: String },

    /// Another writer holds the index lock.
    #[error("another analysis run holds the index lock at {path}")]
    ConcurrentRunRefused { path: PathBuf },

    #[error("invalid configuration at {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ParseFailure { .. } => ErrorKind::ParseFailure,
            EngineError::UnsupportedLanguage { .. } => ErrorKind::UnsupportedLanguage,
            EngineError::Io { .. } => ErrorKind::Io,
            EngineError::IndexCorruption { .. } => ErrorKind::IndexCorruption,
            EngineError::ConcurrentRunRefused { .. } => ErrorKind::ConcurrentRunRefused,
            EngineError::Config { .. } => ErrorKind::Config,
        }
    }

    pub fn parse_failure(path: PathBuf, source: anyhow::Error) -> Self {
        EngineError::ParseFailure { path, source }
    }

    pub fn unsupported_language(path: PathBuf) -> Self {
        EngineError::UnsupportedLanguage { path }
    }

    pub fn io(path: PathBuf, source: std::io::Error) -> Self {
        EngineError::Io { path, source }
    }

    pub fn index_corruption(path: PathBuf, reason: impl Into<String>) -> Self {
        EngineError::IndexCorruption { path, reason: reason.into() }
    }

    pub fn concurrent_run_refused(path: PathBuf) -> Self {
        EngineError::ConcurrentRunRefused { path }
    }

    pub fn config(path: PathBuf, reason: impl Into<String>) -> Self {
        EngineError::Config { path, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// A per-file failure accumulated during a run instead of aborting it —
/// surfaced in the report as a warning (§7's accumulation rule).
#[derive(Debug, Clone)]
pub struct AccumulatedFailure {
    pub file_path: PathBuf,
    pub message: String,
}

impl std::fmt::Display for AccumulatedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file_path.display(), self.message)
    }
}
