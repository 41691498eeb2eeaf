//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the session run.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: pixelscript_core::config::ConfigError,
    },

    /// The project file could not be read.
    #[error("failed to read project file {path}: {source}")]
    ProjectLoad {
        /// Path that was read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The project file is not a valid project document.
    #[error("failed to parse project: {source}")]
    ProjectParse {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Session runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: pixelscript_core::runner::RunnerError,
    },
}
