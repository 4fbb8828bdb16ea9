//! Error types for the engine binary.
//!
//! [`AppError`] wraps every failure mode between loading the config and
//! writing the final outputs, so `main` can propagate with `?`.

use std::path::PathBuf;

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: hegemon_core::ConfigError,
    },

    /// The configured scenario does not exist.
    #[error("unknown scenario {name:?}; expected one of {available:?}")]
    UnknownScenario {
        /// The name that was asked for.
        name: String,
        /// Names that would have worked.
        available: Vec<&'static str>,
    },

    /// A tick failed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: hegemon_core::EngineError,
    },

    /// Serializing the final state failed.
    #[error("graph error: {source}")]
    Graph {
        /// The underlying graph error.
        #[from]
        source: hegemon_graph::GraphError,
    },

    /// Serializing observer output failed.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying observer error.
        #[from]
        source: hegemon_core::ObserverError,
    },

    /// Writing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        /// File being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
