//! Error types for the campaign engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode of engine startup, scenario loading and save files.

/// Top-level error for the campaign engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The district grid could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: electorate_core::WorldError,
    },

    /// A snapshot could not be restored.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying snapshot error.
        #[from]
        source: electorate_core::SnapshotError,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A JSON document could not be encoded or decoded.
    #[error("JSON error in {path}: {source}")]
    Json {
        /// The file involved.
        path: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The `engine` section of the YAML file is malformed.
    #[error("engine config error: {message}")]
    EngineConfig {
        /// Description of the failure.
        message: String,
    },
}
