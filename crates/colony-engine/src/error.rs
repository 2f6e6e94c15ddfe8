//! Error types for the tick binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode of a single tick run.

/// Top-level error for the tick binary.
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
        source: colony_core::config::ConfigError,
    },

    /// Loading inputs, running the tick, or writing outputs failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: colony_core::tick::TickError,
    },

    /// The tick summary could not be rendered.
    #[error("failed to render summary: {source}")]
    Summary {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
