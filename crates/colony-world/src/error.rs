//! Error types for the `colony-world` crate.
//!
//! Snapshot loading is the only fallible operation in this crate; it
//! returns [`WorldError`].

/// Errors that can occur while loading a world snapshot.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Failed to read the snapshot file from disk.
    #[error("failed to read snapshot: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Snapshot JSON did not match the expected layout.
    #[error("failed to parse snapshot JSON: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// An object claims to live in a locale other than the one it is listed under.
    #[error("object {id} is listed under locale {listed} but positioned in {actual}")]
    LocaleMismatch {
        /// The offending object.
        id: String,
        /// The locale it is listed under.
        listed: String,
        /// The locale in its position.
        actual: String,
    },
}
