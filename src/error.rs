//! Error types for extraction configuration and record repair

use thiserror::Error;

/// Errors that can occur around content extraction.
///
/// Extraction itself never surfaces an error; these come from building a
/// custom extractor, from a decode stage that is then skipped, or from the
/// record store.
#[derive(Error, Debug)]
pub enum Error {
    /// An optional decode stage could not run
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// A configured pattern does not compile
    #[error("Invalid pattern for {name}: {details}")]
    InvalidPattern { name: String, details: String },

    /// Configuration could not be read
    #[error("Invalid extractor configuration: {0}")]
    InvalidConfig(String),

    /// No record with the given id
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Record store failure
    #[error("Record store error: {0}")]
    Store(String),
}

/// Result type for extraction and repair operations
pub type Result<T> = std::result::Result<T, Error>;
