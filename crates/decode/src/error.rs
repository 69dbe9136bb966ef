//! Decode Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Decode-phase failures abort an import before any store
//! mutation, so every variant here means "nothing was written".

use derive_more::{Display, Error};

/// A decode error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for decode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The raw bytes could not be turned into a text document: corrupt
    /// archive, no JSON/XML entry inside it, or malformed JSON syntax.
    #[display("failed to decode source: {_0}")]
    DecodeFailure(#[error(not(source))] String),
    /// The document parsed, but matches neither OSIS nor the simple
    /// book/chapter/verse dialect (or yielded zero books).
    #[display("unsupported dialect: {_0}")]
    UnsupportedDialect(#[error(not(source))] String),
    /// Decoding succeeded but produced zero verses.
    #[display("decoded corpus contains no verses")]
    EmptyCorpus,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The source bytes are either a decodable corpus or they're not.
        false
    }
}
