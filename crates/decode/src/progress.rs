//! Ingestion progress reporting.
//!
//! The `{phase, percent}` event stream is the only signal external callers
//! receive between handing over raw bytes and the import completing.

use derive_more::Display;

/// A pipeline phase boundary.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Byte acquisition (emitted by the caller that fetched the bytes).
    #[display("downloading")]
    Downloading,
    /// Archive detection and decompression.
    #[display("unzipping")]
    Unzipping,
    /// Dialect decoding into canonical records.
    #[display("parsing")]
    Parsing,
    /// Batched writes into the corpus store.
    #[display("importing")]
    Importing,
}

/// A single progress event. `percent` is scoped to the phase, not the
/// pipeline as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase: Phase,
    pub percent: u8,
}

impl Progress {
    pub fn new(phase: Phase, percent: u8) -> Self {
        Self { phase, percent: percent.min(100) }
    }
}
