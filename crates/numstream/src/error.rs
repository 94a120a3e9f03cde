//! Error types for the record streaming pipeline.
//!
//! ## Error Cases
//! - `EntropyUnavailable`: the entropy source could not supply randomness.
//!   Fatal for the session.
//! - `UnencodableValue`: a record could not be serialized to JSON.
//! - `TransportWriteFailure`: the client connection rejected a chunk. The
//!   session treats this as a disconnect rather than surfacing it.
//! - `CompressorMisuse`: data was emitted after the stream was finalized.
//! - `Compression`: the underlying deflate encoder failed.

use std::io;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for the streaming pipeline.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The entropy source failed to produce a random number.
    #[error("Entropy unavailable: {context}")]
    EntropyUnavailable { context: String },

    /// A record could not be represented as JSON.
    #[error("Unencodable value: {0}")]
    UnencodableValue(#[from] serde_json::Error),

    /// The transport refused a chunk (client disconnected, broken pipe).
    #[error("Transport write failure: {context}")]
    TransportWriteFailure { context: String },

    /// Bytes were emitted after the compressed stream was finished.
    #[error("Compressor used after finish")]
    CompressorMisuse,

    /// The deflate encoder reported an I/O error.
    #[error("Compression error: {0}")]
    Compression(#[from] io::Error),
}

impl Error {
    /// Returns `true` when the error means the client went away.
    pub const fn is_disconnect(&self) -> bool {
        matches!(self, Self::TransportWriteFailure { .. })
    }
}
