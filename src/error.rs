//! Error types for the ZIP decoder.

use thiserror::Error;

/// Errors raised while decoding an archive.
///
/// Every variant is fatal to the operation that produced it. Failures from
/// [`Entry::data`](crate::zip::Entry::data) only affect that entry; other
/// entries can still be listed and decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZipError {
    /// A read ran past the end of the archive buffer.
    #[error("read of {length} bytes at offset {offset} exceeds archive size {size}")]
    OutOfRange { offset: u64, length: u64, size: u64 },

    /// A record started with the wrong magic value.
    #[error("{record} signature invalid: expected {expected:#010x}, got {actual:#010x}")]
    SignatureMismatch {
        record: &'static str,
        expected: u32,
        actual: u32,
    },

    /// A record signature matching none of the known record kinds.
    #[error("unknown ZIP structure signature: {0:#010x}")]
    UnknownSignature(u32),

    /// No end of central directory record within the comment search window.
    #[error("unable to find end of central directory record")]
    ArchiveStructureNotFound,

    /// Compression method other than stored (0) or deflate (8).
    #[error("unsupported compression method: {0}")]
    UnsupportedCompressionMethod(u16),

    /// The DEFLATE stream could not be decoded.
    #[error("inflate failed: {0}")]
    Inflate(String),

    /// Integer decode requested with a width over 8 bytes.
    #[error("cannot decode a {0}-byte integer")]
    IntegerWidth(usize),
}

/// Result type for decoder operations.
pub type Result<T> = std::result::Result<T, ZipError>;
