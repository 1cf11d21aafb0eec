use flate2::read::DeflateDecoder;
use std::io::Read;

use crate::error::{Result, ZipError};

/// Decompress a raw DEFLATE stream (no zlib or gzip framing).
///
/// `size_hint` pre-sizes the output when the uncompressed size is known.
pub fn inflate(compressed: &[u8], size_hint: Option<usize>) -> Result<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(compressed);
    let mut output = Vec::with_capacity(size_hint.unwrap_or(compressed.len() * 2));
    decoder
        .read_to_end(&mut output)
        .map_err(|e| ZipError::Inflate(e.to_string()))?;
    Ok(output)
}
