//! Stateful read position over a [`ByteWindow`].

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use encoding_rs::Encoding;

use super::ByteWindow;
use crate::error::{Result, ZipError};
use crate::zip::{CompressionMethod, inflate};

/// A read position over a shared [`ByteWindow`].
///
/// Seeking is never bounds-checked; a position past the end only fails once
/// something is read there. Each cursor owns its position, so independent
/// cursors over the same window never disturb each other.
///
/// ```
/// use memzip::io::{ByteWindow, Cursor};
///
/// let data = [0x50, 0x4b, 0x03, 0x04, 0x0a, 0x00];
/// let mut cursor = Cursor::new(ByteWindow::new(&data));
///
/// assert_eq!(cursor.read_u32().unwrap(), 0x04034b50);
/// assert_eq!(cursor.read_u16().unwrap(), 10);
/// assert_eq!(cursor.position(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    window: ByteWindow<'a>,
    offset: u64,
}

impl<'a> Cursor<'a> {
    pub fn new(window: ByteWindow<'a>) -> Self {
        Self { window, offset: 0 }
    }

    /// Create a cursor already positioned at `offset`.
    pub fn new_at(window: ByteWindow<'a>, offset: u64) -> Self {
        Self { window, offset }
    }

    pub fn window(&self) -> ByteWindow<'a> {
        self.window
    }

    /// Size of the underlying archive.
    pub fn length(&self) -> u64 {
        self.window.length()
    }

    pub fn position(&self) -> u64 {
        self.offset
    }

    pub fn seek(&mut self, offset: u64) {
        self.offset = offset;
    }

    /// Read `length` raw bytes and advance past them.
    pub fn read(&mut self, length: u64) -> Result<&'a [u8]> {
        let bytes = self.window.read(self.offset, length)?;
        self.offset += length;
        Ok(bytes)
    }

    /// Decode an unsigned integer `length` bytes wide.
    ///
    /// Little-endian unless `big_endian` is set. A zero-width read yields 0.
    pub fn read_integer(&mut self, length: usize, big_endian: bool) -> Result<u64> {
        if length > 8 {
            return Err(ZipError::IntegerWidth(length));
        }
        let bytes = self.read(length as u64)?;
        if bytes.is_empty() {
            return Ok(0);
        }

        Ok(if big_endian {
            BigEndian::read_uint(bytes, length)
        } else {
            LittleEndian::read_uint(bytes, length)
        })
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_integer(1, false)? as u8)
    }

    /// Read a little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read_integer(2, false)? as u16)
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.read_integer(4, false)? as u32)
    }

    /// Read `length` bytes and decode them as text in `encoding`.
    ///
    /// Malformed sequences are replaced with U+FFFD rather than failing.
    pub fn read_string(&mut self, length: u64, encoding: &'static Encoding) -> Result<String> {
        let bytes = self.read(length)?;
        let (text, _had_errors) = encoding.decode_without_bom_handling(bytes);
        Ok(text.into_owned())
    }

    /// Read `length` payload bytes and undo `method`'s compression.
    ///
    /// Stored payloads are copied out as-is, deflate payloads go through
    /// [`inflate`]. The cursor advances past the raw bytes either way.
    pub fn read_uncompressed(&mut self, length: u64, method: CompressionMethod) -> Result<Vec<u8>> {
        let compressed = self.read(length)?;
        match method {
            CompressionMethod::Stored => Ok(compressed.to_vec()),
            CompressionMethod::Deflate => inflate(compressed, None),
            CompressionMethod::Unknown(code) => Err(ZipError::UnsupportedCompressionMethod(code)),
        }
    }
}
