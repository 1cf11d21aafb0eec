use crate::error::{Result, ZipError};

/// Bounds-checked random access over an in-memory archive buffer.
///
/// The window borrows the buffer, so it is `Copy` and can be handed to any
/// number of cursors or entries. Slices returned by [`read`](Self::read)
/// alias the buffer; nothing in the decoder mutates them.
#[derive(Debug, Clone, Copy)]
pub struct ByteWindow<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteWindow<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Total size of the buffer in bytes.
    pub fn length(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Borrow `length` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`ZipError::OutOfRange`] if any part of the range lies past the end
    /// of the buffer.
    pub fn read(&self, offset: u64, length: u64) -> Result<&'a [u8]> {
        let out_of_range = || ZipError::OutOfRange {
            offset,
            length,
            size: self.length(),
        };

        let end = offset.checked_add(length).ok_or_else(out_of_range)?;
        if end > self.length() {
            return Err(out_of_range());
        }

        // Both bounds fit in usize since they are <= bytes.len()
        Ok(&self.bytes[offset as usize..end as usize])
    }

    /// The whole underlying buffer.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}
