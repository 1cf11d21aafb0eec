use std::sync::OnceLock;

use crate::error::Result;
use crate::io::{ByteWindow, Cursor};

use super::structures::{
    CentralDirectoryHeader, CompressionMethod, DataDescriptor, DosDateTime, LocalFileHeader,
};

/// One archived item, with its content decoded on first request.
///
/// An entry keeps its own copy of the archive window and reads the payload
/// through a private [`Cursor`], so entries never share a read position and
/// can be decoded from any thread. The decoded bytes (or the decode error)
/// are computed at most once and cached for the entry's lifetime.
#[derive(Debug)]
pub struct Entry<'a> {
    window: ByteWindow<'a>,
    local: LocalFileHeader,
    central: CentralDirectoryHeader,
    data_offset: u64,
    data: OnceLock<Result<Vec<u8>>>,
}

impl<'a> Entry<'a> {
    pub(crate) fn new(
        window: ByteWindow<'a>,
        local: LocalFileHeader,
        central: CentralDirectoryHeader,
        data_offset: u64,
    ) -> Self {
        Self {
            window,
            local,
            central,
            data_offset,
            data: OnceLock::new(),
        }
    }

    /// File name as recorded in the local header.
    pub fn name(&self) -> &str {
        &self.local.file_name
    }

    /// Directory entries end with '/'
    pub fn is_directory(&self) -> bool {
        self.name().ends_with('/')
    }

    pub fn is_file(&self) -> bool {
        !self.is_directory()
    }

    pub fn last_modified(&self) -> DosDateTime {
        DosDateTime::from_dos(self.local.last_mod_date, self.local.last_mod_time)
    }

    /// POSIX permission bits (e.g. `0o644`), only for archives made on Unix.
    pub fn mode(&self) -> Option<u32> {
        self.central.mode
    }

    pub fn compression_method(&self) -> CompressionMethod {
        self.central.compression_method
    }

    pub fn compressed_size(&self) -> u64 {
        self.central.compressed_size.into()
    }

    pub fn uncompressed_size(&self) -> u64 {
        self.central.uncompressed_size.into()
    }

    pub fn crc32(&self) -> u32 {
        self.central.crc32
    }

    pub fn comment(&self) -> &str {
        &self.central.file_comment
    }

    /// Offset of the first payload byte, just past the local header.
    pub fn data_offset(&self) -> u64 {
        self.data_offset
    }

    pub fn local_header(&self) -> &LocalFileHeader {
        &self.local
    }

    pub fn central_header(&self) -> &CentralDirectoryHeader {
        &self.central
    }

    /// Decoded content of the entry.
    ///
    /// The first call reads and decompresses the payload; later calls return
    /// the cached bytes. A failed decode is cached as well.
    ///
    /// # Errors
    ///
    /// [`ZipError::UnsupportedCompressionMethod`](crate::ZipError::UnsupportedCompressionMethod)
    /// for methods other than stored and deflate, [`ZipError::OutOfRange`](crate::ZipError::OutOfRange)
    /// if the payload runs past the archive, and
    /// [`ZipError::Inflate`](crate::ZipError::Inflate) for corrupt DEFLATE data.
    pub fn data(&self) -> Result<&[u8]> {
        self.data
            .get_or_init(|| self.decode())
            .as_deref()
            .map_err(Clone::clone)
    }

    fn decode(&self) -> Result<Vec<u8>> {
        let method = self.compression_method();
        if let CompressionMethod::Unknown(code) = method {
            log::warn!("{}: unsupported compression method {code}", self.name());
        }

        let mut cursor = Cursor::new_at(self.window, self.data_offset);
        cursor.read_uncompressed(self.compressed_size(), method)
    }

    /// The data descriptor after the payload, for entries flagged as having one.
    pub fn data_descriptor(&self) -> Result<Option<DataDescriptor>> {
        if !self.local.flags.has_data_descriptor() {
            return Ok(None);
        }

        let mut cursor = Cursor::new_at(self.window, self.data_offset + self.compressed_size());
        DataDescriptor::read(&mut cursor).map(Some)
    }
}
