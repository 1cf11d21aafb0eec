use std::collections::BTreeMap;
use std::iter::FusedIterator;
use std::ops::ControlFlow;

use encoding_rs::Encoding;

use crate::error::Result;
use crate::io::{ByteWindow, Cursor};

use super::entry::Entry;
use super::parser::locate_end_of_central_directory;
use super::structures::{CentralDirectoryHeader, EndOfCentralDirectoryRecord, LocalFileHeader};

/// A ZIP archive held entirely in memory.
///
/// Opening an archive does no parsing. Each call to [`entries`](Self::entries)
/// locates the end record afresh and walks the central directory lazily.
///
/// ```
/// use memzip::Archive;
///
/// fn list(bytes: &[u8]) -> memzip::Result<()> {
///     for entry in Archive::new(bytes).entries()? {
///         let entry = entry?;
///         println!("{} ({} bytes)", entry.name(), entry.uncompressed_size());
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Archive<'a> {
    window: ByteWindow<'a>,
    encoding: &'static Encoding,
}

impl<'a> Archive<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            window: ByteWindow::new(bytes),
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Charset for names and comments of entries not flagged as UTF-8.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Size of the archive in bytes.
    pub fn len(&self) -> u64 {
        self.window.length()
    }

    pub fn is_empty(&self) -> bool {
        self.window.length() == 0
    }

    /// Locate and parse the End of Central Directory record.
    pub fn end_record(&self) -> Result<EndOfCentralDirectoryRecord> {
        let mut cursor = Cursor::new(self.window);
        locate_end_of_central_directory(&mut cursor)?;
        EndOfCentralDirectoryRecord::read(&mut cursor, self.encoding)
    }

    /// The archive-level comment.
    pub fn comment(&self) -> Result<String> {
        Ok(self.end_record()?.file_comment)
    }

    /// Iterate over the central directory in order.
    pub fn entries(&self) -> Result<Entries<'a>> {
        let end = self.end_record()?;
        log::debug!(
            "central directory at offset {} ({} bytes, {} records)",
            end.central_dir_offset,
            end.central_dir_size,
            end.central_dir_disk_records
        );

        Ok(Entries {
            cursor: Cursor::new_at(self.window, end.central_dir_offset.into()),
            remaining: end.central_dir_disk_records,
            encoding: self.encoding,
        })
    }

    /// Apply `visitor` to every entry in directory order.
    ///
    /// Returning `ControlFlow::Break` stops the walk early. The first error,
    /// from parsing or from the visitor, ends the walk and is returned.
    pub fn for_each<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(Entry<'a>) -> Result<ControlFlow<()>>,
    {
        for entry in self.entries()? {
            if visitor(entry?)?.is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Find the first entry called `name`.
    pub fn by_name(&self, name: &str) -> Result<Option<Entry<'a>>> {
        for entry in self.entries()? {
            let entry = entry?;
            if entry.name() == name {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Decode every file entry into a name to content map. Directories are left out.
    pub fn to_map(&self) -> Result<BTreeMap<String, Vec<u8>>> {
        let mut files = BTreeMap::new();
        self.for_each(|entry| {
            if entry.is_file() {
                let data = entry.data()?.to_vec();
                files.insert(entry.name().to_string(), data);
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(files)
    }

    /// Like [`to_map`](Self::to_map), with contents decoded as text in `encoding`.
    pub fn to_string_map(&self, encoding: &'static Encoding) -> Result<BTreeMap<String, String>> {
        let mut files = BTreeMap::new();
        self.for_each(|entry| {
            if entry.is_file() {
                let (text, _) = encoding.decode_without_bom_handling(entry.data()?);
                files.insert(entry.name().to_string(), text.into_owned());
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(files)
    }
}

/// Iterator over the entries of an [`Archive`].
///
/// Yields at most as many entries as the end record declares for this disk.
/// After the first error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    cursor: Cursor<'a>,
    remaining: u16,
    encoding: &'static Encoding,
}

impl<'a> Entries<'a> {
    fn read_entry(&mut self) -> Result<Entry<'a>> {
        let central = CentralDirectoryHeader::read(&mut self.cursor, self.encoding)?;
        log::trace!("{central:#x?}");

        // A separate cursor keeps the directory position untouched
        let mut local_cursor =
            Cursor::new_at(self.cursor.window(), central.local_file_header_offset.into());
        let local = LocalFileHeader::read(&mut local_cursor, self.encoding)?;
        if local.file_name != central.file_name {
            log::warn!(
                "local header name {:?} differs from central directory name {:?}",
                local.file_name,
                central.file_name
            );
        }

        let data_offset = local_cursor.position();
        Ok(Entry::new(self.cursor.window(), local, central, data_offset))
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<Entry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let entry = self.read_entry();
        if entry.is_err() {
            self.remaining = 0;
        }
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining.into()))
    }
}

impl FusedIterator for Entries<'_> {}
