//! Record dispatch and the end-of-central-directory search.
//!
//! ZIP archives are read from the end:
//! 1. Find the End of Central Directory (EOCD) record behind the archive comment
//! 2. Read it to learn where the Central Directory starts and how many records it holds
//! 3. Walk the Central Directory, visiting each file's Local File Header on the way
//!
//! Step 1 is the awkward one. The EOCD is fixed-size but may be followed by
//! a comment of up to 65535 bytes, so its offset has to be found by scanning
//! backwards for the signature.

use encoding_rs::Encoding;

use crate::error::{Result, ZipError};
use crate::io::Cursor;

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
pub const MAX_COMMENT_SIZE: u64 = 65535;

/// Any of the three top-level ZIP records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    LocalFile(LocalFileHeader),
    CentralDirectory(CentralDirectoryHeader),
    EndOfCentralDirectory(EndOfCentralDirectoryRecord),
}

impl Record {
    /// Read whichever record starts at the cursor, chosen by its signature.
    pub fn read(cursor: &mut Cursor<'_>, encoding: &'static Encoding) -> Result<Self> {
        let signature = cursor.read_u32()?;
        match signature {
            LocalFileHeader::SIGNATURE => Ok(Record::LocalFile(
                LocalFileHeader::read_after_signature(cursor, signature, encoding)?,
            )),
            CentralDirectoryHeader::SIGNATURE => Ok(Record::CentralDirectory(
                CentralDirectoryHeader::read_after_signature(cursor, signature, encoding)?,
            )),
            EndOfCentralDirectoryRecord::SIGNATURE => Ok(Record::EndOfCentralDirectory(
                EndOfCentralDirectoryRecord::read_after_signature(cursor, signature, encoding)?,
            )),
            other => Err(ZipError::UnknownSignature(other)),
        }
    }
}

/// Find the End of Central Directory record and seek the cursor to it.
///
/// Candidates are tried from `length - 22` downwards. A candidate is only
/// accepted when its declared comment length reaches exactly to the end of
/// the archive, which rules out signature bytes that happen to sit inside the
/// comment itself. The search gives up once the candidate would imply a
/// comment longer than [`MAX_COMMENT_SIZE`].
///
/// # Returns
///
/// The offset of the record. The cursor is left positioned there.
///
/// # Errors
///
/// [`ZipError::ArchiveStructureNotFound`] if no candidate qualifies.
pub fn locate_end_of_central_directory(cursor: &mut Cursor<'_>) -> Result<u64> {
    let length = cursor.length();
    let Some(last) = length.checked_sub(EndOfCentralDirectoryRecord::SIZE) else {
        return Err(ZipError::ArchiveStructureNotFound);
    };
    let first = last.saturating_sub(MAX_COMMENT_SIZE);

    for position in (first..=last).rev() {
        cursor.seek(position);
        if cursor.read_u32()? != EndOfCentralDirectoryRecord::SIGNATURE {
            continue;
        }

        cursor.seek(position + EndOfCentralDirectoryRecord::COMMENT_LENGTH_OFFSET);
        let comment_length = u64::from(cursor.read_u16()?);
        if position + EndOfCentralDirectoryRecord::SIZE + comment_length == length {
            log::debug!("end of central directory record at offset {position}");
            cursor.seek(position);
            return Ok(position);
        }

        log::trace!(
            "rejected end record candidate at {position}: comment length {comment_length} does not reach the end"
        );
    }

    Err(ZipError::ArchiveStructureNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ByteWindow;
    use byteorder::{LittleEndian, WriteBytesExt};
    use encoding_rs::UTF_8;

    /// An empty archive: just an end record with the given comment.
    fn end_record(comment: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_u32::<LittleEndian>(EndOfCentralDirectoryRecord::SIGNATURE).unwrap();
        buf.extend_from_slice(&[0u8; 16]);
        buf.write_u16::<LittleEndian>(comment.len() as u16).unwrap();
        buf.extend_from_slice(comment);
        buf
    }

    #[test]
    fn finds_record_without_comment() {
        let mut archive = vec![0xEEu8; 100];
        archive.extend(end_record(b""));

        let mut cursor = Cursor::new(ByteWindow::new(&archive));
        assert_eq!(locate_end_of_central_directory(&mut cursor).unwrap(), 100);
        assert_eq!(cursor.position(), 100);
    }

    #[test]
    fn skips_signature_embedded_in_comment() {
        // The comment carries a fake end record whose comment length is wrong
        let mut comment = b"note ".to_vec();
        comment.extend(end_record(b"xyz"));
        comment.extend_from_slice(b" tail");

        let archive = end_record(&comment);
        let mut cursor = Cursor::new(ByteWindow::new(&archive));
        assert_eq!(locate_end_of_central_directory(&mut cursor).unwrap(), 0);

        let record = EndOfCentralDirectoryRecord::read(&mut cursor, UTF_8).unwrap();
        assert_eq!(record.file_comment_length as usize, comment.len());
    }

    #[test]
    fn finds_record_behind_maximum_comment() {
        let comment = vec![b'c'; MAX_COMMENT_SIZE as usize];
        let mut archive = vec![0u8; 10];
        archive.extend(end_record(&comment));

        let mut cursor = Cursor::new(ByteWindow::new(&archive));
        assert_eq!(locate_end_of_central_directory(&mut cursor).unwrap(), 10);
    }

    #[test]
    fn gives_up_outside_search_window() {
        // A valid record followed by more bytes than any comment could hold
        let mut archive = end_record(b"");
        archive.extend(vec![0u8; MAX_COMMENT_SIZE as usize + 1]);

        let mut cursor = Cursor::new(ByteWindow::new(&archive));
        assert_eq!(
            locate_end_of_central_directory(&mut cursor),
            Err(ZipError::ArchiveStructureNotFound)
        );
    }

    #[test]
    fn rejects_non_zip_input() {
        let inputs: [&[u8]; 3] = [b"", b"PK\x05\x06", &[0x42u8; 4096]];
        for data in inputs {
            let mut cursor = Cursor::new(ByteWindow::new(data));
            assert_eq!(
                locate_end_of_central_directory(&mut cursor),
                Err(ZipError::ArchiveStructureNotFound)
            );
        }
    }

    #[test]
    fn record_dispatches_on_signature() {
        let archive = end_record(b"hi");
        let mut cursor = Cursor::new(ByteWindow::new(&archive));
        match Record::read(&mut cursor, UTF_8).unwrap() {
            Record::EndOfCentralDirectory(record) => assert_eq!(record.file_comment, "hi"),
            other => panic!("unexpected record {other:?}"),
        }

        let junk = [0x50u8, 0x4b, 0x07, 0x08, 0, 0];
        let mut cursor = Cursor::new(ByteWindow::new(&junk));
        assert_eq!(
            Record::read(&mut cursor, UTF_8),
            Err(ZipError::UnknownSignature(0x08074b50))
        );
    }
}
