use chrono::{NaiveDate, NaiveDateTime};
use encoding_rs::Encoding;

use crate::error::{Result, ZipError};
use crate::io::Cursor;

/// Host system code for Unix in the high byte of "version made by".
pub const MADE_BY_UNIX: u8 = 3;

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            CompressionMethod::Stored => 0,
            CompressionMethod::Deflate => 8,
            CompressionMethod::Unknown(v) => *v,
        }
    }
}

/// General purpose bit flag shared by local and central headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneralPurposeFlags(pub u16);

impl GeneralPurposeFlags {
    /// Bit 0: the payload is encrypted. Reported only, never decrypted.
    pub fn is_encrypted(&self) -> bool {
        self.0 & 0x0001 != 0
    }

    /// Bit 3: sizes and CRC follow the payload in a data descriptor.
    pub fn has_data_descriptor(&self) -> bool {
        self.0 & 0x0008 != 0
    }

    /// Bit 11: name and comment are UTF-8.
    pub fn is_utf8(&self) -> bool {
        self.0 & 0x0800 != 0
    }

    /// Charset for names and comments: UTF-8 when bit 11 says so, else `fallback`.
    pub fn name_encoding(&self, fallback: &'static Encoding) -> &'static Encoding {
        if self.is_utf8() { encoding_rs::UTF_8 } else { fallback }
    }
}

/// MS-DOS date and time as stored in ZIP headers.
///
/// Fields are the raw bit-field values and are not range checked, so an
/// archive can encode e.g. day 0. Use [`to_naive`](Self::to_naive) for a
/// validated calendar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosDateTime {
    pub year: u16,
    /// 1-12 for well-formed archives
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DosDateTime {
    pub fn from_dos(date: u16, time: u16) -> Self {
        Self {
            year: (date >> 9) + 1980,
            month: ((date >> 5) & 0x0F) as u8,
            day: (date & 0x1F) as u8,
            hour: ((time >> 11) & 0x1F) as u8,
            minute: ((time >> 5) & 0x3F) as u8,
            second: ((time & 0x1F) * 2) as u8,
        }
    }

    /// Convert to a calendar timestamp, `None` if the fields do not name one.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?.and_hms_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.into(),
        )
    }
}

/// POSIX permission bits of an entry, if the archive was made on Unix.
///
/// The high byte of `version_made_by` names the host system that wrote the
/// entry; only Unix hosts store `st_mode` in the upper 16 bits of the
/// external attributes. The result is masked to `rwxrwxrwx`.
pub fn detect_mode(version_made_by: u16, external_attributes: u32) -> Option<u32> {
    let made_by = (version_made_by >> 8) as u8;
    if made_by != MADE_BY_UNIX {
        return None;
    }
    Some((external_attributes >> 16) & 0o777)
}

fn check_signature(record: &'static str, expected: u32, actual: u32) -> Result<()> {
    if actual != expected {
        return Err(ZipError::SignatureMismatch {
            record,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Local File Header (LFH) - 30 bytes plus name and extra field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileHeader {
    pub version_needed: u16,
    pub flags: GeneralPurposeFlags,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub file_name: String,
    pub extra_field: Vec<u8>,
}

impl LocalFileHeader {
    pub const SIGNATURE: u32 = 0x04034b50;
    pub const SIZE: u64 = 30;

    /// Parse a local header at the cursor, signature included.
    pub fn read(cursor: &mut Cursor<'_>, encoding: &'static Encoding) -> Result<Self> {
        let signature = cursor.read_u32()?;
        Self::read_after_signature(cursor, signature, encoding)
    }

    /// Parse the rest of a local header whose signature was already read.
    pub fn read_after_signature(
        cursor: &mut Cursor<'_>,
        signature: u32,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        check_signature("local file header", Self::SIGNATURE, signature)?;

        let version_needed = cursor.read_u16()?;
        let flags = GeneralPurposeFlags(cursor.read_u16()?);
        let compression_method = CompressionMethod::from_u16(cursor.read_u16()?);
        let last_mod_time = cursor.read_u16()?;
        let last_mod_date = cursor.read_u16()?;
        let crc32 = cursor.read_u32()?;
        let compressed_size = cursor.read_u32()?;
        let uncompressed_size = cursor.read_u32()?;
        let file_name_length = cursor.read_u16()?;
        let extra_field_length = cursor.read_u16()?;

        let encoding = flags.name_encoding(encoding);
        let file_name = cursor.read_string(file_name_length.into(), encoding)?;
        let extra_field = cursor.read(extra_field_length.into())?.to_vec();

        Ok(Self {
            version_needed,
            flags,
            compression_method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            file_name,
            extra_field,
        })
    }
}

/// Central Directory File Header (CDFH) - 46 bytes plus name, extra field and comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralDirectoryHeader {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: GeneralPurposeFlags,
    pub compression_method: CompressionMethod,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub disk_number: u16,
    pub internal_file_attributes: u16,
    pub external_file_attributes: u32,
    pub local_file_header_offset: u32,
    pub file_name: String,
    pub extra_field: Vec<u8>,
    pub file_comment: String,
    /// Permission bits, present only for Unix-made entries
    pub mode: Option<u32>,
}

impl CentralDirectoryHeader {
    pub const SIGNATURE: u32 = 0x02014b50;
    pub const MIN_SIZE: u64 = 46;

    pub fn read(cursor: &mut Cursor<'_>, encoding: &'static Encoding) -> Result<Self> {
        let signature = cursor.read_u32()?;
        Self::read_after_signature(cursor, signature, encoding)
    }

    pub fn read_after_signature(
        cursor: &mut Cursor<'_>,
        signature: u32,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        check_signature("central directory file header", Self::SIGNATURE, signature)?;

        let version_made_by = cursor.read_u16()?;
        let version_needed = cursor.read_u16()?;
        let flags = GeneralPurposeFlags(cursor.read_u16()?);
        let compression_method = CompressionMethod::from_u16(cursor.read_u16()?);
        let last_mod_time = cursor.read_u16()?;
        let last_mod_date = cursor.read_u16()?;
        let crc32 = cursor.read_u32()?;
        let compressed_size = cursor.read_u32()?;
        let uncompressed_size = cursor.read_u32()?;
        let file_name_length = cursor.read_u16()?;
        let extra_field_length = cursor.read_u16()?;
        let file_comment_length = cursor.read_u16()?;
        let disk_number = cursor.read_u16()?;
        let internal_file_attributes = cursor.read_u16()?;
        let external_file_attributes = cursor.read_u32()?;
        let local_file_header_offset = cursor.read_u32()?;

        let encoding = flags.name_encoding(encoding);
        let file_name = cursor.read_string(file_name_length.into(), encoding)?;
        let extra_field = cursor.read(extra_field_length.into())?.to_vec();
        let file_comment = cursor.read_string(file_comment_length.into(), encoding)?;

        Ok(Self {
            version_made_by,
            version_needed,
            flags,
            compression_method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size,
            uncompressed_size,
            disk_number,
            internal_file_attributes,
            external_file_attributes,
            local_file_header_offset,
            file_name,
            extra_field,
            file_comment,
            mode: detect_mode(version_made_by, external_file_attributes),
        })
    }
}

/// End of Central Directory (EOCD) - 22 bytes plus comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfCentralDirectoryRecord {
    pub disk_number: u16,
    pub central_dir_disk_number: u16,
    pub central_dir_disk_records: u16,
    pub central_dir_total_records: u16,
    pub central_dir_size: u32,
    pub central_dir_offset: u32,
    /// Comment length in bytes, as declared
    pub file_comment_length: u16,
    pub file_comment: String,
}

impl EndOfCentralDirectoryRecord {
    pub const SIGNATURE: u32 = 0x06054b50;
    pub const SIZE: u64 = 22;
    /// Offset of the comment length field from the start of the record.
    pub const COMMENT_LENGTH_OFFSET: u64 = 20;

    pub fn read(cursor: &mut Cursor<'_>, encoding: &'static Encoding) -> Result<Self> {
        let signature = cursor.read_u32()?;
        Self::read_after_signature(cursor, signature, encoding)
    }

    pub fn read_after_signature(
        cursor: &mut Cursor<'_>,
        signature: u32,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        check_signature("end of central directory record", Self::SIGNATURE, signature)?;

        let disk_number = cursor.read_u16()?;
        let central_dir_disk_number = cursor.read_u16()?;
        let central_dir_disk_records = cursor.read_u16()?;
        let central_dir_total_records = cursor.read_u16()?;
        let central_dir_size = cursor.read_u32()?;
        let central_dir_offset = cursor.read_u32()?;
        let file_comment_length = cursor.read_u16()?;
        let file_comment = cursor.read_string(file_comment_length.into(), encoding)?;

        Ok(Self {
            disk_number,
            central_dir_disk_number,
            central_dir_disk_records,
            central_dir_total_records,
            central_dir_size,
            central_dir_offset,
            file_comment_length,
            file_comment,
        })
    }
}

/// Data descriptor trailing a payload whose sizes were unknown up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataDescriptor {
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
}

impl DataDescriptor {
    /// Optional signature some writers put in front of the descriptor.
    pub const SIGNATURE: u32 = 0x08074b50;

    /// Parse a descriptor, with or without its optional signature.
    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        let mut crc32 = cursor.read_u32()?;
        if crc32 == Self::SIGNATURE {
            crc32 = cursor.read_u32()?;
        }

        Ok(Self {
            crc32,
            compressed_size: cursor.read_u32()?,
            uncompressed_size: cursor.read_u32()?,
        })
    }
}
