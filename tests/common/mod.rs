//! Hand-rolled ZIP writer for building test fixtures byte by byte.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

pub const MADE_BY_DOS: u16 = 0x0014;
pub const MADE_BY_UNIX: u16 = 0x031E;

struct FixtureEntry {
    name: Vec<u8>,
    data: Vec<u8>,
    method: u16,
    flags: u16,
    version_made_by: u16,
    external_attributes: u32,
    date: u16,
    time: u16,
    comment: Vec<u8>,
    /// `Some(true)` writes a signed descriptor, `Some(false)` an unsigned one
    descriptor: Option<bool>,
}

/// Builds archives entry by entry; `with_*` calls apply to the last entry added.
#[derive(Default)]
pub struct ArchiveBuilder {
    entries: Vec<FixtureEntry>,
    comment: Vec<u8>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, name: &[u8], data: &[u8], method: u16) -> Self {
        self.entries.push(FixtureEntry {
            name: name.to_vec(),
            data: data.to_vec(),
            method,
            flags: 0,
            version_made_by: MADE_BY_DOS,
            external_attributes: 0,
            date: 0x0021, // 1980-01-01
            time: 0,
            comment: Vec::new(),
            descriptor: None,
        });
        self
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.push(name.as_bytes(), data, 0)
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.push(name.as_bytes(), data, 8)
    }

    pub fn directory(self, name: &str) -> Self {
        self.push(name.as_bytes(), b"", 0)
    }

    /// Entry with a raw, undecoded name.
    pub fn stored_raw_name(self, name: &[u8], data: &[u8]) -> Self {
        self.push(name, data, 0)
    }

    /// Keep the payload verbatim but label it with an arbitrary method code.
    pub fn with_method(mut self, method: u16) -> Self {
        self.last().method = method;
        self
    }

    pub fn with_unix_mode(mut self, mode: u32) -> Self {
        let entry = self.last();
        entry.version_made_by = MADE_BY_UNIX;
        entry.external_attributes = mode << 16;
        self
    }

    pub fn with_made_by(mut self, version_made_by: u16, external_attributes: u32) -> Self {
        let entry = self.last();
        entry.version_made_by = version_made_by;
        entry.external_attributes = external_attributes;
        self
    }

    pub fn with_dos_time(mut self, date: u16, time: u16) -> Self {
        let entry = self.last();
        entry.date = date;
        entry.time = time;
        self
    }

    pub fn with_flags(mut self, flags: u16) -> Self {
        self.last().flags |= flags;
        self
    }

    pub fn with_entry_comment(mut self, comment: &str) -> Self {
        self.last().comment = comment.as_bytes().to_vec();
        self
    }

    pub fn with_data_descriptor(mut self, signed: bool) -> Self {
        let entry = self.last();
        entry.flags |= 0x0008;
        entry.descriptor = Some(signed);
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    fn last(&mut self) -> &mut FixtureEntry {
        self.entries.last_mut().expect("add an entry first")
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();

        for entry in &self.entries {
            let offset = out.len() as u32;
            let payload = match entry.method {
                8 => deflate(&entry.data),
                _ => entry.data.clone(),
            };
            // Entries relabelled via with_method carry their payload as-is
            let uncompressed_len = match entry.method {
                0 | 8 => entry.data.len() as u32,
                _ => payload.len() as u32,
            };
            let crc = crc32(&entry.data);

            let (local_crc, local_compressed, local_uncompressed) = match entry.descriptor {
                Some(_) => (0, 0, 0),
                None => (crc, payload.len() as u32, uncompressed_len),
            };

            out.write_u32::<LittleEndian>(0x04034b50).unwrap();
            out.write_u16::<LittleEndian>(20).unwrap();
            out.write_u16::<LittleEndian>(entry.flags).unwrap();
            out.write_u16::<LittleEndian>(entry.method).unwrap();
            out.write_u16::<LittleEndian>(entry.time).unwrap();
            out.write_u16::<LittleEndian>(entry.date).unwrap();
            out.write_u32::<LittleEndian>(local_crc).unwrap();
            out.write_u32::<LittleEndian>(local_compressed).unwrap();
            out.write_u32::<LittleEndian>(local_uncompressed).unwrap();
            out.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.extend_from_slice(&entry.name);
            out.extend_from_slice(&payload);

            if let Some(signed) = entry.descriptor {
                if signed {
                    out.write_u32::<LittleEndian>(0x08074b50).unwrap();
                }
                out.write_u32::<LittleEndian>(crc).unwrap();
                out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
                out.write_u32::<LittleEndian>(uncompressed_len).unwrap();
            }

            central.write_u32::<LittleEndian>(0x02014b50).unwrap();
            central.write_u16::<LittleEndian>(entry.version_made_by).unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(entry.flags).unwrap();
            central.write_u16::<LittleEndian>(entry.method).unwrap();
            central.write_u16::<LittleEndian>(entry.time).unwrap();
            central.write_u16::<LittleEndian>(entry.date).unwrap();
            central.write_u32::<LittleEndian>(crc).unwrap();
            central.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            central.write_u32::<LittleEndian>(uncompressed_len).unwrap();
            central.write_u16::<LittleEndian>(entry.name.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(entry.comment.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(entry.external_attributes).unwrap();
            central.write_u32::<LittleEndian>(offset).unwrap();
            central.extend_from_slice(&entry.name);
            central.extend_from_slice(&entry.comment);
        }

        let central_offset = out.len() as u32;
        out.extend_from_slice(&central);

        let count = self.entries.len() as u16;
        out.write_u32::<LittleEndian>(0x06054b50).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(count).unwrap();
        out.write_u16::<LittleEndian>(count).unwrap();
        out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(central_offset).unwrap();
        out.write_u16::<LittleEndian>(self.comment.len() as u16).unwrap();
        out.extend_from_slice(&self.comment);
        out
    }
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = flate2::Crc::new();
    crc.update(data);
    crc.sum()
}

/// Little-endian u32 at `offset`.
pub fn read_u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

/// Overwrite a little-endian u16 at `offset`.
pub fn patch_u16(bytes: &mut [u8], offset: usize, value: u16) {
    bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Overwrite a little-endian u32 at `offset`.
pub fn patch_u32(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
