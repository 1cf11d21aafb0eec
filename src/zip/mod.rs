//! ZIP archive decoding.
//!
//! This module reads ZIP archives that are fully loaded in memory and exposes
//! each archived item as an [`Entry`] whose content is decoded on demand.
//!
//! ## Architecture
//!
//! - [`structures`]: ZIP records (local header, central header, end record,
//!   data descriptor) and their parsers
//! - [`parser`]: record dispatch and the search for the end record
//! - [`Archive`] / [`Entries`] / [`Entry`]: walking the central directory
//! - [`ZipExtractor`]: writing entries out to files or stdout
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end, followed by an
//!    optional comment
//!
//! ## Supported Features
//!
//! - STORED (no compression) method
//! - DEFLATE compression method
//! - Unix permission bits for archives made on Unix
//!
//! ## Limitations
//!
//! - No ZIP64 extensions
//! - No encryption support
//! - No multi-disk archive support
//! - No writing

mod archive;
mod entry;
mod extractor;
mod inflate;
pub mod parser;
pub mod structures;

pub use archive::{Archive, Entries};
pub use entry::Entry;
pub use extractor::ZipExtractor;
pub use inflate::inflate;
pub use parser::{Record, locate_end_of_central_directory};
pub use structures::*;
