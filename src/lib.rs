//! # memzip
//!
//! A read-only ZIP decoder for archives held in memory, plus a small
//! unzip-style command line tool built on top of it.
//!
//! The decoder locates the end of central directory record (even behind a
//! trailing comment), walks the central directory, and hands out an
//! [`Entry`] per archived item. Entry content is only read and decompressed
//! when [`Entry::data`] is first called.
//!
//! ## Features
//!
//! - STORED and DEFLATE entries
//! - Unix permission bits for archives made on Unix
//! - Configurable charset for legacy (non UTF-8) file names
//! - Entries are independent of each other and safe to decode from several threads
//!
//! ## Example
//!
//! ```no_run
//! use memzip::Archive;
//!
//! fn main() -> anyhow::Result<()> {
//!     let bytes = std::fs::read("archive.zip")?;
//!     let archive = Archive::new(&bytes);
//!
//!     for entry in archive.entries()? {
//!         let entry = entry?;
//!         if entry.is_file() {
//!             println!("{}: {} bytes", entry.name(), entry.data()?.len());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use error::{Result, ZipError};
pub use io::{ByteWindow, Cursor};
pub use crate::zip::{Archive, Entries, Entry, ZipExtractor};
