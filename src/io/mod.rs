//! Byte-level access to archive buffers.
//!
//! [`ByteWindow`] is the immutable, shareable view over the archive bytes and
//! [`Cursor`] is a cheap read position on top of it. Loading an archive from
//! disk lives in [`read_archive`] and is only needed by the binary.

mod cursor;
mod local;
mod window;

pub use cursor::Cursor;
pub use local::read_archive;
pub use window::ByteWindow;
