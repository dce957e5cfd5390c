//! Loader for sectioned binary containers such as `.zkey` and `.wtns` files.
//!
//! A container is a four-byte tag, a version, and a table of typed,
//! length-prefixed sections. [`BinFile`] parses the table once and hands out
//! bounds-checked, zero-copy views of section payloads, either by random
//! access or through a sequential cursor. Interpreting the payloads is left
//! to the caller.

pub mod container;
pub mod cursor;
pub mod error;
pub mod file_source;
pub mod format;
pub mod options;
mod shared_macros;

pub use container::BinFile;
pub use error::{BinFileError, CursorError, FileSystemError, FormatError, Result, SectionError};
pub use file_source::{FileSource, LoadStrategy};
pub use format::{ContainerHeader, SectionDescriptor, SectionIndex};
pub use options::OpenOptions;
