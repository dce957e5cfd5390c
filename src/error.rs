use std::io;
use std::path::PathBuf;

/// Failures while acquiring the bytes of a file.
#[derive(Debug, thiserror::Error)]
pub enum FileSystemError {
    #[error("File not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("Permission denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },
    #[error("Could not determine size of {}: {source}", .path.display())]
    StatFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not map {}: {source}", .path.display())]
    MapFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("File {} is too large to address ({size} bytes)", .path.display())]
    TooLarge { path: PathBuf, size: u64 },
    #[error("Could not open {}: {source}", .path.display())]
    Other {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileSystemError {
    /// Classify an error returned while opening `path`.
    pub(crate) fn from_open(path: PathBuf, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => FileSystemError::NotFound { path },
            io::ErrorKind::PermissionDenied => FileSystemError::PermissionDenied { path },
            _ => FileSystemError::Other { path, source: e },
        }
    }
}

/// The header or section table does not describe a valid container.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Bad magic: expected {expected:?}, found {found:?}")]
    BadMagic { expected: String, found: [u8; 4] },
    #[error("Unsupported version {version} (maximum supported is {max_version})")]
    UnsupportedVersion { version: u32, max_version: u32 },
    #[error("Truncated file: {needed} bytes required at offset {offset}, buffer is {len} bytes")]
    TruncatedFile { offset: usize, needed: u64, len: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum SectionError {
    #[error("Unknown section type {0}")]
    UnknownSectionType(u32),
    #[error("Section {section_type} index {index} out of range ({count} present)")]
    SectionIndexOutOfRange {
        section_type: u32,
        index: usize,
        count: usize,
    },
    #[error("Section {section_type}[{index}] is already open for reading")]
    SectionAlreadyOpen { section_type: u32, index: usize },
    #[error("Section {section_type}[{index}] cannot be viewed as {target}: {reason}")]
    Cast {
        section_type: u32,
        index: usize,
        target: &'static str,
        reason: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    #[error("No section is open for reading")]
    NoSectionOpen,
    #[error("Read of {requested} bytes at offset {position} exceeds buffer of {len} bytes")]
    CursorOutOfRange {
        position: usize,
        requested: u64,
        len: usize,
    },
    #[error("Section {section_type}[{index}] declared {declared} bytes but {consumed} were read")]
    SectionSizeMismatch {
        section_type: u32,
        index: usize,
        declared: u64,
        consumed: u64,
    },
    #[error("No string terminator before end of buffer (string starts at offset {position})")]
    UnterminatedString { position: usize },
    #[error("String at offset {position} is not valid UTF-8")]
    InvalidUtf8 { position: usize },
}

/// Umbrella error for callers that do not need to distinguish the layers.
#[derive(Debug, thiserror::Error)]
pub enum BinFileError {
    #[error(transparent)]
    FileSystem(#[from] FileSystemError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Section(#[from] SectionError),
    #[error(transparent)]
    Cursor(#[from] CursorError),
}

pub type Result<T> = std::result::Result<T, BinFileError>;
