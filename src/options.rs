use std::path::Path;

use crate::container::BinFile;
use crate::error::{self, FormatError};
use crate::file_source::{FileSource, LoadStrategy};

/// What a caller expects of a file, and how to load it.
///
/// ```no_run
/// use zkbin::{LoadStrategy, OpenOptions};
///
/// let zkey = OpenOptions::new("zkey", 1)
///     .strategy(LoadStrategy::Read)
///     .open("circuit.zkey")?;
/// # Ok::<(), zkbin::BinFileError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    expected_tag: String,
    max_version: u32,
    strategy: LoadStrategy,
}

impl OpenOptions {
    pub fn new(expected_tag: impl Into<String>, max_version: u32) -> Self {
        Self {
            expected_tag: expected_tag.into(),
            max_version,
            strategy: LoadStrategy::default(),
        }
    }

    pub fn strategy(mut self, strategy: LoadStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn expected_tag(&self) -> &str {
        &self.expected_tag
    }

    pub fn max_version(&self) -> u32 {
        self.max_version
    }

    pub fn load_strategy(&self) -> LoadStrategy {
        self.strategy
    }

    /// Load and parse the file at `path`.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> error::Result<BinFile<FileSource>> {
        let source = FileSource::open_with(path, self.strategy)?;
        Ok(self.parse(source)?)
    }

    /// Parse bytes that are already in memory.
    pub fn parse<S: AsRef<[u8]>>(&self, source: S) -> Result<BinFile<S>, FormatError> {
        BinFile::from_bytes(source, &self.expected_tag, self.max_version)
    }
}
