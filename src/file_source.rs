use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use memmap2::Mmap;

use crate::error::FileSystemError;

/// How a [`FileSource`] acquires the file's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStrategy {
    /// Memory-map the file; mapping failures are returned to the caller.
    Mmap,
    /// Read the whole file into an owned buffer.
    Read,
    /// Try to memory-map, falling back to a full read if mapping fails.
    #[default]
    MmapOrRead,
}

enum Backing {
    // The file handle is kept alive next to its mapping.
    Mapped { _file: File, mmap: Mmap },
    Owned(Vec<u8>),
}

/// A read-only, whole-file byte region.
///
/// The mapping (or buffer) and the file descriptor are released when the
/// `FileSource` is dropped. Slices handed out by [`FileSource::data`] borrow
/// from it, so they cannot outlive it.
pub struct FileSource {
    path: PathBuf,
    backing: Backing,
}

impl FileSource {
    /// Open `path` with the default [`LoadStrategy::MmapOrRead`] strategy.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FileSystemError> {
        Self::open_with(path, LoadStrategy::default())
    }

    pub fn open_with<P: AsRef<Path>>(
        path: P,
        strategy: LoadStrategy,
    ) -> Result<Self, FileSystemError> {
        let path = path.as_ref().to_path_buf();
        let mut file =
            File::open(&path).map_err(|e| FileSystemError::from_open(path.clone(), e))?;

        let size = file
            .metadata()
            .map_err(|source| FileSystemError::StatFailed {
                path: path.clone(),
                source,
            })?
            .len();
        let size_usize = usize::try_from(size).map_err(|_| FileSystemError::TooLarge {
            path: path.clone(),
            size,
        })?;

        debug!(
            "opening {} ({} bytes) with {:?}",
            path.display(),
            size,
            strategy
        );

        // Zero-length mappings are rejected on some platforms.
        let backing = if size_usize == 0 {
            Backing::Owned(Vec::new())
        } else {
            match strategy {
                LoadStrategy::Read => Backing::Owned(read_all(&path, &mut file, size_usize)?),
                LoadStrategy::Mmap => {
                    let mmap = map_file(&path, &file)?;
                    Backing::Mapped { _file: file, mmap }
                }
                LoadStrategy::MmapOrRead => match map_file(&path, &file) {
                    Ok(mmap) => Backing::Mapped { _file: file, mmap },
                    Err(e) => {
                        warn!("{}, falling back to a buffered read", e);
                        Backing::Owned(read_all(&path, &mut file, size_usize)?)
                    }
                },
            }
        };

        Ok(Self { path, backing })
    }

    /// The full file contents. Constant time, no copy.
    pub fn data(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped { mmap, .. } => &mmap[..],
            Backing::Owned(buf) => buf.as_slice(),
        }
    }

    /// Length in bytes.
    pub fn size(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Whether the bytes come from a memory mapping rather than an owned buffer.
    pub fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped { .. })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AsRef<[u8]> for FileSource {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}

impl std::fmt::Debug for FileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSource")
            .field("path", &self.path)
            .field("size", &self.size())
            .field("mapped", &self.is_mapped())
            .finish()
    }
}

fn map_file(path: &Path, file: &File) -> Result<Mmap, FileSystemError> {
    // SAFETY: the file is opened read-only and the handle is kept alive with
    // the mapping. Callers must not truncate the file while it is mapped.
    unsafe { Mmap::map(file) }.map_err(|source| FileSystemError::MapFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn read_all(path: &Path, file: &mut File, size_hint: usize) -> Result<Vec<u8>, FileSystemError> {
    let mut buf = Vec::with_capacity(size_hint);
    file.read_to_end(&mut buf)
        .map_err(|source| FileSystemError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(buf)
}
