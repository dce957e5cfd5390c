use std::cell::Cell;
use std::path::Path;

use log::debug;

use crate::error::{self, FormatError, SectionError};
use crate::file_source::FileSource;
use crate::format::bounds::BoundedReader;
use crate::format::{ContainerHeader, SectionDescriptor, SectionIndex, TAG_LEN};
use crate::options::OpenOptions;

/// A parsed sectioned container.
///
/// The container owns its byte source, so every slice it hands out borrows
/// from `self` and cannot outlive the underlying buffer or mapping. The
/// header and section table are parsed eagerly by the constructors; a
/// container that exists is structurally valid.
///
/// The read cursor is kept in `Cell`s, which makes `BinFile` `!Sync`.
/// Wrap it in a `Mutex` or open one container per thread for concurrent use.
pub struct BinFile<S = FileSource> {
    source: S,
    header: ContainerHeader,
    sections: SectionIndex,
    pub(crate) cursor: Cell<usize>,
    pub(crate) reading: Cell<Option<SectionDescriptor>>,
}

impl BinFile<FileSource> {
    /// Load `path` and validate it against `expected_tag` and `max_version`,
    /// using the default load strategy.
    pub fn open<P: AsRef<Path>>(
        path: P,
        expected_tag: &str,
        max_version: u32,
    ) -> error::Result<Self> {
        OpenOptions::new(expected_tag, max_version).open(path)
    }
}

impl<S: AsRef<[u8]>> BinFile<S> {
    /// Parse a container from any owned or borrowed byte source.
    pub fn from_bytes(
        source: S,
        expected_tag: &str,
        max_version: u32,
    ) -> Result<Self, FormatError> {
        let data = source.as_ref();
        let mut reader = BoundedReader::new(data);

        let header = ContainerHeader::read_from(&mut reader, expected_tag, max_version)?;
        let sections = SectionIndex::read_from(&mut reader, header.section_count)?;

        let trailing = data.len() - reader.position();
        if trailing > 0 {
            debug!("ignoring {} trailing bytes after the last section", trailing);
        }
        debug!(
            "loaded {:?} container v{} with {} sections ({} bytes)",
            expected_tag,
            header.version,
            sections.total(),
            data.len()
        );

        Ok(Self {
            source,
            header,
            sections,
            cursor: Cell::new(0),
            reading: Cell::new(None),
        })
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    pub fn file_type(&self) -> [u8; TAG_LEN] {
        self.header.tag
    }

    pub fn version(&self) -> u32 {
        self.header.version
    }

    /// Number of entries in the section table, across all types.
    pub fn total_sections(&self) -> usize {
        self.sections.total()
    }

    /// Number of sections of `section_type`. Unknown types have zero sections.
    pub fn section_count(&self, section_type: u32) -> usize {
        self.sections.count(section_type)
    }

    /// Distinct section types, ascending.
    pub fn section_types(&self) -> impl Iterator<Item = u32> + '_ {
        self.sections.section_types()
    }

    pub fn section_index(&self) -> &SectionIndex {
        &self.sections
    }

    pub fn descriptor(
        &self,
        section_type: u32,
        index: usize,
    ) -> Result<SectionDescriptor, SectionError> {
        self.sections.get(section_type, index).copied()
    }

    /// All descriptors of `section_type` in file order; empty for unknown types.
    pub fn descriptors(&self, section_type: u32) -> &[SectionDescriptor] {
        self.sections.descriptors(section_type)
    }

    /// The payload of the `index`-th section of `section_type`, without copying.
    pub fn section_payload(
        &self,
        section_type: u32,
        index: usize,
    ) -> Result<&[u8], SectionError> {
        let descriptor = self.sections.get(section_type, index)?;
        // Descriptor ranges were checked against this buffer during parsing.
        Ok(&self.data()[descriptor.range()])
    }

    pub fn section_payload_size(
        &self,
        section_type: u32,
        index: usize,
    ) -> Result<u64, SectionError> {
        self.sections
            .get(section_type, index)
            .map(|descriptor| descriptor.size as u64)
    }

    /// View a payload as a slice of `T` without copying.
    ///
    /// Fails if the payload length is not a multiple of `size_of::<T>()` or
    /// its address is not aligned for `T`. Values are read in native byte
    /// order, which matches the file only on little-endian hosts.
    pub fn section_payload_as<T: bytemuck::Pod>(
        &self,
        section_type: u32,
        index: usize,
    ) -> Result<&[T], SectionError> {
        let payload = self.section_payload(section_type, index)?;
        bytemuck::try_cast_slice(payload).map_err(|e| SectionError::Cast {
            section_type,
            index,
            target: std::any::type_name::<T>(),
            reason: format!("{:?}", e),
        })
    }

    /// The whole underlying buffer.
    pub fn data(&self) -> &[u8] {
        self.source.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Give back the byte source, discarding the index.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S> std::fmt::Debug for BinFile<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinFile")
            .field("header", &self.header)
            .field("sections", &self.sections.total())
            .field("reading", &self.reading.get())
            .finish()
    }
}
