use std::collections::BTreeMap;
use std::ops::Range;

use log::trace;

use crate::error::{FormatError, SectionError};

use super::bounds::BoundedReader;
use super::header::SectionHeaderRaw;

/// One occurrence of a section in the file.
///
/// Descriptors are only built by [`SectionIndex`], which checks `offset` and
/// `size` against the buffer, so `offset + size` never exceeds its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub section_type: u32,
    /// Ordinal among sections sharing `section_type`.
    pub index: usize,
    pub(crate) offset: usize,
    pub(crate) size: usize,
}

impl SectionDescriptor {
    /// Absolute offset of the payload.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Declared payload length.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }

    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

/// Section type to the descriptors of that type, in file order.
#[derive(Debug, Clone, Default)]
pub struct SectionIndex {
    buckets: BTreeMap<u32, Vec<SectionDescriptor>>,
    total: usize,
}

impl SectionIndex {
    /// Walk `section_count` descriptor headers, skipping over each payload.
    pub(crate) fn read_from(
        reader: &mut BoundedReader<'_>,
        section_count: u32,
    ) -> Result<Self, FormatError> {
        let mut index = SectionIndex::default();

        for _ in 0..section_count {
            let raw = SectionHeaderRaw::read_from(reader)?;
            let payload = reader.skip(raw.section_length)?;

            let bucket = index.buckets.entry(raw.section_type).or_default();
            let descriptor = SectionDescriptor {
                section_type: raw.section_type,
                index: bucket.len(),
                offset: payload.start,
                size: payload.len(),
            };
            trace!(
                "section {}[{}] at offset {} ({} bytes)",
                descriptor.section_type,
                descriptor.index,
                descriptor.offset,
                descriptor.size
            );
            bucket.push(descriptor);
            index.total += 1;
        }

        Ok(index)
    }

    /// Number of occurrences of `section_type`; zero for unknown types.
    pub fn count(&self, section_type: u32) -> usize {
        self.buckets.get(&section_type).map_or(0, Vec::len)
    }

    /// Total number of entries in the section table.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn descriptors(&self, section_type: u32) -> &[SectionDescriptor] {
        self.buckets
            .get(&section_type)
            .map_or(&[][..], Vec::as_slice)
    }

    pub fn get(&self, section_type: u32, index: usize) -> Result<&SectionDescriptor, SectionError> {
        let bucket = self
            .buckets
            .get(&section_type)
            .ok_or(SectionError::UnknownSectionType(section_type))?;
        bucket
            .get(index)
            .ok_or(SectionError::SectionIndexOutOfRange {
                section_type,
                index,
                count: bucket.len(),
            })
    }

    /// Distinct section types present, in ascending order.
    pub fn section_types(&self) -> impl Iterator<Item = u32> + '_ {
        self.buckets.keys().copied()
    }
}
