use binrw::BinRead;

use crate::error::FormatError;

use super::bounds::BoundedReader;

pub const TAG_LEN: usize = 4;
const HEADER_FIELDS_LEN: usize = 8;
/// Bytes in the fixed header: tag, version and section count.
pub const CONTAINER_HEADER_LEN: usize = TAG_LEN + HEADER_FIELDS_LEN;
/// Bytes in the descriptor that precedes every section payload.
pub const SECTION_HEADER_LEN: usize = 12;

#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
struct HeaderFieldsRaw {
    version: u32,
    section_count: u32,
}

#[derive(Debug, Clone, Copy, BinRead)]
#[br(little)]
pub(crate) struct SectionHeaderRaw {
    pub section_type: u32,
    pub section_length: u64,
}

/// The fixed header at the start of every container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub tag: [u8; TAG_LEN],
    pub version: u32,
    pub section_count: u32,
}

impl ContainerHeader {
    /// Read and validate the fixed header.
    ///
    /// The tag is checked as soon as its four bytes are available, so a
    /// foreign file is reported as `BadMagic` even if it is shorter than a
    /// full header.
    pub(crate) fn read_from(
        reader: &mut BoundedReader<'_>,
        expected_tag: &str,
        max_version: u32,
    ) -> Result<Self, FormatError> {
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(reader.take(TAG_LEN)?);
        if tag.as_slice() != expected_tag.as_bytes() {
            return Err(FormatError::BadMagic {
                expected: expected_tag.to_string(),
                found: tag,
            });
        }

        let raw: HeaderFieldsRaw = reader.read_record(HEADER_FIELDS_LEN)?;
        if raw.version > max_version {
            return Err(FormatError::UnsupportedVersion {
                version: raw.version,
                max_version,
            });
        }

        Ok(Self {
            tag,
            version: raw.version,
            section_count: raw.section_count,
        })
    }

    /// The tag as text, when it is valid UTF-8.
    pub fn tag_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.tag).ok()
    }
}

impl SectionHeaderRaw {
    pub(crate) fn read_from(reader: &mut BoundedReader<'_>) -> Result<Self, FormatError> {
        reader.read_record(SECTION_HEADER_LEN)
    }
}
