//! On-disk layout of a sectioned container (all integers little-endian):
//!
//! ```text
//! 0   tag            [u8; 4]
//! 4   version        u32
//! 8   section_count  u32
//! 12  section_count x { section_type u32, section_length u64, payload [u8; section_length] }
//! ```

pub(crate) mod bounds;
pub mod header;
pub mod section_index;

pub use header::{ContainerHeader, CONTAINER_HEADER_LEN, SECTION_HEADER_LEN, TAG_LEN};
pub use section_index::{SectionDescriptor, SectionIndex};
