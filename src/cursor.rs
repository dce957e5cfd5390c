//! Sequential reads inside one open section.
//!
//! A container has a single cursor. `begin_section` opens a section and
//! positions the cursor at its payload, the `read_*` methods consume bytes,
//! and `end_section` closes it again. Reads are bounded by the end of the
//! buffer, not the section; pass `verify_exact_consumption` to `end_section`
//! to check that exactly the declared payload was read.

use crate::container::BinFile;
use crate::error::{CursorError, SectionError};
use crate::format::SectionDescriptor;
use crate::shared_macros::generate_cursor_int_readers;

impl<S: AsRef<[u8]>> BinFile<S> {
    /// Open the `index`-th section of `section_type` for reading.
    ///
    /// Fails with `SectionAlreadyOpen` if a section is already open, in which
    /// case the open section and its position are left untouched.
    pub fn begin_section(
        &self,
        section_type: u32,
        index: usize,
    ) -> Result<SectionDescriptor, SectionError> {
        if let Some(open) = self.reading.get() {
            return Err(SectionError::SectionAlreadyOpen {
                section_type: open.section_type,
                index: open.index,
            });
        }

        let descriptor = self.descriptor(section_type, index)?;
        self.cursor.set(descriptor.offset);
        self.reading.set(Some(descriptor));
        Ok(descriptor)
    }

    /// Close the open section.
    ///
    /// The cursor is closed even when the size check fails.
    pub fn end_section(&self, verify_exact_consumption: bool) -> Result<(), CursorError> {
        let descriptor = self.reading.take().ok_or(CursorError::NoSectionOpen)?;
        let consumed = self.cursor.replace(0).saturating_sub(descriptor.offset);

        if verify_exact_consumption && consumed != descriptor.size {
            return Err(CursorError::SectionSizeMismatch {
                section_type: descriptor.section_type,
                index: descriptor.index,
                declared: descriptor.size as u64,
                consumed: consumed as u64,
            });
        }
        Ok(())
    }

    /// The section currently open, if any.
    pub fn open_section(&self) -> Option<SectionDescriptor> {
        self.reading.get()
    }

    /// Absolute cursor offset while a section is open.
    pub fn position(&self) -> Option<usize> {
        self.reading.get().map(|_| self.cursor.get())
    }

    /// Bytes left before the end of the open section's declared payload.
    pub fn remaining_in_section(&self) -> Option<usize> {
        self.reading
            .get()
            .map(|descriptor| descriptor.end().saturating_sub(self.cursor.get()))
    }

    generate_cursor_int_readers!(u8; u16; u32; u64);

    /// Read `len` raw bytes without copying.
    pub fn read_bytes(&self, len: usize) -> Result<&[u8], CursorError> {
        self.advance_cursor(len as u64)
    }

    /// Read a NUL-terminated UTF-8 string. The terminator is consumed but not
    /// returned.
    pub fn read_string(&self) -> Result<&str, CursorError> {
        if self.reading.get().is_none() {
            return Err(CursorError::NoSectionOpen);
        }

        let position = self.cursor.get();
        let rest = self.data().get(position..).unwrap_or_default();
        let nul = rest
            .iter()
            .position(|b| *b == 0)
            .ok_or(CursorError::UnterminatedString { position })?;
        let text = std::str::from_utf8(&rest[..nul])
            .map_err(|_| CursorError::InvalidUtf8 { position })?;

        self.cursor.set(position + nul + 1);
        Ok(text)
    }

    fn advance_cursor(&self, len: u64) -> Result<&[u8], CursorError> {
        if self.reading.get().is_none() {
            return Err(CursorError::NoSectionOpen);
        }

        let data = self.data();
        let position = self.cursor.get();
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| position.checked_add(len))
            .filter(|end| *end <= data.len())
            .ok_or(CursorError::CursorOutOfRange {
                position,
                requested: len,
                len: data.len(),
            })?;

        self.cursor.set(end);
        Ok(&data[position..end])
    }
}
