use std::io::Cursor;
use std::ops::Range;

use binrw::{BinRead, Endian};

use crate::error::FormatError;

/// Forward-only reader over a byte slice. Every advance is checked against
/// the slice length before it is applied.
pub(crate) struct BoundedReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BoundedReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Offset just past `len` bytes from the current position, if that is
    /// still inside the buffer.
    fn checked_end(&self, len: u64) -> Result<usize, FormatError> {
        usize::try_from(len)
            .ok()
            .and_then(|len| self.pos.checked_add(len))
            .filter(|end| *end <= self.data.len())
            .ok_or(FormatError::TruncatedFile {
                offset: self.pos,
                needed: len,
                len: self.data.len(),
            })
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let end = self.checked_end(len as u64)?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Skip `len` bytes without looking at them, returning the range skipped.
    pub(crate) fn skip(&mut self, len: u64) -> Result<Range<usize>, FormatError> {
        let start = self.pos;
        self.pos = self.checked_end(len)?;
        Ok(start..self.pos)
    }

    /// Decode a fixed-size little-endian record of `size` bytes.
    ///
    /// A record that needs more than `size` bytes is reported as truncated at
    /// the record's offset.
    pub(crate) fn read_record<T>(&mut self, size: usize) -> Result<T, FormatError>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        let offset = self.pos;
        let bytes = self.take(size)?;
        T::read_options(&mut Cursor::new(bytes), Endian::Little, ()).map_err(|_| {
            FormatError::TruncatedFile {
                offset,
                needed: size as u64,
                len: self.data.len(),
            }
        })
    }
}
