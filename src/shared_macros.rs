// Generates `read_<ty>` cursor methods that decode a little-endian integer
// from the open section and advance the cursor by its width.
macro_rules! generate_cursor_int_readers {
    ($($type:ty);*) => {
        $(
            paste::item! {
                pub fn [< read_ $type >](&self) -> Result<$type, CursorError> {
                    let bytes = self.advance_cursor(std::mem::size_of::<$type>() as u64)?;
                    let mut raw = [0u8; std::mem::size_of::<$type>()];
                    raw.copy_from_slice(bytes);
                    Ok(<$type>::from_le_bytes(raw))
                }
            }
        )*
    };
}

pub(crate) use generate_cursor_int_readers;
