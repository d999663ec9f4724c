//! Bounds-checked little-endian reads over a borrowed byte buffer.
//!
//! Every read verifies `offset + width <= len` before touching the data, so a
//! malformed file can only ever surface as [`Error::TruncatedData`].

use crate::Error;

/// A read-only view over an object file buffer.
///
/// Reads are addressed by absolute offset rather than by an internal position,
/// so the same cursor can be shared by every decoder in a pass.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    /// Wraps `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Verifies that `len` bytes are available at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the range runs past the buffer or
    /// `offset + len` overflows.
    pub fn check(&self, offset: usize, len: usize) -> Result<(), Error> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(Error::TruncatedData {
                offset,
                needed: len,
                available: self.data.len(),
            }),
        }
    }

    /// Borrows `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the range is out of bounds.
    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], Error> {
        self.check(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    /// Reads a fixed-size array starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the range is out of bounds.
    pub fn read_array<const N: usize>(&self, offset: usize) -> Result<[u8; N], Error> {
        let bytes = self.read_bytes(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Reads a `u8` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the byte is out of bounds.
    pub fn read_u8(&self, offset: usize) -> Result<u8, Error> {
        self.check(offset, 1)?;
        Ok(self.data[offset])
    }

    /// Reads a little-endian `u16` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the range is out of bounds.
    pub fn read_u16(&self, offset: usize) -> Result<u16, Error> {
        self.read_array(offset).map(u16::from_le_bytes)
    }

    /// Reads a little-endian `i16` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the range is out of bounds.
    pub fn read_i16(&self, offset: usize) -> Result<i16, Error> {
        self.read_array(offset).map(i16::from_le_bytes)
    }

    /// Reads a little-endian `u32` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the range is out of bounds.
    pub fn read_u32(&self, offset: usize) -> Result<u32, Error> {
        self.read_array(offset).map(u32::from_le_bytes)
    }

    /// Reads a little-endian `i32` at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the range is out of bounds.
    pub fn read_i32(&self, offset: usize) -> Result<i32, Error> {
        self.read_array(offset).map(i32::from_le_bytes)
    }
}

/// Decodes a fixed-width name field, stopping at the first NUL or ASCII space.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub(crate) fn trim_name(raw: &[u8]) -> alloc::string::String {
    let end = raw
        .iter()
        .position(|&b| b == 0 || b == b' ')
        .unwrap_or(raw.len());
    alloc::string::String::from_utf8_lossy(&raw[..end]).into_owned()
}
