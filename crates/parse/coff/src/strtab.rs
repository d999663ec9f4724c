//! The string table that follows the symbol table.
//!
//! Layout: a little-endian `u32` length that counts itself, then
//! NUL-terminated names addressed by their byte offset from the start of the
//! length field.

use alloc::string::String;

use crate::cursor::ByteCursor;
use crate::diag::{DiagnosticKind, Diagnostics, Level, emit};
use crate::error::IndexKind;
use crate::Error;

/// Size of the length prefix.
const LENGTH_FIELD_SIZE: u32 = 4;

/// Location of the string table within the file buffer.
///
/// Only the span is stored; names are resolved against the buffer on demand
/// and copied out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringTable {
    /// Offset of the length prefix.
    pub base_offset: usize,
    /// Table size in bytes, including the length prefix.
    pub total_size: u32,
}

impl StringTable {
    /// A table with no names at `base_offset`, used when the file has no
    /// string table or its length prefix is unusable. Every lookup in it is
    /// out of range.
    #[must_use]
    pub fn empty(base_offset: usize) -> Self {
        Self {
            base_offset,
            total_size: 0,
        }
    }

    /// Locates the string table whose length prefix is at `offset`.
    ///
    /// A length smaller than the prefix itself is reported as a warning and
    /// treated as an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if the length prefix cannot be read,
    /// or [`Error::MalformedStringTable`] if the declared length runs past
    /// the end of `data`.
    pub fn at(data: &[u8], offset: usize, diag: &mut dyn Diagnostics) -> Result<Self, Error> {
        let cur = ByteCursor::new(data);
        let declared = cur.read_u32(offset)?;

        if declared < LENGTH_FIELD_SIZE {
            emit(diag, Level::Warn, offset, DiagnosticKind::ShortStringTable(declared));
            return Ok(Self::empty(offset));
        }

        let available = data.len() - offset;
        if declared as usize > available {
            return Err(Error::MalformedStringTable {
                offset,
                declared,
                available,
            });
        }

        Ok(Self {
            base_offset: offset,
            total_size: declared,
        })
    }

    /// Offset one past the last byte of the table.
    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.base_offset + self.total_size as usize
    }

    /// Resolves the name at `name_offset`, relative to the length prefix.
    ///
    /// Scanning stops at the first NUL or at the end of the table; a name
    /// that runs into the end without a terminator is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRangeIndex`] if `name_offset` is not inside the
    /// table, or [`Error::TruncatedData`] if `data` is not the buffer the
    /// table was located in.
    pub fn resolve(&self, data: &[u8], name_offset: u32) -> Result<String, Error> {
        if name_offset >= self.total_size {
            return Err(Error::OutOfRangeIndex {
                kind: IndexKind::StringOffset,
                index: u64::from(name_offset),
                limit: u64::from(self.total_size),
                offset: self.base_offset,
            });
        }

        let start = self.base_offset + name_offset as usize;
        let bytes = ByteCursor::new(data).read_bytes(start, self.end_offset() - start)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }
}
