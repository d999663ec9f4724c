//! Decode errors.

use alloc::string::String;
use core::fmt;

/// Which kind of index an [`Error::OutOfRangeIndex`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum IndexKind {
    /// A relocation's index into the raw symbol stream.
    Symbol,
    /// A byte offset into the string table.
    StringOffset,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol => write!(f, "symbol index"),
            Self::StringOffset => write!(f, "string table offset"),
        }
    }
}

/// Errors produced while decoding a single component of an object file.
///
/// Every variant records the buffer offset at which the problem was found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Error {
    /// The buffer is shorter than a record requires.
    TruncatedData {
        /// Start of the requested range.
        offset: usize,
        /// Number of bytes the record needs.
        needed: usize,
        /// Total length of the buffer.
        available: usize,
    },
    /// An index points outside the array it addresses.
    OutOfRangeIndex {
        /// What the index addresses.
        kind: IndexKind,
        /// The offending index.
        index: u64,
        /// Number of valid entries (exclusive upper bound).
        limit: u64,
        /// Offset of the record holding the index.
        offset: usize,
    },
    /// The string table's length prefix runs past the end of the buffer.
    MalformedStringTable {
        /// Offset of the length prefix.
        offset: usize,
        /// Declared table length, including the prefix itself.
        declared: u32,
        /// Bytes actually available from `offset` to the end of the buffer.
        available: usize,
    },
    /// A header field holds a value no valid file can contain.
    InvalidHeader {
        /// Name of the field.
        field: &'static str,
        /// The value found.
        value: i64,
        /// Offset of the record holding the field.
        offset: usize,
    },
}

impl Error {
    /// Buffer offset at which the error was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        match *self {
            Self::TruncatedData { offset, .. }
            | Self::OutOfRangeIndex { offset, .. }
            | Self::MalformedStringTable { offset, .. }
            | Self::InvalidHeader { offset, .. } => offset,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedData {
                offset,
                needed,
                available,
            } => write!(
                f,
                "truncated data: need {needed} bytes at offset {offset:#x}, buffer is {available} bytes"
            ),
            Self::OutOfRangeIndex {
                kind,
                index,
                limit,
                offset,
            } => write!(
                f,
                "{kind} {index} out of range (limit {limit}) at offset {offset:#x}"
            ),
            Self::MalformedStringTable {
                offset,
                declared,
                available,
            } => write!(
                f,
                "malformed string table at offset {offset:#x}: declares {declared} bytes, {available} available"
            ),
            Self::InvalidHeader {
                field,
                value,
                offset,
            } => write!(f, "invalid {field} {value} in record at offset {offset:#x}"),
        }
    }
}

impl core::error::Error for Error {}

/// A fatal error from [`ObjectFile::decode`](crate::ObjectFile::decode),
/// tagged with the optional source identifier supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    source_name: Option<String>,
    error: Error,
}

impl DecodeError {
    pub(crate) fn new(source_name: Option<String>, error: Error) -> Self {
        Self { source_name, error }
    }

    /// The source identifier given to the decoder, if any.
    #[must_use]
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// The component error that aborted the decode.
    #[must_use]
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Buffer offset at which the error was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.error.offset()
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_name {
            Some(name) => write!(f, "{name}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

impl core::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<Error> for DecodeError {
    fn from(error: Error) -> Self {
        Self::new(None, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn offset_is_reported_for_every_variant() {
        let errors = [
            Error::TruncatedData {
                offset: 1,
                needed: 20,
                available: 10,
            },
            Error::OutOfRangeIndex {
                kind: IndexKind::Symbol,
                index: 9,
                limit: 3,
                offset: 1,
            },
            Error::MalformedStringTable {
                offset: 1,
                declared: 100,
                available: 4,
            },
            Error::InvalidHeader {
                field: "symbol count",
                value: -1,
                offset: 1,
            },
        ];
        for err in &errors {
            assert_eq!(err.offset(), 1);
            assert!(!format!("{err}").is_empty());
        }
    }

    #[test]
    fn decode_error_prefixes_source_name() {
        let inner = Error::TruncatedData {
            offset: 0,
            needed: 20,
            available: 10,
        };
        let named = DecodeError::new(Some("foo.obj".into()), inner.clone());
        let msg = format!("{named}");
        assert!(msg.starts_with("foo.obj: "));
        assert!(msg.contains("need 20 bytes"));

        let anon = DecodeError::from(inner);
        assert_eq!(anon.source_name(), None);
        assert!(format!("{anon}").starts_with("truncated data"));
    }
}
