//! File header and optional header decoding.

use bitflags::bitflags;

use crate::cursor::ByteCursor;
use crate::Error;

/// Size of the on-disk file header (20 bytes).
pub const FILE_HEADER_SIZE: usize = 20;

/// Size of the decoded part of the optional header (28 bytes).
pub const OPTIONAL_HEADER_SIZE: usize = 28;

/// Size of one symbol table record (18 bytes).
pub const SYMBOL_SIZE: usize = 18;

// ---------------------------------------------------------------------------
// Machine ids
// ---------------------------------------------------------------------------

/// Machine: unknown / any.
pub const MACHINE_UNKNOWN: u16 = 0;

/// Machine: Intel 386 and compatibles.
pub const MACHINE_I386: u16 = 0x14c;

/// Machine: ARM little-endian.
pub const MACHINE_ARM: u16 = 0x1c0;

/// Machine: ARM Thumb-2 little-endian.
pub const MACHINE_ARMNT: u16 = 0x1c4;

/// Machine: Intel Itanium.
pub const MACHINE_IA64: u16 = 0x200;

/// Machine: x86-64.
pub const MACHINE_AMD64: u16 = 0x8664;

/// Machine: ARM64 little-endian.
pub const MACHINE_ARM64: u16 = 0xaa64;

/// Returns a short name for a machine id, or `None` if it is not known.
#[must_use]
pub fn machine_name(machine: u16) -> Option<&'static str> {
    Some(match machine {
        MACHINE_UNKNOWN => "unknown",
        MACHINE_I386 => "i386",
        MACHINE_ARM => "arm",
        MACHINE_ARMNT => "armnt",
        MACHINE_IA64 => "ia64",
        MACHINE_AMD64 => "amd64",
        MACHINE_ARM64 => "arm64",
        _ => return None,
    })
}

bitflags! {
    /// File header characteristics.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct FileFlags: u16 {
        /// Base relocations have been removed.
        const RELOCS_STRIPPED = 0x0001;
        /// The file is a valid image.
        const EXECUTABLE_IMAGE = 0x0002;
        /// Line numbers have been removed.
        const LINE_NUMS_STRIPPED = 0x0004;
        /// Local symbols have been removed.
        const LOCAL_SYMS_STRIPPED = 0x0008;
        /// Aggressively trim the working set (obsolete).
        const AGGRESSIVE_WS_TRIM = 0x0010;
        /// The image can handle addresses above 2 GiB.
        const LARGE_ADDRESS_AWARE = 0x0020;
        /// Little-endian byte order (obsolete).
        const BYTES_REVERSED_LO = 0x0080;
        /// 32-bit word machine.
        const MACHINE_32BIT = 0x0100;
        /// Debug information has been removed.
        const DEBUG_STRIPPED = 0x0200;
        /// Copy to swap if run from removable media.
        const REMOVABLE_RUN_FROM_SWAP = 0x0400;
        /// Copy to swap if run from network media.
        const NET_RUN_FROM_SWAP = 0x0800;
        /// System file.
        const SYSTEM = 0x1000;
        /// Dynamic-link library.
        const DLL = 0x2000;
        /// Uniprocessor only.
        const UP_SYSTEM_ONLY = 0x4000;
        /// Big-endian byte order (obsolete).
        const BYTES_REVERSED_HI = 0x8000;
    }
}

// ---------------------------------------------------------------------------
// FileHeader
// ---------------------------------------------------------------------------

/// The fixed 20-byte header at the start of every object file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileHeader {
    /// Target machine id (`MACHINE_*`).
    pub machine: u16,
    /// Number of section headers.
    pub section_count: u16,
    /// Creation time, seconds since the Unix epoch.
    pub timestamp: i32,
    /// File offset of the symbol table.
    pub symbol_table_offset: i32,
    /// Number of 18-byte symbol records, auxiliary records included.
    pub symbol_count: i32,
    /// Size of the optional header in bytes (0 for most object files).
    pub optional_header_size: u16,
    /// Raw characteristics; see [`FileHeader::characteristics`].
    pub flags: u16,
}

impl FileHeader {
    /// Decodes the file header at `offset` (normally 0).
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if fewer than 20 bytes remain, or
    /// [`Error::InvalidHeader`] if the symbol count is negative or a symbol
    /// table is declared at a negative offset.
    pub fn decode(data: &[u8], offset: usize) -> Result<Self, Error> {
        let cur = ByteCursor::new(data);
        cur.check(offset, FILE_HEADER_SIZE)?;

        let hdr = Self {
            machine: cur.read_u16(offset)?,
            section_count: cur.read_u16(offset + 2)?,
            timestamp: cur.read_i32(offset + 4)?,
            symbol_table_offset: cur.read_i32(offset + 8)?,
            symbol_count: cur.read_i32(offset + 12)?,
            optional_header_size: cur.read_u16(offset + 16)?,
            flags: cur.read_u16(offset + 18)?,
        };

        if hdr.symbol_count < 0 {
            return Err(Error::InvalidHeader {
                field: "symbol count",
                value: i64::from(hdr.symbol_count),
                offset,
            });
        }
        if hdr.symbol_count > 0 && hdr.symbol_table_offset < 0 {
            return Err(Error::InvalidHeader {
                field: "symbol table offset",
                value: i64::from(hdr.symbol_table_offset),
                offset,
            });
        }

        Ok(hdr)
    }

    /// Characteristics as typed flags. Unknown bits are retained.
    #[must_use]
    pub fn characteristics(&self) -> FileFlags {
        FileFlags::from_bits_retain(self.flags)
    }

    /// Offset of the optional header (directly after this header).
    #[must_use]
    pub fn optional_header_offset(&self) -> usize {
        FILE_HEADER_SIZE
    }

    /// Offset of the first section header.
    #[must_use]
    pub fn section_table_offset(&self) -> usize {
        FILE_HEADER_SIZE + usize::from(self.optional_header_size)
    }

    /// Offset of the symbol table, clamped to 0 when the field is negative.
    #[must_use]
    pub fn symbol_table_start(&self) -> usize {
        usize::try_from(self.symbol_table_offset).unwrap_or(0)
    }

    /// Number of symbol records, clamped to 0 when the field is negative.
    #[must_use]
    pub fn symbol_record_count(&self) -> usize {
        usize::try_from(self.symbol_count).unwrap_or(0)
    }

    /// Offset of the string table: directly after the last symbol record.
    ///
    /// Returns `None` if the computation overflows.
    #[must_use]
    pub fn string_table_offset(&self) -> Option<usize> {
        self.symbol_record_count()
            .checked_mul(SYMBOL_SIZE)?
            .checked_add(self.symbol_table_start())
    }
}

// ---------------------------------------------------------------------------
// OptionalHeader
// ---------------------------------------------------------------------------

/// The 28-byte optional header, present when
/// [`FileHeader::optional_header_size`] is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OptionalHeader {
    /// Magic number identifying the header variant.
    pub magic: i16,
    /// Linker version stamp.
    pub version: i16,
    /// Size of the code section(s).
    pub text_size: i32,
    /// Size of the initialized data section(s).
    pub data_size: i32,
    /// Size of the uninitialized data section(s).
    pub bss_size: i32,
    /// Entry point address.
    pub entry_point: i32,
    /// Base address of code.
    pub text_start: i32,
    /// Base address of data.
    pub data_start: i32,
}

impl OptionalHeader {
    /// Decodes the optional header at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if fewer than 28 bytes remain.
    pub fn decode(data: &[u8], offset: usize) -> Result<Self, Error> {
        let cur = ByteCursor::new(data);
        cur.check(offset, OPTIONAL_HEADER_SIZE)?;
        Ok(Self {
            magic: cur.read_i16(offset)?,
            version: cur.read_i16(offset + 2)?,
            text_size: cur.read_i32(offset + 4)?,
            data_size: cur.read_i32(offset + 8)?,
            bss_size: cur.read_i32(offset + 12)?,
            entry_point: cur.read_i32(offset + 16)?,
            text_start: cur.read_i32(offset + 20)?,
            data_start: cur.read_i32(offset + 24)?,
        })
    }
}
