//! Section header decoding.

use alloc::string::String;
use bitflags::bitflags;

use crate::cursor::{ByteCursor, trim_name};
use crate::Error;

/// Size of one on-disk section header (40 bytes).
pub const SECTION_HEADER_SIZE: usize = 40;

/// Section flag: the section contains executable code.
pub const SCN_CNT_CODE: u32 = 0x0000_0020;

/// Section flag: the section contains COMDAT data.
pub const SCN_LNK_COMDAT: u32 = 0x0000_1000;

bitflags! {
    /// Section characteristics.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct SectionFlags: u32 {
        /// Not padded to the next boundary (obsolete).
        const TYPE_NO_PAD = 0x0000_0008;
        /// Executable code.
        const CNT_CODE = SCN_CNT_CODE;
        /// Initialized data.
        const CNT_INITIALIZED_DATA = 0x0000_0040;
        /// Uninitialized data.
        const CNT_UNINITIALIZED_DATA = 0x0000_0080;
        /// Reserved.
        const LNK_OTHER = 0x0000_0100;
        /// Comments or other information (e.g. `.drectve`).
        const LNK_INFO = 0x0000_0200;
        /// Not part of the image.
        const LNK_REMOVE = 0x0000_0800;
        /// COMDAT data.
        const LNK_COMDAT = SCN_LNK_COMDAT;
        /// Referenced through the global pointer.
        const GPREL = 0x0000_8000;
        /// Extended relocation count in the first relocation record.
        const LNK_NRELOC_OVFL = 0x0100_0000;
        /// Can be discarded.
        const MEM_DISCARDABLE = 0x0200_0000;
        /// Cannot be cached.
        const MEM_NOT_CACHED = 0x0400_0000;
        /// Not pageable.
        const MEM_NOT_PAGED = 0x0800_0000;
        /// Can be shared in memory.
        const MEM_SHARED = 0x1000_0000;
        /// Executable.
        const MEM_EXECUTE = 0x2000_0000;
        /// Readable.
        const MEM_READ = 0x4000_0000;
        /// Writable.
        const MEM_WRITE = 0x8000_0000;
    }
}

/// Mask of the 4-bit alignment field in the characteristics.
const ALIGN_MASK: u32 = 0x00f0_0000;

/// A decoded section header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectionHeader {
    /// Section name. `/nnn` long names are replaced by their string table
    /// entry once the string table is known.
    pub name: String,
    /// Physical address (virtual size in images).
    pub phys_addr: i32,
    /// Virtual address.
    pub virt_addr: i32,
    /// Size of the section data in bytes.
    pub size: i32,
    /// File offset of the section data.
    pub data_offset: i32,
    /// File offset of the relocation array, 0 if there is none.
    pub reloc_offset: i32,
    /// File offset of the line number array.
    pub line_num_offset: i32,
    /// Number of relocation records.
    pub reloc_count: u32,
    /// Number of line number records.
    pub line_num_count: u32,
    /// Raw characteristics; see [`SectionHeader::characteristics`].
    pub flags: i32,
}

impl SectionHeader {
    /// Decodes one section header at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if fewer than 40 bytes remain.
    pub fn decode(data: &[u8], offset: usize) -> Result<Self, Error> {
        let cur = ByteCursor::new(data);
        cur.check(offset, SECTION_HEADER_SIZE)?;
        Ok(Self {
            name: trim_name(cur.read_bytes(offset, 8)?),
            phys_addr: cur.read_i32(offset + 8)?,
            virt_addr: cur.read_i32(offset + 12)?,
            size: cur.read_i32(offset + 16)?,
            data_offset: cur.read_i32(offset + 20)?,
            reloc_offset: cur.read_i32(offset + 24)?,
            line_num_offset: cur.read_i32(offset + 28)?,
            reloc_count: u32::from(cur.read_u16(offset + 32)?),
            line_num_count: u32::from(cur.read_u16(offset + 34)?),
            flags: cur.read_i32(offset + 36)?,
        })
    }

    /// Characteristics as typed flags. Unknown bits (including the
    /// alignment field) are retained.
    #[must_use]
    #[expect(clippy::cast_sign_loss, reason = "flags are a bit pattern")]
    pub fn characteristics(&self) -> SectionFlags {
        SectionFlags::from_bits_retain(self.flags as u32)
    }

    /// Data alignment in bytes encoded in the characteristics, if any.
    #[must_use]
    pub fn alignment(&self) -> Option<u32> {
        let field = (self.characteristics().bits() & ALIGN_MASK) >> 20;
        match field {
            1..=14 => Some(1 << (field - 1)),
            _ => None,
        }
    }

    /// Returns `true` if the section holds executable code.
    #[must_use]
    pub fn is_code(&self) -> bool {
        self.characteristics().contains(SectionFlags::CNT_CODE)
    }

    /// Returns `true` if the section is a COMDAT section.
    #[must_use]
    pub fn is_comdat(&self) -> bool {
        self.characteristics().contains(SectionFlags::LNK_COMDAT)
    }

    /// Returns `true` if this section carries a relocation array the decoder
    /// reads: a non-zero relocation offset on a non-COMDAT code section.
    #[must_use]
    pub fn has_relocations(&self) -> bool {
        self.reloc_offset != 0 && self.is_code() && !self.is_comdat()
    }

    /// Section size, clamped to 0 when negative.
    #[must_use]
    pub fn data_size(&self) -> u32 {
        u32::try_from(self.size).unwrap_or(0)
    }

    /// String table offset encoded in a `/nnn` long name, if this is one.
    pub(crate) fn long_name_offset(&self) -> Option<u32> {
        let digits = self.name.strip_prefix('/')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}
