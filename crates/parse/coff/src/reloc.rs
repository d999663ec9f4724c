//! Per-section relocation decoding and machine-specific filtering.
//!
//! Only the PC-relative and absolute 32-bit relocation kinds that mark
//! references between symbols are retained; everything else is dropped.

use alloc::string::String;
use alloc::vec::Vec;

use crate::cursor::ByteCursor;
use crate::diag::{DiagnosticKind, Diagnostics, Level, RelocSkip, emit};
use crate::error::IndexKind;
use crate::header::{FileHeader, MACHINE_AMD64, MACHINE_I386, SYMBOL_SIZE};
use crate::section::SectionHeader;
use crate::strtab::StringTable;
use crate::symbol::decode_name;
use crate::Error;

// ---------------------------------------------------------------------------
// x86-64 relocation types
// ---------------------------------------------------------------------------

/// AMD64: ignored.
pub const REL_AMD64_ABSOLUTE: u16 = 0x0000;
/// AMD64: 64-bit VA of the target.
pub const REL_AMD64_ADDR64: u16 = 0x0001;
/// AMD64: 32-bit VA of the target.
pub const REL_AMD64_ADDR32: u16 = 0x0002;
/// AMD64: 32-bit address without image base (RVA).
pub const REL_AMD64_ADDR32NB: u16 = 0x0003;
/// AMD64: 32-bit relative to the byte following the relocation.
pub const REL_AMD64_REL32: u16 = 0x0004;
/// AMD64: `REL32` with one byte of displacement to the next instruction.
pub const REL_AMD64_REL32_1: u16 = 0x0005;
/// AMD64: `REL32` with two bytes of displacement.
pub const REL_AMD64_REL32_2: u16 = 0x0006;
/// AMD64: `REL32` with three bytes of displacement.
pub const REL_AMD64_REL32_3: u16 = 0x0007;
/// AMD64: `REL32` with four bytes of displacement.
pub const REL_AMD64_REL32_4: u16 = 0x0008;
/// AMD64: `REL32` with five bytes of displacement.
pub const REL_AMD64_REL32_5: u16 = 0x0009;
/// AMD64: 16-bit section index.
pub const REL_AMD64_SECTION: u16 = 0x000a;
/// AMD64: 32-bit offset from the start of the section.
pub const REL_AMD64_SECREL: u16 = 0x000b;
/// AMD64: 7-bit unsigned section offset.
pub const REL_AMD64_SECREL7: u16 = 0x000c;
/// AMD64: CLR token.
pub const REL_AMD64_TOKEN: u16 = 0x000d;
/// AMD64: 32-bit signed span-dependent value.
pub const REL_AMD64_SREL32: u16 = 0x000e;
/// AMD64: pair, must follow a span-dependent value.
pub const REL_AMD64_PAIR: u16 = 0x000f;
/// AMD64: 32-bit signed span-dependent value applied at link time.
pub const REL_AMD64_SSPAN32: u16 = 0x0010;

// ---------------------------------------------------------------------------
// i386 relocation types
// ---------------------------------------------------------------------------

/// I386: ignored.
pub const REL_I386_ABSOLUTE: u16 = 0x0000;
/// I386: 16-bit VA (unsupported by modern linkers).
pub const REL_I386_DIR16: u16 = 0x0001;
/// I386: 16-bit relative (unsupported by modern linkers).
pub const REL_I386_REL16: u16 = 0x0002;
/// I386: 32-bit VA of the target.
pub const REL_I386_DIR32: u16 = 0x0006;
/// I386: 32-bit RVA of the target.
pub const REL_I386_DIR32NB: u16 = 0x0007;
/// I386: unsupported.
pub const REL_I386_SEG12: u16 = 0x0009;
/// I386: 16-bit section index.
pub const REL_I386_SECTION: u16 = 0x000a;
/// I386: 32-bit offset from the start of the section.
pub const REL_I386_SECREL: u16 = 0x000b;
/// I386: CLR token.
pub const REL_I386_TOKEN: u16 = 0x000c;
/// I386: 7-bit section offset.
pub const REL_I386_SECREL7: u16 = 0x000d;
/// I386: 32-bit relative displacement.
pub const REL_I386_REL32: u16 = 0x0014;

/// Size of one on-disk relocation record (10 bytes).
pub const RELOCATION_SIZE: usize = 10;

/// Returns the name of a relocation type for `machine`, or `None` if either
/// is unknown.
#[must_use]
pub fn reloc_type_name(machine: u16, reloc_type: u16) -> Option<&'static str> {
    Some(match (machine, reloc_type) {
        (MACHINE_AMD64, REL_AMD64_ABSOLUTE) => "ABSOLUTE",
        (MACHINE_AMD64, REL_AMD64_ADDR64) => "ADDR64",
        (MACHINE_AMD64, REL_AMD64_ADDR32) => "ADDR32",
        (MACHINE_AMD64, REL_AMD64_ADDR32NB) => "ADDR32NB",
        (MACHINE_AMD64, REL_AMD64_REL32) => "REL32",
        (MACHINE_AMD64, REL_AMD64_REL32_1) => "REL32_1",
        (MACHINE_AMD64, REL_AMD64_REL32_2) => "REL32_2",
        (MACHINE_AMD64, REL_AMD64_REL32_3) => "REL32_3",
        (MACHINE_AMD64, REL_AMD64_REL32_4) => "REL32_4",
        (MACHINE_AMD64, REL_AMD64_REL32_5) => "REL32_5",
        (MACHINE_AMD64, REL_AMD64_SECTION) => "SECTION",
        (MACHINE_AMD64, REL_AMD64_SECREL) => "SECREL",
        (MACHINE_AMD64, REL_AMD64_SECREL7) => "SECREL7",
        (MACHINE_AMD64, REL_AMD64_TOKEN) => "TOKEN",
        (MACHINE_AMD64, REL_AMD64_SREL32) => "SREL32",
        (MACHINE_AMD64, REL_AMD64_PAIR) => "PAIR",
        (MACHINE_AMD64, REL_AMD64_SSPAN32) => "SSPAN32",
        (MACHINE_I386, REL_I386_ABSOLUTE) => "ABSOLUTE",
        (MACHINE_I386, REL_I386_DIR16) => "DIR16",
        (MACHINE_I386, REL_I386_REL16) => "REL16",
        (MACHINE_I386, REL_I386_DIR32) => "DIR32",
        (MACHINE_I386, REL_I386_DIR32NB) => "DIR32NB",
        (MACHINE_I386, REL_I386_SEG12) => "SEG12",
        (MACHINE_I386, REL_I386_SECTION) => "SECTION",
        (MACHINE_I386, REL_I386_SECREL) => "SECREL",
        (MACHINE_I386, REL_I386_TOKEN) => "TOKEN",
        (MACHINE_I386, REL_I386_SECREL7) => "SECREL7",
        (MACHINE_I386, REL_I386_REL32) => "REL32",
        _ => return None,
    })
}

/// Returns `true` if relocations for `machine` can be filtered at all.
#[must_use]
pub fn machine_has_reloc_filter(machine: u16) -> bool {
    matches!(machine, MACHINE_AMD64 | MACHINE_I386)
}

/// Patch width in bytes of a relocation that passes the filter for
/// `machine`, or `None` if the relocation is dropped.
#[must_use]
pub fn retained_size(machine: u16, reloc_type: u16) -> Option<u32> {
    match machine {
        MACHINE_AMD64 => {
            (REL_AMD64_REL32..=REL_AMD64_REL32_5).contains(&reloc_type).then_some(4)
        }
        MACHINE_I386 => matches!(
            reloc_type,
            REL_I386_DIR32 | REL_I386_DIR32NB | REL_I386_REL32
        )
        .then_some(4),
        _ => None,
    }
}

/// A retained relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Relocation {
    /// Name of the referenced symbol.
    pub symbol_name: String,
    /// Index of the referenced symbol in the raw symbol stream.
    pub symbol_index: u32,
    /// Address of the patched location, relative to the section.
    pub virtual_addr: u32,
    /// Machine-specific relocation type.
    pub reloc_type: u16,
    /// Width of the patched field in bytes.
    pub size: u32,
}

/// A raw 10-byte relocation record.
#[derive(Debug, Clone, Copy)]
struct RawRelocation {
    virtual_addr: u32,
    symbol_index: u32,
    reloc_type: u16,
}

impl RawRelocation {
    fn decode(cur: &ByteCursor<'_>, offset: usize) -> Result<Self, Error> {
        cur.check(offset, RELOCATION_SIZE)?;
        Ok(Self {
            virtual_addr: cur.read_u32(offset)?,
            symbol_index: cur.read_u32(offset + 4)?,
            reloc_type: cur.read_u16(offset + 8)?,
        })
    }
}

/// Retained relocations of every section.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RelocationTable {
    by_section: Vec<Vec<Relocation>>,
}

impl RelocationTable {
    /// Decodes and filters the relocations of every section.
    ///
    /// Sections that are not code, are COMDAT, or have no relocation offset
    /// get an empty list. For machines other than AMD64 and I386 nothing is
    /// decoded and every list is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] if a relocation array runs past the
    /// buffer, [`Error::OutOfRangeIndex`] if a relocation references a
    /// symbol index past the symbol table, [`Error::InvalidHeader`] for a
    /// negative relocation offset, or any error from resolving a name.
    pub fn decode(
        data: &[u8],
        header: &FileHeader,
        sections: &[SectionHeader],
        strtab: &StringTable,
        diag: &mut dyn Diagnostics,
    ) -> Result<Self, Error> {
        let mut by_section = Vec::with_capacity(sections.len());

        if !machine_has_reloc_filter(header.machine) {
            emit(diag, Level::Info, 0, DiagnosticKind::UnsupportedMachine(header.machine));
            by_section.resize_with(sections.len(), Vec::new);
            return Ok(Self { by_section });
        }

        for (index, section) in sections.iter().enumerate() {
            if let Some(reason) = skip_reason(section) {
                emit(
                    diag,
                    Level::Debug,
                    header.section_table_offset(),
                    DiagnosticKind::RelocationsSkipped {
                        section: index,
                        reason,
                    },
                );
                by_section.push(Vec::new());
                continue;
            }
            by_section.push(decode_section(data, header, index, section, strtab, diag)?);
        }

        Ok(Self { by_section })
    }

    /// Relocations of the section with 0-based index `section`, in on-disk
    /// order.
    #[must_use]
    pub fn section(&self, section: usize) -> Option<&[Relocation]> {
        self.by_section.get(section).map(Vec::as_slice)
    }

    /// Relocations for every section, indexed by 0-based section index.
    #[must_use]
    pub fn by_section(&self) -> &[Vec<Relocation>] {
        &self.by_section
    }
}

fn skip_reason(section: &SectionHeader) -> Option<RelocSkip> {
    if section.has_relocations() {
        None
    } else if section.reloc_offset == 0 {
        Some(RelocSkip::NoRelocations)
    } else if !section.is_code() {
        Some(RelocSkip::NotCode)
    } else {
        Some(RelocSkip::Comdat)
    }
}

fn decode_section(
    data: &[u8],
    header: &FileHeader,
    index: usize,
    section: &SectionHeader,
    strtab: &StringTable,
    diag: &mut dyn Diagnostics,
) -> Result<Vec<Relocation>, Error> {
    let cur = ByteCursor::new(data);
    let base = usize::try_from(section.reloc_offset).map_err(|_| Error::InvalidHeader {
        field: "relocation offset",
        value: i64::from(section.reloc_offset),
        offset: header.section_table_offset() + index * crate::section::SECTION_HEADER_SIZE,
    })?;
    let symbol_count = header.symbol_record_count();
    let symtab = header.symbol_table_start();

    let mut out = Vec::new();
    for position in 0..section.reloc_count {
        let offset = base + position as usize * RELOCATION_SIZE;
        let raw = RawRelocation::decode(&cur, offset)?;

        if raw.symbol_index as usize >= symbol_count {
            return Err(Error::OutOfRangeIndex {
                kind: IndexKind::Symbol,
                index: u64::from(raw.symbol_index),
                limit: symbol_count as u64,
                offset,
            });
        }

        let Some(size) = retained_size(header.machine, raw.reloc_type) else {
            emit(
                diag,
                Level::Debug,
                offset,
                DiagnosticKind::RelocationDropped {
                    section: index,
                    position,
                    reloc_type: raw.reloc_type,
                },
            );
            continue;
        };

        let symbol_offset = symtab + raw.symbol_index as usize * SYMBOL_SIZE;
        out.push(Relocation {
            symbol_name: decode_name(data, symbol_offset, strtab)?,
            symbol_index: raw.symbol_index,
            virtual_addr: raw.virtual_addr,
            reloc_type: raw.reloc_type,
            size,
        });
    }

    Ok(out)
}
