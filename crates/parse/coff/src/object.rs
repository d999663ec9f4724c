//! Whole-file decoding.
//!
//! Decode order follows the file layout: header, optional header, section
//! headers, then (once the string table is located) symbols and relocations.

use alloc::string::String;
use alloc::vec::Vec;

use crate::diag::{DiagnosticKind, Diagnostics, Level, NoDiagnostics, emit};
use crate::error::DecodeError;
use crate::header::{FileHeader, OptionalHeader};
use crate::reloc::{Relocation, RelocationTable};
use crate::section::{SECTION_HEADER_SIZE, SectionHeader};
use crate::strtab::StringTable;
use crate::symbol::{Symbol, SymbolTable};
use crate::Error;

/// A fully decoded object file.
///
/// Owns copies of every name and field; the input buffer can be dropped as
/// soon as decoding returns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ObjectFile {
    header: FileHeader,
    optional_header: Option<OptionalHeader>,
    sections: Vec<SectionHeader>,
    string_table: StringTable,
    symbols: SymbolTable,
    relocations: RelocationTable,
}

impl ObjectFile {
    /// Decodes `data` with no source name and diagnostics discarded.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] wrapping the first fatal component error.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        Decoder::new().decode(data)
    }

    /// The file header.
    #[must_use]
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// The optional header, if the file has one.
    #[must_use]
    pub fn optional_header(&self) -> Option<&OptionalHeader> {
        self.optional_header.as_ref()
    }

    /// Section headers in on-disk order (0-based).
    #[must_use]
    pub fn sections(&self) -> &[SectionHeader] {
        &self.sections
    }

    /// The section with 0-based index `index`.
    #[must_use]
    pub fn section(&self, index: usize) -> Option<&SectionHeader> {
        self.sections.get(index)
    }

    /// Finds the first section called `name`, returning its 0-based index.
    #[must_use]
    pub fn section_by_name(&self, name: &str) -> Option<(usize, &SectionHeader)> {
        self.sections.iter().enumerate().find(|(_, s)| s.name == name)
    }

    /// Location of the string table.
    #[must_use]
    pub fn string_table(&self) -> &StringTable {
        &self.string_table
    }

    /// The full symbol table, including symbols left out of the grouping.
    #[must_use]
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Symbols of the section with 0-based index `section`, sorted by value
    /// with inferred sizes. Empty for a section without symbols; `None` only
    /// for an index past the section table.
    #[must_use]
    pub fn symbols(&self, section: usize) -> Option<&[Symbol]> {
        self.symbols.section(section)
    }

    /// Primary symbol record at raw stream index `index`, as addressed by
    /// relocations.
    #[must_use]
    pub fn symbol_at(&self, index: u32) -> Option<&Symbol> {
        self.symbols.raw_at(index).map(|r| &r.symbol)
    }

    /// Retained relocations of the section with 0-based index `section`.
    #[must_use]
    pub fn relocations(&self, section: usize) -> Option<&[Relocation]> {
        self.relocations.section(section)
    }

    /// The full relocation table.
    #[must_use]
    pub fn relocation_table(&self) -> &RelocationTable {
        &self.relocations
    }
}

/// Configures a decode: source name for error messages and a diagnostics
/// sink.
///
/// ```
/// use coffkit_coff::{Decoder, Diagnostic};
///
/// # let data = [0u8; 0];
/// let mut diags: Vec<Diagnostic> = Vec::new();
/// let result = Decoder::new()
///     .source_name("hello.obj")
///     .diagnostics(&mut diags)
///     .decode(&data);
/// assert!(result.unwrap_err().to_string().starts_with("hello.obj: "));
/// ```
#[derive(Default)]
pub struct Decoder<'d> {
    source_name: Option<String>,
    diag: Option<&'d mut dyn Diagnostics>,
}

impl<'d> Decoder<'d> {
    /// A decoder with no source name that discards diagnostics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the identifier used to prefix error messages.
    #[must_use]
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Sends non-fatal diagnostics to `sink`.
    #[must_use]
    pub fn diagnostics(mut self, sink: &'d mut dyn Diagnostics) -> Self {
        self.diag = Some(sink);
        self
    }

    /// Decodes `data`.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] carrying the source name and the first
    /// fatal component error; no partial result is produced.
    pub fn decode(self, data: &[u8]) -> Result<ObjectFile, DecodeError> {
        let mut discard = NoDiagnostics;
        let diag: &mut dyn Diagnostics = match self.diag {
            Some(sink) => sink,
            None => &mut discard,
        };
        decode_object(data, diag).map_err(|e| DecodeError::new(self.source_name, e))
    }
}

fn decode_object(data: &[u8], diag: &mut dyn Diagnostics) -> Result<ObjectFile, Error> {
    let header = FileHeader::decode(data, 0)?;

    let optional_header = if header.optional_header_size > 0 {
        Some(OptionalHeader::decode(data, header.optional_header_offset())?)
    } else {
        None
    };

    let table_start = header.section_table_offset();
    let mut sections = (0..usize::from(header.section_count))
        .map(|i| SectionHeader::decode(data, table_start + i * SECTION_HEADER_SIZE))
        .collect::<Result<Vec<_>, _>>()?;

    let string_table = locate_string_table(data, &header, diag)?;
    resolve_section_names(data, &mut sections, &string_table, table_start, diag);

    let symbols = SymbolTable::decode(data, &header, &sections, &string_table, diag)?;
    let relocations = RelocationTable::decode(data, &header, &sections, &string_table, diag)?;

    Ok(ObjectFile {
        header,
        optional_header,
        sections,
        string_table,
        symbols,
        relocations,
    })
}

/// Finds the string table directly after the symbol records.
///
/// A file without a symbol table, or one that ends exactly where the string
/// table would begin, gets an empty table.
fn locate_string_table(
    data: &[u8],
    header: &FileHeader,
    diag: &mut dyn Diagnostics,
) -> Result<StringTable, Error> {
    let offset = header.string_table_offset().ok_or(Error::InvalidHeader {
        field: "symbol count",
        value: i64::from(header.symbol_count),
        offset: 0,
    })?;

    if header.symbol_count == 0 && header.symbol_table_offset == 0 {
        return Ok(StringTable::empty(offset));
    }
    if offset == data.len() {
        emit(diag, Level::Warn, offset, DiagnosticKind::MissingStringTable);
        return Ok(StringTable::empty(offset));
    }
    StringTable::at(data, offset, diag)
}

/// Replaces `/nnn` section names with their string table entries.
fn resolve_section_names(
    data: &[u8],
    sections: &mut [SectionHeader],
    strtab: &StringTable,
    table_start: usize,
    diag: &mut dyn Diagnostics,
) {
    for (index, section) in sections.iter_mut().enumerate() {
        let Some(name_offset) = section.long_name_offset() else {
            continue;
        };
        match strtab.resolve(data, name_offset) {
            Ok(name) => section.name = name,
            Err(_) => emit(
                diag,
                Level::Warn,
                table_start + index * SECTION_HEADER_SIZE,
                DiagnosticKind::UnresolvedSectionName { section: index },
            ),
        }
    }
}
