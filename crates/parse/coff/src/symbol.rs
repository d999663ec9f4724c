//! Symbol table decoding, per-section grouping, and size inference.
//!
//! Each primary 18-byte record may be followed by `aux_count` auxiliary
//! records of the same size. Auxiliary records are kept as raw bytes; only
//! the primary record is decoded.

use alloc::string::String;
use alloc::vec::Vec;

use crate::cursor::{ByteCursor, trim_name};
use crate::diag::{DiagnosticKind, Diagnostics, Exclusion, Level, emit};
use crate::error::IndexKind;
use crate::header::{FileHeader, SYMBOL_SIZE};
use crate::section::SectionHeader;
use crate::strtab::StringTable;
use crate::Error;

// ---------------------------------------------------------------------------
// Special section numbers
// ---------------------------------------------------------------------------

/// Section number: external symbol, not yet assigned a section.
pub const SYM_UNDEFINED: i16 = 0;

/// Section number: absolute value, not an address.
pub const SYM_ABSOLUTE: i16 = -1;

/// Section number: debugging symbol.
pub const SYM_DEBUG: i16 = -2;

// ---------------------------------------------------------------------------
// Storage classes
// ---------------------------------------------------------------------------

/// Storage class: end of function (debug only).
pub const CLASS_END_OF_FUNCTION: u8 = 0xff;
/// Storage class: none.
pub const CLASS_NULL: u8 = 0;
/// Storage class: automatic (stack) variable.
pub const CLASS_AUTOMATIC: u8 = 1;
/// Storage class: external symbol.
pub const CLASS_EXTERNAL: u8 = 2;
/// Storage class: static symbol (section-relative offset).
pub const CLASS_STATIC: u8 = 3;
/// Storage class: register variable.
pub const CLASS_REGISTER: u8 = 4;
/// Storage class: externally defined.
pub const CLASS_EXTERNAL_DEF: u8 = 5;
/// Storage class: code label inside a function.
pub const CLASS_LABEL: u8 = 6;
/// Storage class: undefined label.
pub const CLASS_UNDEFINED_LABEL: u8 = 7;
/// Storage class: structure member.
pub const CLASS_MEMBER_OF_STRUCT: u8 = 8;
/// Storage class: formal argument.
pub const CLASS_ARGUMENT: u8 = 9;
/// Storage class: structure tag.
pub const CLASS_STRUCT_TAG: u8 = 10;
/// Storage class: union member.
pub const CLASS_MEMBER_OF_UNION: u8 = 11;
/// Storage class: union tag.
pub const CLASS_UNION_TAG: u8 = 12;
/// Storage class: typedef.
pub const CLASS_TYPE_DEFINITION: u8 = 13;
/// Storage class: undefined static.
pub const CLASS_UNDEFINED_STATIC: u8 = 14;
/// Storage class: enum tag.
pub const CLASS_ENUM_TAG: u8 = 15;
/// Storage class: enum member.
pub const CLASS_MEMBER_OF_ENUM: u8 = 16;
/// Storage class: register parameter.
pub const CLASS_REGISTER_PARAM: u8 = 17;
/// Storage class: bit-field.
pub const CLASS_BIT_FIELD: u8 = 18;
/// Storage class: `.bb` / `.eb` block marker.
pub const CLASS_BLOCK: u8 = 100;
/// Storage class: `.bf` / `.ef` / `.lf` function marker.
pub const CLASS_FUNCTION: u8 = 101;
/// Storage class: end of structure.
pub const CLASS_END_OF_STRUCT: u8 = 102;
/// Storage class: source file name, followed by aux records.
pub const CLASS_FILE: u8 = 103;
/// Storage class: section definition.
pub const CLASS_SECTION: u8 = 104;
/// Storage class: weak external.
pub const CLASS_WEAK_EXTERNAL: u8 = 105;
/// Storage class: CLR token.
pub const CLASS_CLR_TOKEN: u8 = 107;

/// Symbol type: function (complex type `DTYPE_FUNCTION` in bits 4..6).
pub const TYPE_FUNCTION: u16 = 0x20;

/// Returns the conventional name of a storage class, or `None` if unknown.
#[must_use]
pub fn storage_class_name(class: u8) -> Option<&'static str> {
    Some(match class {
        CLASS_END_OF_FUNCTION => "END_OF_FUNCTION",
        CLASS_NULL => "NULL",
        CLASS_AUTOMATIC => "AUTOMATIC",
        CLASS_EXTERNAL => "EXTERNAL",
        CLASS_STATIC => "STATIC",
        CLASS_REGISTER => "REGISTER",
        CLASS_EXTERNAL_DEF => "EXTERNAL_DEF",
        CLASS_LABEL => "LABEL",
        CLASS_UNDEFINED_LABEL => "UNDEFINED_LABEL",
        CLASS_MEMBER_OF_STRUCT => "MEMBER_OF_STRUCT",
        CLASS_ARGUMENT => "ARGUMENT",
        CLASS_STRUCT_TAG => "STRUCT_TAG",
        CLASS_MEMBER_OF_UNION => "MEMBER_OF_UNION",
        CLASS_UNION_TAG => "UNION_TAG",
        CLASS_TYPE_DEFINITION => "TYPE_DEFINITION",
        CLASS_UNDEFINED_STATIC => "UNDEFINED_STATIC",
        CLASS_ENUM_TAG => "ENUM_TAG",
        CLASS_MEMBER_OF_ENUM => "MEMBER_OF_ENUM",
        CLASS_REGISTER_PARAM => "REGISTER_PARAM",
        CLASS_BIT_FIELD => "BIT_FIELD",
        CLASS_BLOCK => "BLOCK",
        CLASS_FUNCTION => "FUNCTION",
        CLASS_END_OF_STRUCT => "END_OF_STRUCT",
        CLASS_FILE => "FILE",
        CLASS_SECTION => "SECTION",
        CLASS_WEAK_EXTERNAL => "WEAK_EXTERNAL",
        CLASS_CLR_TOKEN => "CLR_TOKEN",
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// Symbol
// ---------------------------------------------------------------------------

/// A decoded symbol record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Symbol {
    /// Symbol name, inline or from the string table.
    pub name: String,
    /// Value; for section symbols, the offset within the section.
    pub value: i32,
    /// 1-based section number, or one of `SYM_UNDEFINED`/`SYM_ABSOLUTE`/`SYM_DEBUG`.
    pub section_index: i16,
    /// Symbol type.
    pub sym_type: u16,
    /// Storage class (`CLASS_*`).
    pub storage_class: u8,
    /// Number of auxiliary records following this one.
    pub aux_count: u8,
    /// Extent inferred from neighbouring symbols; 0 until grouped.
    pub inferred_size: u32,
}

impl Symbol {
    /// Decodes the primary symbol record at `offset`, resolving its name
    /// through `strtab` when needed. `inferred_size` is left at 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedData`] for a short record, or any error from
    /// resolving a string table name.
    pub fn decode(data: &[u8], offset: usize, strtab: &StringTable) -> Result<Self, Error> {
        let cur = ByteCursor::new(data);
        cur.check(offset, SYMBOL_SIZE)?;
        Ok(Self {
            name: decode_name(data, offset, strtab)?,
            value: cur.read_i32(offset + 8)?,
            section_index: cur.read_i16(offset + 12)?,
            sym_type: cur.read_u16(offset + 14)?,
            storage_class: cur.read_u8(offset + 16)?,
            aux_count: cur.read_u8(offset + 17)?,
            inferred_size: 0,
        })
    }

    /// Returns `true` for `CLASS_LABEL` symbols.
    #[must_use]
    pub fn is_label(&self) -> bool {
        self.storage_class == CLASS_LABEL
    }

    /// Returns `true` if the type marks a function.
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.sym_type & 0x30 == TYPE_FUNCTION
    }
}

/// Decodes the 8-byte name field of the symbol record at `offset`.
///
/// Four leading zero bytes mean the next four hold a string table offset;
/// anything else is an inline name trimmed at NUL or space.
pub(crate) fn decode_name(
    data: &[u8],
    offset: usize,
    strtab: &StringTable,
) -> Result<String, Error> {
    let cur = ByteCursor::new(data);
    let raw: [u8; 8] = cur.read_array(offset)?;
    if raw[..4] != [0; 4] {
        return Ok(trim_name(&raw));
    }

    let str_offset = cur.read_i32(offset + 4)?;
    let str_offset = u32::try_from(str_offset).map_err(|_| Error::OutOfRangeIndex {
        kind: IndexKind::StringOffset,
        index: u64::from(str_offset.unsigned_abs()),
        limit: u64::from(strtab.total_size),
        offset,
    })?;
    strtab.resolve(data, str_offset)
}

// ---------------------------------------------------------------------------
// SymbolTable
// ---------------------------------------------------------------------------

/// A primary symbol record as it appears in the raw stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RawSymbol {
    /// Index in the raw record stream (auxiliary records count).
    pub index: u32,
    /// File offset of the primary record.
    pub offset: usize,
    /// The decoded record. `inferred_size` is always 0 here.
    pub symbol: Symbol,
    /// Raw bytes of the trailing auxiliary records.
    pub aux: Vec<u8>,
}

/// The decoded symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SymbolTable {
    raw: Vec<RawSymbol>,
    by_section: Vec<Vec<Symbol>>,
}

impl SymbolTable {
    /// Decodes every symbol record declared by `header`, groups the plain
    /// section symbols by section and infers their sizes.
    ///
    /// Symbols with auxiliary records or a section number outside
    /// `1..=sections.len()` are kept in [`SymbolTable::raw`] but left out of
    /// the grouping; each such symbol is reported at [`Level::Info`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRangeIndex`] if a symbol's auxiliary records run
    /// past the declared record count, [`Error::TruncatedData`] if a record or
    /// its auxiliary records run past the buffer, or any error from resolving
    /// a name.
    pub fn decode(
        data: &[u8],
        header: &FileHeader,
        sections: &[SectionHeader],
        strtab: &StringTable,
        diag: &mut dyn Diagnostics,
    ) -> Result<Self, Error> {
        let cur = ByteCursor::new(data);
        let count = header.symbol_record_count();
        let mut by_section: Vec<Vec<Symbol>> = sections.iter().map(|_| Vec::new()).collect();
        let mut raw = Vec::new();

        let mut offset = header.symbol_table_start();
        let mut index = 0usize;
        while index < count {
            let symbol = Symbol::decode(data, offset, strtab)?;
            let last = index + usize::from(symbol.aux_count);
            if last >= count {
                return Err(Error::OutOfRangeIndex {
                    kind: IndexKind::Symbol,
                    index: last as u64,
                    limit: count as u64,
                    offset,
                });
            }
            let aux_len = usize::from(symbol.aux_count) * SYMBOL_SIZE;
            let aux = cur.read_bytes(offset + SYMBOL_SIZE, aux_len)?.to_vec();
            #[expect(clippy::cast_possible_truncation, reason = "bounded by an i32 count")]
            let raw_index = index as u32;

            match group_slot(&symbol, sections.len()) {
                Ok(slot) => by_section[slot].push(symbol.clone()),
                Err(reason) => emit(
                    diag,
                    Level::Info,
                    offset,
                    DiagnosticKind::SymbolExcluded { raw_index, reason },
                ),
            }

            raw.push(RawSymbol {
                index: raw_index,
                offset,
                symbol,
                aux,
            });
            offset += SYMBOL_SIZE + aux_len;
            index += 1 + aux_len / SYMBOL_SIZE;
        }

        for (list, section) in by_section.iter_mut().zip(sections) {
            infer_sizes(list, section.data_size());
        }

        Ok(Self { raw, by_section })
    }

    /// Every primary record in on-disk order.
    #[must_use]
    pub fn raw(&self) -> &[RawSymbol] {
        &self.raw
    }

    /// Looks up the primary record with raw stream index `index`.
    ///
    /// Returns `None` if the index is past the table or lands on an
    /// auxiliary record.
    #[must_use]
    pub fn raw_at(&self, index: u32) -> Option<&RawSymbol> {
        self.raw
            .binary_search_by_key(&index, |r| r.index)
            .ok()
            .map(|i| &self.raw[i])
    }

    /// Grouped symbols of the section with 0-based index `section`, sorted
    /// by value with sizes inferred.
    #[must_use]
    pub fn section(&self, section: usize) -> Option<&[Symbol]> {
        self.by_section.get(section).map(Vec::as_slice)
    }

    /// Grouped symbols for every section, indexed by 0-based section index.
    #[must_use]
    pub fn by_section(&self) -> &[Vec<Symbol>] {
        &self.by_section
    }
}

/// Decides which 0-based section list a symbol belongs in.
fn group_slot(symbol: &Symbol, section_count: usize) -> Result<usize, Exclusion> {
    if symbol.aux_count != 0 {
        return Err(Exclusion::HasAux(symbol.aux_count));
    }
    match usize::try_from(symbol.section_index) {
        Ok(n) if (1..=section_count).contains(&n) => Ok(n - 1),
        _ => Err(Exclusion::SectionOutOfRange(symbol.section_index)),
    }
}

/// Sorts one section's symbols by value and fills in `inferred_size`.
///
/// A symbol extends to the next symbol that is not a label; labels mark
/// points inside a symbol rather than starting a new one. A label itself
/// extends only to its immediate successor. The last symbol extends to the
/// end of the section.
pub fn infer_sizes(symbols: &mut [Symbol], section_size: u32) {
    symbols.sort_by_key(|s| s.value);

    for i in 0..symbols.len() {
        let start = i64::from(symbols[i].value);
        let label = symbols[i].is_label();
        let end = symbols[i + 1..]
            .iter()
            .find(|next| label || !next.is_label())
            .map_or(i64::from(section_size), |next| i64::from(next.value));
        symbols[i].inferred_size = u32::try_from(end - start).unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{Diagnostic, NoDiagnostics};
    use crate::header::MACHINE_AMD64;
    use crate::testutil::{ObjectBuilder, SymbolSpec};

    fn sym(name: &str, value: i32, class: u8) -> Symbol {
        Symbol {
            name: name.into(),
            value,
            section_index: 1,
            sym_type: 0,
            storage_class: class,
            aux_count: 0,
            inferred_size: 0,
        }
    }

    fn sizes(symbols: &[Symbol]) -> Vec<u32> {
        symbols.iter().map(|s| s.inferred_size).collect()
    }

    #[test]
    fn sizes_from_successors() {
        let mut syms = vec![
            sym("a", 0x10, CLASS_EXTERNAL),
            sym("b", 0x20, CLASS_EXTERNAL),
            sym("c", 0x30, CLASS_STATIC),
        ];
        infer_sizes(&mut syms, 0x40);
        assert_eq!(sizes(&syms), [0x10, 0x10, 0x10]);
    }

    #[test]
    fn labels_are_skipped_by_non_labels() {
        let mut syms = vec![
            sym("lbl", 0x10, CLASS_LABEL),
            sym("f", 0x14, CLASS_EXTERNAL),
            sym("g", 0x20, CLASS_EXTERNAL),
        ];
        infer_sizes(&mut syms, 0x40);
        assert_eq!(sizes(&syms), [0x04, 0x0c, 0x20]);
    }

    #[test]
    fn function_spans_inner_labels() {
        let mut syms = vec![
            sym("f", 0x00, CLASS_EXTERNAL),
            sym("$LN1", 0x08, CLASS_LABEL),
            sym("$LN2", 0x0c, CLASS_LABEL),
            sym("g", 0x20, CLASS_EXTERNAL),
        ];
        infer_sizes(&mut syms, 0x30);
        assert_eq!(sizes(&syms), [0x20, 0x04, 0x14, 0x10]);
    }

    #[test]
    fn trailing_labels_extend_to_section_end() {
        let mut syms = vec![sym("f", 0x00, CLASS_EXTERNAL), sym("$LN", 0x08, CLASS_LABEL)];
        infer_sizes(&mut syms, 0x10);
        assert_eq!(sizes(&syms), [0x10, 0x08]);
    }

    #[test]
    fn sort_is_stable_and_ties_have_zero_size() {
        let mut syms = vec![
            sym("second", 0x20, CLASS_EXTERNAL),
            sym("alias_a", 0x00, CLASS_EXTERNAL),
            sym("alias_b", 0x00, CLASS_EXTERNAL),
        ];
        infer_sizes(&mut syms, 0x30);
        let names: Vec<_> = syms.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["alias_a", "alias_b", "second"]);
        assert_eq!(sizes(&syms), [0x00, 0x20, 0x10]);
    }

    #[test]
    fn value_past_section_end_gets_zero() {
        let mut syms = vec![sym("x", 0x50, CLASS_EXTERNAL)];
        infer_sizes(&mut syms, 0x40);
        assert_eq!(sizes(&syms), [0]);
    }

    #[test]
    fn inline_and_long_names() {
        let buf = ObjectBuilder::new(MACHINE_AMD64)
            .section(".text", 0x20, 0x6000_0020)
            .symbol(SymbolSpec::new("main", 0, 1, CLASS_EXTERNAL))
            .symbol(SymbolSpec::new("a_rather_long_name", 0x10, 1, CLASS_EXTERNAL))
            .build();
        let (hdr, sections, strtab) = ObjectBuilder::layout(&buf);
        let table = SymbolTable::decode(&buf, &hdr, &sections, &strtab, &mut NoDiagnostics)
            .expect("valid symbols");
        let names: Vec<_> = table.raw().iter().map(|r| r.symbol.name.as_str()).collect();
        assert_eq!(names, ["main", "a_rather_long_name"]);
        assert_eq!(sizes(table.section(0).unwrap()), [0x10, 0x10]);
    }

    #[test]
    fn string_table_offset_four_resolves_first_name() {
        let strtab_bytes = b"\x09\x00\x00\x00foo\x00bar\x00";
        let mut buf = vec![0u8; SYMBOL_SIZE];
        buf[4..8].copy_from_slice(&4i32.to_le_bytes());
        buf.extend_from_slice(strtab_bytes);
        let strtab = StringTable::at(&buf, SYMBOL_SIZE, &mut NoDiagnostics).unwrap();
        assert_eq!(decode_name(&buf, 0, &strtab).unwrap(), "foo");
    }

    #[test]
    fn negative_string_offset_is_out_of_range() {
        let mut buf = vec![0u8; SYMBOL_SIZE];
        buf[4..8].copy_from_slice(&(-8i32).to_le_bytes());
        buf.extend_from_slice(b"\x04\x00\x00\x00");
        let strtab = StringTable::at(&buf, SYMBOL_SIZE, &mut NoDiagnostics).unwrap();
        assert!(matches!(
            decode_name(&buf, 0, &strtab),
            Err(Error::OutOfRangeIndex {
                kind: IndexKind::StringOffset,
                index: 8,
                ..
            })
        ));
    }

    #[test]
    fn aux_records_are_skipped_and_excluded() {
        let buf = ObjectBuilder::new(MACHINE_AMD64)
            .section(".text", 0x40, 0x6000_0020)
            .symbol(SymbolSpec::new(".file", 0, SYM_DEBUG, CLASS_FILE).aux(b"hello.c"))
            .symbol(SymbolSpec::new(".text", 0, 1, CLASS_STATIC).aux(&[0u8; 18]))
            .symbol(SymbolSpec::new("main", 0, 1, CLASS_EXTERNAL))
            .symbol(SymbolSpec::new("puts", 0, SYM_UNDEFINED, CLASS_EXTERNAL))
            .build();
        let (hdr, sections, strtab) = ObjectBuilder::layout(&buf);
        assert_eq!(hdr.symbol_count, 6);

        let mut diags: Vec<Diagnostic> = Vec::new();
        let table = SymbolTable::decode(&buf, &hdr, &sections, &strtab, &mut diags).unwrap();

        let indices: Vec<_> = table.raw().iter().map(|r| r.index).collect();
        assert_eq!(indices, [0, 2, 4, 5]);
        assert_eq!(&table.raw()[0].aux[..7], b"hello.c");
        assert_eq!(table.raw()[1].aux.len(), SYMBOL_SIZE);

        let grouped = table.section(0).unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].name, "main");
        assert_eq!(grouped[0].inferred_size, 0x40);

        let excluded: Vec<_> = diags
            .iter()
            .filter_map(|d| match d.kind {
                DiagnosticKind::SymbolExcluded { raw_index, reason } => Some((raw_index, reason)),
                _ => None,
            })
            .collect();
        assert_eq!(
            excluded,
            [
                (0, Exclusion::HasAux(1)),
                (2, Exclusion::HasAux(1)),
                (5, Exclusion::SectionOutOfRange(0)),
            ]
        );
        assert!(diags.iter().all(|d| d.level == Level::Info));
    }

    #[test]
    fn raw_lookup_skips_aux_slots() {
        let buf = ObjectBuilder::new(MACHINE_AMD64)
            .section(".text", 0x10, 0x6000_0020)
            .symbol(SymbolSpec::new(".text", 0, 1, CLASS_STATIC).aux(&[0u8; 18]))
            .symbol(SymbolSpec::new("f", 0, 1, CLASS_EXTERNAL))
            .build();
        let (hdr, sections, strtab) = ObjectBuilder::layout(&buf);
        let table =
            SymbolTable::decode(&buf, &hdr, &sections, &strtab, &mut NoDiagnostics).unwrap();
        assert_eq!(table.raw_at(0).map(|r| r.symbol.name.as_str()), Some(".text"));
        assert!(table.raw_at(1).is_none());
        assert_eq!(table.raw_at(2).map(|r| r.symbol.name.as_str()), Some("f"));
        assert!(table.raw_at(3).is_none());
    }

    #[test]
    fn empty_sections_have_empty_lists() {
        let buf = ObjectBuilder::new(MACHINE_AMD64)
            .section(".text", 0x10, 0x6000_0020)
            .section(".data", 0x10, 0xc000_0040_u32 as i32)
            .symbol(SymbolSpec::new("f", 0, 1, CLASS_EXTERNAL))
            .build();
        let (hdr, sections, strtab) = ObjectBuilder::layout(&buf);
        let table =
            SymbolTable::decode(&buf, &hdr, &sections, &strtab, &mut NoDiagnostics).unwrap();
        assert_eq!(table.by_section().len(), 2);
        assert_eq!(table.section(1), Some(&[][..]));
        assert_eq!(table.section(2), None);
    }

    #[test]
    fn aux_past_buffer_is_truncation() {
        let mut buf = ObjectBuilder::new(MACHINE_AMD64)
            .section(".text", 0x10, 0x6000_0020)
            .symbol(SymbolSpec::new("f", 0, 1, CLASS_EXTERNAL))
            .build();
        let (mut hdr, sections, strtab) = ObjectBuilder::layout(&buf);
        // Claim 200 aux records on the only symbol, and room for them.
        let aux_at = hdr.symbol_table_start() + 17;
        buf[aux_at] = 200;
        hdr.symbol_count = 201;
        assert!(matches!(
            SymbolTable::decode(&buf, &hdr, &sections, &strtab, &mut NoDiagnostics),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn aux_past_record_count_is_out_of_range() {
        let mut buf = ObjectBuilder::new(MACHINE_AMD64)
            .section(".text", 0x10, 0x6000_0020)
            .symbol(SymbolSpec::new("f", 0, 1, CLASS_EXTERNAL))
            .symbol(SymbolSpec::new("a_long_symbol_name", 4, 1, CLASS_EXTERNAL))
            .build();
        let (hdr, sections, strtab) = ObjectBuilder::layout(&buf);
        // The last symbol claims an aux record; the next 18 bytes are the
        // string table, not symbol data.
        let second = hdr.symbol_table_start() + SYMBOL_SIZE;
        buf[second + 17] = 1;

        let err = SymbolTable::decode(&buf, &hdr, &sections, &strtab, &mut NoDiagnostics)
            .unwrap_err();
        assert_eq!(
            err,
            Error::OutOfRangeIndex {
                kind: IndexKind::Symbol,
                index: 2,
                limit: 2,
                offset: second,
            }
        );
    }

    #[test]
    fn function_type_and_class_names() {
        let mut s = sym("f", 0, CLASS_EXTERNAL);
        s.sym_type = TYPE_FUNCTION;
        assert!(s.is_function());
        assert!(!s.is_label());
        assert_eq!(storage_class_name(CLASS_LABEL), Some("LABEL"));
        assert_eq!(storage_class_name(200), None);
    }
}
