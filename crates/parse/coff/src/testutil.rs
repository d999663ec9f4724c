//! Builders for hand-assembled object files used across the unit tests.

use crate::diag::NoDiagnostics;
use crate::header::{
    FILE_HEADER_SIZE, FileHeader, OPTIONAL_HEADER_SIZE, SYMBOL_SIZE,
};
use crate::section::{SECTION_HEADER_SIZE, SectionHeader};
use crate::strtab::StringTable;
use crate::reloc::RELOCATION_SIZE;

/// Build a bare 20-byte file header.
pub(crate) fn file_header(
    machine: u16,
    section_count: u16,
    symtab: i32,
    symbol_count: i32,
    optional_size: u16,
) -> Vec<u8> {
    let mut b = vec![0u8; FILE_HEADER_SIZE];
    b[0..2].copy_from_slice(&machine.to_le_bytes());
    b[2..4].copy_from_slice(&section_count.to_le_bytes());
    b[4..8].copy_from_slice(&0x6000_0000i32.to_le_bytes());
    b[8..12].copy_from_slice(&symtab.to_le_bytes());
    b[12..16].copy_from_slice(&symbol_count.to_le_bytes());
    b[16..18].copy_from_slice(&optional_size.to_le_bytes());
    b
}

/// Build a bare 40-byte section header.
pub(crate) fn section_header(
    name: &[u8; 8],
    size: i32,
    data_offset: i32,
    reloc_offset: i32,
    reloc_count: u16,
    flags: i32,
) -> Vec<u8> {
    let mut b = vec![0u8; SECTION_HEADER_SIZE];
    b[0..8].copy_from_slice(name);
    b[16..20].copy_from_slice(&size.to_le_bytes());
    b[20..24].copy_from_slice(&data_offset.to_le_bytes());
    b[24..28].copy_from_slice(&reloc_offset.to_le_bytes());
    b[32..34].copy_from_slice(&reloc_count.to_le_bytes());
    b[36..40].copy_from_slice(&flags.to_le_bytes());
    b
}

/// One symbol to place in a built object.
pub(crate) struct SymbolSpec {
    name: String,
    value: i32,
    section: i16,
    class: u8,
    sym_type: u16,
    aux: Vec<u8>,
}

impl SymbolSpec {
    pub(crate) fn new(name: &str, value: i32, section: i16, class: u8) -> Self {
        Self {
            name: name.into(),
            value,
            section,
            class,
            sym_type: 0,
            aux: Vec::new(),
        }
    }

    /// Attach auxiliary bytes, zero-padded to a whole number of records.
    pub(crate) fn aux(mut self, bytes: &[u8]) -> Self {
        self.aux = bytes.to_vec();
        let records = bytes.len().div_ceil(SYMBOL_SIZE).max(1);
        self.aux.resize(records * SYMBOL_SIZE, 0);
        self
    }

    pub(crate) fn sym_type(mut self, sym_type: u16) -> Self {
        self.sym_type = sym_type;
        self
    }
}

struct SectionSpec {
    name: String,
    size: i32,
    flags: i32,
    relocs: Vec<(u32, u32, u16)>,
}

/// Assembles a complete object file:
/// header, optional header, section headers, section data, relocation
/// arrays, symbol table, string table.
pub(crate) struct ObjectBuilder {
    machine: u16,
    optional: bool,
    sections: Vec<SectionSpec>,
    symbols: Vec<SymbolSpec>,
}

impl ObjectBuilder {
    pub(crate) fn new(machine: u16) -> Self {
        Self {
            machine,
            optional: false,
            sections: Vec::new(),
            symbols: Vec::new(),
        }
    }

    pub(crate) fn with_optional_header(mut self) -> Self {
        self.optional = true;
        self
    }

    pub(crate) fn section(mut self, name: &str, size: i32, flags: i32) -> Self {
        self.sections.push(SectionSpec {
            name: name.into(),
            size,
            flags,
            relocs: Vec::new(),
        });
        self
    }

    pub(crate) fn symbol(mut self, spec: SymbolSpec) -> Self {
        self.symbols.push(spec);
        self
    }

    /// Add a relocation to the 0-based section `section`.
    pub(crate) fn reloc(mut self, section: usize, vaddr: u32, symbol: u32, ty: u16) -> Self {
        self.sections[section].relocs.push((vaddr, symbol, ty));
        self
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    pub(crate) fn build(self) -> Vec<u8> {
        let mut strings: Vec<u8> = Vec::new();
        let mut intern = |name: &str| -> u32 {
            let off = 4 + strings.len() as u32;
            strings.extend_from_slice(name.as_bytes());
            strings.push(0);
            off
        };

        let optional_size = if self.optional { OPTIONAL_HEADER_SIZE } else { 0 };
        let headers_end =
            FILE_HEADER_SIZE + optional_size + self.sections.len() * SECTION_HEADER_SIZE;

        // Section data, then relocation arrays.
        let mut cursor = headers_end;
        let mut data_offsets = Vec::new();
        for sec in &self.sections {
            data_offsets.push(cursor);
            cursor += sec.size.max(0) as usize;
        }
        let mut reloc_offsets = Vec::new();
        for sec in &self.sections {
            if sec.relocs.is_empty() {
                reloc_offsets.push(0);
            } else {
                reloc_offsets.push(cursor);
                cursor += sec.relocs.len() * RELOCATION_SIZE;
            }
        }
        let symtab = cursor;
        let record_count: usize = self
            .symbols
            .iter()
            .map(|s| 1 + s.aux.len() / SYMBOL_SIZE)
            .sum();

        let mut buf = file_header(
            self.machine,
            self.sections.len() as u16,
            symtab as i32,
            record_count as i32,
            optional_size as u16,
        );

        if self.optional {
            let mut opt = vec![0u8; OPTIONAL_HEADER_SIZE];
            opt[0..2].copy_from_slice(&0x010bi16.to_le_bytes());
            opt[16..20].copy_from_slice(&0x1000i32.to_le_bytes());
            buf.extend_from_slice(&opt);
        }

        for (i, sec) in self.sections.iter().enumerate() {
            let mut name = [0u8; 8];
            if sec.name.len() > 8 {
                let off = intern(&sec.name);
                let long = format!("/{off}");
                name[..long.len()].copy_from_slice(long.as_bytes());
            } else {
                name[..sec.name.len()].copy_from_slice(sec.name.as_bytes());
            }
            buf.extend_from_slice(&section_header(
                &name,
                sec.size,
                data_offsets[i] as i32,
                reloc_offsets[i] as i32,
                sec.relocs.len() as u16,
                sec.flags,
            ));
        }

        for sec in &self.sections {
            buf.extend(core::iter::repeat_n(0x90u8, sec.size.max(0) as usize));
        }
        for sec in &self.sections {
            for &(vaddr, symbol, ty) in &sec.relocs {
                buf.extend_from_slice(&vaddr.to_le_bytes());
                buf.extend_from_slice(&symbol.to_le_bytes());
                buf.extend_from_slice(&ty.to_le_bytes());
            }
        }

        for sym in &self.symbols {
            let mut rec = [0u8; SYMBOL_SIZE];
            if sym.name.len() > 8 {
                let off = intern(&sym.name);
                rec[4..8].copy_from_slice(&off.to_le_bytes());
            } else {
                rec[..sym.name.len()].copy_from_slice(sym.name.as_bytes());
            }
            rec[8..12].copy_from_slice(&sym.value.to_le_bytes());
            rec[12..14].copy_from_slice(&sym.section.to_le_bytes());
            rec[14..16].copy_from_slice(&sym.sym_type.to_le_bytes());
            rec[16] = sym.class;
            rec[17] = (sym.aux.len() / SYMBOL_SIZE) as u8;
            buf.extend_from_slice(&rec);
            buf.extend_from_slice(&sym.aux);
        }

        buf.extend_from_slice(&(4 + strings.len() as u32).to_le_bytes());
        buf.extend_from_slice(&strings);
        buf
    }

    /// Decode the pieces that symbol and relocation decoding depend on.
    pub(crate) fn layout(buf: &[u8]) -> (FileHeader, Vec<SectionHeader>, StringTable) {
        let hdr = FileHeader::decode(buf, 0).expect("header");
        let sections = (0..usize::from(hdr.section_count))
            .map(|i| {
                SectionHeader::decode(buf, hdr.section_table_offset() + i * SECTION_HEADER_SIZE)
                    .expect("section")
            })
            .collect();
        let strtab = StringTable::at(
            buf,
            hdr.string_table_offset().expect("strtab offset"),
            &mut NoDiagnostics,
        )
        .expect("strtab");
        (hdr, sections, strtab)
    }
}
