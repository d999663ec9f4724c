//! Text and JSON rendering of decoded object files.

use std::io::{self, Write};

use coffkit_coff::{
    ObjectFile, Relocation, SectionHeader, Symbol, machine_name, reloc_type_name,
    storage_class_name,
};
use serde::Serialize;
use serde_json::json;

/// Joins the names of the set flags with `|`, or `-` when none are set.
fn join_names<'a, T>(names: impl Iterator<Item = (&'a str, T)>) -> String {
    let joined: Vec<&str> = names.map(|(name, _)| name).collect();
    if joined.is_empty() {
        "-".into()
    } else {
        joined.join("|")
    }
}

fn class_name(class: u8) -> String {
    storage_class_name(class).map_or_else(|| format!("CLASS({class})"), str::to_owned)
}

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// `header` subcommand.
pub fn header(out: &mut impl Write, file: &str, obj: &ObjectFile) -> io::Result<()> {
    let hdr = obj.header();
    #[expect(clippy::cast_sign_loss, reason = "timestamps are stored as raw u32 seconds")]
    let secs = hdr.timestamp as u32;
    writeln!(
        out,
        "{file} header machine={}({:#06x}) sections={} timestamp={:#010x}({secs}) symtab={:#x} symbols={} optsize={} flags={:#06x}[{}]",
        machine_name(hdr.machine).unwrap_or("?"),
        hdr.machine,
        hdr.section_count,
        secs,
        hdr.symbol_table_offset,
        hdr.symbol_count,
        hdr.optional_header_size,
        hdr.flags,
        join_names(hdr.characteristics().iter_names()),
    )
}

/// `optheader` subcommand.
pub fn optional_header(out: &mut impl Write, file: &str, obj: &ObjectFile) -> io::Result<()> {
    match obj.optional_header() {
        None => writeln!(out, "[{file}] no optional header"),
        Some(opt) => writeln!(
            out,
            "[{file}] optheader magic={:#06x} version={} text={:#x} data={:#x} bss={:#x} entry={:#010x} text_start={:#010x} data_start={:#010x}",
            opt.magic,
            opt.version,
            opt.text_size,
            opt.data_size,
            opt.bss_size,
            opt.entry_point,
            opt.text_start,
            opt.data_start,
        ),
    }
}

fn section_line(index: usize, sec: &SectionHeader) -> String {
    format!(
        "[{}] {:<8} vaddr={:#010x} size={:#x} data={:#x} relocs={}@{:#x} lines={} flags={:#010x}[{}]",
        index + 1,
        sec.name,
        sec.virt_addr,
        sec.size,
        sec.data_offset,
        sec.reloc_count,
        sec.reloc_offset,
        sec.line_num_count,
        sec.flags,
        join_names(sec.characteristics().iter_names()),
    )
}

/// `sections` subcommand.
pub fn sections(out: &mut impl Write, file: &str, obj: &ObjectFile) -> io::Result<()> {
    for (index, sec) in obj.sections().iter().enumerate() {
        writeln!(out, "[{file}].{}", section_line(index, sec))?;
    }
    Ok(())
}

fn symbol_line(n: usize, sym: &Symbol) -> String {
    format!(
        "    [{n}] {:#010x} size={:#x} {} {}",
        sym.value,
        sym.inferred_size,
        class_name(sym.storage_class),
        sym.name,
    )
}

/// `symbols` subcommand: each section's symbols by value, then by name.
pub fn symbols(out: &mut impl Write, file: &str, obj: &ObjectFile) -> io::Result<()> {
    for (index, sec) in obj.sections().iter().enumerate() {
        let by_value = obj.symbols(index).unwrap_or_default();

        writeln!(out, "[{file}].[{}] {} value", index + 1, sec.name)?;
        for (n, sym) in by_value.iter().enumerate() {
            writeln!(out, "{}", symbol_line(n, sym))?;
        }

        let mut by_name: Vec<&Symbol> = by_value.iter().collect();
        by_name.sort_by(|a, b| a.name.cmp(&b.name));
        writeln!(out, "[{file}].[{}] {} name", index + 1, sec.name)?;
        for (n, sym) in by_name.into_iter().enumerate() {
            writeln!(out, "{}", symbol_line(n, sym))?;
        }
    }
    Ok(())
}

fn reloc_line(n: usize, machine: u16, rel: &Relocation) -> String {
    let ty = reloc_type_name(machine, rel.reloc_type)
        .map_or_else(|| format!("TYPE({:#x})", rel.reloc_type), str::to_owned);
    format!(
        "    [{n}] {:#010x} {ty} size={} {}",
        rel.virtual_addr, rel.size, rel.symbol_name,
    )
}

/// `relocs` subcommand.
pub fn relocations(out: &mut impl Write, file: &str, obj: &ObjectFile) -> io::Result<()> {
    let machine = obj.header().machine;
    for (index, sec) in obj.sections().iter().enumerate() {
        let relocs = obj.relocations(index).unwrap_or_default();
        if relocs.is_empty() {
            continue;
        }
        writeln!(out, "[{file}].[{}] {} relocs", index + 1, sec.name)?;
        for (n, rel) in relocs.iter().enumerate() {
            writeln!(out, "{}", reloc_line(n, machine, rel))?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SectionEntries<'a, T> {
    index: usize,
    name: &'a str,
    entries: &'a [T],
}

fn per_section<'a, T>(
    obj: &'a ObjectFile,
    get: impl Fn(usize) -> Option<&'a [T]>,
) -> Vec<SectionEntries<'a, T>> {
    obj.sections()
        .iter()
        .enumerate()
        .map(|(index, sec)| SectionEntries {
            index: index + 1,
            name: &sec.name,
            entries: get(index).unwrap_or_default(),
        })
        .collect()
}

/// The JSON document for one file and subcommand.
pub fn json_value(command: &crate::cli::Command, file: &str, obj: &ObjectFile) -> serde_json::Value {
    use crate::cli::Command;
    match command {
        Command::Header(_) => json!({ "file": file, "header": obj.header() }),
        Command::Optheader(_) => json!({ "file": file, "optional_header": obj.optional_header() }),
        Command::Sections(_) => json!({ "file": file, "sections": obj.sections() }),
        Command::Symbols(_) => {
            json!({ "file": file, "symbols": per_section(obj, |i| obj.symbols(i)) })
        }
        Command::Relocs(_) => {
            json!({ "file": file, "relocations": per_section(obj, |i| obj.relocations(i)) })
        }
    }
}
