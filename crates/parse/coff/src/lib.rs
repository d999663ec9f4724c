//! Decoder for 32-bit little-endian COFF/PE object files.
//!
//! Turns the raw bytes of one object file into owned records: file header,
//! optional header, section headers, the symbol table (grouped by section,
//! with inferred symbol sizes) and per-section relocations. No I/O happens
//! here; callers hand in a fully read buffer.
//!
//! # Usage
//!
//! ```
//! use coffkit_coff::ObjectFile;
//!
//! fn list_functions(data: &[u8]) {
//!     let obj = ObjectFile::decode(data).expect("valid object");
//!     for (index, section) in obj.sections().iter().enumerate() {
//!         for sym in obj.symbols(index).unwrap_or_default() {
//!             println!("{} {}+{:#x} ({} bytes)", section.name, sym.name, sym.value, sym.inferred_size);
//!         }
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod cursor;
pub mod diag;
pub mod error;
pub mod header;
pub mod object;
pub mod reloc;
pub mod section;
pub mod strtab;
pub mod symbol;

#[cfg(test)]
mod testutil;

pub use cursor::ByteCursor;
pub use diag::{
    Diagnostic, DiagnosticKind, Diagnostics, Exclusion, FnSink, Level, NoDiagnostics, RelocSkip,
};
pub use error::{DecodeError, Error, IndexKind};
pub use header::{
    FILE_HEADER_SIZE, FileFlags, FileHeader, MACHINE_AMD64, MACHINE_ARM, MACHINE_ARM64,
    MACHINE_ARMNT, MACHINE_I386, MACHINE_IA64, MACHINE_UNKNOWN, OPTIONAL_HEADER_SIZE,
    OptionalHeader, SYMBOL_SIZE, machine_name,
};
pub use object::{Decoder, ObjectFile};
pub use reloc::{
    RELOCATION_SIZE, Relocation, RelocationTable, reloc_type_name, retained_size,
};
pub use section::{SECTION_HEADER_SIZE, SectionFlags, SectionHeader};
pub use strtab::StringTable;
pub use symbol::{
    CLASS_EXTERNAL, CLASS_FILE, CLASS_LABEL, CLASS_SECTION, CLASS_STATIC, RawSymbol, Symbol,
    SymbolTable, infer_sizes, storage_class_name,
};
