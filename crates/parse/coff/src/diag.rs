//! Decode-time diagnostics.
//!
//! Conditions that do not abort a decode (a symbol left out of the per-section
//! listing, a relocation dropped by the machine filter) are reported to a
//! caller-supplied [`Diagnostics`] sink. The default sink, [`NoDiagnostics`],
//! discards everything; `Vec<Diagnostic>` collects, and [`FnSink`] wraps a
//! closure.

use alloc::vec::Vec;
use core::fmt;

/// Diagnostic severity, lower = more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum Level {
    /// Unexpected input that was tolerated.
    Warn = 2,
    /// Expected but noteworthy conditions.
    Info = 3,
    /// Per-record detail.
    Debug = 4,
    /// Very verbose, low-level tracing.
    Trace = 5,
}

impl Level {
    /// Returns the human-readable name (fixed-width for aligned output).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Warn => "WARN ",
            Self::Info => "INFO ",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }
}

/// Why a symbol was left out of the per-section listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Exclusion {
    /// The symbol carries auxiliary records.
    HasAux(u8),
    /// The section number is zero, negative or past the section table.
    SectionOutOfRange(i16),
}

/// Why a section has no relocation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum RelocSkip {
    /// `relocOffset` is zero.
    NoRelocations,
    /// The section does not contain code.
    NotCode,
    /// The section is a COMDAT section.
    Comdat,
}

/// A non-fatal condition found while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum DiagnosticKind {
    /// A symbol was decoded but not grouped under any section.
    SymbolExcluded {
        /// Index of the symbol in the raw symbol stream.
        raw_index: u32,
        /// Reason for exclusion.
        reason: Exclusion,
    },
    /// A section's relocations were not decoded.
    RelocationsSkipped {
        /// 0-based section index.
        section: usize,
        /// Reason for skipping.
        reason: RelocSkip,
    },
    /// A relocation was dropped by the machine-specific type filter.
    RelocationDropped {
        /// 0-based section index.
        section: usize,
        /// Position of the record within the section's relocation array.
        position: u32,
        /// Raw relocation type.
        reloc_type: u16,
    },
    /// No relocation filter exists for this machine, so none are retained.
    UnsupportedMachine(u16),
    /// The string table's length prefix is smaller than the prefix itself.
    ShortStringTable(u32),
    /// The file ends where the string table should start.
    MissingStringTable,
    /// A `/nnn` long section name could not be resolved.
    UnresolvedSectionName {
        /// 0-based section index.
        section: usize,
    },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SymbolExcluded { raw_index, reason } => match reason {
                Exclusion::HasAux(n) => {
                    write!(f, "symbol #{raw_index} has {n} aux record(s), not grouped")
                }
                Exclusion::SectionOutOfRange(s) => {
                    write!(f, "symbol #{raw_index} in section {s}, not grouped")
                }
            },
            Self::RelocationsSkipped { section, reason } => {
                let why = match reason {
                    RelocSkip::NoRelocations => "no relocation offset",
                    RelocSkip::NotCode => "not a code section",
                    RelocSkip::Comdat => "COMDAT section",
                };
                write!(f, "section {section}: relocations skipped ({why})")
            }
            Self::RelocationDropped {
                section,
                position,
                reloc_type,
            } => write!(
                f,
                "section {section}: relocation {position} of type {reloc_type:#x} dropped"
            ),
            Self::UnsupportedMachine(m) => {
                write!(f, "machine {m:#06x} has no relocation filter, relocations ignored")
            }
            Self::ShortStringTable(len) => {
                write!(f, "string table length {len} is shorter than its prefix, treated as empty")
            }
            Self::MissingStringTable => write!(f, "no string table present, treated as empty"),
            Self::UnresolvedSectionName { section } => {
                write!(f, "section {section}: long name not found in string table")
            }
        }
    }
}

/// A single diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    /// Severity.
    pub level: Level,
    /// Buffer offset of the record concerned.
    pub offset: usize,
    /// What happened.
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{:#08x}] {}", self.level.name(), self.offset, self.kind)
    }
}

/// Receiver for non-fatal decode diagnostics.
pub trait Diagnostics {
    /// Called once per diagnostic, in decode order.
    fn report(&mut self, diag: Diagnostic);
}

/// A sink that discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl Diagnostics for NoDiagnostics {
    fn report(&mut self, _diag: Diagnostic) {}
}

impl Diagnostics for Vec<Diagnostic> {
    fn report(&mut self, diag: Diagnostic) {
        self.push(diag);
    }
}

/// Adapts a closure into a [`Diagnostics`] sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(Diagnostic)> Diagnostics for FnSink<F> {
    fn report(&mut self, diag: Diagnostic) {
        (self.0)(diag);
    }
}

/// Shorthand for reporting from inside the decoders.
pub(crate) fn emit(
    sink: &mut dyn Diagnostics,
    level: Level,
    offset: usize,
    kind: DiagnosticKind,
) {
    sink.report(Diagnostic {
        level,
        offset,
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn levels_order_by_severity() {
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Trace);
        assert_eq!(Level::Debug.name().len(), Level::Info.name().len());
    }

    #[test]
    fn vec_and_closure_sinks_receive_reports() {
        let mut collected: Vec<Diagnostic> = Vec::new();
        emit(&mut collected, Level::Info, 0x40, DiagnosticKind::UnsupportedMachine(0x1c0));
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].offset, 0x40);

        let mut count = 0;
        let mut counter = FnSink(|_: Diagnostic| count += 1);
        emit(&mut counter, Level::Debug, 0, DiagnosticKind::ShortStringTable(0));
        assert_eq!(count, 1);
    }

    #[test]
    fn display_mentions_raw_index() {
        let d = Diagnostic {
            level: Level::Info,
            offset: 0x80,
            kind: DiagnosticKind::SymbolExcluded {
                raw_index: 7,
                reason: Exclusion::HasAux(1),
            },
        };
        let msg = format!("{d}");
        assert!(msg.starts_with("INFO "));
        assert!(msg.contains("#7"));
    }
}
