//! Output verbosity and the diagnostics sink that honours it.
//!
//! - **Quiet** (`-q`): errors only
//! - **Default**: warnings from the decoder
//! - **Verbose** (`-v`): informational diagnostics (excluded symbols, unknown machines)
//! - **Debug** (`-vv`): per-record detail (dropped relocations, skipped sections)

use std::sync::atomic::{AtomicU8, Ordering};

use coffkit_coff::{Diagnostic, Diagnostics, Level};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Default = 1,
    Verbose = 2,
    Debug = 3,
}

/// Global verbosity level, set once at startup.
static VERBOSITY: AtomicU8 = AtomicU8::new(1); // Default

/// Initialize the verbosity level for the current process.
pub fn init(quiet: bool, verbose: u8) {
    let level = if quiet {
        Verbosity::Quiet
    } else {
        match verbose {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Returns the current verbosity level.
pub fn verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        3 => Verbosity::Debug,
        _ => Verbosity::Default,
    }
}

/// Returns true if verbose output is enabled (`-v` or more).
pub fn is_verbose() -> bool {
    verbosity() >= Verbosity::Verbose
}

/// Print to stderr at verbose level and above.
///
/// Usage mirrors `eprintln!`. Standard output carries only the dump itself.
macro_rules! veprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use veprintln;

/// The lowest verbosity at which a diagnostic of `level` is shown.
fn threshold(level: Level) -> Verbosity {
    match level {
        Level::Warn => Verbosity::Default,
        Level::Info => Verbosity::Verbose,
        Level::Debug | Level::Trace => Verbosity::Debug,
    }
}

/// Prints decoder diagnostics to stderr, prefixed with the file name.
pub struct StderrDiagnostics<'a> {
    file: &'a str,
}

impl<'a> StderrDiagnostics<'a> {
    pub fn new(file: &'a str) -> Self {
        Self { file }
    }
}

impl Diagnostics for StderrDiagnostics<'_> {
    fn report(&mut self, diag: Diagnostic) {
        if verbosity() >= threshold(diag.level) {
            eprintln!("{}: {diag}", self.file);
        }
    }
}
