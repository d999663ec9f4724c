//! Command-line interface definitions for coffdump.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Inspect COFF object files.
#[derive(Parser)]
#[command(name = "coffdump", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Show decode diagnostics (repeat for more detail).
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print only errors.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the file header.
    Header(Files),
    /// Print the optional header, if present.
    Optheader(Files),
    /// Print the section headers.
    Sections(Files),
    /// Print symbols per section, by value and by name.
    Symbols(Files),
    /// Print retained relocations per section.
    Relocs(Files),
}

/// Input files shared by every subcommand.
#[derive(Parser)]
pub struct Files {
    /// Object files to read.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl Command {
    /// The files named on the command line.
    pub fn files(&self) -> &[PathBuf] {
        match self {
            Self::Header(f)
            | Self::Optheader(f)
            | Self::Sections(f)
            | Self::Symbols(f)
            | Self::Relocs(f) => &f.files,
        }
    }
}
