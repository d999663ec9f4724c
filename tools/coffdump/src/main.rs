//! coffdump: print the contents of COFF object files.
//!
//! Every file named on the command line is decoded independently. A file
//! that fails to read or decode is reported on stderr and the remaining
//! files are still processed; the exit status is non-zero if any failed.

mod cli;
mod render;
mod verbose;

use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use coffkit_coff::{Decoder, ObjectFile};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut failed = 0usize;
    for path in cli.command.files() {
        if let Err(err) = dump_file(&cli, path, &mut out) {
            out.flush()?;
            eprintln!("error: {err:#}");
            failed += 1;
        }
    }
    out.flush()?;

    if failed > 0 {
        bail!("{failed} of {} file(s) could not be dumped", cli.command.files().len());
    }
    Ok(())
}

/// Read, decode and print one file.
fn dump_file(cli: &cli::Cli, path: &Path, out: &mut impl Write) -> Result<()> {
    let name = path.display().to_string();
    let data = std::fs::read(path).with_context(|| format!("{name}: failed to read"))?;

    let mut sink = verbose::StderrDiagnostics::new(&name);
    let obj = Decoder::new()
        .source_name(name.as_str())
        .diagnostics(&mut sink)
        .decode(&data)?;
    verbose::veprintln!(
        "{name}: {} bytes, {} sections, {} symbol records",
        data.len(),
        obj.sections().len(),
        obj.symbol_table().raw().len(),
    );

    if cli.json {
        let value = render::json_value(&cli.command, &name, &obj);
        serde_json::to_writer(&mut *out, &value)?;
        writeln!(out)?;
    } else {
        render_text(&cli.command, out, &name, &obj)?;
    }
    Ok(())
}

fn render_text(
    command: &cli::Command,
    out: &mut impl Write,
    name: &str,
    obj: &ObjectFile,
) -> io::Result<()> {
    use cli::Command;
    match command {
        Command::Header(_) => render::header(out, name, obj),
        Command::Optheader(_) => render::optional_header(out, name, obj),
        Command::Sections(_) => render::sections(out, name, obj),
        Command::Symbols(_) => render::symbols(out, name, obj),
        Command::Relocs(_) => render::relocations(out, name, obj),
    }
}
