//! gridcalc - a line-oriented REPL over the sheet evaluation engine.
//!
//! Commands:
//!   A1 = 1+2       set a cell's content
//!   A1             print a cell's value
//!   :clear A1      clear a cell
//!   :print         print the sheet's values
//!   :text          print the sheet's raw text
//!   :quit          exit (EOF does the same)

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use gridcalc_core::{Position, Sheet};

fn main() -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut sheet = Sheet::new();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        let bytes_read = stdin.lock().read_line(&mut line)?;
        if bytes_read == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Err(err) = run_command(&mut sheet, line, &mut stdout) {
            eprintln!("error: {err}");
        }
    }

    Ok(())
}

fn run_command(sheet: &mut Sheet, line: &str, out: &mut impl Write) -> Result<()> {
    if line == ":quit" {
        std::process::exit(0);
    }
    if line == ":print" {
        sheet.print_values(out).context("writing sheet values")?;
        return Ok(());
    }
    if line == ":text" {
        sheet.print_texts(out).context("writing sheet text")?;
        return Ok(());
    }
    if let Some(rest) = line.strip_prefix(":clear ") {
        let pos = parse_position(rest.trim())?;
        sheet.clear_cell(pos)?;
        return Ok(());
    }

    if let Some((cell, text)) = line.split_once('=') {
        let pos = parse_position(cell.trim())?;
        sheet.set_cell(pos, text.trim())?;
        return Ok(());
    }

    let pos = parse_position(line)?;
    let value = sheet.get_value(pos)?;
    writeln!(out, "{value}")?;
    Ok(())
}

fn parse_position(text: &str) -> Result<Position> {
    Position::parse_a1(text).with_context(|| format!("'{text}' is not a valid cell reference"))
}
