//! Line-oriented command session over a document.
//!
//! Commands use the vocabulary of a spreadsheet `:` prompt. Rows are 1-based
//! numbers, columns are letters and cells are A1 references.

use crate::error::{CommandError, Result};
use crate::render::write_table;
use minisheet_core::{Axis, CellRef, Document};
use std::io::Write;
use std::path::Path;

/// Whether the session should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub const HELP: &str = "\
Commands:
  set CELL TEXT   Set cell text (formulas start with =)
  clear CELL      Clear a cell
  get CELL        Print the evaluated value of a cell
  raw CELL        Print the raw text of a cell
  ir [ROW]        Insert a row before ROW (default: append)
  dr ROW          Delete a row
  ic [COL]        Insert a column before COL (default: append)
  dc COL          Delete a column
  dupr ROW        Duplicate a row below itself
  dupc COL        Duplicate a column right of itself
  fill CELL       Fill a formula down every row
  fillr CELL      Fill a formula across every column
  undo, u         Undo the last change
  redo            Redo the last undone change
  w [PATH]        Save (to PATH, which becomes the current file)
  e, open PATH    Load a CSV file
  filter COL TEXT Show only rows whose COL text contains TEXT
  unfilter        Show every row again
  print           Print the evaluated (filtered) sheet
  q               Stop processing commands";

pub struct Session<W: Write> {
    pub doc: Document,
    out: W,
    failures: usize,
}

impl<W: Write> Session<W> {
    pub fn new(doc: Document, out: W) -> Self {
        Session {
            doc,
            out,
            failures: 0,
        }
    }

    /// Number of commands that reported an error so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Run every line of `script`, reporting errors on stderr.
    pub fn run_script(&mut self, script: &str) -> Flow {
        for (idx, line) in script.lines().enumerate() {
            if self.run_line(line, idx + 1) == Flow::Quit {
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Run one line, reporting an error on stderr instead of returning it.
    pub fn run_line(&mut self, line: &str, line_no: usize) -> Flow {
        match self.execute(line) {
            Ok(flow) => flow,
            Err(err) => {
                self.failures += 1;
                eprintln!("Error (line {}): {}", line_no, err);
                Flow::Continue
            }
        }
    }

    /// Execute one command line. Blank lines and `#` comments do nothing.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let (command, args) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, Some(rest.trim()).filter(|s| !s.is_empty())),
            None => (line, None),
        };
        tracing::debug!(command, ?args, "execute");

        match command {
            "q" => return Ok(Flow::Quit),
            "set" => {
                let args = args.ok_or(CommandError::Usage("set CELL TEXT"))?;
                let (cell, text) = args
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("set CELL TEXT"))?;
                let cell_ref = parse_cell(cell)?;
                if !self.doc.set_cell(cell_ref, text.trim_start()) {
                    return Err(CommandError::OutOfRange(cell_ref.to_string()));
                }
            }
            "clear" => {
                let cell_ref = parse_cell(args.ok_or(CommandError::Usage("clear CELL"))?)?;
                if !self.doc.clear_cell(cell_ref) {
                    return Err(CommandError::OutOfRange(cell_ref.to_string()));
                }
            }
            "get" => {
                let cell_ref = parse_cell(args.ok_or(CommandError::Usage("get CELL"))?)?;
                let display = self.doc.cell_display(&cell_ref);
                writeln!(self.out, "{}", display)?;
            }
            "raw" => {
                let cell_ref = parse_cell(args.ok_or(CommandError::Usage("raw CELL"))?)?;
                let raw = self.doc.cell_raw(&cell_ref);
                writeln!(self.out, "{}", raw)?;
            }
            "ir" => {
                let row = match args {
                    Some(arg) => parse_row(arg)?,
                    None => self.doc.grid.nrows(),
                };
                ensure(self.doc.insert_row(row), || format!("Row {}", row + 1))?;
            }
            "dr" => {
                let row = parse_row(args.ok_or(CommandError::Usage("dr ROW"))?)?;
                ensure(self.doc.delete_row(row), || format!("Row {}", row + 1))?;
            }
            "ic" => {
                let col = match args {
                    Some(arg) => parse_col(arg)?,
                    None => self.doc.grid.ncols(),
                };
                ensure(self.doc.insert_col(col), || column_name(col))?;
            }
            "dc" => {
                let col = parse_col(args.ok_or(CommandError::Usage("dc COL"))?)?;
                ensure(self.doc.delete_col(col), || column_name(col))?;
            }
            "dupr" => {
                let row = parse_row(args.ok_or(CommandError::Usage("dupr ROW"))?)?;
                ensure(self.doc.duplicate_row(row), || format!("Row {}", row + 1))?;
            }
            "dupc" => {
                let col = parse_col(args.ok_or(CommandError::Usage("dupc COL"))?)?;
                ensure(self.doc.duplicate_col(col), || column_name(col))?;
            }
            "fill" | "fillr" => {
                let usage = if command == "fill" { "fill CELL" } else { "fillr CELL" };
                let cell_ref = parse_cell(args.ok_or(CommandError::Usage(usage))?)?;
                let axis = if command == "fill" {
                    Axis::Vertical
                } else {
                    Axis::Horizontal
                };
                if self.doc.propagate_formula(cell_ref, axis) == 0
                    && !self.doc.cell_raw(&cell_ref).starts_with('=')
                {
                    return Err(CommandError::NotFormula(cell_ref.to_string()));
                }
            }
            "undo" | "u" => {
                if !self.doc.undo() {
                    return Err(CommandError::NothingTo("undo"));
                }
            }
            "redo" => {
                if !self.doc.redo() {
                    return Err(CommandError::NothingTo("redo"));
                }
            }
            "w" | "save" => {
                let path = match args {
                    Some(path) => self.doc.save_as(Path::new(path))?,
                    None => self.doc.save_file()?,
                };
                tracing::info!(path = %path.display(), "saved");
            }
            "e" | "open" => {
                let path = args.ok_or(CommandError::Usage("e PATH"))?;
                self.doc.load_file(Path::new(path))?;
            }
            "filter" => {
                let args = args.ok_or(CommandError::Usage("filter COL TEXT"))?;
                let (col, text) = args
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("filter COL TEXT"))?;
                let col = parse_col(col)?;
                let text = text.trim_start();
                ensure(self.doc.set_filter(col, text), || column_name(col))?;
                tracing::info!(col, text, shown = self.doc.visible_rows().len(), "filter");
            }
            "unfilter" => {
                if !self.doc.clear_filter() {
                    return Err(CommandError::NothingTo("unfilter"));
                }
            }
            "print" => write_table(&mut self.out, &self.doc)?,
            "help" => writeln!(self.out, "{}", HELP)?,
            other => return Err(CommandError::Unknown(other.to_string())),
        }
        Ok(Flow::Continue)
    }
}

fn ensure(done: bool, what: impl FnOnce() -> String) -> Result<()> {
    if done {
        Ok(())
    } else {
        Err(CommandError::OutOfRange(what()))
    }
}

fn column_name(col: usize) -> String {
    format!("Column {}", CellRef::col_to_letters(col))
}

fn parse_cell(arg: &str) -> Result<CellRef> {
    CellRef::from_str(arg).ok_or_else(|| CommandError::InvalidCell(arg.to_string()))
}

/// Parse a 1-based row number into a row index.
fn parse_row(arg: &str) -> Result<usize> {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CommandError::InvalidRow(arg.to_string()))
}

fn parse_col(arg: &str) -> Result<usize> {
    CellRef::letters_to_col(arg).ok_or_else(|| CommandError::InvalidColumn(arg.to_string()))
}
