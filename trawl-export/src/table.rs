//! Delimited text writing (CSV, TSV). Quotes only when a cell needs it.

use std::io::{self, Write};

fn needs_quotes(cell: &str, sep: char) -> bool {
    cell.contains(sep) || cell.contains('"') || cell.contains('\n') || cell.contains('\r')
}

/// Write a single row to any writer, newline-terminated.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first {
            write!(w, "{}", sep)?;
        } else {
            first = false;
        }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header line followed by every row.
pub fn write_table<W, H, R>(mut w: W, header: &[H], rows: R, sep: char) -> io::Result<()>
where
    W: Write,
    H: AsRef<str>,
    R: IntoIterator<Item = Vec<String>>,
{
    write_row(&mut w, header, sep)?;
    for row in rows {
        write_row(&mut w, &row, sep)?;
    }
    w.flush()
}
