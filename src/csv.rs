use std::io::{self, Write};

/// Row terminator used by the CSV export
pub const LINE_TERMINATOR: &str = "\r\n";

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single comma-separated row, quoting only where needed.
pub fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { w.write_all(b",")?; } else { first = false; }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(LINE_TERMINATOR.as_bytes())
}
