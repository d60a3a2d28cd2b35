//! Line-delimited JSON plumbing shared by every stage
//!
//! Input lines are decoded lossily as UTF-8, trimmed, and blank lines are skipped
//! without being counted.

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A non-blank, trimmed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based position among non-blank lines
    pub number: usize,
    pub text: String,
}

/// Iterator over the non-blank lines of a reader
pub struct JsonlLines<R> {
    reader: R,
    buf: Vec<u8>,
    number: usize,
}

impl<R: BufRead> JsonlLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            number: 0,
        }
    }
}

impl<R: BufRead> Iterator for JsonlLines<R> {
    type Item = std::io::Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    let decoded = String::from_utf8_lossy(&self.buf);
                    let trimmed = trim_line(&decoded);
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.number += 1;
                    return Some(Ok(Line {
                        number: self.number,
                        text: trimmed.to_string(),
                    }));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Trim whitespace and a stray byte-order mark
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Open `path` for line iteration
pub fn open_lines(path: &Path) -> Result<JsonlLines<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(JsonlLines::new(BufReader::new(file)))
}

/// Create (truncate) `path`, creating missing parent directories
pub fn create_output(path: &Path) -> Result<BufWriter<File>> {
    ensure_parent(path)?;
    Ok(BufWriter::new(File::create(path)?))
}

/// Open `path` for appending, creating it and its parent directories if needed
pub fn append_output(path: &Path) -> Result<BufWriter<File>> {
    ensure_parent(path)?;
    let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BufWriter::new(file))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Serialize `record` as one compact JSON line
pub fn write_record<W: Write, T: Serialize>(out: &mut W, record: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Parse one JSON line, accepting lone UTF-16 surrogate escapes such as `\ud800`.
///
/// A Rust string cannot hold a lone surrogate, so each one decodes to U+FFFD.
pub fn parse_value(text: &str) -> serde_json::Result<Value> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(e) => match replace_lone_surrogates(text) {
            Some(repaired) => serde_json::from_str(&repaired).map_err(|_| e),
            None => Err(e),
        },
    }
}

/// Rewrite unpaired `\uD800`-`\uDFFF` escapes as `\ufffd`; `None` when there are none
fn replace_lone_surrogates(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let Some(unit) = (bytes.get(i + 1) == Some(&b'u')).then(|| hex_unit(bytes, i + 2)).flatten() else {
            // any other escape, `\\` included, is two bytes long
            i += 2;
            continue;
        };
        match unit {
            0xD800..=0xDBFF => {
                let paired = bytes.get(i + 6) == Some(&b'\\')
                    && bytes.get(i + 7) == Some(&b'u')
                    && hex_unit(bytes, i + 8).is_some_and(|low| (0xDC00..=0xDFFF).contains(&low));
                if paired {
                    i += 12;
                    continue;
                }
            }
            0xDC00..=0xDFFF => {}
            _ => {
                i += 6;
                continue;
            }
        }
        out.push_str(&text[copied..i]);
        out.push_str("\\ufffd");
        i += 6;
        copied = i;
    }

    if copied == 0 {
        return None;
    }
    out.push_str(&text[copied..]);
    Some(out)
}

fn hex_unit(bytes: &[u8], start: usize) -> Option<u16> {
    let digits = std::str::from_utf8(bytes.get(start..start + 4)?).ok()?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}
