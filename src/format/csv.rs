//! Minimal RFC 4180 CSV reading and writing.
//!
//! Fields containing a comma, double quote, CR or LF are quoted and inner
//! quotes are doubled. The reader accepts quoted fields spanning several
//! lines and both LF and CRLF record terminators.

use std::io::{self, Write};

/// One parsed CSV record with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub line: usize,
    pub fields: Vec<String>,
}

impl CsvRecord {
    /// A record produced by an empty line.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields.len() == 1 && self.fields[0].is_empty()
    }
}

/// Parse error with the line where it was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvParseError {
    pub line: usize,
    pub reason: String,
}

const BOM: char = '\u{feff}';

/// Parse CSV text into records. A leading UTF-8 BOM is ignored.
///
/// # Errors
///
/// Returns an error for an unterminated quoted field or for characters
/// directly after a closing quote.
pub fn parse(input: &str) -> Result<Vec<CsvRecord>, CsvParseError> {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut line = 1;
    let mut record_line = 1;
    let mut in_quotes = false;
    let mut after_quote = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => {
                    in_quotes = false;
                    after_quote = true;
                }
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            ',' => {
                fields.push(std::mem::take(&mut field));
                after_quote = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                records.push(CsvRecord {
                    line: record_line,
                    fields: std::mem::take(&mut fields),
                });
                after_quote = false;
                line += 1;
                record_line = line;
            }
            '"' if field.is_empty() && !after_quote => in_quotes = true,
            _ if after_quote => {
                return Err(CsvParseError {
                    line,
                    reason: format!("unexpected character {c:?} after closing quote"),
                });
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CsvParseError {
            line: record_line,
            reason: "unterminated quoted field".to_string(),
        });
    }

    // Final record without a trailing newline.
    if !field.is_empty() || !fields.is_empty() || after_quote {
        fields.push(field);
        records.push(CsvRecord {
            line: record_line,
            fields,
        });
    }

    Ok(records)
}

/// Quote a field if it needs it. A leading BOM is quoted so the reader
/// does not drop it.
#[must_use]
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) || field.starts_with(BOM) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write one record followed by `\n`.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_record<W, I, S>(writer: &mut W, fields: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let line = fields
        .into_iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{line}")
}
