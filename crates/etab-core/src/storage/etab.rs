//! Reader and writer for the `.etab` grid format.
//!
//! One line per row, fields joined by `,`, each field the cell's display
//! text. Fields containing `,`, `"`, a line break or surrounding whitespace
//! are quoted with `""` escaping.

use crate::error::{EtabError, Result};
use etab_engine::engine::{Cell, CellRef, Grid};
use std::fs;
use std::path::Path;

/// Parse a `.etab` file into a grid
pub fn parse_etab(path: &Path) -> Result<Grid> {
    let content = fs::read_to_string(path)?;
    parse_etab_content(&content)
}

/// Parse `.etab` content from a string.
///
/// The grid gets one row per record and as many columns as the widest
/// record. Short records leave their trailing cells empty.
pub fn parse_etab_content(content: &str) -> Result<Grid> {
    let records = parse_records(content)?;
    let rows = records.len();
    let cols = records.iter().map(Vec::len).max().unwrap_or(0);
    let mut grid = Grid::new(rows, cols);

    for (row, fields) in records.into_iter().enumerate() {
        for (col, field) in fields.into_iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            grid.insert(CellRef::new(row, col), Cell::new_text(&field));
        }
    }

    Ok(grid)
}

/// Split content into records of fields. Quoted fields may span lines.
fn parse_records(content: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut field_was_quoted = false;
    let mut line = 1;
    let mut quote_line = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => {
                    if c == '\n' {
                        line += 1;
                    }
                    current.push(c);
                }
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                field_was_quoted = true;
                quote_line = line;
            }
            ',' => {
                fields.push(finish_field(&mut current, field_was_quoted));
                field_was_quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(finish_field(&mut current, field_was_quoted));
                field_was_quoted = false;
                records.push(std::mem::take(&mut fields));
                line += 1;
            }
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(EtabError::Parse {
            line: quote_line,
            message: "Unterminated quoted field".to_string(),
        });
    }

    // Last record without a trailing newline.
    if !current.is_empty() || field_was_quoted || !fields.is_empty() {
        fields.push(finish_field(&mut current, field_was_quoted));
        records.push(fields);
    }

    Ok(records)
}

fn finish_field(current: &mut String, quoted: bool) -> String {
    let field = std::mem::take(current);
    if quoted {
        field
    } else {
        field.trim().to_string()
    }
}

/// Write a grid to a `.etab` file
pub fn write_etab(path: &Path, grid: &Grid) -> Result<()> {
    let content = write_etab_content(grid);
    fs::write(path, content)?;
    Ok(())
}

/// Render a grid's display texts in `.etab` form.
pub fn write_etab_content(grid: &Grid) -> String {
    let mut out = String::new();
    for row in 0..grid.rows() {
        let fields: Vec<String> = (0..grid.cols())
            .map(|col| escape_field(&grid.display(&CellRef::new(row, col))))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Quote a field when it would not survive a read back unquoted.
fn escape_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r']) || field.trim() != field;
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
