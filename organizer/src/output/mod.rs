//! Rendering of organized categories.
//!
//! - [`render_csv`]: one table, header first, categories separated by a blank line
//! - [`render_json`]: pretty JSON array of `{category, rows}`

use crate::error::OutputResult;
use crate::models::CategoryRows;

/// Render categories as a single CSV table.
///
/// `columns` fixes the header and the cell order of every row; a cell missing
/// from a row is written empty. Categories are separated by one blank line.
pub fn render_csv<S: AsRef<str>>(
    columns: &[S],
    categories: &[CategoryRows],
    delimiter: u8,
) -> OutputResult<String> {
    let header = [columns.iter().map(|c| c.as_ref().to_string()).collect::<Vec<_>>()];
    let mut out = write_records(&header, delimiter)?;

    for (i, category) in categories.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let records: Vec<Vec<String>> = category
            .rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.value_or_empty(c.as_ref()).to_string())
                    .collect()
            })
            .collect();
        out.push_str(&write_records(&records, delimiter)?);
    }

    Ok(out)
}

fn write_records(records: &[Vec<String>], delimiter: u8) -> OutputResult<String> {
    let mut out = String::new();
    for record in records {
        // The csv writer quotes a lone empty field as `""`; write it as an empty line.
        if let [only] = record.as_slice() {
            if only.is_empty() {
                out.push('\n');
                continue;
            }
        }
        out.push_str(&write_record(record, delimiter)?);
    }
    Ok(out)
}

fn write_record(record: &[String], delimiter: u8) -> OutputResult<String> {
    let mut bytes = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_writer(&mut bytes);
        writer.write_record(record)?;
        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(String::from_utf8(bytes)?)
}

/// Render categories as pretty-printed JSON.
pub fn render_json(categories: &[CategoryRows]) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(categories)?)
}
