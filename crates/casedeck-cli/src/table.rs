use anyhow::{Context, Result};
use casedeck::{Field, Row};
use std::path::Path;

/// Write rows as CSV with the full field-registry column order as header.
/// Per-field value transforms (date formatting, depth coercion) are
/// applied here; fields absent from a row become empty cells.
pub fn write_rows(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(Field::ALL.iter().map(|f| f.name()))?;

    for row in rows {
        let record: Vec<String> = Field::ALL
            .iter()
            .map(|f| {
                row.get(*f)
                    .map(|v| f.format_value(&v))
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Read CSV rows, mapping columns by header name. Recognized columns
/// populate the typed row fields; unrecognized columns are retained in
/// `extra`. Rows are never rejected for missing columns.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let columns = headers.iter().map(String::as_str).zip(record.iter());
        rows.push(Row::from_columns(columns));
    }
    Ok(rows)
}
