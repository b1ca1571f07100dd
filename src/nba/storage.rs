use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::nba::recordset::{cell_to_string, RecordSet};

/// Writes a record set as a flat CSV file, overwriting any prior contents.
pub fn write_record_set(record_set: &RecordSet, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(&record_set.headers)?;
    for row in &record_set.rows {
        writer.write_record(row.iter().map(cell_to_string))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// Reads a CSV file back into a record set. Cells come back as strings; the
/// numeric accessors on `RecordSet` parse them on demand.
pub fn read_record_set(path: &Path) -> Result<RecordSet> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = reader
        .headers()?
        .iter()
        .map(String::from)
        .collect::<Vec<String>>();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|cell| Value::String(cell.to_string()))
                .collect::<Vec<Value>>(),
        );
    }
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(RecordSet { name, headers, rows })
}
