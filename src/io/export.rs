//! Export a fetched indicator table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::IndicatorTable;
use crate::error::AppError;

pub const CSV_HEADER: [&str; 7] = [
    "indicator",
    "time_period",
    "obs_value",
    "unit",
    "last_update",
    "obs_status",
    "cober_geo",
];

/// Write one CSV row per observation to `path`.
pub fn write_table_csv(path: &Path, table: &IndicatorTable) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_table(&mut file, table)?;
    tracing::info!(path = %path.display(), rows = table.len(), "exported indicator table");
    Ok(())
}

/// Write the CSV to any writer.
pub fn write_table<W: Write>(out: W, table: &IndicatorTable) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(CSV_HEADER)
        .map_err(|e| AppError::config(format!("Failed to write export CSV header: {e}")))?;

    for r in &table.rows {
        wtr.write_record([
            r.indicator.clone(),
            r.time_period.to_string(),
            r.obs_value.map(|v| v.to_string()).unwrap_or_default(),
            r.unit.clone().unwrap_or_default(),
            r.last_update.clone().unwrap_or_default(),
            r.obs_status.clone().unwrap_or_default(),
            r.cober_geo.clone().unwrap_or_default(),
        ])
        .map_err(|e| AppError::config(format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::config(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
