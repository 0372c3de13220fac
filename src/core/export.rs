// GolNumeros - core/export.rs
//
// CSV export of tables and JSON export of metric summaries.
// Core layer: writes to any Write trait object; the path is only carried
// for error context.

use crate::core::model::Table;
use crate::core::summary::MetricSummary;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Write `table` as CSV (header row plus one record per row).
///
/// Returns the number of data rows written.
pub fn export_table_csv<W: Write>(
    table: &Table,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(table.columns()).map_err(csv_err)?;

    let mut count = 0;
    for row in table.rows() {
        csv_writer
            .write_record(row.iter().map(|c| c.label()))
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Write summaries as a pretty-printed JSON array.
pub fn export_summaries_json<W: Write>(
    summaries: &[MetricSummary],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, summaries).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(summaries.len())
}
