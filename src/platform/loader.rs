// GolNumeros - platform/loader.rs
//
// CSV file loading. Every table passes through the header normaliser
// before anyone else sees it.

use crate::app::session::TableSource;
use crate::core::model::{Cell, Table};
use crate::core::normalize::normalize_headers;
use crate::util::error::LoadError;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Parse CSV text from any reader into a normalised `Table`.
///
/// `path` is only used for error context. Ragged rows are accepted and
/// padded/truncated to the header width.
pub fn read_table<R: Read>(reader: R, path: &Path) -> Result<Table, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| LoadError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| LoadError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        rows.push(record.iter().map(Cell::from_raw).collect());
    }

    Ok(normalize_headers(Table::new(headers, rows)))
}

/// Load and normalise a CSV file.
pub fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    // Strip a UTF-8 BOM, which spreadsheet exports like to prepend.
    let mut content = String::new();
    std::io::BufReader::new(file)
        .read_to_string(&mut content)
        .map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let table = read_table(content.as_bytes(), path)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns().len(),
        "CSV loaded"
    );
    Ok(table)
}

/// `TableSource` reading CSV files, with source identifiers taken as paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFileSource;

impl TableSource for CsvFileSource {
    fn load(&self, source: &str) -> Result<Table, LoadError> {
        load_csv(&PathBuf::from(source))
    }
}
