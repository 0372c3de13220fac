// GolNumeros - core/normalize.rs
//
// Header normalisation for freshly loaded tables.
// Spreadsheet exports carry headers like " Placar Provável " which are
// turned into stable field names ("Placar_Provável"). Row values are
// never touched here.

use crate::core::model::Table;

/// Trim surrounding whitespace, then replace each internal space with `_`.
///
/// Idempotent: a normalised header contains neither surrounding whitespace
/// nor spaces, so a second pass changes nothing.
pub fn normalize_header(header: &str) -> String {
    header.trim().replace(' ', "_")
}

/// Normalise every column name of `table`.
pub fn normalize_headers(table: Table) -> Table {
    let columns: Vec<String> = table.columns().iter().map(|c| normalize_header(c)).collect();
    let renamed = table
        .columns()
        .iter()
        .zip(&columns)
        .filter(|(before, after)| before != after)
        .count();
    if renamed > 0 {
        tracing::debug!(renamed, "Normalised column headers");
    }
    table.with_columns(columns)
}
