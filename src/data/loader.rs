use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

use super::model::RawTable;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse a tab-separated file with a header row.
///
/// With `column_limit` set, only the first `limit` columns (clamped to the
/// header width) are kept and every record is truncated or padded to that
/// width. This absorbs files whose data rows carry an extra trailing tab.
/// Without a limit, a row whose width differs from the header is an error.
pub fn read_tsv(path: &Path, column_limit: Option<usize>) -> Result<RawTable> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_tsv(file, path, column_limit)?;
    log::debug!(
        "Parsed {} rows x {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

/// Same as [`read_tsv`], from any reader. `path` is only used for messages.
pub fn parse_tsv<R: Read>(reader: R, path: &Path, column_limit: Option<usize>) -> Result<RawTable> {
    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(column_limit.is_some())
        .from_reader(reader);

    let mut headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let width = match column_limit {
        Some(limit) => limit.min(headers.len()),
        None => headers.len(),
    };
    headers.truncate(width);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let mut row: Vec<String> = record.iter().take(width).map(|v| v.to_string()).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(RawTable::new(path, headers, rows))
}
