use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

use super::source::{Measure, Source};

// ---------------------------------------------------------------------------
// RawTable – a parsed TSV file, cells kept as text
// ---------------------------------------------------------------------------

/// A raw table exactly as a tool wrote it (modulo the column limit).
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// File the table was read from, used in error messages.
    pub path: PathBuf,
    pub headers: Vec<String>,
    /// Every row has `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<P: AsRef<Path>>(path: P, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        RawTable {
            path: path.as_ref().to_path_buf(),
            headers,
            rows,
        }
    }

    /// Index of a column by exact header name.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| Error::MissingColumn {
                table: self.name(),
                column: column.to_string(),
            })
    }

    /// All values of a column, top to bottom.
    pub fn column(&self, column: &str) -> Result<impl Iterator<Item = &str> + '_> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(move |r| r[idx].as_str()))
    }

    /// File name of the table for diagnostics.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Cell – one protein value for one sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// Quantified abundance.
    Abundance(f64),
    /// Reported in a "Found in Sample" column.
    Found,
    /// Empty, NaN or "Not Found".
    Missing,
}

impl Cell {
    /// Parse an abundance cell. Empty text and NaN are missing.
    pub fn abundance(text: &str, column: &str) -> Result<Cell> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Cell::Missing);
        }
        let value = text.parse::<f64>().map_err(|_| Error::InvalidValue {
            column: column.to_string(),
            value: text.to_string(),
            reason: "not a number",
        })?;
        if value.is_nan() {
            Ok(Cell::Missing)
        } else {
            Ok(Cell::Abundance(value))
        }
    }

    /// Parse a presence cell ("High", "Peak Found", ...). "Not Found" is
    /// missing, like an empty cell.
    pub fn found(text: &str) -> Cell {
        match text.trim() {
            "" => Cell::Missing,
            t if t.eq_ignore_ascii_case("not found") => Cell::Missing,
            _ => Cell::Found,
        }
    }

    /// Whether the cell holds a value; the counter counts exactly these.
    pub fn is_present(&self) -> bool {
        !matches!(self, Cell::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Abundance(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Abundance(v) => write!(f, "{v}"),
            Cell::Found => write!(f, "found"),
            Cell::Missing => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// QC flags and the derived status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct QcFlags {
    pub contaminated: bool,
    pub no_protein: bool,
}

impl QcFlags {
    /// Flags are encoded as suffixes of the raw file name.
    pub fn from_file_name(file_name: &str) -> Self {
        QcFlags {
            contaminated: file_name.ends_with("bad"),
            no_protein: file_name.ends_with("np"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QcStatus {
    Normal,
    Contaminated,
    NoProtein,
    ContaminatedNoProtein,
}

impl QcStatus {
    /// Every status in legend order.
    pub const ALL: [QcStatus; 4] = [
        QcStatus::Normal,
        QcStatus::Contaminated,
        QcStatus::NoProtein,
        QcStatus::ContaminatedNoProtein,
    ];

    pub fn label(self) -> &'static str {
        match self {
            QcStatus::Normal => "Normal",
            QcStatus::Contaminated => "Contaminated",
            QcStatus::NoProtein => "No protein",
            QcStatus::ContaminatedNoProtein => "Contaminated, No protein",
        }
    }
}

impl From<QcFlags> for QcStatus {
    fn from(flags: QcFlags) -> Self {
        match (flags.contaminated, flags.no_protein) {
            (false, false) => QcStatus::Normal,
            (true, false) => QcStatus::Contaminated,
            (false, true) => QcStatus::NoProtein,
            (true, true) => QcStatus::ContaminatedNoProtein,
        }
    }
}

impl fmt::Display for QcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for QcStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SampleRow / ProteinTable – samples as rows, proteins as columns
// ---------------------------------------------------------------------------

/// One sample of a [`ProteinTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    /// Canonical id, `condition_NN`.
    pub sample: String,
    /// Raw instrument file name without extension.
    pub file_name: String,
    pub sample_type: String,
    /// `None` for samples that are neither healthy nor unhealthy (QC, blanks).
    pub sample_condition: Option<String>,
    pub sample_num: u32,
    /// Dropped by `clean`.
    pub qc: Option<QcFlags>,
    /// One cell per entry of [`ProteinTable::proteins`].
    pub values: Vec<Cell>,
}

impl SampleRow {
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|c| c.is_present()).count()
    }
}

/// Metadata column names, in output order.
pub const METADATA_COLUMNS: [&str; 5] = [
    "sample",
    "sample_type",
    "sample_condition",
    "sample_num",
    "file_name",
];

/// Columns that only exist before cleaning.
pub const QC_COLUMNS: [&str; 2] = ["contaminated", "no_protein"];

#[derive(Debug, Clone, PartialEq)]
pub struct ProteinTable {
    pub source: Source,
    pub measure: Measure,
    /// Protein accessions, in column order.
    pub proteins: Vec<String>,
    /// Sorted by `sample`.
    pub rows: Vec<SampleRow>,
    /// Set once flagged, QC and blank samples and the QC columns are dropped.
    pub cleaned: bool,
}

impl ProteinTable {
    /// Whether the QC flag columns are still present.
    pub fn has_qc_columns(&self) -> bool {
        !self.cleaned
    }

    /// Column names with metadata first, then proteins.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = METADATA_COLUMNS.to_vec();
        if self.has_qc_columns() {
            columns.extend(QC_COLUMNS);
        }
        columns.extend(self.proteins.iter().map(String::as_str));
        columns
    }

    pub fn samples(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|r| r.sample.as_str())
    }

    pub fn row(&self, sample: &str) -> Option<&SampleRow> {
        self.rows.iter().find(|r| r.sample == sample)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ProteinCount – output of the protein-found counter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinCount {
    /// `mm` or `pd`; set when counts from both tools are combined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software: Option<&'static str>,
    pub sample: String,
    pub sample_type: String,
    pub sample_condition: Option<String>,
    pub sample_num: u32,
    /// Only present for tables that were not cleaned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QcStatus>,
    pub protein_count: usize,
}

impl ProteinCount {
    /// `type_condition`, or just the type when there is no condition.
    pub fn sample_type_condition(&self) -> String {
        match &self.sample_condition {
            Some(condition) => format!("{}_{}", self.sample_type, condition),
            None => self.sample_type.clone(),
        }
    }
}
