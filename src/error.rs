use std::path::PathBuf;

use crate::data::source::{Measure, Source};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while loading and reshaping protein tables
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unrecognized value for one of the loader parameters
    #[error("Invalid argument '{value}' for {parameter} parameter")]
    InvalidArgument {
        parameter: &'static str,
        value: String,
    },

    /// Table name outside the set a tool produces
    #[error("Invalid argument '{name}' for name parameter with '{tool}' as source")]
    InvalidTableName { tool: Source, name: String },

    /// The tool does not report the requested measure
    #[error("'{measure}' data not available from {}", tool.display_name())]
    Unsupported { tool: Source, measure: Measure },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TSV parsing error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    #[error("Invalid value '{value}' in column '{column}': {reason}")]
    InvalidValue {
        column: String,
        value: String,
        reason: &'static str,
    },

    /// A column matched a schema prefix but not its extraction pattern
    #[error("Column '{column}' does not match pattern '{pattern}'")]
    ColumnPattern { column: String, pattern: String },

    #[error("Invalid column pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Disagreements between the experiment-design metadata and a protein table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// A protein column names a sample the run's experiment design lacks
    #[error("Protein column sample '{0}' has no entry in the run experimental design")]
    UnknownRunKey(String),

    /// A protein column names a file id missing from the input files table
    #[error("Protein column file id '{0}' has no entry in the input files table")]
    UnknownFileId(String),

    /// A raw file is missing from the reference experiment design
    #[error("File '{0}' has no entry in the reference experimental design")]
    UnknownFile(String),

    #[error("Sample '{sample}' is assigned to both '{first}' and '{second}'")]
    DuplicateSample {
        sample: String,
        first: String,
        second: String,
    },

    #[error("Key '{0}' appears more than once in the run metadata")]
    DuplicateKey(String),
}
