//! Column layouts of the tool output tables.
//!
//! Column names drift between tool versions and reprocessing runs. Every
//! name the assembler depends on is resolved here, once per
//! (tool, revision), so the rest of the crate never matches on revisions.

use regex::Regex;

use crate::error::{Error, Result};

use super::model::RawTable;
use super::source::{Measure, Revision, Source, TableName};

/// Maximum combined q-value for a protein to be kept.
pub const Q_VALUE_THRESHOLD: f64 = 0.01;

/// MetaMorpheus `ExperimentalDesign.tsv`.
pub mod design {
    pub const FILE_NAME: &str = "FileName";
    pub const CONDITION: &str = "Condition";
    pub const BIOREP: &str = "Biorep";
}

/// Proteome Discoverer `InputFiles.txt`.
pub mod input_files {
    pub const FILE_ID: &str = "File ID";
    /// Full Windows path of the raw file.
    pub const FILE_NAME: &str = "File Name";
}

/// Column count to keep when parsing a table, if it must be limited.
///
/// MetaMorpheus writes an extra trailing tab on every data row of the
/// quantified protein groups table.
pub fn column_limit(source: Source, name: TableName, revision: Revision) -> Option<usize> {
    match (source, name, revision) {
        (Source::MetaMorpheus, TableName::AllQuantifiedProteinGroups, Revision::Old) => Some(136),
        (Source::MetaMorpheus, TableName::AllQuantifiedProteinGroups, Revision::Current) => {
            Some(105)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// ColumnPattern – a family of per-sample value columns
// ---------------------------------------------------------------------------

/// Columns starting with `prefix`; the sample token is capture group 1 of
/// `extract`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPattern {
    pub prefix: &'static str,
    pub extract: &'static str,
}

impl ColumnPattern {
    /// Indices and extracted tokens of every matching column, in table order.
    pub fn select(&self, table: &RawTable) -> Result<Vec<(usize, String)>> {
        let re = Regex::new(self.extract)?;
        table
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.starts_with(self.prefix))
            .map(|(i, h)| -> Result<(usize, String)> {
                let token = re
                    .captures(h)
                    .and_then(|c| c.get(1))
                    .ok_or_else(|| Error::ColumnPattern {
                        column: h.clone(),
                        pattern: self.extract.to_string(),
                    })?;
                Ok((i, token.as_str().to_string()))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// ProteinSchema – the protein table of one tool and run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProteinSchema {
    pub table: TableName,
    /// Protein accession column.
    pub accession: &'static str,
    /// Boolean column marking contaminant proteins.
    pub contaminant: Option<&'static str>,
    /// Combined q-value column, filtered at [`Q_VALUE_THRESHOLD`].
    pub q_value: Option<&'static str>,
    pub quant: ColumnPattern,
    pub found: Option<ColumnPattern>,
}

impl ProteinSchema {
    pub fn for_run(source: Source, revision: Revision) -> Self {
        match (source, revision) {
            (Source::MetaMorpheus, _) => ProteinSchema {
                table: TableName::AllQuantifiedProteinGroups,
                accession: "Protein Accession",
                contaminant: None,
                q_value: None,
                quant: ColumnPattern {
                    prefix: "Intensity_",
                    extract: r"^Intensity_(.+)$",
                },
                found: None,
            },
            (Source::ProteomeDiscoverer, Revision::Old) => ProteinSchema {
                table: TableName::Proteins,
                accession: "Accession",
                contaminant: Some("Contaminant"),
                q_value: Some("Exp q-value Combined"),
                quant: ColumnPattern {
                    prefix: "Abundances Scaled F",
                    extract: r"Abundances Scaled (F\d+) Sample",
                },
                found: Some(ColumnPattern {
                    prefix: "Found in Sample F",
                    extract: r"Found in Sample (F\d+) Sample",
                }),
            },
            (Source::ProteomeDiscoverer, Revision::Current) => ProteinSchema {
                table: TableName::Proteins,
                accession: "Accession",
                contaminant: Some("Contaminant"),
                q_value: Some("Exp. q-value: Combined"),
                quant: ColumnPattern {
                    prefix: "Abundance: F",
                    extract: r"Abundance: (F\d+): Sample",
                },
                found: Some(ColumnPattern {
                    prefix: "Found in Sample: F",
                    extract: r"Found in Sample: (F\d+): Sample",
                }),
            },
        }
    }

    /// Value columns for a measure; `None` when the tool does not report it.
    pub fn values(&self, measure: Measure) -> Option<ColumnPattern> {
        match measure {
            Measure::Quant => Some(self.quant),
            Measure::Found => self.found,
        }
    }
}
