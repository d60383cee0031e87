use std::fmt;
use std::str::FromStr;

use crate::config::DataLayout;
use crate::error::{Error, Result};

use super::assemble::load_protein_table;
use super::model::{ProteinCount, ProteinTable, QcStatus};
use super::source::{Measure, Source};

/// Which tools to count proteins for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSelection {
    Both,
    Single(Source),
}

impl fmt::Display for CountSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountSelection::Both => f.write_str("both"),
            CountSelection::Single(source) => fmt::Display::fmt(source, f),
        }
    }
}

impl FromStr for CountSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "both" => Ok(CountSelection::Both),
            other => other.parse().map(CountSelection::Single),
        }
    }
}

impl From<Source> for CountSelection {
    fn from(source: Source) -> Self {
        CountSelection::Single(source)
    }
}

/// Number of proteins present in each sample.
///
/// For [`CountSelection::Both`] the MetaMorpheus counts come first, then the
/// Proteome Discoverer counts, each tagged with its `software` code. A single
/// tool's counts are sorted ascending and untagged. Uncleaned tables carry a
/// [`QcStatus`] in place of the two flag columns.
pub fn get_proteins_found_count(
    layout: &DataLayout,
    selection: CountSelection,
    measure: Measure,
    clean: bool,
) -> Result<Vec<ProteinCount>> {
    match selection {
        CountSelection::Both => {
            let mut counts = Vec::new();
            for source in Source::ALL {
                let tagged = get_proteins_found_count(layout, source.into(), measure, clean)?
                    .into_iter()
                    .map(|c| ProteinCount {
                        software: Some(source.code()),
                        ..c
                    });
                counts.extend(tagged);
            }
            Ok(counts)
        }
        CountSelection::Single(source) => {
            let table = load_protein_table(layout, source, measure, clean, false)?;
            Ok(count_proteins(&table))
        }
    }
}

/// Count present cells per sample, ascending by count.
pub fn count_proteins(table: &ProteinTable) -> Vec<ProteinCount> {
    let mut counts: Vec<ProteinCount> = table
        .rows
        .iter()
        .map(|row| ProteinCount {
            software: None,
            sample: row.sample.clone(),
            sample_type: row.sample_type.clone(),
            sample_condition: row.sample_condition.clone(),
            sample_num: row.sample_num,
            status: row.qc.map(QcStatus::from),
            protein_count: row.present_count(),
        })
        .collect();
    counts.sort_by_key(|c| c.protein_count);
    counts
}
