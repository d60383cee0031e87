use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::DataLayout;
use crate::error::{Error, Result};

use super::loader::read_tsv;
use super::model::RawTable;
use super::schema;

// ---------------------------------------------------------------------------
// Source – which tool produced a table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// MetaMorpheus, `mm`
    MetaMorpheus,
    /// Proteome Discoverer, `pd`
    ProteomeDiscoverer,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::MetaMorpheus, Source::ProteomeDiscoverer];

    /// Short code used in parameters and the `software` tag.
    pub fn code(self) -> &'static str {
        match self {
            Source::MetaMorpheus => "mm",
            Source::ProteomeDiscoverer => "pd",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Source::MetaMorpheus => "MetaMorpheus",
            Source::ProteomeDiscoverer => "Proteome Discoverer",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mm" => Ok(Source::MetaMorpheus),
            "pd" => Ok(Source::ProteomeDiscoverer),
            other => Err(Error::InvalidArgument {
                parameter: "source",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Measure – quantified abundances or presence flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    Quant,
    Found,
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Quant => f.write_str("quant"),
            Measure::Found => f.write_str("found"),
        }
    }
}

impl FromStr for Measure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "quant" => Ok(Measure::Quant),
            "found" => Ok(Measure::Found),
            other => Err(Error::InvalidArgument {
                parameter: "quant_or_found",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Revision – which processing run to read
// ---------------------------------------------------------------------------

/// Dated reprocessing of the same instrument data. The old runs are kept for
/// backward comparison only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Revision {
    Current,
    Old,
}

impl Revision {
    pub fn from_load_old(load_old: bool) -> Self {
        if load_old {
            Revision::Old
        } else {
            Revision::Current
        }
    }

    /// Run directory for a tool.
    pub fn run_dir(self, source: Source) -> &'static str {
        match (source, self) {
            (Source::MetaMorpheus, Revision::Current) => "run20230508",
            (Source::MetaMorpheus, Revision::Old) => "run20230411",
            (Source::ProteomeDiscoverer, Revision::Current) => "run20230809",
            (Source::ProteomeDiscoverer, Revision::Old) => "run20230410",
        }
    }
}

// ---------------------------------------------------------------------------
// TableName – the logical tables each tool writes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    AllQuantifiedProteinGroups,
    ExperimentalDesign,
    /// Coverage of GO annotations
    AnnotationProteinGroups,
    /// Coverage of Reactome and WikiPathways pathways
    PathwayProteinGroups,
    ProteinGroups,
    Proteins,
    InputFiles,
}

impl TableName {
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::AllQuantifiedProteinGroups => "AllQuantifiedProteinGroups",
            TableName::ExperimentalDesign => "ExperimentalDesign",
            TableName::AnnotationProteinGroups => "AnnotationProteinGroups",
            TableName::PathwayProteinGroups => "PathwayProteinGroups",
            TableName::ProteinGroups => "ProteinGroups",
            TableName::Proteins => "Proteins",
            TableName::InputFiles => "InputFiles",
        }
    }

    /// Tables written by a tool.
    pub fn available(source: Source) -> &'static [TableName] {
        match source {
            Source::MetaMorpheus => &[
                TableName::AllQuantifiedProteinGroups,
                TableName::ExperimentalDesign,
            ],
            Source::ProteomeDiscoverer => &[
                TableName::AnnotationProteinGroups,
                TableName::PathwayProteinGroups,
                TableName::ProteinGroups,
                TableName::Proteins,
                TableName::InputFiles,
            ],
        }
    }

    /// Resolve a table name for a tool, rejecting names the tool never writes.
    pub fn parse(source: Source, name: &str) -> Result<Self> {
        TableName::available(source)
            .iter()
            .copied()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| Error::InvalidTableName {
                tool: source,
                name: name.to_string(),
            })
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DataLayout {
    /// Path of a raw table within the data tree.
    pub fn table_path(&self, source: Source, name: TableName, revision: Revision) -> PathBuf {
        let run_dir = revision.run_dir(source);
        match source {
            Source::MetaMorpheus => self
                .root
                .join("metamorpheus")
                .join(run_dir)
                .join("Task1-SearchTask")
                .join(format!("{name}.tsv")),
            Source::ProteomeDiscoverer => {
                let prefix = match revision {
                    Revision::Current => "Payne_organoids2.0",
                    Revision::Old => "Payne_Organoids",
                };
                self.root
                    .join("proteome_discoverer")
                    .join(run_dir)
                    .join(format!("{prefix}_{name}.txt"))
            }
        }
    }
}

/// Load one of the raw tables without any reshaping.
///
/// `name` is validated against the tables `source` writes before the
/// filesystem is touched.
pub fn load_table(layout: &DataLayout, source: Source, name: &str, load_old: bool) -> Result<RawTable> {
    let name = TableName::parse(source, name)?;
    read_table(layout, source, name, Revision::from_load_old(load_old))
}

/// Load a table that is already known to be valid for `source`.
pub(crate) fn read_table(
    layout: &DataLayout,
    source: Source,
    name: TableName,
    revision: Revision,
) -> Result<RawTable> {
    let path = layout.table_path(source, name, revision);
    let limit = schema::column_limit(source, name, revision);
    log::debug!("Reading {source} {name} ({revision:?}) from {}", path.display());
    read_tsv(&path, limit)
}
