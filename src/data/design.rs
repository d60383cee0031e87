//! Experiment design metadata and sample-id reconciliation.
//!
//! Each tool names samples its own way: MetaMorpheus by `Condition_Biorep`,
//! Proteome Discoverer by file id (`F12`). Both can be traced back to the raw
//! instrument file name, which the old MetaMorpheus experiment design maps
//! to the canonical sample id used across the project.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::{Error, ReconcileError, Result};

use super::model::{QcFlags, RawTable};
use super::schema;

/// Strip the extension from a file name (`a.b.raw` → `a.b`).
pub fn strip_extension(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// Bare file name from a full path without its extension.
///
/// Input file tables carry Windows paths, but `/` is accepted as well.
pub fn file_stem_from_path(path: &str) -> &str {
    let stem = strip_extension(path);
    stem.rsplit(['\\', '/']).next().unwrap_or(stem)
}

// ---------------------------------------------------------------------------
// ExperimentDesign – MetaMorpheus ExperimentalDesign.tsv
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignEntry {
    /// Raw file name without extension.
    pub file_name: String,
    pub condition: String,
    pub biorep: u32,
}

impl DesignEntry {
    /// The sample name MetaMorpheus uses in its intensity column headers.
    pub fn run_key(&self) -> String {
        format!("{}_{}", self.condition, self.biorep)
    }

    /// Canonical sample id: lowercased condition and two-digit replicate.
    pub fn canonical_sample(&self) -> String {
        format!("{}_{:02}", self.condition.to_lowercase(), self.biorep)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExperimentDesign {
    pub entries: Vec<DesignEntry>,
}

impl ExperimentDesign {
    pub fn from_table(table: &RawTable) -> Result<Self> {
        let file_idx = table.column_index(schema::design::FILE_NAME)?;
        let condition_idx = table.column_index(schema::design::CONDITION)?;
        let biorep_idx = table.column_index(schema::design::BIOREP)?;

        let entries = table
            .rows
            .iter()
            .map(|row| -> Result<DesignEntry> {
                let biorep = row[biorep_idx].trim();
                let biorep = biorep.parse::<u32>().map_err(|_| Error::InvalidValue {
                    column: schema::design::BIOREP.to_string(),
                    value: biorep.to_string(),
                    reason: "not a replicate number",
                })?;
                Ok(DesignEntry {
                    file_name: strip_extension(row[file_idx].trim()).to_string(),
                    condition: row[condition_idx].trim().to_string(),
                    biorep,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ExperimentDesign { entries })
    }

    /// `(run key, file name)` pairs, the join MetaMorpheus columns go through.
    pub fn run_files(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.run_key(), e.file_name.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// CanonicalSamples – file name → canonical sample id, verified one-to-one
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleIdentity {
    pub sample: String,
    pub file_name: String,
    pub flags: QcFlags,
}

#[derive(Debug, Clone, Default)]
pub struct CanonicalSamples {
    by_file: BTreeMap<String, SampleIdentity>,
}

impl CanonicalSamples {
    /// Build the mapping from the reference design.
    ///
    /// Fails if two files share a canonical id or one file appears twice.
    pub fn from_reference(design: &ExperimentDesign) -> Result<Self, ReconcileError> {
        let mut by_file = BTreeMap::new();
        let mut owners: BTreeMap<String, String> = BTreeMap::new();

        for entry in &design.entries {
            let sample = entry.canonical_sample();
            match owners.entry(sample.clone()) {
                Entry::Occupied(owner) => {
                    return Err(ReconcileError::DuplicateSample {
                        sample,
                        first: owner.get().clone(),
                        second: entry.file_name.clone(),
                    })
                }
                Entry::Vacant(slot) => {
                    slot.insert(entry.file_name.clone());
                }
            }

            let identity = SampleIdentity {
                sample,
                file_name: entry.file_name.clone(),
                flags: QcFlags::from_file_name(&entry.file_name),
            };
            if by_file.insert(entry.file_name.clone(), identity).is_some() {
                return Err(ReconcileError::DuplicateKey(entry.file_name.clone()));
            }
        }

        Ok(CanonicalSamples { by_file })
    }

    pub fn resolve(&self, file_name: &str) -> Result<&SampleIdentity, ReconcileError> {
        self.by_file
            .get(file_name)
            .ok_or_else(|| ReconcileError::UnknownFile(file_name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.by_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reconciliation – run-specific keys resolved to canonical samples
// ---------------------------------------------------------------------------

/// Run keys (`Condition_Biorep` or file ids) in metadata order, each with
/// its verified canonical identity.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub samples: Vec<(String, SampleIdentity)>,
    index: BTreeMap<String, usize>,
}

impl Reconciliation {
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Resolve every `(run key, file name)` pair of a run's metadata through the
/// reference mapping. Keys must be unique and every file must be known.
pub fn reconcile<I>(run_files: I, reference: &CanonicalSamples) -> Result<Reconciliation, ReconcileError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut reconciled = Reconciliation::default();
    let mut seen_samples: BTreeMap<String, String> = BTreeMap::new();

    for (key, file_name) in run_files {
        let identity = reference.resolve(&file_name)?.clone();
        if let Some(first) = seen_samples.insert(identity.sample.clone(), file_name.clone()) {
            return Err(ReconcileError::DuplicateSample {
                sample: identity.sample,
                first,
                second: file_name,
            });
        }
        if reconciled.index.insert(key.clone(), reconciled.samples.len()).is_some() {
            return Err(ReconcileError::DuplicateKey(key));
        }
        reconciled.samples.push((key, identity));
    }

    Ok(reconciled)
}
