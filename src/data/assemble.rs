//! Reshape raw tool output into samples-by-proteins tables.
//!
//! Both tools go through the same steps: select the per-sample value
//! columns, resolve each column's run key to a canonical sample through the
//! experiment design, then transpose so samples become rows.

use crate::config::DataLayout;
use crate::error::{Error, ReconcileError, Result};

use super::design::{
    file_stem_from_path, reconcile, CanonicalSamples, ExperimentDesign, Reconciliation,
};
use super::filter;
use super::model::{Cell, ProteinTable, RawTable, SampleRow};
use super::schema::{self, ProteinSchema, Q_VALUE_THRESHOLD};
use super::source::{read_table, Measure, Revision, Source, TableName};

/// Conditions kept in `sample_condition`; anything else (QC, blanks) is null.
pub const RECOGNIZED_CONDITIONS: [&str; 2] = ["Healthy", "Unhealthy"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the protein values of one tool with canonical sample names.
///
/// With `clean`, contaminated, no-protein, QC and blank samples are dropped
/// along with the QC flag columns. `load_old` selects the older processing
/// run, kept for backward comparison only.
///
/// Sample ids always come from the old MetaMorpheus experiment design, which
/// is the only one listing every sample number.
pub fn load_protein_table(
    layout: &DataLayout,
    source: Source,
    measure: Measure,
    clean: bool,
    load_old: bool,
) -> Result<ProteinTable> {
    let revision = Revision::from_load_old(load_old);
    let schema = ProteinSchema::for_run(source, revision);
    if schema.values(measure).is_none() {
        return Err(Error::Unsupported {
            tool: source,
            measure,
        });
    }

    let proteins = read_table(layout, source, schema.table, revision)?;
    let reference = reference_samples(layout)?;

    let table = match source {
        Source::MetaMorpheus => {
            let design = read_table(layout, source, TableName::ExperimentalDesign, revision)?;
            assemble_metamorpheus(&schema, &proteins, &design, &reference)?
        }
        Source::ProteomeDiscoverer => {
            let input_files = read_table(layout, source, TableName::InputFiles, revision)?;
            assemble_proteome_discoverer(&schema, measure, &proteins, &input_files, &reference)?
        }
    };

    let table = if clean { filter::clean(table) } else { table };
    log::info!(
        "Loaded {source} {measure} table ({revision:?} run): {} samples x {} proteins",
        table.len(),
        table.proteins.len()
    );
    Ok(table)
}

/// Canonical sample ids from the old MetaMorpheus experiment design.
pub fn reference_samples(layout: &DataLayout) -> Result<CanonicalSamples> {
    let table = read_table(
        layout,
        Source::MetaMorpheus,
        TableName::ExperimentalDesign,
        Revision::Old,
    )?;
    let design = ExperimentDesign::from_table(&table)?;
    Ok(CanonicalSamples::from_reference(&design)?)
}

// ---------------------------------------------------------------------------
// Per-tool assembly
// ---------------------------------------------------------------------------

/// MetaMorpheus: intensity columns are named `Intensity_<Condition>_<Biorep>`
/// after the run's own experiment design.
pub fn assemble_metamorpheus(
    schema: &ProteinSchema,
    proteins: &RawTable,
    design: &RawTable,
    reference: &CanonicalSamples,
) -> Result<ProteinTable> {
    let design = ExperimentDesign::from_table(design)?;
    let reconciled = reconcile(design.run_files(), reference)?;
    let rows: Vec<usize> = (0..proteins.len()).collect();

    transpose(
        Source::MetaMorpheus,
        Measure::Quant,
        schema,
        proteins,
        &rows,
        &reconciled,
        ReconcileError::UnknownRunKey,
    )
}

/// Proteome Discoverer: value columns carry a file id (`F12`) that the input
/// files table maps to a raw file path.
pub fn assemble_proteome_discoverer(
    schema: &ProteinSchema,
    measure: Measure,
    proteins: &RawTable,
    input_files: &RawTable,
    reference: &CanonicalSamples,
) -> Result<ProteinTable> {
    let id_idx = input_files.column_index(schema::input_files::FILE_ID)?;
    let path_idx = input_files.column_index(schema::input_files::FILE_NAME)?;
    let run_files = input_files.rows.iter().map(|row| {
        (
            row[id_idx].trim().to_string(),
            file_stem_from_path(row[path_idx].trim()).to_string(),
        )
    });
    let reconciled = reconcile(run_files, reference)?;
    let rows = confident_rows(schema, proteins)?;
    log::debug!(
        "{} of {} Proteome Discoverer proteins pass the contaminant and q-value filters",
        rows.len(),
        proteins.len()
    );

    transpose(
        Source::ProteomeDiscoverer,
        measure,
        schema,
        proteins,
        &rows,
        &reconciled,
        ReconcileError::UnknownFileId,
    )
}

/// Rows that are not contaminants and pass the combined q-value threshold.
fn confident_rows(schema: &ProteinSchema, proteins: &RawTable) -> Result<Vec<usize>> {
    let contaminant_idx = schema
        .contaminant
        .map(|c| proteins.column_index(c))
        .transpose()?;
    let q_idx = schema.q_value.map(|c| proteins.column_index(c)).transpose()?;

    let mut rows = Vec::new();
    for (i, row) in proteins.rows.iter().enumerate() {
        if let Some(idx) = contaminant_idx {
            if parse_bool(&row[idx]) {
                continue;
            }
        }
        if let (Some(idx), Some(column)) = (q_idx, schema.q_value) {
            match Cell::abundance(&row[idx], column)?.as_f64() {
                Some(q) if q <= Q_VALUE_THRESHOLD => {}
                _ => continue,
            }
        }
        rows.push(i);
    }
    Ok(rows)
}

fn parse_bool(text: &str) -> bool {
    let text = text.trim();
    text.eq_ignore_ascii_case("true") || text == "1"
}

// ---------------------------------------------------------------------------
// Transposition and sample metadata
// ---------------------------------------------------------------------------

/// Build one row per reconciled sample from the value columns of the
/// selected protein rows. Samples without a value column keep all cells
/// missing; a column without a reconciled sample is an error.
fn transpose(
    source: Source,
    measure: Measure,
    schema: &ProteinSchema,
    proteins: &RawTable,
    rows: &[usize],
    reconciled: &Reconciliation,
    unknown_key: fn(String) -> ReconcileError,
) -> Result<ProteinTable> {
    let pattern = schema.values(measure).ok_or(Error::Unsupported {
        tool: source,
        measure,
    })?;
    let accession_idx = proteins.column_index(schema.accession)?;
    let accessions: Vec<String> = rows
        .iter()
        .map(|&r| proteins.rows[r][accession_idx].clone())
        .collect();

    let mut slots: Vec<Option<usize>> = vec![None; reconciled.len()];
    for (col_idx, key) in pattern.select(proteins)? {
        let slot = reconciled.index_of(&key).ok_or_else(|| unknown_key(key.clone()))?;
        if slots[slot].replace(col_idx).is_some() {
            return Err(ReconcileError::DuplicateKey(key).into());
        }
    }

    let mut samples = Vec::with_capacity(reconciled.len());
    for ((key, identity), column) in reconciled.samples.iter().zip(&slots) {
        let values = match column {
            Some(col_idx) => {
                let header = &proteins.headers[*col_idx];
                rows.iter()
                    .map(|&r| parse_cell(measure, &proteins.rows[r][*col_idx], header))
                    .collect::<Result<Vec<_>>>()?
            }
            None => {
                log::warn!(
                    "{source} sample '{key}' ({}) has no value column",
                    identity.file_name
                );
                vec![Cell::Missing; accessions.len()]
            }
        };

        let (sample_type, sample_condition) = describe_file(&identity.file_name);
        samples.push(SampleRow {
            sample: identity.sample.clone(),
            file_name: identity.file_name.clone(),
            sample_type,
            sample_condition,
            sample_num: sample_number(&identity.sample)?,
            qc: Some(identity.flags),
            values,
        });
    }
    samples.sort_by(|a, b| a.sample.cmp(&b.sample));

    Ok(ProteinTable {
        source,
        measure,
        proteins: accessions,
        rows: samples,
        cleaned: false,
    })
}

fn parse_cell(measure: Measure, text: &str, column: &str) -> Result<Cell> {
    match measure {
        Measure::Quant => Cell::abundance(text, column),
        Measure::Found => Ok(Cell::found(text)),
    }
}

/// Sample type and condition encoded in a raw file name,
/// e.g. `HFL1_Healthy_A3` → (`hfl1`, `Some("healthy")`).
pub fn describe_file(file_name: &str) -> (String, Option<String>) {
    let normalized = file_name.replace("_2_", "_");
    let mut parts = normalized.split('_');
    let sample_type = match parts.next().unwrap_or_default() {
        "Psuedo-bulk" => "pbulk".to_string(),
        other => other.to_lowercase(),
    };
    let condition = parts
        .next()
        .filter(|c| RECOGNIZED_CONDITIONS.contains(c))
        .map(str::to_lowercase);
    (sample_type, condition)
}

/// Trailing numeric token of a canonical sample id.
pub fn sample_number(sample: &str) -> Result<u32> {
    sample
        .rsplit_once('_')
        .and_then(|(_, num)| num.parse().ok())
        .ok_or_else(|| Error::InvalidValue {
            column: "sample".to_string(),
            value: sample.to_string(),
            reason: "no trailing sample number",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::design::DesignEntry;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            "test.tsv",
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn reference() -> CanonicalSamples {
        let entry = |file: &str, condition: &str, biorep| DesignEntry {
            file_name: file.to_string(),
            condition: condition.to_string(),
            biorep,
        };
        CanonicalSamples::from_reference(&ExperimentDesign {
            entries: vec![
                entry("HFL1_Healthy_A3", "healthy", 3),
                entry("HFL1_Unhealthy_B1_bad", "unhealthy", 1),
                entry("Psuedo-bulk_Healthy_2_C4", "healthy", 12),
                entry("QC_Std_H1", "qc", 1),
            ],
        })
        .unwrap()
    }

    #[test]
    fn file_descriptions() {
        assert_eq!(describe_file("HFL1_Healthy_A3"), ("hfl1".into(), Some("healthy".into())));
        assert_eq!(
            describe_file("Psuedo-bulk_Unhealthy_2_C4"),
            ("pbulk".into(), Some("unhealthy".into()))
        );
        assert_eq!(describe_file("Blank_B2"), ("blank".into(), None));
        assert_eq!(describe_file("QC_Std_H1"), ("qc".into(), None));
        assert_eq!(sample_number("healthy_03").unwrap(), 3);
        assert!(sample_number("healthy").is_err());
    }

    #[test]
    fn metamorpheus_columns_resolve_through_run_design() {
        let schema = ProteinSchema::for_run(Source::MetaMorpheus, Revision::Current);
        let proteins = table(
            &["Protein Accession", "Gene", "Intensity_Healthy_1", "Intensity_unhealthy_1"],
            &[&["P1", "G1", "100", ""], &["P2", "G2", "", "7.5"]],
        );
        // The current run numbers replicates differently than the reference.
        let design = table(
            &["FileName", "Condition", "Biorep"],
            &[
                &["HFL1_Healthy_A3.raw", "Healthy", "1"],
                &["HFL1_Unhealthy_B1_bad.raw", "unhealthy", "1"],
                &["QC_Std_H1.raw", "qc", "1"],
            ],
        );

        let t = assemble_metamorpheus(&schema, &proteins, &design, &reference()).unwrap();
        assert_eq!(t.proteins, vec!["P1", "P2"]);
        assert_eq!(t.samples().collect::<Vec<_>>(), vec!["healthy_03", "qc_01", "unhealthy_01"]);

        let healthy = t.row("healthy_03").unwrap();
        assert_eq!(healthy.values, vec![Cell::Abundance(100.0), Cell::Missing]);
        assert_eq!(healthy.sample_num, 3);
        assert_eq!(healthy.sample_condition.as_deref(), Some("healthy"));

        // Listed in the design but never quantified.
        let qc = t.row("qc_01").unwrap();
        assert_eq!(qc.values, vec![Cell::Missing, Cell::Missing]);
        assert_eq!(qc.sample_condition, None);

        assert!(t.row("unhealthy_01").unwrap().qc.unwrap().contaminated);
    }

    #[test]
    fn metamorpheus_unknown_column_is_named() {
        let schema = ProteinSchema::for_run(Source::MetaMorpheus, Revision::Current);
        let proteins = table(&["Protein Accession", "Intensity_healthy_9"], &[&["P1", "1"]]);
        let design = table(&["FileName", "Condition", "Biorep"], &[&["HFL1_Healthy_A3.raw", "healthy", "3"]]);
        let err = assemble_metamorpheus(&schema, &proteins, &design, &reference()).unwrap_err();
        assert!(matches!(
            err,
            Error::Reconcile(ReconcileError::UnknownRunKey(ref k)) if k == "healthy_9"
        ));
    }

    fn pd_proteins() -> RawTable {
        table(
            &[
                "Accession",
                "Contaminant",
                "Exp. q-value: Combined",
                "Abundance: F1: Sample",
                "Abundance: F2: Sample",
                "Found in Sample: F1: Sample",
                "Found in Sample: F2: Sample",
            ],
            &[
                &["P1", "False", "0.001", "5", "6", "High", "Peak Found"],
                &["P2", "True", "0.001", "5", "6", "High", "High"],
                &["P3", "False", "0.2", "5", "6", "High", "High"],
                &["P4", "False", "0.01", "", "3", "Not Found", "High"],
                &["P5", "False", "", "1", "1", "High", "High"],
            ],
        )
    }

    fn pd_input_files() -> RawTable {
        table(
            &["Study File ID", "File ID", "File Name"],
            &[
                &["F1", "F1", r"D:\raw\HFL1_Healthy_A3.raw"],
                &["F2", "F2", r"D:\raw\Psuedo-bulk_Healthy_2_C4.raw"],
                &["F3", "F3", r"D:\raw\QC_Std_H1.raw"],
            ],
        )
    }

    #[test]
    fn proteome_discoverer_quant() {
        let schema = ProteinSchema::for_run(Source::ProteomeDiscoverer, Revision::Current);
        let t = assemble_proteome_discoverer(
            &schema,
            Measure::Quant,
            &pd_proteins(),
            &pd_input_files(),
            &reference(),
        )
        .unwrap();

        // P2 is a contaminant, P3 and P5 fail the q-value filter.
        assert_eq!(t.proteins, vec!["P1", "P4"]);
        assert_eq!(t.samples().collect::<Vec<_>>(), vec!["healthy_03", "healthy_12", "qc_01"]);
        let pbulk = t.row("healthy_12").unwrap();
        assert_eq!(pbulk.sample_type, "pbulk");
        assert_eq!(pbulk.values, vec![Cell::Abundance(6.0), Cell::Abundance(3.0)]);
        assert_eq!(t.row("healthy_03").unwrap().present_count(), 1);
        assert_eq!(t.row("qc_01").unwrap().present_count(), 0);
    }

    #[test]
    fn non_numeric_q_value_is_rejected() {
        let schema = ProteinSchema::for_run(Source::ProteomeDiscoverer, Revision::Current);
        let proteins = table(
            &["Accession", "Contaminant", "Exp. q-value: Combined", "Abundance: F1: Sample"],
            &[&["P1", "False", "low", "5"]],
        );
        let err = confident_rows(&schema, &proteins).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidValue { ref column, ref value, .. }
                if column == "Exp. q-value: Combined" && value == "low"
        ));
    }

    #[test]
    fn proteome_discoverer_found() {
        let schema = ProteinSchema::for_run(Source::ProteomeDiscoverer, Revision::Current);
        let t = assemble_proteome_discoverer(
            &schema,
            Measure::Found,
            &pd_proteins(),
            &pd_input_files(),
            &reference(),
        )
        .unwrap();
        let healthy = t.row("healthy_03").unwrap();
        assert_eq!(healthy.values, vec![Cell::Found, Cell::Missing]);
        assert_eq!(healthy.present_count(), 1);
    }

    #[test]
    fn proteome_discoverer_unknown_file() {
        let schema = ProteinSchema::for_run(Source::ProteomeDiscoverer, Revision::Current);
        let input_files = table(
            &["File ID", "File Name"],
            &[&["F1", r"D:\raw\HFL1_Healthy_A9.raw"]],
        );
        let err = assemble_proteome_discoverer(
            &schema,
            Measure::Quant,
            &pd_proteins(),
            &input_files,
            &reference(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Reconcile(ReconcileError::UnknownFile(ref f)) if f == "HFL1_Healthy_A9"
        ));
    }

    #[test]
    fn proteome_discoverer_unknown_file_id() {
        let schema = ProteinSchema::for_run(Source::ProteomeDiscoverer, Revision::Current);
        let input_files = table(&["File ID", "File Name"], &[&["F1", r"D:\raw\HFL1_Healthy_A3.raw"]]);
        let err = assemble_proteome_discoverer(
            &schema,
            Measure::Quant,
            &pd_proteins(),
            &input_files,
            &reference(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Reconcile(ReconcileError::UnknownFileId(ref f)) if f == "F2"
        ));
    }

    #[test]
    fn found_from_metamorpheus_is_unsupported() {
        let layout = DataLayout::new("/nonexistent/protein-tables");
        let err = load_protein_table(&layout, Source::MetaMorpheus, Measure::Found, true, false).unwrap_err();
        assert!(matches!(
            err,
            Error::Unsupported { tool: Source::MetaMorpheus, measure: Measure::Found }
        ));
    }
}
