#![allow(dead_code)]

use std::fs;
use std::path::Path;

use protein_tables::{DataLayout, Revision, Source, TableName};
use tempfile::TempDir;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One physical sample as the different tables describe it.
pub struct Sample {
    pub file: &'static str,
    pub condition: &'static str,
    /// Replicate number in the old MetaMorpheus design (canonical).
    pub old_biorep: u32,
    /// Replicate number in the current MetaMorpheus design.
    pub run_biorep: u32,
    pub canonical: &'static str,
}

pub const SAMPLES: [Sample; 7] = [
    Sample { file: "HFL1_Healthy_A1", condition: "Healthy", old_biorep: 1, run_biorep: 1, canonical: "healthy_01" },
    Sample { file: "HFL1_Healthy_A3", condition: "Healthy", old_biorep: 3, run_biorep: 2, canonical: "healthy_03" },
    Sample { file: "HFL1_Unhealthy_B1", condition: "Unhealthy", old_biorep: 1, run_biorep: 1, canonical: "unhealthy_01" },
    Sample { file: "HFL1_Unhealthy_B2_bad", condition: "Unhealthy", old_biorep: 2, run_biorep: 2, canonical: "unhealthy_02" },
    Sample { file: "Psuedo-bulk_Healthy_2_C1_np", condition: "Healthy", old_biorep: 4, run_biorep: 3, canonical: "healthy_04" },
    Sample { file: "QC_Std_H1", condition: "QC", old_biorep: 1, run_biorep: 1, canonical: "qc_01" },
    Sample { file: "Blank_H2", condition: "Blank", old_biorep: 1, run_biorep: 1, canonical: "blank_01" },
];

/// Accessions that pass every Proteome Discoverer filter.
pub const PROTEINS: [&str; 4] = ["P01", "P02", "P03", "P04"];

/// Abundance of a protein in a sample; empty when not quantified.
pub fn abundance(sample: usize, protein: usize) -> String {
    if (sample + protein) % 3 == 0 {
        String::new()
    } else {
        format!("{}", (sample + 1) * 100 + protein)
    }
}

fn tsv(rows: &[Vec<String>]) -> String {
    rows.iter().map(|r| r.join("\t") + "\n").collect()
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A complete data tree in a temporary directory.
pub struct Fixture {
    _dir: TempDir,
    pub layout: DataLayout,
}

impl Fixture {
    pub fn new() -> Self {
        init_logging();
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path());
        for revision in [Revision::Current, Revision::Old] {
            write_metamorpheus(&layout, revision);
            write_proteome_discoverer(&layout, revision);
        }
        Fixture { _dir: dir, layout }
    }
}

fn write_metamorpheus(layout: &DataLayout, revision: Revision) {
    let biorep = |s: &Sample| match revision {
        Revision::Current => s.run_biorep,
        Revision::Old => s.old_biorep,
    };

    let mut design = vec![vec!["FileName".to_string(), "Condition".into(), "Biorep".into(), "Fraction".into()]];
    for s in &SAMPLES {
        design.push(vec![format!("{}.raw", s.file), s.condition.into(), biorep(s).to_string(), "1".into()]);
    }
    write(
        &layout.table_path(Source::MetaMorpheus, TableName::ExperimentalDesign, revision),
        &tsv(&design),
    );

    let mut header = vec!["Protein Accession".to_string(), "Gene".into(), "Organism".into()];
    header.extend(SAMPLES.iter().map(|s| format!("Intensity_{}_{}", s.condition, biorep(s))));
    let mut text = header.join("\t") + "\n";
    for (p, acc) in PROTEINS.iter().enumerate() {
        let mut row = vec![acc.to_string(), format!("G{p}"), "Homo sapiens".into()];
        row.extend((0..SAMPLES.len()).map(|s| abundance(s, p)));
        // MetaMorpheus ends every data row with an extra tab.
        text += &(row.join("\t") + "\t\n");
    }
    write(
        &layout.table_path(Source::MetaMorpheus, TableName::AllQuantifiedProteinGroups, revision),
        &text,
    );
}

fn write_proteome_discoverer(layout: &DataLayout, revision: Revision) {
    let (q_col, quant_prefix, found_prefix, sep) = match revision {
        Revision::Current => ("Exp. q-value: Combined", "Abundance: ", "Found in Sample: ", ": "),
        Revision::Old => ("Exp q-value Combined", "Abundances Scaled ", "Found in Sample ", " "),
    };
    let ids = 1..=SAMPLES.len();

    let mut header = vec!["Accession".to_string(), "Description".into(), "Contaminant".into(), q_col.into()];
    header.extend(ids.clone().map(|i| format!("{quant_prefix}F{i}{sep}Sample")));
    header.extend(ids.map(|i| format!("{found_prefix}F{i}{sep}Sample")));
    let mut rows = vec![header];

    let mut push = |acc: &str, contaminant: &str, q: &str, p: usize| {
        let mut row = vec![acc.to_string(), format!("Protein {acc}"), contaminant.into(), q.into()];
        row.extend((0..SAMPLES.len()).map(|s| abundance(s, p)));
        row.extend((0..SAMPLES.len()).map(|s| {
            if abundance(s, p).is_empty() { "Not Found".to_string() } else { "High".to_string() }
        }));
        rows.push(row);
    };
    for (p, acc) in PROTEINS.iter().enumerate() {
        push(*acc, "False", "0.001", p);
    }
    push("KRT1", "True", "0.0", 1);
    push("P99", "False", "0.5", 2);

    write(
        &layout.table_path(Source::ProteomeDiscoverer, TableName::Proteins, revision),
        &tsv(&rows),
    );

    let mut input_files = vec![vec!["Study File ID".to_string(), "File ID".into(), "File Name".into()]];
    for (i, s) in SAMPLES.iter().enumerate() {
        let id = format!("F{}", i + 1);
        input_files.push(vec![id.clone(), id, format!(r"C:\Xcalibur\data\{}.raw", s.file)]);
    }
    write(
        &layout.table_path(Source::ProteomeDiscoverer, TableName::InputFiles, revision),
        &tsv(&input_files),
    );

    write(
        &layout.table_path(Source::ProteomeDiscoverer, TableName::ProteinGroups, revision),
        "Protein Group ID\tNumber of Proteins\n1\t2\n2\t1\n",
    );
}
