use super::model::{ProteinTable, SampleRow};

/// Sample id prefixes of QC standards and blanks.
pub const EXCLUDED_PREFIXES: [&str; 2] = ["qc_", "blank_"];

// ---------------------------------------------------------------------------
// Clean filter: which samples are kept for analysis
// ---------------------------------------------------------------------------

/// A sample passes when:
/// * it is not flagged contaminated or no protein
/// * its id does not start with a QC or blank prefix
///
/// Rows whose flags were already dropped only get the prefix check.
pub fn is_clean(row: &SampleRow) -> bool {
    let flagged = row
        .qc
        .map(|f| f.contaminated || f.no_protein)
        .unwrap_or(false);
    !flagged && !EXCLUDED_PREFIXES.iter().any(|p| row.sample.starts_with(p))
}

/// Drop rows failing [`is_clean`], then drop the QC flag columns.
pub fn clean(mut table: ProteinTable) -> ProteinTable {
    let before = table.rows.len();
    table.rows.retain(is_clean);
    for row in &mut table.rows {
        row.qc = None;
    }
    table.cleaned = true;
    log::debug!(
        "Cleaning {} table kept {} of {before} samples",
        table.source,
        table.rows.len()
    );
    table
}
