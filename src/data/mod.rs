/// Data layer: raw tables, schemas, reconciliation, assembly and counts.
///
/// Architecture:
/// ```text
///  .tsv / .txt  (mm, pd; current and old runs)
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  (source, name, revision) → path
///   │  loader   │  parse TSV → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐     ┌──────────┐
///   │ assemble  │◀────│  design   │  canonical sample ids, QC flags
///   └──────────┘     └──────────┘
///        │   (schema: per-revision column rules)
///        ▼
///   ┌──────────────┐
///   │ ProteinTable  │  samples × proteins
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop contaminated / no protein / QC / blank
///   │  counts   │  present proteins per sample
///   └──────────┘
/// ```

pub mod assemble;
pub mod counts;
pub mod design;
pub mod filter;
pub mod loader;
pub mod model;
pub mod schema;
pub mod source;
