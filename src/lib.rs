//! Loading utilities for the organoid proteomics runs.
//!
//! Raw MetaMorpheus (`mm`) and Proteome Discoverer (`pd`) output tables are
//! read from a fixed on-disk layout, reshaped into samples-by-proteins
//! tables keyed by a canonical sample id, and summarised into per-sample
//! protein counts for plotting.
//!
//! ```rust,ignore
//! use protein_tables::*;
//!
//! let layout = DataLayout::from_env();
//! let table = load_protein_table(&layout, Source::ProteomeDiscoverer, Measure::Quant, true, false)?;
//! let chart = make_proteins_counts_plot(&layout, Measure::Quant, true)?;
//! println!("{}", chart.to_json()?);
//! ```

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;

pub use chart::{make_proteins_counts_plot, Chart};
pub use config::DataLayout;
pub use data::assemble::load_protein_table;
pub use data::counts::{get_proteins_found_count, CountSelection};
pub use data::model::{Cell, ProteinCount, ProteinTable, QcFlags, QcStatus, RawTable, SampleRow};
pub use data::source::{load_table, Measure, Revision, Source, TableName};
pub use error::{Error, ReconcileError, Result};
