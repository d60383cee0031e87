//! Faceted bar chart of protein counts, emitted as a Vega-Lite spec.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::color::ColorMap;
use crate::config::DataLayout;
use crate::data::counts::{get_proteins_found_count, CountSelection};
use crate::data::model::ProteinCount;
use crate::data::source::Measure;
use crate::error::Result;

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";
const FACET_COLUMNS: u32 = 15;

// ---------------------------------------------------------------------------
// Chart – serializable Vega-Lite spec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub data: ChartData,
    pub facet: Facet,
    pub columns: u32,
    pub spec: BarSpec,
    pub config: Config,
    pub resolve: Resolve,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub values: Vec<ChartRecord>,
}

/// One bar: a tool's protein count for a sample.
#[derive(Debug, Clone, Serialize)]
pub struct ChartRecord {
    #[serde(flatten)]
    pub count: ProteinCount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_type_condition: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Facet {
    pub field: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub header: Header,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub label_orient: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct BarSpec {
    pub mark: &'static str,
    pub encoding: Encoding,
}

#[derive(Debug, Clone, Serialize)]
pub struct Encoding {
    pub x: PositionChannel,
    pub y: PositionChannel,
    pub color: ColorChannel,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionChannel {
    pub field: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub axis: Axis,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub title: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_y: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorChannel {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub scale: Scale,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scale {
    pub domain: Vec<String>,
    pub range: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub facet: FacetConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct FacetConfig {
    pub spacing: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resolve {
    pub axis: ResolveAxis,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveAxis {
    pub x: &'static str,
    pub y: &'static str,
}

impl Chart {
    /// Bars of protein counts from both tools, one facet per sample.
    ///
    /// Cleaned counts are coloured by sample type and condition; otherwise
    /// bars are coloured by QC status with a fixed legend.
    pub fn from_counts(counts: Vec<ProteinCount>, clean: bool) -> Self {
        let values: Vec<ChartRecord> = counts
            .into_iter()
            .map(|count| ChartRecord {
                sample_type_condition: clean.then(|| count.sample_type_condition()),
                count,
            })
            .collect();

        let color_map = if clean {
            let labels: BTreeSet<String> = values
                .iter()
                .filter_map(|r| r.sample_type_condition.clone())
                .collect();
            ColorMap::new("sample_type_condition", &labels)
        } else {
            ColorMap::status()
        };
        let (domain, range) = color_map.legend_entries().into_iter().unzip();

        Chart {
            schema: VEGA_LITE_SCHEMA,
            data: ChartData { values },
            facet: Facet {
                field: "sample",
                kind: "nominal",
                header: Header {
                    label_orient: "bottom",
                },
            },
            columns: FACET_COLUMNS,
            spec: BarSpec {
                mark: "bar",
                encoding: Encoding {
                    x: PositionChannel {
                        field: "software",
                        kind: "nominal",
                        axis: Axis {
                            title: Some(" "),
                            title_y: Some(-320),
                        },
                    },
                    y: PositionChannel {
                        field: "protein_count",
                        kind: "quantitative",
                        axis: Axis {
                            title: None,
                            title_y: None,
                        },
                    },
                    color: ColorChannel {
                        field: color_map.field.clone(),
                        kind: "nominal",
                        scale: Scale { domain, range },
                    },
                },
            },
            config: Config {
                facet: FacetConfig { spacing: 0 },
            },
            resolve: Resolve {
                axis: ResolveAxis {
                    x: "independent",
                    y: "independent",
                },
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the protein count chart for both tools.
pub fn make_proteins_counts_plot(layout: &DataLayout, measure: Measure, clean: bool) -> Result<Chart> {
    let counts = get_proteins_found_count(layout, CountSelection::Both, measure, clean)?;
    log::debug!("Charting {} protein counts", counts.len());
    Ok(Chart::from_counts(counts, clean))
}
