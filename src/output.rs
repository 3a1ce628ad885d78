//! Output formatting and persistence for census results.
//!
//! Supports pretty-printed JSON reports and CSV append, one row per
//! (region, metric) census.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::census::{DataCensus, Metric, data_census, dedup_by_way_id};
use crate::schema::PrioritizationDataset;

/// One CSV row: the census of a single metric over a single dataset.
///
/// Statistic cells are empty (not zero) when the dataset had no valid
/// values for the metric.
#[derive(Debug, Serialize)]
pub struct CensusRecord {
    pub recorded_at: DateTime<Utc>,
    pub region: String,
    pub gtfs_date: NaiveDate,
    pub metric: String,
    pub segments_total: usize,
    pub segments_unique: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub p25: Option<f64>,
    pub p75: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub variance: Option<f64>,
    pub sd: Option<f64>,
}

impl CensusRecord {
    pub fn new(
        dataset: &PrioritizationDataset,
        metric: Metric,
        segments_unique: usize,
        census: Option<DataCensus>,
    ) -> Self {
        CensusRecord {
            recorded_at: Utc::now(),
            region: dataset.metadata.region.clone(),
            gtfs_date: dataset.metadata.gtfs_date,
            metric: metric.property_name().to_string(),
            segments_total: dataset.features.len(),
            segments_unique,
            min: census.map(|c| c.min),
            max: census.map(|c| c.max),
            p25: census.map(|c| c.p25),
            p75: census.map(|c| c.p75),
            mean: census.map(|c| c.mean),
            median: census.map(|c| c.median),
            variance: census.map(|c| c.variance),
            sd: census.map(|c| c.sd),
        }
    }
}

/// All-metric census plus dataset provenance, emitted by `summary`.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub region: String,
    pub generated_at: DateTime<Utc>,
    pub gtfs_source: String,
    pub gtfs_date: NaiveDate,
    pub rt_data_included: bool,
    pub route_coverage_percent: f64,
    pub segments_total: usize,
    pub segments_unique: usize,
    pub metrics: BTreeMap<&'static str, Option<DataCensus>>,
}

impl SummaryReport {
    /// Censuses every metric over the deduplicated feature set.
    pub fn from_dataset(dataset: &PrioritizationDataset) -> Self {
        let unique = dedup_by_way_id(&dataset.features);

        let metrics = Metric::ALL
            .iter()
            .map(|m| {
                (
                    m.property_name(),
                    data_census(unique.iter().copied(), *m),
                )
            })
            .collect();

        SummaryReport {
            region: dataset.metadata.region.clone(),
            generated_at: dataset.metadata.generated_at,
            gtfs_source: dataset.metadata.gtfs_source.clone(),
            gtfs_date: dataset.metadata.gtfs_date,
            rt_data_included: dataset.metadata.rt_data_included,
            route_coverage_percent: pct(
                dataset.metadata.routes_covered as usize,
                dataset.metadata.routes_total as usize,
            ),
            segments_total: dataset.features.len(),
            segments_unique: unique.len(),
            metrics,
        }
    }
}

/// Percentage of `part` in `total`, 0.0 when `total` is 0.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Logs a report as pretty-printed JSON.
pub fn print_json(report: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Appends a [`CensusRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &CensusRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
