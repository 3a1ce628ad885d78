//! Real-time commercial speed merge.
//!
//! Datasets built with `rt_data_included` advertise an endpoint
//! (`metadata.rt_data_url`) serving current per-way average speeds. The
//! endpoint returns a JSON array of samples which are merged into the
//! dataset's `speed_avg` property before the census runs.

use std::collections::HashMap;

use anyhow::Result;
use serde::Deserialize;
use tracing::debug;

use crate::schema::{DatasetMetadata, PrioritizationDataset};

/// Returns the dataset's advertised real-time endpoint, if it has a usable
/// one: the run was built with real-time data and names a non-empty URL.
pub fn advertised_rt_url(metadata: &DatasetMetadata) -> Option<&str> {
    (metadata.rt_data_included && !metadata.rt_data_url.is_empty())
        .then_some(metadata.rt_data_url.as_str())
}

/// One per-way speed sample from the real-time endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeedSample {
    pub way_osm_id: i64,
    /// Average commercial speed in km/h over the reporting interval.
    pub speed_avg: f64,
}

/// Decodes a list of [`SpeedSample`]s from raw JSON bytes.
pub fn parse_speeds(bytes: &[u8]) -> Result<Vec<SpeedSample>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Writes `samples` into the matching features' `speed_avg` property.
///
/// Samples for way ids not present in the dataset are ignored; later
/// samples for the same way overwrite earlier ones. Non-positive speeds are
/// merged as-is and left for the census positivity filter to discard.
/// Returns the number of features updated.
pub fn apply_speeds(dataset: &mut PrioritizationDataset, samples: &[SpeedSample]) -> usize {
    let by_way: HashMap<i64, f64> = samples
        .iter()
        .map(|s| (s.way_osm_id, s.speed_avg))
        .collect();

    let mut updated = 0;
    for feature in &mut dataset.features {
        if let Some(speed) = by_way.get(&feature.properties.way_osm_id) {
            feature.properties.speed_avg = Some(*speed);
            updated += 1;
        }
    }

    debug!(
        samples = samples.len(),
        updated, "Real-time speeds applied"
    );
    updated
}
