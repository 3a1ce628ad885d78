//! GeoJSON parser for prioritization datasets.

use anyhow::{Result, ensure};

use crate::schema::PrioritizationDataset;

/// Decodes a [`PrioritizationDataset`] from raw GeoJSON bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON for the prioritization
/// schema, or if the document is not a `FeatureCollection`.
pub fn parse_dataset(bytes: &[u8]) -> Result<PrioritizationDataset> {
    let dataset: PrioritizationDataset = serde_json::from_slice(bytes)?;
    ensure!(
        dataset.collection_type == "FeatureCollection",
        "expected a FeatureCollection, got {:?}",
        dataset.collection_type
    );
    Ok(dataset)
}
