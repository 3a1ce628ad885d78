//! Typed mirror of the prioritization GeoJSON schema.
//!
//! A prioritization dataset is a GeoJSON `FeatureCollection` with a foreign
//! `metadata` member describing the region, the GTFS snapshot the run was
//! built from, the OSM query used to select ways, and optional real-time
//! data descriptors. Segment properties are optional/nullable: a missing
//! value means "not surveyed", not zero.

use chrono::{DateTime, NaiveDate, Utc};
use geojson::Geometry;
use serde::{Deserialize, Serialize};

/// A full prioritization dataset for one region/run.
#[derive(Debug, Deserialize, Serialize)]
pub struct PrioritizationDataset {
    #[serde(rename = "type")]
    pub collection_type: String,
    pub metadata: DatasetMetadata,
    pub features: Vec<SegmentFeature>,
}

/// Provenance and run parameters attached to a dataset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetMetadata {
    pub region: String,
    pub generated_at: DateTime<Utc>,
    pub gtfs_source: String,
    pub gtfs_date: NaiveDate,
    pub stop_buffer_size_meters: f64,

    // real-time data descriptors
    pub rt_data_included: bool,
    #[serde(default)]
    pub rt_data_url: String,
    #[serde(default)]
    pub rt_interval: String,

    // pipeline environment
    pub r_version: String,
    pub gtfshift_version: String,

    // route coverage of the GTFS snapshot
    pub routes_missing: String,
    pub routes_covered: u32,
    pub routes_total: u32,

    pub osm_query: Vec<OsmQueryFilter>,
}

/// One key/value filter from the OSM Overpass query that selected the ways.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OsmQueryFilter {
    pub key: String,
    pub value: String,
    pub key_exact: bool,
}

/// A single street segment: geometry plus per-segment statistics.
#[derive(Debug, Deserialize, Serialize)]
pub struct SegmentFeature {
    #[serde(rename = "type")]
    pub feature_type: String,
    pub geometry: Geometry,
    pub properties: SegmentProperties,
}

/// Per-segment property bag. Every statistic is nullable.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SegmentProperties {
    /// OSM way id. Features repeat per service hour under the same id.
    pub way_osm_id: i64,
    #[serde(default)]
    pub hour: Option<u8>,
    /// Scheduled bus services per hour over this segment.
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub is_bus_lane: Option<bool>,
    #[serde(default)]
    pub n_lanes: Option<u32>,
    #[serde(default)]
    pub n_directions: Option<u32>,
    #[serde(default)]
    pub n_lanes_direction: Option<u32>,
    /// Average commercial speed in km/h, present when real-time data was merged.
    #[serde(default)]
    pub speed_avg: Option<f64>,
    /// Comma-separated route short names serving the segment.
    #[serde(default)]
    pub route_names: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_default_to_none() {
        let props: SegmentProperties = serde_json::from_str(r#"{"way_osm_id": 42}"#).unwrap();

        assert_eq!(props.way_osm_id, 42);
        assert_eq!(props.frequency, None);
        assert_eq!(props.n_lanes, None);
        assert_eq!(props.speed_avg, None);
    }

    #[test]
    fn test_properties_null_fields_accepted() {
        let props: SegmentProperties = serde_json::from_str(
            r#"{"way_osm_id": 7, "frequency": null, "n_lanes": 2, "is_bus_lane": true}"#,
        )
        .unwrap();

        assert_eq!(props.frequency, None);
        assert_eq!(props.n_lanes, Some(2));
        assert_eq!(props.is_bus_lane, Some(true));
    }
}
