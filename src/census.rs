//! Descriptive statistics ("census") over segment properties.
//!
//! Drives the color-scale thresholds and popup content: for a chosen metric
//! the census reports min/max, quartiles, mean, median, and spread over all
//! segments that actually carry a value.

use std::collections::HashSet;

use clap::ValueEnum;
use serde::Serialize;

use crate::schema::{SegmentFeature, SegmentProperties};

/// Numeric segment properties a census can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Metric {
    /// Scheduled bus services per hour (`frequency`).
    Frequency,
    /// Average commercial speed in km/h (`speed_avg`).
    SpeedAvg,
    /// Total lane count (`n_lanes`).
    Lanes,
    /// Number of directions (`n_directions`).
    Directions,
    /// Lanes in the feature's direction (`n_lanes_direction`).
    LanesDirection,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Frequency,
        Metric::SpeedAvg,
        Metric::Lanes,
        Metric::Directions,
        Metric::LanesDirection,
    ];

    /// Property name as it appears in the GeoJSON schema.
    pub fn property_name(&self) -> &'static str {
        match self {
            Metric::Frequency => "frequency",
            Metric::SpeedAvg => "speed_avg",
            Metric::Lanes => "n_lanes",
            Metric::Directions => "n_directions",
            Metric::LanesDirection => "n_lanes_direction",
        }
    }

    /// Reads the metric from a property bag. Missing values become 0.0,
    /// which the census positivity filter then treats as absent data.
    pub fn extract(&self, props: &SegmentProperties) -> f64 {
        match self {
            Metric::Frequency => props.frequency.unwrap_or(0.0),
            Metric::SpeedAvg => props.speed_avg.unwrap_or(0.0),
            Metric::Lanes => props.n_lanes.map_or(0.0, f64::from),
            Metric::Directions => props.n_directions.map_or(0.0, f64::from),
            Metric::LanesDirection => props.n_lanes_direction.map_or(0.0, f64::from),
        }
    }
}

/// Summary statistics over one metric across a feature set.
///
/// Recomputed whenever the feature set or metric changes, never mutated
/// in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataCensus {
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p75: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub sd: f64,
}

/// Computes a [`DataCensus`] for `metric` over `features`.
///
/// Values ≤ 0 are treated as absent (dataset convention: a segment with no
/// service has frequency 0, not a measurement of zero). Returns `None` when
/// the input is empty or no valid values remain, so callers can distinguish
/// "no data" from "all zeros".
pub fn data_census<'a, I>(features: I, metric: Metric) -> Option<DataCensus>
where
    I: IntoIterator<Item = &'a SegmentFeature>,
{
    let mut values: Vec<f64> = features
        .into_iter()
        .map(|f| metric.extract(&f.properties))
        .filter(|v| *v > 0.0)
        .collect();

    if values.is_empty() {
        return None;
    }

    values.sort_by(f64::total_cmp);
    let n = values.len();

    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    } else {
        values[n / 2]
    };
    // Population variance: the feature set is the whole population, not a sample.
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;

    Some(DataCensus {
        min: values[0],
        max: values[n - 1],
        // Nearest-rank quartiles: floor(q * (n - 1)).
        p25: values[(0.25 * (n - 1) as f64).floor() as usize],
        p75: values[(0.75 * (n - 1) as f64).floor() as usize],
        mean,
        median,
        variance,
        sd: variance.sqrt(),
    })
}

/// Drops hourly repeats: features recur once per service hour under the
/// same `way_osm_id`, and only the first occurrence is kept.
pub fn dedup_by_way_id(features: &[SegmentFeature]) -> Vec<&SegmentFeature> {
    let mut seen = HashSet::new();
    features
        .iter()
        .filter(|f| seen.insert(f.properties.way_osm_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{Geometry, GeometryValue};

    fn segment(way_osm_id: i64, frequency: Option<f64>) -> SegmentFeature {
        SegmentFeature {
            feature_type: "Feature".to_string(),
            geometry: Geometry::new(GeometryValue::Point {
                coordinates: vec![-9.1399, 38.7169].into(),
            }),
            properties: SegmentProperties {
                way_osm_id,
                frequency,
                ..Default::default()
            },
        }
    }

    fn frequency_census(frequencies: &[Option<f64>]) -> Option<DataCensus> {
        let features: Vec<SegmentFeature> = frequencies
            .iter()
            .enumerate()
            .map(|(i, f)| segment(i as i64, *f))
            .collect();
        data_census(&features, Metric::Frequency)
    }

    #[test]
    fn test_empty_input_is_none() {
        assert_eq!(frequency_census(&[]), None);
    }

    #[test]
    fn test_all_invalid_is_none() {
        // Zeros, negatives and missing values are all "absent", not data.
        assert_eq!(frequency_census(&[Some(0.0), Some(-1.0), None]), None);
    }

    #[test]
    fn test_four_values() {
        let census = frequency_census(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]).unwrap();

        assert_eq!(census.min, 1.0);
        assert_eq!(census.max, 4.0);
        assert_eq!(census.mean, 2.5);
        assert_eq!(census.median, 2.5);
        assert_eq!(census.p25, 1.0); // floor(0.25 * 3) = 0
        assert_eq!(census.p75, 3.0); // floor(0.75 * 3) = 2
        assert_eq!(census.variance, 1.25);
        assert_eq!(census.sd, 1.25f64.sqrt());
    }

    #[test]
    fn test_single_value() {
        let census = frequency_census(&[Some(5.0)]).unwrap();

        assert_eq!(census.min, 5.0);
        assert_eq!(census.max, 5.0);
        assert_eq!(census.p25, 5.0);
        assert_eq!(census.p75, 5.0);
        assert_eq!(census.mean, 5.0);
        assert_eq!(census.median, 5.0);
        assert_eq!(census.variance, 0.0);
        assert_eq!(census.sd, 0.0);
    }

    #[test]
    fn test_non_positive_values_excluded() {
        // Only the 3 survives the filter, so this matches the single-value case.
        let census = frequency_census(&[Some(0.0), Some(-1.0), Some(3.0)]).unwrap();

        assert_eq!(census, frequency_census(&[Some(3.0)]).unwrap());
        assert_eq!(census.median, 3.0);
    }

    #[test]
    fn test_unsorted_input() {
        let census = frequency_census(&[Some(9.0), Some(1.0), Some(4.0)]).unwrap();

        assert_eq!(census.min, 1.0);
        assert_eq!(census.max, 9.0);
        assert_eq!(census.median, 4.0);
    }

    #[test]
    fn test_quartile_ordering_invariant() {
        let census =
            frequency_census(&[Some(2.0), Some(7.0), Some(1.0), Some(8.0), Some(3.0)]).unwrap();

        assert!(census.min <= census.p25);
        assert!(census.p25 <= census.median);
        assert!(census.median <= census.p75);
        assert!(census.p75 <= census.max);
        assert!(census.variance >= 0.0);
        assert_eq!(census.sd, census.variance.sqrt());
    }

    #[test]
    fn test_metric_extract_defaults_missing_to_zero() {
        let props = SegmentProperties {
            way_osm_id: 1,
            n_lanes: Some(3),
            ..Default::default()
        };

        assert_eq!(Metric::Frequency.extract(&props), 0.0);
        assert_eq!(Metric::Lanes.extract(&props), 3.0);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let features = vec![
            segment(10, Some(1.0)),
            segment(11, Some(2.0)),
            segment(10, Some(9.0)),
            segment(12, None),
            segment(11, Some(4.0)),
        ];

        let unique = dedup_by_way_id(&features);

        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].properties.way_osm_id, 10);
        assert_eq!(unique[0].properties.frequency, Some(1.0));
        assert_eq!(unique[1].properties.way_osm_id, 11);
        assert_eq!(unique[2].properties.way_osm_id, 12);
    }
}
