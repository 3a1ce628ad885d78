//! Region/run catalog.
//!
//! The viewer offers a fixed list of regions, each pointing at one
//! prioritization GeoJSON run. The catalog is a plain JSON array on disk:
//!
//! ```json
//! [
//!   {
//!     "id": "lisboa_gtfs2026-01-28_run20260123",
//!     "name": "Carris, Lisbon, PT",
//!     "geojson": "static/data/prioritization_lisboa_gtfs2026-01-28_run20260123.geojson",
//!     "date": "2026-01-28"
//!   }
//! ]
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One region entry: a named dataset run with its GTFS snapshot date.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegionEntry {
    pub id: String,
    pub name: String,
    /// Local path or URL of the run's GeoJSON file.
    pub geojson: String,
    pub date: NaiveDate,
}

/// Loads the region catalog from a JSON file at `path`.
pub fn load_regions(path: &str) -> Result<Vec<RegionEntry>> {
    let content = std::fs::read_to_string(path)?;
    let regions: Vec<RegionEntry> = serde_json::from_str(&content)?;
    Ok(regions)
}

/// Finds a region by its id.
pub fn find_region<'a>(regions: &'a [RegionEntry], id: &str) -> Option<&'a RegionEntry> {
    regions.iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {
            "id": "lisboa_gtfs2026-01-28_run20260123",
            "name": "Carris, Lisbon, PT",
            "geojson": "static/data/prioritization_lisboa_gtfs2026-01-28_run20260123.geojson",
            "date": "2026-01-28"
        },
        {
            "id": "cascais_gtfs2026-01-28_run20260127",
            "name": "MobiCascais, Cascais, PT",
            "geojson": "https://example.org/prioritization_cascais.geojson",
            "date": "2026-01-28"
        }
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let regions: Vec<RegionEntry> = serde_json::from_str(CATALOG).unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "Carris, Lisbon, PT");
        assert_eq!(
            regions[1].date,
            NaiveDate::from_ymd_opt(2026, 1, 28).unwrap()
        );
    }

    #[test]
    fn test_find_region() {
        let regions: Vec<RegionEntry> = serde_json::from_str(CATALOG).unwrap();

        let hit = find_region(&regions, "cascais_gtfs2026-01-28_run20260127");
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().name, "MobiCascais, Cascais, PT");

        assert!(find_region(&regions, "porto").is_none());
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_regions("/nonexistent/regions.json").is_err());
    }
}
