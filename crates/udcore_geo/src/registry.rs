//! The process-wide dynamic zone registry: zones harvested from `load_zones_from_json` or from
//! parsing unrecognised WKT, consulted by `set_from_srid` once the static switch misses, grounded
//! on `original_source/Source/udGeoZone.cpp`'s `g_InternalGeoZoneList` /
//! `udGeoZone_InternalIndexOf` / `udGeoZone_LoadZonesFromJSON` / `udGeoZone_UnloadZones`.

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use udcore_log::{debug, warn};
use udcore_result::{UdResult, UdResultCode};

use crate::wkt;
use crate::zone::GeoZone;

static DYNAMIC_ZONES: Lazy<Mutex<Vec<GeoZone>>> = Lazy::new(|| Mutex::new(Vec::new()));

fn index_of(zones: &[GeoZone], srid: i32) -> Result<usize, usize> {
    zones.binary_search_by_key(&srid, |z| z.srid)
}

/// Looks up a zone previously loaded into the dynamic registry, by SRID.
#[must_use]
pub fn find_srid_zone(srid: i32) -> Option<GeoZone> {
    let zones = DYNAMIC_ZONES.lock();
    index_of(&zones, srid).ok().map(|i| zones[i].clone())
}

/// Parses a `{"AUTHORITY:SRID": "WKT..."}` JSON object and inserts each successfully-parsed zone
/// into the dynamic registry (sorted by SRID, duplicates overwrite), returning
/// `(loaded, failed)` counts, grounded on `udGeoZone_LoadZonesFromJSON`.
pub fn load_zones_from_json(json_text: &str) -> UdResult<(usize, usize)> {
    let value: serde_json::Value =
        serde_json::from_str(json_text).map_err(|_| UdResultCode::ParseError)?;
    let object = value.as_object().ok_or(UdResultCode::ParseError)?;

    let mut loaded = 0usize;
    let mut failed = 0usize;
    for (key, wkt_value) in object {
        let srid = key
            .rsplit(':')
            .next()
            .and_then(|s| s.parse::<i32>().ok());
        let Some(srid) = srid else {
            warn!("udcore_geo: malformed registry key {key:?}, skipping");
            failed += 1;
            continue;
        };
        let Some(wkt_text) = wkt_value.as_str() else {
            failed += 1;
            continue;
        };

        match wkt::set_from_wkt(wkt_text) {
            Ok(mut zone) => {
                zone.srid = srid;
                insert_sorted(zone);
                loaded += 1;
            }
            Err(e) => {
                debug!("udcore_geo: failed to parse WKT for {key}: {e}");
                failed += 1;
            }
        }
    }
    Ok((loaded, failed))
}

fn insert_sorted(zone: GeoZone) {
    let mut zones = DYNAMIC_ZONES.lock();
    match index_of(&zones, zone.srid) {
        Ok(i) => zones[i] = zone,
        Err(i) => zones.insert(i, zone),
    }
}

/// Clears every zone loaded via [`load_zones_from_json`] or WKT parsing, grounded on
/// `udGeoZone_UnloadZones`.
pub fn unload_zones() {
    DYNAMIC_ZONES.lock().clear();
    crate::datum::clear_dynamic();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_find_round_trips() {
        unload_zones();
        let json = r#"{"EPSG:900913": "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563]],PRIMEM[\"Greenwich\",0],UNIT[\"degree\",0.0174532925199433],AUTHORITY[\"EPSG\",\"900913\"]]"}"#;
        let (loaded, failed) = load_zones_from_json(json).unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(failed, 0);
        assert!(find_srid_zone(900_913).is_some());
        unload_zones();
        assert!(find_srid_zone(900_913).is_none());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        unload_zones();
        assert!(load_zones_from_json("not json").is_err());
    }
}
