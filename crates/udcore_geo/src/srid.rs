//! `set_from_srid`: the large static switch mapping an EPSG SRID to a fully populated
//! [`GeoZone`], grounded on `original_source/Source/udGeoZone.cpp`'s `udGeoZone_SetFromSRID`.
//! Falls through to the dynamic registry (zones harvested from `load_zones_from_json` or parsed
//! WKT) for anything not covered by the static ranges below.

use std::f64::consts::PI;

use crate::datum::{self, DatumId};
use crate::ellipsoid::STD_ELLIPSOIDS;
use crate::projection::Projection;
use crate::registry;
use crate::zone::GeoZone;

const D2R: f64 = PI / 180.0;

fn build(datum_idx: usize, projection: Projection, meridian_deg: f64, parallel_deg: f64, scale: f64, fe: f64, fnn: f64) -> GeoZone {
    let descriptor = &datum::STD_DATUMS[datum_idx];
    let mut zone = GeoZone {
        datum: datum_idx,
        projection,
        semi_major_axis: STD_ELLIPSOIDS[descriptor.ellipsoid as usize].semi_major_axis,
        semi_minor_axis: STD_ELLIPSOIDS[descriptor.ellipsoid as usize].semi_minor_axis(),
        meridian: meridian_deg * D2R,
        parallel: parallel_deg * D2R,
        first_parallel: parallel_deg * D2R,
        scale_factor: scale,
        false_easting: fe,
        false_northing: fnn,
        datum_name: descriptor.datum_name.to_string(),
        datum_short_name: descriptor.short_name.to_string(),
        known_datum: true,
        ..GeoZone::default()
    };
    zone.update_spheroid_info();
    zone.update_display_name();
    zone
}

/// A UTM zone (north or south) for a given datum, grounded on the `32601..32660`/`32701..32760`
/// (and equivalent NAD83/ETRS89/GDA) arms of the original switch.
fn utm(datum_idx: usize, utm_zone: i32, south: bool) -> GeoZone {
    let meridian = -183.0 + 6.0 * utm_zone as f64;
    let mut zone = build(
        datum_idx,
        Projection::TransverseMercator,
        meridian,
        0.0,
        0.9996,
        500_000.0,
        if south { 10_000_000.0 } else { 0.0 },
    );
    zone.lat_bounds = if south { (-80.0 * D2R, 0.0) } else { (0.0, 84.0 * D2R) };
    zone.long_bounds = ((meridian - 3.0) * D2R, (meridian + 3.0) * D2R);
    zone
}

/// `(meridian, latitude of origin)` degrees for each of the 19 Japan Plane Rectangular CS zones,
/// shared between the JGD2000 (`2443..=2461`) and JGD2011 (`6669..=6687`) SRID ranges.
const JPRCS_ZONES: [(f64, f64); 19] = [
    (129.5, 33.0),
    (131.0, 33.0),
    (132.0 + 1.0 / 6.0, 36.0),
    (133.5, 33.0),
    (134.0 + 1.0 / 3.0, 36.0),
    (136.0, 36.0),
    (137.0 + 1.0 / 6.0, 36.0),
    (138.5, 36.0),
    (139.0 + 5.0 / 6.0, 36.0),
    (140.0 + 5.0 / 6.0, 40.0),
    (140.25, 44.0),
    (142.25, 44.0),
    (144.25, 44.0),
    (142.0, 26.0),
    (127.5, 26.0),
    (124.0, 26.0),
    (131.0, 26.0),
    (136.0, 20.0),
    (154.0, 26.0),
];

const JPRCS_NUMERALS: [&str; 19] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII", "XIII", "XIV", "XV",
    "XVI", "XVII", "XVIII", "XIX",
];

/// A Japan Plane Rectangular CS zone for `datum_idx` (JGD2000 or JGD2011), grounded on the
/// `jprcsRegions` table of the `2443..=2461`/`6669..=6687` arm.
fn japan_plane_rectangular(datum_idx: usize, zone_index: usize) -> Option<GeoZone> {
    let (meridian, parallel) = *JPRCS_ZONES.get(zone_index)?;
    let mut zone = build(datum_idx, Projection::TransverseMercator, meridian, parallel, 0.9999, 0.0, 0.0);
    zone.zone_name = format!("Japan Plane Rectangular CS {}", JPRCS_NUMERALS[zone_index]);
    zone.lat_bounds = (0.0, 84.0 * D2R);
    zone.long_bounds = ((meridian - 3.0) * D2R, (meridian + 3.0) * D2R);
    Some(zone)
}

/// `(lonMin, latMin, lonMax, latMax)` degrees for each of the 21 CGCS2000 3-degree Gauss-Kruger
/// zones, grounded on the `cgcsRegions` table of the `4534..=4554` arm.
const CGCS2000_BOUNDS: [(f64, f64, f64, f64); 21] = [
    (73.62, 35.81, 76.5, 40.65),
    (76.5, 31.03, 79.5, 41.83),
    (79.5, 29.95, 82.51, 45.88),
    (82.5, 28.26, 85.5, 47.23),
    (85.5, 27.8, 88.5, 49.18),
    (88.49, 27.32, 91.51, 48.42),
    (91.5, 27.71, 94.5, 45.13),
    (94.5, 28.23, 97.51, 44.5),
    (97.5, 21.43, 100.5, 42.76),
    (100.5, 21.13, 103.5, 42.69),
    (103.5, 22.5, 106.5, 42.21),
    (106.5, 18.19, 109.5, 42.47),
    (109.5, 18.11, 112.5, 45.11),
    (112.5, 21.52, 115.5, 45.45),
    (115.5, 22.6, 118.5, 49.88),
    (118.5, 24.43, 121.5, 53.33),
    (121.5, 28.22, 124.5, 53.56),
    (124.5, 40.19, 127.5, 53.2),
    (127.5, 41.37, 130.5, 50.25),
    (130.5, 42.42, 133.5, 48.88),
    (133.5, 45.85, 134.77, 48.4),
];

/// A CGCS2000 3-degree Gauss-Kruger zone, grounded on the `4534..=4554` arm: `meridian = 75 +
/// zone*3`, falseEasting fixed at 500000, bounds taken from [`CGCS2000_BOUNDS`].
fn cgcs2000_gauss_kruger(zone_index: usize) -> Option<GeoZone> {
    let (lon_min, lat_min, lon_max, lat_max) = *CGCS2000_BOUNDS.get(zone_index)?;
    let meridian = 75.0 + zone_index as f64 * 3.0;
    let mut zone = build(
        DatumId::Cgcs2000 as usize,
        Projection::TransverseMercator,
        meridian,
        0.0,
        1.0,
        500_000.0,
        0.0,
    );
    zone.zone_name = format!("3-degree Gauss-Kruger CM {}E", meridian as i32);
    zone.lat_bounds = (lat_min * D2R, lat_max * D2R);
    zone.long_bounds = (lon_min * D2R, lon_max * D2R);
    Some(zone)
}

/// A France Conic Conformal CC42..CC50 zone (RGF93 `3942..=3950` or RGF93v2b `9842..=9850`),
/// grounded on the France Conic Conformal arm: first/second standard parallels sit 0.75 degrees
/// either side of the zone's central parallel, which `build`'s single-parallel signature can't
/// express, so its defaults are overwritten here.
fn france_conic_conformal(datum_idx: usize, zone: i32) -> GeoZone {
    let parallel = 42.0 + zone as f64;
    let mut geo_zone = build(
        datum_idx,
        Projection::LambertConformalConic2Sp,
        3.0,
        parallel,
        1.0,
        1_700_000.0,
        1_200_000.0 + 1_000_000.0 * zone as f64,
    );
    geo_zone.first_parallel = (parallel - 0.75) * D2R;
    geo_zone.second_parallel = (parallel + 0.75) * D2R;
    geo_zone.zone_name = format!("CC{}", 42 + zone);
    geo_zone.lat_bounds = ((parallel - 1.0) * D2R, (parallel + 1.0) * D2R);
    geo_zone.long_bounds = (-2.0 * D2R, 10.0 * D2R);
    geo_zone
}

/// A DB_REF 3-degree Gauss-Kruger zone (`5682..=5685`, zone numbers start at 2), grounded on the
/// DB_REF arm: `meridian = 3*zone`, `falseEasting = 500000 + 1000000*zone`.
fn db_ref_gauss_kruger(zone: i32) -> GeoZone {
    let meridian = 3.0 * zone as f64;
    let mut geo_zone = build(
        DatumId::Dbref as usize,
        Projection::TransverseMercator,
        meridian,
        0.0,
        1.0,
        500_000.0 + 1_000_000.0 * zone as f64,
        0.0,
    );
    geo_zone.zone_name = format!("3-degree Gauss-Kruger zone {zone} (E-N)");
    geo_zone
}

/// Austria MGI zones (`31284..=31287`): three Transverse Mercator "M" zones plus one Lambert
/// zone, grounded on the `31284..=31287` arm.
fn austria_mgi(srid: i32) -> Option<GeoZone> {
    let meridian = match srid {
        31284 => 10.333_333_333_333_33,
        31285 | 31287 => 13.333_333_333_333_33,
        31286 => 16.333_333_333_333_33,
        _ => return None,
    };
    let mut zone = match srid {
        31284 => build(DatumId::Mgi as usize, Projection::TransverseMercator, meridian, 0.0, 1.0, 150_000.0, 0.0),
        31285 => build(DatumId::Mgi as usize, Projection::TransverseMercator, meridian, 0.0, 1.0, 450_000.0, 0.0),
        31286 => build(DatumId::Mgi as usize, Projection::TransverseMercator, meridian, 0.0, 1.0, 750_000.0, 0.0),
        31287 => {
            let mut zone = build(DatumId::Mgi as usize, Projection::LambertConformalConic2Sp, meridian, 47.5, 1.0, 400_000.0, 400_000.0);
            zone.first_parallel = 49.0 * D2R;
            zone.second_parallel = 46.0 * D2R;
            zone
        }
        _ => unreachable!(),
    };
    let suffix = match srid {
        31284 => "M28",
        31285 => "M31",
        31286 => "M34",
        31287 => "Lambert",
        _ => unreachable!(),
    };
    zone.zone_name = format!("Austria {suffix}");
    zone.lat_bounds = (0.0, 84.0 * D2R);
    zone.long_bounds = ((meridian - 3.0) * D2R, (meridian + 3.0) * D2R);
    Some(zone)
}

/// Austria MGI Gauss-Kruger zones (`31254..=31259`), grounded on the `31254..=31259` arm.
fn austria_gauss_kruger(srid: i32) -> Option<GeoZone> {
    let (meridian, fe, suffix) = match srid {
        31254 => (10.333_333_333_333_33, 0.0, "GK West"),
        31255 => (13.333_333_333_333_33, 0.0, "GK Central"),
        31256 => (16.333_333_333_333_33, 0.0, "GK East"),
        31257 => (10.333_333_333_333_33, 150_000.0, "GK M28"),
        31258 => (13.333_333_333_333_33, 450_000.0, "GK M31"),
        31259 => (16.333_333_333_333_33, 750_000.0, "GK M34"),
        _ => return None,
    };
    let mut zone = build(DatumId::Mgi as usize, Projection::TransverseMercator, meridian, 0.0, 1.0, fe, -5_000_000.0);
    zone.zone_name = format!("Austria {suffix}");
    zone.lat_bounds = (0.0, 84.0 * D2R);
    zone.long_bounds = ((meridian - 3.0) * D2R, (meridian + 3.0) * D2R);
    Some(zone)
}

/// Populates a zone from an EPSG SRID, mirroring `udGeoZone_SetFromSRID`'s large switch.
#[must_use]
pub fn set_from_srid(srid: i32) -> Option<GeoZone> {
    set_from_srid_inner(srid).map(|mut zone| {
        zone.srid = srid;
        zone
    })
}

fn set_from_srid_inner(srid: i32) -> Option<GeoZone> {
    if srid == 0 {
        return Some(GeoZone::not_geolocated());
    }

    if (32601..=32660).contains(&srid) {
        return Some(utm(DatumId::Wgs84 as usize, srid - 32600, false));
    }
    if (32701..=32760).contains(&srid) {
        return Some(utm(DatumId::Wgs84 as usize, srid - 32700, true));
    }
    if (25828..=25838).contains(&srid) {
        return Some(utm(DatumId::Etrs89 as usize, srid - 25800, false));
    }
    if (26901..=26923).contains(&srid) {
        return Some(utm(DatumId::Nad83 as usize, srid - 26900, false));
    }
    if (28348..=28356).contains(&srid) {
        return Some(utm(DatumId::Gda94 as usize, srid - 28300, true));
    }
    if (7846..=7859).contains(&srid) {
        return Some(utm(DatumId::Gda2020 as usize, srid - 7800, true));
    }
    if (31284..=31287).contains(&srid) {
        return austria_mgi(srid);
    }
    if (31254..=31259).contains(&srid) {
        return austria_gauss_kruger(srid);
    }
    if (4534..=4554).contains(&srid) {
        return cgcs2000_gauss_kruger((srid - 4534) as usize);
    }
    if (2443..=2461).contains(&srid) {
        return japan_plane_rectangular(DatumId::Jgd2000 as usize, (srid - 2443) as usize);
    }
    if (6669..=6687).contains(&srid) {
        return japan_plane_rectangular(DatumId::Jgd2011 as usize, (srid - 6669) as usize);
    }
    if (3942..=3950).contains(&srid) {
        return Some(france_conic_conformal(DatumId::Rgf93 as usize, srid - 3942));
    }
    if (9842..=9850).contains(&srid) {
        return Some(france_conic_conformal(DatumId::Rgf93V2b as usize, srid - 9842));
    }
    if (5682..=5685).contains(&srid) {
        return Some(db_ref_gauss_kruger(srid - 5680));
    }

    match srid {
        84 => {
            let mut zone = build(DatumId::Wgs84 as usize, Projection::LongLat, 0.0, 0.0, 1.0, 0.0, 0.0);
            zone.zone_name = "CRS:84".to_string();
            Some(zone)
        }
        2154 => {
            let mut zone = build(DatumId::Rgf93 as usize, Projection::LambertConformalConic2Sp, 3.0, 46.5, 1.0, 700_000.0, 6_600_000.0);
            zone.zone_name = "Lambert-93".to_string();
            zone.first_parallel = 49.0 * D2R;
            zone.second_parallel = 44.0 * D2R;
            zone.lat_bounds = (41.18 * D2R, 51.54 * D2R);
            zone.long_bounds = (-9.62 * D2R, 10.30 * D2R);
            Some(zone)
        }
        9794 => {
            let mut zone = build(DatumId::Rgf93V2b as usize, Projection::LambertConformalConic2Sp, 3.0, 46.5, 1.0, 700_000.0, 6_600_000.0);
            zone.zone_name = "Lambert-93".to_string();
            zone.first_parallel = 49.0 * D2R;
            zone.second_parallel = 44.0 * D2R;
            zone.lat_bounds = (41.18 * D2R, 51.54 * D2R);
            zone.long_bounds = (-9.62 * D2R, 10.30 * D2R);
            Some(zone)
        }
        2193 => Some(build(DatumId::Nzgd2000 as usize, Projection::TransverseMercator, 173.0, 0.0, 0.9996, 1_600_000.0, 10_000_000.0)),
        3857 => Some(build(DatumId::Wgs84 as usize, Projection::WebMercator, 0.0, 0.0, 1.0, 0.0, 0.0)),
        4087 => Some(build(DatumId::Wgs84 as usize, Projection::EquidistantCylindrical, 0.0, 0.0, 1.0, 0.0, 0.0)),
        4326 => Some(build(DatumId::Wgs84 as usize, Projection::LatLong, 0.0, 0.0, 1.0, 0.0, 0.0)),
        4936 => Some(build(DatumId::Etrs89 as usize, Projection::Ecef, 0.0, 0.0, 1.0, 0.0, 0.0)),
        4978 => Some(build(DatumId::Wgs84 as usize, Projection::Ecef, 0.0, 0.0, 1.0, 0.0, 0.0)),
        3112 => Some(build(DatumId::Gda94 as usize, Projection::LambertConformalConic2Sp, 134.0, 0.0, 1.0, 0.0, 0.0)),
        3174 => Some(build(DatumId::Nad83 as usize, Projection::AlbersEqualArea, -86.0, 0.0, 1.0, 1_000_000.0, 0.0)),
        3414 => Some(build(DatumId::Svy21 as usize, Projection::TransverseMercator, 103.833_333, 1.366_666_7, 1.0, 28_001.642, 38_744.572)),
        27700 => Some(build(DatumId::Osgb36 as usize, Projection::TransverseMercator, -2.0, 49.0, 0.999_601_27, 400_000.0, -100_000.0)),
        28992 => Some(build(DatumId::Amersfoort as usize, Projection::StereographicObliqueEquatorial, 5.387_638_889, 52.156_160_556, 0.999_908, 155_000.0, 463_000.0)),
        8353 => Some(build(DatumId::Sjtsk03 as usize, Projection::KrovakNorthOrientated, 24.833_333, 49.5, 0.9999, 0.0, 0.0)),
        30175 => Some(build(DatumId::MoonMerc as usize, Projection::Mercator, 0.0, 0.0, 1.0, 0.0, 0.0)),
        30101 => Some(build(DatumId::MoonPcpf as usize, Projection::Ecef, 0.0, 0.0, 1.0, 0.0, 0.0)),
        49975 => Some(build(DatumId::MarsMerc as usize, Projection::Mercator, 0.0, 0.0, 1.0, 0.0, 0.0)),
        8705 => Some(build(DatumId::MarsPcpf as usize, Projection::Ecef, 0.0, 0.0, 1.0, 0.0, 0.0)),
        31700 => Some(build(DatumId::Dealul1970 as usize, Projection::StereographicObliqueEquatorial, 25.383_333_3, 46.0, 0.999_75, 500_000.0, 500_000.0)),
        19920 => Some(build(DatumId::Singgrid as usize, Projection::CassiniSoldner, 103.833_333, 1.366_666_7, 1.0, 30_000.0, 30_000.0)),
        3139 => Some(build(DatumId::Vanua1915 as usize, Projection::CassiniSoldnerHyperbolic, 179.333_333_3, -16.25, 1.0, 550_000.0, 1_000_000.0)),
        30200 => Some(build(DatumId::Tri1903 as usize, Projection::CassiniSoldner, -61.333_333, 10.441_666_7, 1.0, 430_000.0, 325_000.0)),
        2326 => Some(build(DatumId::Hk1980 as usize, Projection::TransverseMercator, 114.178_555_6, 22.312_131_1, 1.0, 836_694.05, 819_069.8)),
        29873 => Some(build(DatumId::Timb1948 as usize, Projection::HotineObliqueMercatorVb, 115.0, 5.0, 0.99984, 590_476.87, 442_857.7)),
        _ => {
            // Outside the static switch; consult the registry harvested from `load_zones_from_json`.
            registry::find_srid_zone(srid)
        }
    }
}

/// Maps a WGS-84-normalised lat/long (radians) to a UTM SRID, grounded on `udGeoZone_FindSRID`.
#[must_use]
pub fn find_srid(lat: f64, lon: f64) -> Option<i32> {
    let lon_deg = lon * 180.0 / PI;
    let lat_deg = lat * 180.0 / PI;
    let zone = ((lon_deg + 186.0) / 6.0).floor() as i32;
    if !(1..=60).contains(&zone) {
        return None;
    }
    Some(if lat_deg >= 0.0 { 32600 + zone } else { 32700 + zone })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wgs84_utm_zone_56_south() {
        let zone = set_from_srid(32756).unwrap();
        assert_eq!(zone.projection, Projection::TransverseMercator);
        assert!((zone.meridian - 153.0 * D2R).abs() < 1e-9);
        assert_eq!(zone.false_northing, 10_000_000.0);
    }

    #[test]
    fn srid_zero_is_not_geolocated() {
        let zone = set_from_srid(0).unwrap();
        assert_eq!(zone.srid, 0);
        assert_eq!(zone.projection, Projection::Unknown);
    }

    #[test]
    fn unknown_srid_falls_through_to_registry() {
        assert!(set_from_srid(999_999_999).is_none());
    }

    #[test]
    fn find_srid_picks_correct_utm_zone() {
        assert_eq!(find_srid(-27.0 * D2R, 153.0 * D2R), Some(32756));
        assert_eq!(find_srid(51.5 * D2R, -0.1 * D2R), Some(32630));
    }
}
