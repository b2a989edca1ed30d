//! Datum conversion, point transform, and matrix transform, grounded on
//! `original_source/Source/udGeoZone.cpp`'s `udGeoZone_ConvertDatum` / `udGeoZone_TransformPoint`
//! / `udGeoZone_TransformMatrix`.

use std::f64::consts::PI;

use glam::{DMat4, DVec3, DVec4};

use crate::datum::{self, DatumId, Helmert7};
use crate::ellipsoid::STD_ELLIPSOIDS;
use crate::projection::{cartesian_to_lat_long, lat_long_to_cartesian};
use crate::zone::GeoZone;

const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Geodetic (lat, lon, h in radians/metres) to geocentric (ECEF) cartesian, for a specific
/// ellipsoid rather than a whole zone.
#[must_use]
fn geodetic_to_geocentric(semi_major_axis: f64, eccentricity_sq: f64, lat_long: DVec3) -> DVec3 {
    let (lat, lon, h) = (lat_long.x, lat_long.y, lat_long.z);
    let n = semi_major_axis / (1.0 - eccentricity_sq * lat.sin().powi(2)).sqrt();
    let x = (n + h) * lat.cos() * lon.cos();
    let y = (n + h) * lat.cos() * lon.sin();
    let z = (n * (1.0 - eccentricity_sq) + h) * lat.sin();
    DVec3::new(x, y, z)
}

/// Geocentric (ECEF) cartesian to geodetic (lat, lon, h), iterating height/latitude together to
/// convergence, mirroring the `Ecef` arm of `cartesian_to_lat_long`.
#[must_use]
fn geocentric_to_geodetic(semi_major_axis: f64, eccentricity_sq: f64, xyz: DVec3) -> DVec3 {
    let (x, y, z) = (xyz.x, xyz.y, xyz.z);
    let p = x.hypot(y);
    let lon = y.atan2(x);
    let mut lat = (z / (p * (1.0 - eccentricity_sq))).atan();
    let mut height = 0.0;
    for _ in 0..8 {
        let n = semi_major_axis / (1.0 - eccentricity_sq * lat.sin().powi(2)).sqrt();
        height = p / lat.cos() - n;
        lat = (z / p / (1.0 - eccentricity_sq * n / (n + height))).atan();
    }
    DVec3::new(lat, lon, height)
}

/// Applies a Helmert-7 position-vector transform (small-angle rotations in arc-seconds, scale in
/// ppm) to a geocentric point.
#[must_use]
fn apply_helmert(xyz: DVec3, h: &Helmert7) -> DVec3 {
    if h.is_identity() {
        return xyz;
    }
    let rx = h.rx * ARCSEC_TO_RAD;
    let ry = h.ry * ARCSEC_TO_RAD;
    let rz = h.rz * ARCSEC_TO_RAD;
    let scale = 1.0 + h.ds * 1e-6;
    DVec3::new(
        h.tx + scale * (xyz.x - rz * xyz.y + ry * xyz.z),
        h.ty + scale * (rz * xyz.x + xyz.y - rx * xyz.z),
        h.tz + scale * (-ry * xyz.x + rx * xyz.y + xyz.z),
    )
}

/// Converts a geodetic coordinate (lat, lon, h in radians/metres) from `source_datum` to
/// `target_datum`. If neither is WGS-84, the transform is decomposed through WGS-84: geodetic ->
/// geocentric (source ellipsoid), Helmert-7 (negated on the WGS-84 -> target leg), geocentric ->
/// geodetic (target ellipsoid), grounded on `udGeoZone_ConvertDatum`.
#[must_use]
pub fn convert_datum(source_datum: usize, target_datum: usize, lat_long: DVec3) -> DVec3 {
    if source_datum == target_datum {
        return lat_long;
    }
    let Some(source) = datum::descriptor(source_datum) else {
        return lat_long;
    };
    let Some(target) = datum::descriptor(target_datum) else {
        return lat_long;
    };

    let source_ellipsoid = STD_ELLIPSOIDS[source.ellipsoid as usize];
    let target_ellipsoid = STD_ELLIPSOIDS[target.ellipsoid as usize];

    let xyz_source =
        geodetic_to_geocentric(source_ellipsoid.semi_major_axis, source_ellipsoid.eccentricity_sq(), lat_long);

    let xyz_wgs84 = if source_datum == DatumId::Wgs84 as usize {
        xyz_source
    } else {
        apply_helmert(xyz_source, &source.to_wgs84)
    };

    let xyz_target = if target_datum == DatumId::Wgs84 as usize {
        xyz_wgs84
    } else {
        apply_helmert(xyz_wgs84, &target.to_wgs84.negated())
    };

    geocentric_to_geodetic(target_ellipsoid.semi_major_axis, target_ellipsoid.eccentricity_sq(), xyz_target)
}

/// Transforms a single point from `source`'s projected cartesian space to `dest`'s, applying a
/// datum shift between the two projection steps whenever the zones' datums differ, grounded on
/// `udGeoZone_TransformPoint`.
#[must_use]
pub fn transform_point(source: &GeoZone, dest: &GeoZone, point: DVec3) -> DVec3 {
    let geodetic = cartesian_to_lat_long(source, point);
    let geodetic = if source.datum == dest.datum {
        geodetic
    } else {
        convert_datum(source.datum, dest.datum, geodetic)
    };
    lat_long_to_cartesian(dest, geodetic)
}

/// Transforms a 4x4 affine frame (columns: x-axis, y-axis, z-axis, origin) from `source`'s space
/// to `dest`'s, by projecting the origin and the tips of the unit basis vectors independently and
/// recomputing the basis in the destination frame, then re-orthonormalising using Z as the
/// authoritative axis (Gram-Schmidt against Z, then `Y = Z x X`) so that scale and rotation
/// survive non-conformal projections as faithfully as the source geometry allows, grounded on
/// `udGeoZone_TransformMatrix`.
#[must_use]
pub fn transform_matrix(source: &GeoZone, dest: &GeoZone, matrix: DMat4) -> DMat4 {
    let origin = matrix.w_axis.truncate();
    let x_tip = origin + matrix.x_axis.truncate();
    let y_tip = origin + matrix.y_axis.truncate();
    let z_tip = origin + matrix.z_axis.truncate();

    let new_origin = transform_point(source, dest, origin);
    let new_x = transform_point(source, dest, x_tip) - new_origin;
    let new_y = transform_point(source, dest, y_tip) - new_origin;
    let new_z = transform_point(source, dest, z_tip) - new_origin;

    let z_len = new_z.length();
    let y_len = new_y.length();
    let x_len = new_x.length();

    if z_len < f64::EPSILON || x_len < f64::EPSILON {
        // Degenerate frame (e.g. a polar singularity); fall back to the unorthonormalised basis
        // rather than dividing by a near-zero length.
        return DMat4::from_cols(
            new_x.extend(0.0),
            new_y.extend(0.0),
            new_z.extend(0.0),
            new_origin.extend(1.0),
        );
    }

    let z_unit = new_z / z_len;
    let x_proj = new_x - z_unit * new_x.dot(z_unit);
    let x_proj_len = x_proj.length();
    let x_unit = if x_proj_len < f64::EPSILON {
        new_x / x_len
    } else {
        x_proj / x_proj_len
    };
    let y_unit = z_unit.cross(x_unit);

    DMat4::from_cols(
        (x_unit * x_len).extend(0.0),
        (y_unit * y_len).extend(0.0),
        (z_unit * z_len).extend(0.0),
        new_origin.extend(1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srid;

    #[test]
    fn convert_datum_identity_is_a_no_op() {
        let wgs84 = DatumId::Wgs84 as usize;
        let p = DVec3::new(0.5, 1.2, 10.0);
        assert_eq!(convert_datum(wgs84, wgs84, p), p);
    }

    #[test]
    fn convert_datum_round_trips_through_wgs84_within_a_centimetre() {
        let wgs84 = DatumId::Wgs84 as usize;
        let osgb36 = DatumId::Osgb36 as usize;
        let original = DVec3::new(51.5_f64.to_radians(), -0.12_f64.to_radians(), 50.0);

        let shifted = convert_datum(wgs84, osgb36, original);
        let back = convert_datum(osgb36, wgs84, shifted);

        let d_lat_m = (back.x - original.x) * 6_378_137.0;
        let d_lon_m = (back.y - original.y) * 6_378_137.0 * original.x.cos();
        assert!(d_lat_m.abs() < 0.01, "lat drift {d_lat_m}");
        assert!(d_lon_m.abs() < 0.01, "lon drift {d_lon_m}");
    }

    #[test]
    fn transform_point_between_identical_zones_is_identity() {
        let zone = srid::set_from_srid(32756).unwrap();
        let p = DVec3::new(500_000.0, 6_950_000.0, 0.0);
        let result = transform_point(&zone, &zone, p);
        assert!((result.x - p.x).abs() < 1e-6);
        assert!((result.y - p.y).abs() < 1e-6);
    }

    #[test]
    fn transform_matrix_preserves_axis_lengths_between_identical_zones() {
        let zone = srid::set_from_srid(32756).unwrap();
        let m = DMat4::from_cols(
            DVec4::new(10.0, 0.0, 0.0, 0.0),
            DVec4::new(0.0, 10.0, 0.0, 0.0),
            DVec4::new(0.0, 0.0, 10.0, 0.0),
            DVec4::new(500_000.0, 6_950_000.0, 0.0, 1.0),
        );
        let out = transform_matrix(&zone, &zone, m);
        assert!((out.x_axis.truncate().length() - 10.0).abs() < 1e-6);
        assert!((out.z_axis.truncate().length() - 10.0).abs() < 1e-6);
    }
}
