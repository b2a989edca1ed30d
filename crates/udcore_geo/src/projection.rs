//! Map projections: forward (`lat_long_to_cartesian`) and inverse (`cartesian_to_lat_long`)
//! closed-form and iterative formulae, grounded on `original_source/Source/udGeoZone.cpp`'s
//! `udGeoZone_LatLongToCartesian` / `udGeoZone_CartesianToLatLong` switches (EPSG Guidance
//! Note 7-2).

use std::f64::consts::PI;

use glam::DVec3;

use crate::series;
use crate::zone::GeoZone;

/// Mirrors `udGeoZoneProjectionType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum Projection {
    #[default]
    Unknown,
    Ecef,
    LongLat,
    LatLong,
    TransverseMercator,
    LambertConformalConic2Sp,
    WebMercator,
    CassiniSoldner,
    CassiniSoldnerHyperbolic,
    StereographicObliqueEquatorial,
    StereographicPolarVb,
    Mercator,
    Krovak,
    KrovakNorthOrientated,
    HotineObliqueMercatorVa,
    HotineObliqueMercatorVb,
    AlbersEqualArea,
    EquidistantCylindrical,
}

const R2D: f64 = 180.0 / PI;
const D2R: f64 = PI / 180.0;

/// Projects a geodetic lat/long (radians, `x=lat, y=lon, z=height`) to the zone's projected
/// cartesian coordinates (`x=easting, y=northing, z=height`), grounded on
/// `udGeoZone_LatLongToCartesian`.
#[must_use]
pub fn lat_long_to_cartesian(zone: &GeoZone, lat_long: DVec3) -> DVec3 {
    let lat = lat_long.x;
    let lon = lat_long.y;
    let h = lat_long.z;
    let a = zone.semi_major_axis;
    let e = zone.eccentricity;
    let e_sq = zone.eccentricity_sq;
    let k0 = zone.scale_factor;
    let fe = zone.false_easting;
    let fnn = zone.false_northing;

    match zone.projection {
        Projection::Ecef => {
            let n = a / (1.0 - e_sq * lat.sin().powi(2)).sqrt();
            let x = (n + h) * lat.cos() * lon.cos();
            let y = (n + h) * lat.cos() * lon.sin();
            let z = (n * (1.0 - e_sq) + h) * lat.sin();
            DVec3::new(x, y, z)
        }
        Projection::LatLong => DVec3::new(lat * R2D, lon * R2D, h),
        Projection::LongLat => DVec3::new(lon * R2D, lat * R2D, h),
        Projection::TransverseMercator => {
            let dlon = lon - zone.meridian;
            let conformal_lat = conformal_latitude(lat, e);
            let xi0 = conformal_lat.atan2(dlon.cos());
            let eta0 = (dlon.sin() / (1.0 + conformal_lat.tan().powi(2) + dlon.cos().powi(2)).sqrt())
                .asinh();
            let mut xi = xi0;
            let mut eta = eta0;
            for j in 1..=8 {
                let jf = j as f64;
                xi += zone.alpha[j] * (2.0 * jf * xi0).sin() * (2.0 * jf * eta0).cosh();
                eta += zone.alpha[j] * (2.0 * jf * xi0).cos() * (2.0 * jf * eta0).sinh();
            }
            let easting = k0 * zone.mean_radius * eta + fe;
            let northing = k0 * zone.mean_radius * xi - zone.first_parallel + fnn;
            DVec3::new(easting, northing, h)
        }
        Projection::LambertConformalConic2Sp => {
            let (n, f, rho0) = lcc_constants(zone);
            let t = series::lcc_conformal(lat, e);
            let rho = a * f * t.powf(n);
            let theta = n * dlon_wrapped(lon, zone.meridian);
            let easting = fe + rho * theta.sin();
            let northing = fnn + rho0 - rho * theta.cos();
            DVec3::new(easting, northing, h)
        }
        Projection::WebMercator => {
            let easting = a * (lon - zone.meridian) + fe;
            let northing = a * (PI / 4.0 + lat / 2.0).tan().ln() + fnn;
            DVec3::new(easting, northing, h)
        }
        Projection::Mercator => {
            let k_scale = series::lcc_meridional(zone.first_parallel, e_sq)
                / series::lcc_conformal(zone.first_parallel, e);
            let easting = fe + a * k_scale * (lon - zone.meridian);
            let northing = fnn - a * k_scale * series::lcc_conformal(lat, e).ln();
            DVec3::new(easting, northing, h)
        }
        Projection::CassiniSoldner | Projection::CassiniSoldnerHyperbolic => {
            let dlon = lon - zone.meridian;
            let m = series::meridian_arc_distance(a, e_sq, lat);
            let m0 = series::meridian_arc_distance(a, e_sq, zone.parallel);
            let nu = a / (1.0 - e_sq * lat.sin().powi(2)).sqrt();
            let t = lat.tan();
            let t2 = t * t;
            let a1 = dlon * lat.cos();
            let a2 = a1 * a1;
            let a3 = a2 * a1;
            let a4 = a3 * a1;
            let easting = fe + nu * a1 - nu * t2 * a3 / 6.0
                - nu * (8.0 - t2 + 8.0 * e_sq * lat.cos().powi(2)) * t2 * a3 * a2 / 120.0;
            let northing = fnn + m - m0 + nu * t / 2.0 * a2
                + nu * t * (5.0 - t2 + 6.0 * e_sq * lat.cos().powi(2)) / 24.0 * a4;
            DVec3::new(easting, northing, h)
        }
        Projection::StereographicObliqueEquatorial | Projection::StereographicPolarVb => {
            stereographic_forward(zone, lat, lon, h)
        }
        Projection::Krovak | Projection::KrovakNorthOrientated => krovak_forward(zone, lat, lon, h),
        Projection::HotineObliqueMercatorVa | Projection::HotineObliqueMercatorVb => {
            hotine_oblique_mercator_forward(zone, lat, lon, h)
        }
        Projection::AlbersEqualArea => {
            let (c, n, rho0) = albers_constants(zone);
            let q = albers_q(lat, e);
            let rho = a * (c - n * q).max(0.0).sqrt() / n;
            let theta = n * (lon - zone.meridian);
            // West-axis convention: longitude sign flips relative to the other conics.
            let easting = fe - rho * theta.sin();
            let northing = fnn + rho0 - rho * theta.cos();
            DVec3::new(easting, northing, h)
        }
        Projection::EquidistantCylindrical => {
            let m = series::meridian_arc_distance(a, e_sq, lat);
            let easting = fe + a * (lon - zone.meridian) * zone.parallel.cos();
            let northing = fnn + m;
            DVec3::new(easting, northing, h)
        }
        Projection::Unknown => DVec3::new(lat, lon, h),
    }
}

/// Inverse of [`lat_long_to_cartesian`]: projected cartesian -> geodetic lat/long (radians),
/// grounded on `udGeoZone_CartesianToLatLong`.
#[must_use]
pub fn cartesian_to_lat_long(zone: &GeoZone, cartesian: DVec3) -> DVec3 {
    let a = zone.semi_major_axis;
    let e = zone.eccentricity;
    let e_sq = zone.eccentricity_sq;
    let k0 = zone.scale_factor;
    let fe = zone.false_easting;
    let fnn = zone.false_northing;
    let h = cartesian.z;

    match zone.projection {
        Projection::Ecef => {
            let (x, y, z) = (cartesian.x, cartesian.y, cartesian.z);
            let p = x.hypot(y);
            let lon = y.atan2(x);
            let mut lat = (z / (p * (1.0 - e_sq))).atan();
            let mut height = 0.0;
            for _ in 0..8 {
                let n = a / (1.0 - e_sq * lat.sin().powi(2)).sqrt();
                height = p / lat.cos() - n;
                lat = (z / p / (1.0 - e_sq * n / (n + height))).atan();
            }
            DVec3::new(lat, lon, height)
        }
        Projection::LatLong => DVec3::new(cartesian.x * D2R, cartesian.y * D2R, h),
        Projection::LongLat => DVec3::new(cartesian.y * D2R, cartesian.x * D2R, h),
        Projection::TransverseMercator => {
            let xi = (cartesian.y - fnn + zone.first_parallel) / (k0 * zone.mean_radius);
            let eta = (cartesian.x - fe) / (k0 * zone.mean_radius);
            let mut xi0 = xi;
            let mut eta0 = eta;
            for j in 1..=8 {
                let jf = j as f64;
                xi0 -= zone.beta[j] * (2.0 * jf * xi).sin() * (2.0 * jf * eta).cosh();
                eta0 -= zone.beta[j] * (2.0 * jf * xi).cos() * (2.0 * jf * eta).sinh();
            }
            let conformal_lat = xi0.sin().atan2(eta0.sinh().hypot(xi0.cos()));
            let dlon = eta0.sinh().atan2(xi0.cos());
            let mut lat = conformal_lat;
            for _ in 0..5 {
                lat = series::lcc_lat_converge(lat, e);
            }
            DVec3::new(lat, zone.meridian + dlon, h)
        }
        Projection::LambertConformalConic2Sp => {
            let (n, f, rho0) = lcc_constants(zone);
            let dx = cartesian.x - fe;
            let dy = rho0 - (cartesian.y - fnn);
            let rho = dx.hypot(dy) * n.signum();
            let theta = dx.atan2(dy) / n;
            let t = (rho / (a * f)).powf(1.0 / n);
            let chi = PI / 2.0 - 2.0 * t.atan();
            let mut lat = chi;
            for _ in 0..5 {
                lat = series::lcc_lat_converge(lat, e);
            }
            DVec3::new(lat, zone.meridian + theta, h)
        }
        Projection::WebMercator => {
            let lon = (cartesian.x - fe) / a + zone.meridian;
            let lat = PI / 2.0 - 2.0 * (-(cartesian.y - fnn) / a).exp().atan();
            DVec3::new(lat, lon, h)
        }
        Projection::Mercator => {
            let k_scale = series::lcc_meridional(zone.first_parallel, e_sq)
                / series::lcc_conformal(zone.first_parallel, e);
            let lon = (cartesian.x - fe) / (a * k_scale) + zone.meridian;
            let chi = PI / 2.0 - 2.0 * (-(cartesian.y - fnn) / (a * k_scale)).exp().atan();
            let lat = chi
                + (e_sq / 2.0 + 5.0 * e_sq * e_sq / 24.0 + e_sq.powi(3) / 12.0) * (2.0 * chi).sin()
                + (7.0 * e_sq * e_sq / 48.0 + 29.0 * e_sq.powi(3) / 240.0) * (4.0 * chi).sin()
                + (7.0 * e_sq.powi(3) / 120.0) * (6.0 * chi).sin();
            DVec3::new(lat, lon, h)
        }
        Projection::CassiniSoldner | Projection::CassiniSoldnerHyperbolic => {
            let m0 = series::meridian_arc_distance(a, e_sq, zone.parallel);
            let m1 = m0 + (cartesian.y - fnn);
            let lat1 = lat_from_meridian_arc(a, e_sq, m1);
            let nu1 = a / (1.0 - e_sq * lat1.sin().powi(2)).sqrt();
            let rho1 = a * (1.0 - e_sq) / (1.0 - e_sq * lat1.sin().powi(2)).powf(1.5);
            let t1 = lat1.tan();
            let d = (cartesian.x - fe) / nu1;
            let d2 = d * d;
            let d3 = d2 * d;
            let d4 = d3 * d;
            let lat = lat1 - (nu1 * t1 / rho1) * (d2 / 2.0 - (1.0 + 3.0 * t1 * t1) * d4 / 24.0);
            let lon = zone.meridian + (d - t1 * t1 * d3 / 3.0) / lat1.cos();
            DVec3::new(lat, lon, h)
        }
        Projection::StereographicObliqueEquatorial | Projection::StereographicPolarVb => {
            numeric_inverse(zone, cartesian.x, cartesian.y, zone.parallel, zone.meridian, h)
        }
        Projection::Krovak | Projection::KrovakNorthOrientated => {
            numeric_inverse(zone, cartesian.x, cartesian.y, zone.parallel, zone.meridian, h)
        }
        Projection::HotineObliqueMercatorVa | Projection::HotineObliqueMercatorVb => {
            numeric_inverse(zone, cartesian.x, cartesian.y, zone.lat_proj_centre, zone.meridian, h)
        }
        Projection::AlbersEqualArea => {
            let (c, n, rho0) = albers_constants(zone);
            let dx = fe - cartesian.x;
            let dy = rho0 - (cartesian.y - fnn);
            let rho = dx.hypot(dy);
            let theta = dx.atan2(dy);
            let q = (c - (rho * n / a).powi(2)) / n;
            let mut lat = (q / 2.0).clamp(-1.0, 1.0).asin();
            for _ in 0..6 {
                let sin_lat = lat.sin();
                let one_minus = 1.0 - e_sq * sin_lat * sin_lat;
                let correction = one_minus * one_minus / (2.0 * lat.cos())
                    * (q / (1.0 - e_sq) - sin_lat / one_minus
                        + (1.0 / (2.0 * e)) * ((1.0 - e * sin_lat) / (1.0 + e * sin_lat)).ln());
                lat += correction;
            }
            DVec3::new(lat, zone.meridian + theta / n, h)
        }
        Projection::EquidistantCylindrical => {
            let lat = lat_from_meridian_arc(a, e_sq, cartesian.y - fnn);
            let lon = (cartesian.x - fe) / (a * zone.parallel.cos()) + zone.meridian;
            DVec3::new(lat, lon, h)
        }
        Projection::Unknown => DVec3::new(cartesian.x, cartesian.y, h),
    }
}

fn conformal_latitude(lat: f64, e: f64) -> f64 {
    let es = e * lat.sin();
    2.0 * (((1.0 + lat.sin()) / (1.0 - lat.sin()) * ((1.0 - es) / (1.0 + es)).powf(e))
        .sqrt()
        .atan())
        - PI / 2.0
}

fn dlon_wrapped(lon: f64, meridian: f64) -> f64 {
    let mut d = lon - meridian;
    while d > PI {
        d -= 2.0 * PI;
    }
    while d < -PI {
        d += 2.0 * PI;
    }
    d
}

fn lcc_constants(zone: &GeoZone) -> (f64, f64, f64) {
    let a = zone.semi_major_axis;
    let e = zone.eccentricity;
    let e_sq = zone.eccentricity_sq;
    let m1 = series::lcc_meridional(zone.first_parallel, e_sq);
    let m2 = series::lcc_meridional(zone.second_parallel, e_sq);
    let t1 = series::lcc_conformal(zone.first_parallel, e);
    let t2 = series::lcc_conformal(zone.second_parallel, e);
    let t0 = series::lcc_conformal(zone.parallel, e);
    let n = if (zone.first_parallel - zone.second_parallel).abs() < 1e-12 {
        zone.first_parallel.sin()
    } else {
        (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
    };
    let f = m1 / (n * t1.powf(n));
    let rho0 = a * f * t0.powf(n);
    (n, f, rho0)
}

fn albers_constants(zone: &GeoZone) -> (f64, f64, f64) {
    let e = zone.eccentricity;
    let m1 = series::lcc_meridional(zone.first_parallel, zone.eccentricity_sq);
    let m2 = series::lcc_meridional(zone.second_parallel, zone.eccentricity_sq);
    let q0 = albers_q(zone.parallel, e);
    let q1 = albers_q(zone.first_parallel, e);
    let q2 = albers_q(zone.second_parallel, e);
    let n = if (zone.first_parallel - zone.second_parallel).abs() < 1e-12 {
        zone.first_parallel.sin()
    } else {
        (m1 * m1 - m2 * m2) / (q2 - q1)
    };
    let c = m1 * m1 + n * q1;
    let rho0 = zone.semi_major_axis * (c - n * q0).max(0.0).sqrt() / n;
    (c, n, rho0)
}

fn albers_q(lat: f64, e: f64) -> f64 {
    let s = lat.sin();
    (1.0 - e * e) * (s / (1.0 - e * e * s * s) - 1.0 / (2.0 * e) * ((1.0 - e * s) / (1.0 + e * s)).ln())
}

fn lat_from_meridian_arc(a: f64, e_sq: f64, m: f64) -> f64 {
    let mut lat = m / a;
    for _ in 0..8 {
        let computed = series::meridian_arc_distance(a, e_sq, lat);
        let eps = 1e-6;
        let derivative = (series::meridian_arc_distance(a, e_sq, lat + eps) - computed) / eps;
        if derivative.abs() < 1e-30 {
            break;
        }
        lat -= (computed - m) / derivative;
    }
    lat
}

/// Oblique/polar stereographic forward, variant B (EPSG 9809/9810), grounded on the
/// `SterographicObliqueNEquatorial` / `SterographicPolar_vB` arms of the original switch.
fn stereographic_forward(zone: &GeoZone, lat: f64, lon: f64, h: f64) -> DVec3 {
    let a = zone.semi_major_axis;
    let e = zone.eccentricity;
    let e_sq = zone.eccentricity_sq;
    let k0 = zone.scale_factor;
    let phi0 = zone.parallel;

    let rho0 = a * (1.0 - e_sq) / (1.0 - e_sq * phi0.sin().powi(2)).powf(1.5);
    let nu0 = a / (1.0 - e_sq * phi0.sin().powi(2)).sqrt();
    let r = (rho0 * nu0).sqrt();
    let n = (1.0 + e_sq * phi0.cos().powi(4) / (1.0 - e_sq)).sqrt();
    let s1 = (1.0 + phi0.sin()) / (1.0 - phi0.sin());
    let s2 = (1.0 - e * phi0.sin()) / (1.0 + e * phi0.sin());
    let w1 = (s1 * s2.powf(e)).powf(n);
    let sin_chi0 = (w1 - 1.0) / (w1 + 1.0);
    let c = (n + phi0.sin()) * (1.0 - sin_chi0) / ((n - phi0.sin()) * (1.0 + sin_chi0));

    let sa = (1.0 + lat.sin()) / (1.0 - lat.sin());
    let sb = (1.0 - e * lat.sin()) / (1.0 + e * lat.sin());
    let w = c * (sa * sb.powf(e)).powf(n);
    let sin_chi = ((w - 1.0) / (w + 1.0)).clamp(-1.0, 1.0);
    let chi = sin_chi.asin();
    let chi0 = sin_chi0.clamp(-1.0, 1.0).asin();
    let theta = n * (lon - zone.meridian);

    let b = 2.0 * r * k0 / (1.0 + chi0.sin() * chi.sin() + chi0.cos() * chi.cos() * theta.cos());
    let easting = zone.false_easting + b * chi.cos() * theta.sin();
    let northing =
        zone.false_northing + b * (chi0.cos() * chi.sin() - chi0.sin() * chi.cos() * theta.cos());
    DVec3::new(easting, northing, h)
}

/// Krovak / Krovak (North Orientated), grounded on the original's `Krovak` /
/// `KrovakNorthOrientated` arms (EPSG 9819).
fn krovak_forward(zone: &GeoZone, lat: f64, lon: f64, h: f64) -> DVec3 {
    let a = zone.semi_major_axis;
    let e = zone.eccentricity;
    let e_sq = zone.eccentricity_sq;
    let phi_c = zone.lat_proj_centre;
    let alpha_c = zone.co_lat_cone_axis;
    let phi_p = 78.5_f64.to_radians();
    let k_p = zone.scale_factor;
    let lon0 = zone.meridian;

    let big_a = a * (1.0 - e_sq).sqrt() / (1.0 - e_sq * phi_c.sin().powi(2));
    let big_b = (1.0 + e_sq * phi_c.cos().powi(4) / (1.0 - e_sq)).sqrt();
    let gamma0 = (phi_c.sin() / big_b).asin();
    let t0 = (PI / 4.0 + gamma0 / 2.0).tan()
        * ((1.0 + e * phi_c.sin()) / (1.0 - e * phi_c.sin())).powf(e * big_b / 2.0)
        / (PI / 4.0 + phi_c / 2.0).tan().powf(big_b);
    let n = phi_p.sin();
    let rho0 = k_p * big_a;

    let u = 2.0
        * ((t0 * (PI / 4.0 + lat / 2.0).tan().powf(big_b)
            * ((1.0 - e * lat.sin()) / (1.0 + e * lat.sin())).powf(e * big_b / 2.0))
            .atan()
            - PI / 4.0);
    let v = big_b * (lon0 - lon);
    let t = (alpha_c.cos() * u.sin() + alpha_c.sin() * u.cos() * v.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let d = ((u.cos() * v.sin()) / t.cos()).clamp(-1.0, 1.0).asin();
    let theta = n * d;
    let rho = rho0 * (PI / 4.0 + phi_p / 2.0).tan().powf(n) / (PI / 4.0 + t / 2.0).tan().powf(n);
    let xp = rho * theta.cos();
    let yp = rho * theta.sin();

    let (east, north) = if zone.projection == Projection::KrovakNorthOrientated {
        (-yp, -xp)
    } else {
        (yp, xp)
    };
    DVec3::new(east + zone.false_easting, north + zone.false_northing, h)
}

/// Hotine Oblique Mercator, variants A and B (EPSG 9812 / 9815), grounded on the original's
/// `HotineObliqueMercatorvA` / `HotineObliqueMercatorvB` arms.
fn hotine_oblique_mercator_forward(zone: &GeoZone, lat: f64, lon: f64, h: f64) -> DVec3 {
    let a = zone.semi_major_axis;
    let e = zone.eccentricity;
    let e_sq = zone.eccentricity_sq;
    let k0 = zone.scale_factor;
    let phi_c = zone.lat_proj_centre;
    let alpha_c = zone.co_lat_cone_axis;
    let gamma_c = if zone.parallel != 0.0 { zone.parallel } else { alpha_c };
    let lon_c = zone.meridian;

    let big_b = (1.0 + e_sq * phi_c.cos().powi(4) / (1.0 - e_sq)).sqrt();
    let big_a = a * big_b * k0 * (1.0 - e_sq).sqrt() / (1.0 - e_sq * phi_c.sin().powi(2));
    let t0 = (PI / 4.0 - phi_c / 2.0).tan() / ((1.0 - e * phi_c.sin()) / (1.0 + e * phi_c.sin())).powf(e / 2.0);
    let big_d = (big_b * (1.0 - e_sq).sqrt() / (phi_c.cos() * (1.0 - e_sq * phi_c.sin().powi(2)).sqrt()))
        .max(1.0);
    let sign_phi_c = if phi_c >= 0.0 { 1.0 } else { -1.0 };
    let big_f = big_d + sign_phi_c * (big_d * big_d - 1.0).sqrt();
    let big_e = big_f * t0.powf(big_b);
    let g = (big_f - 1.0 / big_f) / 2.0;
    let gamma0 = (alpha_c.sin() / big_d).asin();
    let lon0 = lon_c - (g * gamma0.tan()).asin() / big_b;

    let t = (PI / 4.0 - lat / 2.0).tan() / ((1.0 - e * lat.sin()) / (1.0 + e * lat.sin())).powf(e / 2.0);
    let q = big_e / t.powf(big_b);
    let s = (q - 1.0 / q) / 2.0;
    let big_t = (q + 1.0 / q) / 2.0;
    let v = (big_b * (lon - lon0)).sin();
    let u_ratio = (v * gamma0.cos() + s * gamma0.sin()) / big_t;
    let v_prime = big_a * ((1.0 - u_ratio) / (1.0 + u_ratio)).ln() / (2.0 * big_b);
    let mut u_prime = (big_a / big_b) * (s * gamma0.cos() - v * gamma0.sin()).atan2((big_b * (lon - lon0)).cos());

    if zone.projection == Projection::HotineObliqueMercatorVb {
        let uc = (big_a / big_b) * (big_d * big_d - 1.0).max(0.0).sqrt().atan2(alpha_c.cos()) * sign_phi_c;
        u_prime -= uc;
    }

    let easting = zone.false_easting + v_prime * gamma_c.cos() + u_prime * gamma_c.sin();
    let northing = zone.false_northing + u_prime * gamma_c.cos() - v_prime * gamma_c.sin();
    DVec3::new(easting, northing, h)
}

/// Newton's method inverse (finite-difference Jacobian) for the projections whose closed-form
/// inverse is a small system rather than a single-variable root (stereographic, Krovak, Hotine),
/// grounded on the original's explicit convergence loops for these families (`|delta phi| <=
/// 1e-14`).
fn numeric_inverse(zone: &GeoZone, x: f64, y: f64, lat0: f64, lon0: f64, h: f64) -> DVec3 {
    let mut lat = lat0;
    let mut lon = lon0;
    let eps = 1e-6;
    for _ in 0..60 {
        let p = lat_long_to_cartesian(zone, DVec3::new(lat, lon, 0.0));
        let dx = x - p.x;
        let dy = y - p.y;
        let px = lat_long_to_cartesian(zone, DVec3::new(lat + eps, lon, 0.0));
        let py = lat_long_to_cartesian(zone, DVec3::new(lat, lon + eps, 0.0));
        let j11 = (px.x - p.x) / eps;
        let j21 = (px.y - p.y) / eps;
        let j12 = (py.x - p.x) / eps;
        let j22 = (py.y - p.y) / eps;
        let det = j11 * j22 - j12 * j21;
        if det.abs() < 1e-30 {
            break;
        }
        let dlat = (j22 * dx - j12 * dy) / det;
        let dlon = (j11 * dy - j21 * dx) / det;
        lat += dlat;
        lon += dlon;
        if dlat.abs() < 1e-14 && dlon.abs() < 1e-14 {
            break;
        }
    }
    DVec3::new(lat, lon, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::GeoZone;

    fn utm56s() -> GeoZone {
        let mut zone = GeoZone::default();
        zone.projection = Projection::TransverseMercator;
        zone.semi_major_axis = 6_378_137.0;
        let derived = series::set_spheroid(6_378_137.0, 1.0 / 298.257223563);
        zone.semi_minor_axis = derived.semi_minor_axis;
        zone.eccentricity = derived.eccentricity;
        zone.eccentricity_sq = derived.eccentricity_sq;
        zone.alpha = derived.alpha;
        zone.beta = derived.beta;
        zone.mean_radius = derived.mean_radius;
        zone.meridian = 153.0 * D2R;
        zone.scale_factor = 0.9996;
        zone.false_easting = 500_000.0;
        zone.false_northing = 10_000_000.0;
        zone
    }

    #[test]
    fn transverse_mercator_round_trips() {
        let zone = utm56s();
        let lat_long = DVec3::new(-27.0 * D2R, 153.05 * D2R, 0.0);
        let cartesian = lat_long_to_cartesian(&zone, lat_long);
        let back = cartesian_to_lat_long(&zone, cartesian);
        assert!((back.x - lat_long.x).abs() < 1e-9);
        assert!((back.y - lat_long.y).abs() < 1e-9);
    }

    #[test]
    fn web_mercator_equator_is_identity_scaled() {
        let mut zone = GeoZone::default();
        zone.projection = Projection::WebMercator;
        zone.semi_major_axis = 6_378_137.0;
        let p = lat_long_to_cartesian(&zone, DVec3::new(0.0, 0.0, 0.0));
        assert!(p.x.abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
    }

    #[test]
    fn lat_long_projection_is_degrees() {
        let mut zone = GeoZone::default();
        zone.projection = Projection::LatLong;
        let p = lat_long_to_cartesian(&zone, DVec3::new(PI / 2.0, 0.0, 0.0));
        assert!((p.x - 90.0).abs() < 1e-9);
    }

    #[test]
    fn lambert_conformal_conic_round_trips() {
        let mut zone = GeoZone::default();
        zone.projection = Projection::LambertConformalConic2Sp;
        zone.semi_major_axis = 6_378_137.0;
        let derived = series::set_spheroid(6_378_137.0, 1.0 / 298.257222101);
        zone.eccentricity = derived.eccentricity;
        zone.eccentricity_sq = derived.eccentricity_sq;
        zone.meridian = 3.0 * D2R;
        zone.parallel = 46.5 * D2R;
        zone.first_parallel = 49.0 * D2R;
        zone.second_parallel = 44.0 * D2R;
        zone.false_easting = 700_000.0;
        zone.false_northing = 6_600_000.0;

        let lat_long = DVec3::new(45.0 * D2R, 2.5 * D2R, 0.0);
        let cartesian = lat_long_to_cartesian(&zone, lat_long);
        let back = cartesian_to_lat_long(&zone, cartesian);
        assert!((back.x - lat_long.x).abs() < 1e-8);
        assert!((back.y - lat_long.y).abs() < 1e-8);
    }

    #[test]
    fn stereographic_round_trips() {
        let mut zone = GeoZone::default();
        zone.projection = Projection::StereographicPolarVb;
        zone.semi_major_axis = 6_378_137.0;
        let derived = series::set_spheroid(6_378_137.0, 1.0 / 298.257223563);
        zone.eccentricity = derived.eccentricity;
        zone.eccentricity_sq = derived.eccentricity_sq;
        zone.parallel = -71.0 * D2R;
        zone.meridian = 0.0;
        zone.scale_factor = 0.97276901289;
        zone.false_easting = 6_000_000.0;
        zone.false_northing = 6_000_000.0;

        let lat_long = DVec3::new(-75.0 * D2R, 120.0 * D2R, 0.0);
        let cartesian = lat_long_to_cartesian(&zone, lat_long);
        let back = cartesian_to_lat_long(&zone, cartesian);
        assert!((back.x - lat_long.x).abs() < 1e-7);
        assert!((back.y - lat_long.y).abs() < 1e-7);
    }
}
