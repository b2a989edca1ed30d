//! The `GeoZone` record: a flat, fully self-contained description of a coordinate reference
//! system, grounded on `original_source/Include/udGeoZone.h`'s `struct udGeoZone`.

use crate::datum;
use crate::ellipsoid::{Ellipsoid, STD_ELLIPSOIDS};
use crate::projection::Projection;
use crate::series;

/// A flat record carrying everything needed to project points to/from this zone, and to convert
/// datums relative to WGS-84. Derived fields (`semi_minor_axis` through `mean_radius`) are
/// recomputed by [`GeoZone::update_spheroid_info`] whenever the primary parameters change;
/// every other field is treated as immutable once the zone is populated.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoZone {
    pub srid: i32,
    pub datum: usize,
    pub projection: Projection,

    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    pub eccentricity: f64,
    pub eccentricity_sq: f64,
    pub third_flattening: f64,

    /// Krüger forward series, `alpha[1..=8]` used (index 0 unused, mirroring the original).
    pub alpha: [f64; 9],
    /// Krüger inverse series, `beta[1..=8]` used.
    pub beta: [f64; 9],
    pub mean_radius: f64,

    pub meridian: f64,
    pub parallel: f64,
    pub first_parallel: f64,
    pub second_parallel: f64,
    pub co_lat_cone_axis: f64,
    pub lat_proj_centre: f64,
    pub scale_factor: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub unit_metre_scale: f64,

    pub zone_name: String,
    pub datum_name: String,
    pub datum_short_name: String,

    pub lat_bounds: (f64, f64),
    pub long_bounds: (f64, f64),

    pub known_datum: bool,
}

impl Default for GeoZone {
    fn default() -> Self {
        Self {
            srid: 0,
            datum: 0,
            projection: Projection::Unknown,
            semi_major_axis: 0.0,
            semi_minor_axis: 0.0,
            eccentricity: 0.0,
            eccentricity_sq: 0.0,
            third_flattening: 0.0,
            alpha: [0.0; 9],
            beta: [0.0; 9],
            mean_radius: 0.0,
            meridian: 0.0,
            parallel: 0.0,
            first_parallel: 0.0,
            second_parallel: 0.0,
            co_lat_cone_axis: 0.0,
            lat_proj_centre: 0.0,
            scale_factor: 1.0,
            false_easting: 0.0,
            false_northing: 0.0,
            unit_metre_scale: 1.0,
            zone_name: String::new(),
            datum_name: String::new(),
            datum_short_name: String::new(),
            lat_bounds: (-90.0, 90.0),
            long_bounds: (-180.0, 180.0),
            known_datum: false,
        }
    }
}

impl GeoZone {
    /// SRID 0: the "not geolocated" sentinel, a valid zone with all derived fields zero.
    #[must_use]
    pub fn not_geolocated() -> Self {
        Self::default()
    }

    /// The ellipsoid this zone's `datum` refers to.
    #[must_use]
    pub fn ellipsoid(&self) -> Ellipsoid {
        datum::descriptor(self.datum)
            .map(|d| STD_ELLIPSOIDS[d.ellipsoid as usize])
            .unwrap_or(STD_ELLIPSOIDS[0])
    }

    /// Recomputes `semi_minor_axis`, `eccentricity[_sq]`, `third_flattening`, the Krüger series,
    /// mean radius, and (for a non-zero latitude of origin Transverse Mercator zone) the one-time
    /// `first_parallel` meridional-arc setup cost, grounded on `udGeoZone_SetSpheroid`.
    pub fn update_spheroid_info(&mut self) {
        let derived = series::set_spheroid(self.semi_major_axis, self.flattening());
        self.semi_minor_axis = derived.semi_minor_axis;
        self.eccentricity = derived.eccentricity;
        self.eccentricity_sq = derived.eccentricity_sq;
        self.third_flattening = derived.third_flattening;
        self.alpha = derived.alpha;
        self.beta = derived.beta;
        self.mean_radius = derived.mean_radius;

        if self.projection == Projection::TransverseMercator && self.parallel != 0.0 {
            self.first_parallel =
                self.scale_factor * self.mean_radius * transverse_mercator_xi0(self);
        }
    }

    #[must_use]
    fn flattening(&self) -> f64 {
        if self.semi_major_axis == 0.0 {
            0.0
        } else {
            1.0 - self.semi_minor_axis / self.semi_major_axis
        }
    }

    /// Human-readable display name assembled from the projection and datum, grounded on
    /// `udGeoZone_UpdateDisplayName`.
    pub fn update_display_name(&mut self) {
        if self.zone_name.is_empty() {
            self.zone_name = format!("{} / {:?}", self.datum_short_name, self.projection);
        }
    }
}

fn transverse_mercator_xi0(zone: &GeoZone) -> f64 {
    let e = zone.eccentricity;
    let conformal_lat = {
        let es = e * zone.parallel.sin();
        2.0 * (((1.0 + zone.parallel.sin()) / (1.0 - zone.parallel.sin())
            * ((1.0 - es) / (1.0 + es)).powf(e))
            .sqrt()
            .atan())
            - std::f64::consts::FRAC_PI_2
    };
    let mut xi = conformal_lat;
    for j in 1..=8 {
        xi += zone.alpha[j] * (2.0 * j as f64 * conformal_lat).sin();
    }
    xi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srid_zero_is_all_zero_but_valid() {
        let zone = GeoZone::not_geolocated();
        assert_eq!(zone.srid, 0);
        assert_eq!(zone.semi_major_axis, 0.0);
    }

    #[test]
    fn update_spheroid_info_derives_wgs84_quantities() {
        let mut zone = GeoZone {
            semi_major_axis: 6_378_137.0,
            semi_minor_axis: 6_356_752.314_245,
            ..GeoZone::default()
        };
        zone.update_spheroid_info();
        assert!((zone.eccentricity_sq - 0.006_694_379_99).abs() < 1e-8);
    }
}
