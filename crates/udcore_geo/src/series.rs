//! Krüger series coefficients and meridian-arc helpers, grounded on
//! `original_source/Source/udGeoZone.cpp`'s `udGeoZone_SetSpheroid`, `udGeoZone_MeridianArcDistance`,
//! `udGeoZone_LCCLatConverge`, `udGeoZone_LCCMeridonial`, `udGeoZone_LCCConformal`,
//! `udGeoZone_DelambreCoefficients` and `udGeoZone_LatMeridianSameNorthing`.

use std::f64::consts::PI;

/// Derived spheroid + Krüger quantities computed once per zone by `set_spheroid`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpheroidDerived {
    pub semi_minor_axis: f64,
    pub eccentricity: f64,
    pub eccentricity_sq: f64,
    pub third_flattening: f64,
    /// Krüger forward (meridian -> conformal) series coefficients, powers 1..=8 of `n` stored at
    /// indices 0..=7 (index 0 unused, kept to mirror the original's 0-based `alpha[0..8]`).
    pub alpha: [f64; 9],
    /// Krüger inverse (conformal -> meridian) series coefficients.
    pub beta: [f64; 9],
    /// Mean radius `A` used to scale the Krüger series.
    pub mean_radius: f64,
}

/// Computes the nine-term Krüger series and mean radius from a semi-major axis and flattening,
/// grounded on `udGeoZone_SetSpheroid`'s exact rational coefficients (Karney 2011 / EPSG
/// Guidance Note 7-2, extended to n^9).
#[must_use]
pub fn set_spheroid(semi_major_axis: f64, flattening: f64) -> SpheroidDerived {
    let a = semi_major_axis;
    let f = flattening;
    let b = a * (1.0 - f);
    let e_sq = f * (2.0 - f);
    let e = e_sq.sqrt();
    let n = f / (2.0 - f);
    let tf = n;

    let n2 = n * n;
    let n3 = n2 * n;
    let n4 = n3 * n;
    let n5 = n4 * n;
    let n6 = n5 * n;
    let n7 = n6 * n;
    let n8 = n7 * n;

    let mut alpha = [0.0; 9];
    alpha[1] = 1.0 / 2.0 * n - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4
        - 127.0 / 288.0 * n5
        + 7891.0 / 37800.0 * n6
        + 72161.0 / 387_072.0 * n7
        - 18_975_107.0 / 50_803_200.0 * n8;
    alpha[2] = 13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
        - 1_983_433.0 / 1_935_360.0 * n6
        + 13_769.0 / 28_800.0 * n7
        + 148_003_883.0 / 174_182_400.0 * n8;
    alpha[3] = 61.0 / 240.0 * n3 - 103.0 / 140.0 * n4 + 15_061.0 / 26_880.0 * n5
        + 167_603.0 / 181_440.0 * n6
        - 67_102_379.0 / 29_030_400.0 * n7
        + 79_682_431.0 / 79_833_600.0 * n8;
    alpha[4] = 49_561.0 / 161_280.0 * n4 - 179.0 / 168.0 * n5 + 6_601_661.0 / 7_257_600.0 * n6
        + 97_445.0 / 49_896.0 * n7
        - 40_176_129_013.0 / 7_664_025_600.0 * n8;
    alpha[5] =
        34_729.0 / 80_640.0 * n5 - 3_418_889.0 / 1_995_840.0 * n6 + 14_644_087.0 / 9_123_840.0 * n7
            + 2_605_413_599.0 / 622_702_080.0 * n8;
    alpha[6] = 212_378_941.0 / 319_334_400.0 * n6 - 30_705_481.0 / 10_378_368.0 * n7
        + 175_214_326_799.0 / 58_118_860_800.0 * n8;
    alpha[7] = 1_522_256_789.0 / 1_383_782_400.0 * n7 - 16_759_934_899.0 / 3_113_510_400.0 * n8;
    alpha[8] = 1_424_729_850_961.0 / 743_921_418_240.0 * n8;

    let mut beta = [0.0; 9];
    beta[1] = 1.0 / 2.0 * n - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4
        - 81.0 / 512.0 * n5
        + 96_199.0 / 604_800.0 * n6
        - 5_406_467.0 / 38_707_200.0 * n7
        + 7_944_359.0 / 67_737_600.0 * n8;
    beta[2] = 1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
        - 1_118_711.0 / 3_870_720.0 * n6
        + 51_841.0 / 1_209_600.0 * n7
        + 24_749_483.0 / 348_364_800.0 * n8;
    beta[3] = 17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5
        + 5569.0 / 90720.0 * n6
        + 9_261_899.0 / 58_060_800.0 * n7
        - 6_457_463.0 / 17_740_800.0 * n8;
    beta[4] = 4_397.0 / 161_280.0 * n4 - 11.0 / 504.0 * n5 - 830_251.0 / 7_257_600.0 * n6
        + 466_511.0 / 2_494_800.0 * n7
        + 324_154_477.0 / 7_664_025_600.0 * n8;
    beta[5] = 4_583.0 / 161_280.0 * n5 - 108_847.0 / 3_991_680.0 * n6 - 8_005_831.0 / 63_866_880.0 * n7
        + 22_894_433.0 / 124_540_416.0 * n8;
    beta[6] = 20_648_693.0 / 638_668_800.0 * n6 - 16_363_163.0 / 518_918_400.0 * n7
        - 2_204_645_983.0 / 12_915_302_400.0 * n8;
    beta[7] = 219_941_297.0 / 5_535_129_600.0 * n7 - 497_323_811.0 / 12_454_041_600.0 * n8;
    beta[8] = 191_773_887_257.0 / 3_719_607_091_200.0 * n8;

    let mean_radius = a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0 + 25.0 * n8 / 16384.0);

    SpheroidDerived {
        semi_minor_axis: b,
        eccentricity: e,
        eccentricity_sq: e_sq,
        third_flattening: tf,
        alpha,
        beta,
        mean_radius,
    }
}

/// Meridional arc distance from the equator to `lat` (radians), via Helmert's series in `e²`,
/// grounded on `udGeoZone_MeridianArcDistance`.
#[must_use]
pub fn meridian_arc_distance(semi_major_axis: f64, e_sq: f64, lat: f64) -> f64 {
    let e4 = e_sq * e_sq;
    let e6 = e4 * e_sq;
    let e8 = e6 * e_sq;

    let m0 = 1.0 - e_sq / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0 - 175.0 * e8 / 16384.0;
    let m2 = 3.0 / 8.0 * (e_sq + e4 / 4.0 + 15.0 * e6 / 128.0 - 455.0 * e8 / 4096.0);
    let m4 = 15.0 / 256.0 * (e4 + 3.0 * e6 / 4.0 + 35.0 * e8 / 64.0);
    let m6 = 35.0 / 3072.0 * (e6 + 5.0 * e8 / 4.0);
    let m8 = -315.0 / 131_072.0 * e8;

    semi_major_axis
        * (m0 * lat - m2 * (2.0 * lat).sin() + m4 * (4.0 * lat).sin() - m6 * (6.0 * lat).sin()
            + m8 * (8.0 * lat).sin())
}

/// One Newton iteration step toward the true latitude from a conformal latitude `chi`, used by
/// the Transverse-Mercator and Lambert-2SP inverses, grounded on `udGeoZone_LCCLatConverge`.
#[must_use]
pub fn lcc_lat_converge(chi: f64, e: f64) -> f64 {
    let e_sin = e * chi.sin();
    2.0 * ((PI / 4.0 + chi / 2.0).tan() * ((1.0 - e_sin) / (1.0 + e_sin)).powf(e / 2.0)).atan()
        - PI / 2.0
}

/// Lambert conformal "meridional" radius term `m(phi)`, grounded on `udGeoZone_LCCMeridonial`.
#[must_use]
pub fn lcc_meridional(phi: f64, e_sq: f64) -> f64 {
    phi.cos() / (1.0 - e_sq * phi.sin().powi(2)).sqrt()
}

/// Lambert conformal "conformal" term `t(phi)`, grounded on `udGeoZone_LCCConformal`.
#[must_use]
pub fn lcc_conformal(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (PI / 4.0 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wgs84_spheroid_derivation() {
        let d = set_spheroid(6_378_137.0, 1.0 / 298.257223563);
        assert!((d.semi_minor_axis - 6_356_752.314_245).abs() < 1e-3);
        assert!(d.alpha[1] > 0.0 && d.alpha[1] < 0.01);
        assert!(d.mean_radius > 6_367_000.0 && d.mean_radius < 6_368_000.0);
    }

    #[test]
    fn meridian_arc_distance_zero_at_equator() {
        let d = set_spheroid(6_378_137.0, 1.0 / 298.257223563);
        assert_eq!(meridian_arc_distance(6_378_137.0, d.eccentricity_sq, 0.0), 0.0);
    }

    #[test]
    fn lcc_lat_converge_near_identity_at_equator() {
        assert!((lcc_lat_converge(0.0, 0.0818) - 0.0).abs() < 1e-9);
    }
}
