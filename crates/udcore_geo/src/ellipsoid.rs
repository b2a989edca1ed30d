//! The reference ellipsoid table, grounded verbatim on
//! `original_source/Source/udGeoZone.cpp`'s `g_udGZ_StdEllipsoids[]`.

/// One row of the standard ellipsoid table: a name, semi-major axis (metres), inverse
/// flattening, and the EPSG code for the ellipsoid itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub name: &'static str,
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
    pub epsg: u32,
}

impl Ellipsoid {
    /// Flattening `f = 1 / inverseFlattening` (zero stays zero, e.g. the Moon's sphere).
    #[must_use]
    pub fn flattening(&self) -> f64 {
        if self.inverse_flattening == 0.0 {
            0.0
        } else {
            1.0 / self.inverse_flattening
        }
    }

    /// Semi-minor axis `b = a(1-f)`.
    #[must_use]
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.flattening())
    }

    /// First eccentricity squared `e² = f(2-f)`.
    #[must_use]
    pub fn eccentricity_sq(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    /// Third flattening `n = f/(2-f)`.
    #[must_use]
    pub fn third_flattening(&self) -> f64 {
        let f = self.flattening();
        f / (2.0 - f)
    }
}

macro_rules! ellipsoid_table {
    ($($konst:ident = $idx:literal => $name:literal, $a:literal, $inv_f:expr, $epsg:literal;)*) => {
        /// Indices into [`STD_ELLIPSOIDS`], mirroring `udGeoZoneEllipsoid`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[allow(missing_docs)]
        pub enum EllipsoidId { $($konst = $idx,)* }

        pub const STD_ELLIPSOIDS: [Ellipsoid; 22] = [
            $(Ellipsoid { name: $name, semi_major_axis: $a, inverse_flattening: $inv_f, epsg: $epsg },)*
        ];
    };
}

ellipsoid_table! {
    Wgs84 = 0 => "WGS 84", 6378137.000, 1.0 / 298.257223563, 7030;
    Airy1830 = 1 => "Airy 1830", 6377563.396, 1.0 / 299.3249646, 7001;
    AiryModified = 2 => "Airy Modified 1849", 6377340.189, 1.0 / 299.3249646, 7002;
    Bessel1841 = 3 => "Bessel 1841", 6377397.155, 1.0 / 299.1528128, 7004;
    BesselModified = 4 => "Bessel Modified", 6377492.018, 1.0 / 299.1528128, 7005;
    Clarke1866 = 5 => "Clarke 1866", 6378206.400, 1.0 / 294.978698214, 7008;
    Clarke1880Ign = 6 => "Clarke 1880 (IGN)", 6378249.200, 1.0 / 293.466021294, 7011;
    Grs80 = 7 => "GRS 1980", 6378137.000, 1.0 / 298.257222101, 7019;
    Intl1924 = 8 => "International 1924", 6378388.000, 1.0 / 297.00, 7022;
    Wgs72 = 9 => "WGS 72", 6378135.000, 1.0 / 298.26, 7043;
    Cgcs2000 = 10 => "CGCS2000", 6378137.000, 1.0 / 298.257222101, 1024;
    Clarke1858 = 11 => "Clarke 1858", 6378293.64520876, 1.0 / 294.260676369, 7007;
    Clarke1880Foot = 12 => "Clarke 1880 (international foot)", 6378306.369, 1.0 / 293.466307656, 7055;
    Krassowsky1940 = 13 => "Krassowsky 1940", 6378245.000, 1.0 / 298.3, 7024;
    Everest1930M = 14 => "Everest 1830 Modified", 6377304.063, 1.0 / 300.8017, 7018;
    Mars = 15 => "Mars_2000_IAU_IAG", 3396190.000, 1.0 / 169.894447224, 49900;
    Moon = 16 => "Moon_2000_IAU_IAG", 1737400.000, 0.0, 39064;
    Iag1975 = 17 => "IAG 1975", 6378140.000, 1.0 / 298.257, 7049;
    Everest1830 = 18 => "Everest 1830 (1967 Definition)", 6377298.556, 1.0 / 300.8017, 7016;
    Grs67 = 19 => "GRS 1967", 6378160.000, 1.0 / 298.247167427, 7036;
    Ans = 20 => "Australian National Spheroid", 6378160.0, 1.0 / 298.25, 7003;
    Ins = 21 => "Indonesian National Spheroid", 6378160.0, 1.0 / 298.247, 7021;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_22_rows() {
        assert_eq!(STD_ELLIPSOIDS.len(), 22);
        assert_eq!(STD_ELLIPSOIDS[EllipsoidId::Wgs84 as usize].epsg, 7030);
    }

    #[test]
    fn wgs84_derived_quantities() {
        let e = STD_ELLIPSOIDS[EllipsoidId::Wgs84 as usize];
        assert!((e.semi_minor_axis() - 6_356_752.314_245).abs() < 1e-3);
        assert!((e.eccentricity_sq() - 0.006_694_379_99).abs() < 1e-10);
    }

    #[test]
    fn moon_is_a_perfect_sphere() {
        let e = STD_ELLIPSOIDS[EllipsoidId::Moon as usize];
        assert_eq!(e.flattening(), 0.0);
        assert_eq!(e.semi_minor_axis(), e.semi_major_axis);
    }
}
