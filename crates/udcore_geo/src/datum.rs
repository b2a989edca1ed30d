//! The geodetic datum table and its runtime-extensible dynamic registry, grounded on
//! `original_source/Source/udGeoZone.cpp`'s `g_udGZ_GeodeticDatumDescriptors[]` /
//! `g_udGZ_DatumAlias[]` / `g_InternalDatumList`.

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::ellipsoid::EllipsoidId;

/// A Helmert 7-parameter (position vector) transform to WGS-84: three translations in metres,
/// three rotations in arc-seconds, and a scale difference in parts-per-million.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helmert7 {
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    pub ds: f64,
}

impl Helmert7 {
    pub const IDENTITY: Self = Self {
        tx: 0.0,
        ty: 0.0,
        tz: 0.0,
        rx: 0.0,
        ry: 0.0,
        rz: 0.0,
        ds: 0.0,
    };

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// The inverse transform (negate every parameter), used when converting WGS-84 -> target.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            tx: -self.tx,
            ty: -self.ty,
            tz: -self.tz,
            rx: -self.rx,
            ry: -self.ry,
            rz: -self.rz,
            ds: -self.ds,
        }
    }
}

/// One row of the standard geodetic datum table.
#[derive(Debug, Clone, PartialEq)]
pub struct DatumDescriptor {
    pub full_name: &'static str,
    pub short_name: &'static str,
    pub datum_name: &'static str,
    pub ellipsoid: EllipsoidId,
    pub to_wgs84: Helmert7,
    pub epsg: u32,
    pub datum_epsg: u32,
    pub export_axis_info: bool,
    pub export_to_wgs84: bool,
}

macro_rules! h {
    ($tx:expr, $ty:expr, $tz:expr, $rx:expr, $ry:expr, $rz:expr, $ds:expr) => {
        Helmert7 {
            tx: $tx,
            ty: $ty,
            tz: $tz,
            rx: $rx,
            ry: $ry,
            rz: $rz,
            ds: $ds,
        }
    };
}

/// Indices into [`STD_DATUMS`], mirroring `udGeoZoneGeodeticDatum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum DatumId {
    Wgs84 = 0,
    Ed50 = 1,
    Etrs89 = 2,
    Tm75 = 3,
    Nad27 = 4,
    Nad27Cgq77 = 5,
    Nad83 = 6,
    Nad831996 = 7,
    Nad83Csrs = 8,
    Nad83Nsrs2007 = 9,
    Nad832011 = 10,
    Ntf = 11,
    Osgb36 = 12,
    Potsdam = 13,
    Tokyo = 14,
    Wgs72 = 15,
    Jgd2000 = 16,
    Jgd2011 = 17,
    Gda94 = 18,
    Gda2020 = 19,
    Rgf93 = 20,
    Nad83Harn = 21,
    Cgcs2000 = 22,
    Hk1980 = 23,
    Svy21 = 24,
    Mgi = 25,
    Nzgd2000 = 26,
    Amersfoort = 27,
    Tri1903 = 28,
    Vanua1915 = 29,
    Dealul1970 = 30,
    Singgrid = 31,
    MarsMerc = 32,
    MarsPcpf = 33,
    MoonMerc = 34,
    MoonPcpf = 35,
    Dbref = 36,
    Dhdn = 37,
    Sjtsk03 = 38,
    Pulk1942 = 39,
    Pulk194258 = 40,
    Pulk194283 = 41,
    Pulk1995 = 42,
    Wgs72Be = 43,
    Beijing1954 = 44,
    NewBeijing = 45,
    Xian1980 = 46,
    Timb1948 = 47,
    Nzgd49 = 48,
    Sweref99 = 49,
    Sad69 = 50,
    Gr96 = 51,
    Dgn95 = 52,
    Ucs2000 = 53,
    H94 = 54,
    Id74 = 55,
    Ngo1948 = 56,
    Rgf93V2b = 57,
}

pub const STD_DATUMS: [DatumDescriptor; 58] = [
    DatumDescriptor { full_name: "WGS 84", short_name: "WGS 84", datum_name: "WGS_1984", ellipsoid: EllipsoidId::Wgs84, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4326, datum_epsg: 6326, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "ED50", short_name: "ED50", datum_name: "European_Datum_1950", ellipsoid: EllipsoidId::Intl1924, to_wgs84: h!(-87.0, -98.0, -121.0, 0.0, 0.0, 0.0, 0.0), epsg: 4230, datum_epsg: 6320, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "ETRS89", short_name: "ETRS89", datum_name: "European_Terrestrial_Reference_System_1989", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4258, datum_epsg: 6258, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "TM75", short_name: "TM75", datum_name: "Geodetic_Datum_of_1965", ellipsoid: EllipsoidId::AiryModified, to_wgs84: h!(482.5, -130.6, 564.6, -1.042, -0.214, -0.631, 8.15), epsg: 4300, datum_epsg: 6300, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "NAD27", short_name: "NAD27", datum_name: "North_American_Datum_1927", ellipsoid: EllipsoidId::Clarke1866, to_wgs84: h!(-8.0, 160.0, 176.0, 0.0, 0.0, 0.0, 0.0), epsg: 4267, datum_epsg: 6267, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "NAD27(CGQ77)", short_name: "NAD27(CGQ77)", datum_name: "North_American_Datum_1927_CGQ77", ellipsoid: EllipsoidId::Clarke1866, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4609, datum_epsg: 6609, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "NAD83", short_name: "NAD83", datum_name: "North_American_Datum_1983", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4269, datum_epsg: 6269, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "NAD83(CORS96)", short_name: "NAD83(CORS96)", datum_name: "NAD83_National_Spatial_Reference_System_1996", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 6783, datum_epsg: 1133, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "NAD83(CSRS)", short_name: "NAD83(CSRS)", datum_name: "NAD83_Canadian_Spatial_Reference_System", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 2955, datum_epsg: 4617, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "NAD83(NSRS2007)", short_name: "NAD83(NSRS2007)", datum_name: "NAD83_National_Spatial_Reference_System_2007", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 3465, datum_epsg: 4759, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "NAD83(2011)", short_name: "NAD83(2011)", datum_name: "NAD83_National_Spatial_Reference_System_2011", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 6318, datum_epsg: 1116, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "NTF", short_name: "NTF", datum_name: "Nouvelle_Triangulation_Francaise", ellipsoid: EllipsoidId::Clarke1880Ign, to_wgs84: h!(-168.0, -60.0, 320.0, 0.0, 0.0, 0.0, 0.0), epsg: 4275, datum_epsg: 6275, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "OSGB 1936", short_name: "OSGB 1936", datum_name: "OSGB_1936", ellipsoid: EllipsoidId::Airy1830, to_wgs84: h!(446.448, -125.157, 542.06, 0.1502, 0.247, 0.8421, -20.4894), epsg: 4277, datum_epsg: 6277, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "PD / 83", short_name: "PD / 83", datum_name: "Potsdam_Datum_83", ellipsoid: EllipsoidId::Bessel1841, to_wgs84: h!(582.0, 105.0, 414.0, -1.04, -0.35, 3.08, 8.3), epsg: 4746, datum_epsg: 6746, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "Tokyo", short_name: "Tokyo", datum_name: "Tokyo", ellipsoid: EllipsoidId::Bessel1841, to_wgs84: h!(-146.414, 507.337, 680.507, 0.0, 0.0, 0.0, 0.0), epsg: 7414, datum_epsg: 6301, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "WGS 72", short_name: "WGS 72", datum_name: "WGS_1972", ellipsoid: EllipsoidId::Wgs72, to_wgs84: h!(0.0, 0.0, 4.5, 0.0, 0.0, 0.554, 0.2263), epsg: 4322, datum_epsg: 6322, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "JGD2000", short_name: "JGD2000", datum_name: "Japanese_Geodetic_Datum_2000", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4612, datum_epsg: 6612, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "JGD2011", short_name: "JGD2011", datum_name: "Japanese_Geodetic_Datum_2011", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 6668, datum_epsg: 1128, export_axis_info: false, export_to_wgs84: false },
    DatumDescriptor { full_name: "GDA94", short_name: "GDA94", datum_name: "Geocentric_Datum_of_Australia_1994", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4283, datum_epsg: 6283, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "GDA2020", short_name: "GDA2020", datum_name: "Geocentric_Datum_of_Australia_2020", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 7844, datum_epsg: 1168, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "RGF93", short_name: "RGF93", datum_name: "Reseau_Geodesique_Francais_1993", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4171, datum_epsg: 6171, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "NAD83(HARN)", short_name: "NAD83(HARN)", datum_name: "NAD83_High_Accuracy_Reference_Network", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4152, datum_epsg: 6152, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "China Geodetic Coordinate System 2000", short_name: "CGCS2000", datum_name: "China_2000", ellipsoid: EllipsoidId::Cgcs2000, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4490, datum_epsg: 1043, export_axis_info: false, export_to_wgs84: false },
    DatumDescriptor { full_name: "Hong Kong 1980", short_name: "Hong Kong 1980", datum_name: "Hong_Kong_1980", ellipsoid: EllipsoidId::Intl1924, to_wgs84: h!(-162.619, -276.959, -161.764, 0.067753, -2.24365, -1.15883, -1.09425), epsg: 4611, datum_epsg: 6611, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "SVY21", short_name: "SVY21", datum_name: "SVY21", ellipsoid: EllipsoidId::Wgs84, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4757, datum_epsg: 6757, export_axis_info: false, export_to_wgs84: false },
    DatumDescriptor { full_name: "MGI", short_name: "MGI", datum_name: "Militar_Geographische_Institute", ellipsoid: EllipsoidId::Bessel1841, to_wgs84: h!(577.326, 90.129, 463.919, 5.137, 1.474, 5.297, 2.4232), epsg: 4312, datum_epsg: 6312, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "NZGD2000", short_name: "NZGD2000", datum_name: "New_Zealand_Geodetic_Datum_2000", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4167, datum_epsg: 6167, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "Amersfoort", short_name: "Amersfoort", datum_name: "Amersfoort", ellipsoid: EllipsoidId::Bessel1841, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4289, datum_epsg: 6289, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "Trinidad 1903", short_name: "Trinidad_1903", datum_name: "Trinidad_1903", ellipsoid: EllipsoidId::Clarke1858, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4302, datum_epsg: 6302, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "Vanua Levu 1915", short_name: "Vanua_Levu_1915", datum_name: "Vanua_Levu_1915", ellipsoid: EllipsoidId::Clarke1880Foot, to_wgs84: h!(51.0, 391.0, -36.0, 0.0, 0.0, 0.0, 0.0), epsg: 4748, datum_epsg: 6748, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "Dealul Piscului 1970", short_name: "Dealul_1970", datum_name: "Dealul_Piscului_1970", ellipsoid: EllipsoidId::Krassowsky1940, to_wgs84: h!(28.0, -121.0, -77.0, 0.0, 0.0, 0.0, 0.0), epsg: 4317, datum_epsg: 6317, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "Singapore Grid", short_name: "Singapore Grid", datum_name: "Singapore Grid", ellipsoid: EllipsoidId::Everest1930M, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4245, datum_epsg: 6245, export_axis_info: false, export_to_wgs84: false },
    DatumDescriptor { full_name: "Mars 2000 Mercator", short_name: "Mars 2000", datum_name: "D_Mars_2000", ellipsoid: EllipsoidId::Mars, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 490_000, datum_epsg: 490_001, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "Mars 2000 / ECEF", short_name: "Mars 2000", datum_name: "D_Mars_2000", ellipsoid: EllipsoidId::Mars, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 490_000, datum_epsg: 490_001, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "Moon 2000 Mercator", short_name: "Moon 2000", datum_name: "D_Moon_2000", ellipsoid: EllipsoidId::Moon, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 39064, datum_epsg: 39065, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "Moon 2000 / ECEF", short_name: "Moon 2000", datum_name: "D_Moon_2000", ellipsoid: EllipsoidId::Moon, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 39064, datum_epsg: 39065, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "DB_REF", short_name: "DB_REF", datum_name: "Deutsche_Bahn_Reference_System", ellipsoid: EllipsoidId::Bessel1841, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 5681, datum_epsg: 1081, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "DHDN", short_name: "DHDN", datum_name: "Deutsches_Hauptdreiecksnetz", ellipsoid: EllipsoidId::Bessel1841, to_wgs84: h!(598.1, 73.7, 418.2, 0.202, 0.045, -2.455, 6.7), epsg: 4314, datum_epsg: 6314, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "System of the Unified Trigonometrical Cadastral Network [JTSK03]", short_name: "JTSK03", datum_name: "S-JTSK [JTSK03]", ellipsoid: EllipsoidId::Bessel1841, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 8353, datum_epsg: 8351, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "Pulkovo 1942", short_name: "Pulkovo_1942", datum_name: "Pulkovo_1942", ellipsoid: EllipsoidId::Krassowsky1940, to_wgs84: h!(23.92, -141.27, -80.9, 0.0, 0.35, 0.82, -0.12), epsg: 4284, datum_epsg: 6284, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "Pulkovo 1942(58)", short_name: "Pulkovo_1942_58", datum_name: "Pulkovo_1942_58", ellipsoid: EllipsoidId::Krassowsky1940, to_wgs84: h!(33.4, -146.6, -76.3, -0.359, -0.053, 0.844, -0.84), epsg: 4179, datum_epsg: 6179, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "Pulkovo 1942(83)", short_name: "Pulkovo_1942_83", datum_name: "Pulkovo_1942_83", ellipsoid: EllipsoidId::Krassowsky1940, to_wgs84: h!(26.0, -121.0, -78.0, 0.0, 0.0, 0.0, 0.0), epsg: 4178, datum_epsg: 6178, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "Pulkovo 1995", short_name: "Pulkovo_1995", datum_name: "Pulkovo_1995", ellipsoid: EllipsoidId::Krassowsky1940, to_wgs84: h!(24.47, -130.89, -81.56, 0.0, 0.0, 0.13, -0.22), epsg: 20004, datum_epsg: 4200, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "WGS 72BE", short_name: "WGS_72BE", datum_name: "WGS_1972_Transit_Broadcast_Ephemeris", ellipsoid: EllipsoidId::Wgs72, to_wgs84: h!(0.0, 0.0, 1.9, 0.0, 0.0, 0.814, -0.38), epsg: 4324, datum_epsg: 6324, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "Beijing 1954", short_name: "Beijing_1954", datum_name: "Beijing_1954", ellipsoid: EllipsoidId::Krassowsky1940, to_wgs84: h!(15.8, -154.4, -82.3, 0.0, 0.0, 0.0, 0.0), epsg: 4214, datum_epsg: 6214, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "New Beijing", short_name: "New_Beijing", datum_name: "New_Beijing", ellipsoid: EllipsoidId::Krassowsky1940, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4555, datum_epsg: 1045, export_axis_info: false, export_to_wgs84: false },
    DatumDescriptor { full_name: "Xian 1980", short_name: "Xian_1980", datum_name: "Xian_1980", ellipsoid: EllipsoidId::Iag1975, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4610, datum_epsg: 6610, export_axis_info: false, export_to_wgs84: false },
    DatumDescriptor { full_name: "Timbalai 1948 / Tso Borneo (m)", short_name: "Timbalai 1948", datum_name: "Timbalai_1948", ellipsoid: EllipsoidId::Everest1830, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 29873, datum_epsg: 6298, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "NZGD49", short_name: "NZGD49", datum_name: "New_Zealand_Geodetic_Datum_1949", ellipsoid: EllipsoidId::Intl1924, to_wgs84: h!(59.47, -5.04, 187.44, 0.47, -0.1, 1.024, -4.5993), epsg: 4272, datum_epsg: 6272, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "SWEREF99", short_name: "SWEREF99", datum_name: "SWEREF99", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4619, datum_epsg: 6619, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "SAD69", short_name: "SAD69", datum_name: "South_American_Datum_1969", ellipsoid: EllipsoidId::Grs67, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4291, datum_epsg: 6291, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "GR96", short_name: "GR96", datum_name: "Greenland_1996", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4747, datum_epsg: 6747, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "DGN95", short_name: "DGN95", datum_name: "Datum_Geodesi_Nasional_1995", ellipsoid: EllipsoidId::Wgs84, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4755, datum_epsg: 6755, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "UCS-2000", short_name: "UCS-2000", datum_name: "Ukraine_2000", ellipsoid: EllipsoidId::Krassowsky1940, to_wgs84: h!(25.0, -141.0, -78.5, 0.0, 0.35, 0.736, 0.0), epsg: 5561, datum_epsg: 1077, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "Hartebeesthoek94", short_name: "Hartebeesthoek94", datum_name: "Hartebeesthoek94", ellipsoid: EllipsoidId::Wgs84, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4148, datum_epsg: 6148, export_axis_info: false, export_to_wgs84: true },
    DatumDescriptor { full_name: "ID74", short_name: "ID74", datum_name: "Indonesian_Datum_1974", ellipsoid: EllipsoidId::Ins, to_wgs84: h!(-24.0, -15.0, 5.0, 0.0, 0.0, 0.0, 0.0), epsg: 4238, datum_epsg: 6238, export_axis_info: true, export_to_wgs84: true },
    DatumDescriptor { full_name: "NGO 1948", short_name: "NGO_1948", datum_name: "NGO_1948", ellipsoid: EllipsoidId::BesselModified, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 4273, datum_epsg: 6273, export_axis_info: true, export_to_wgs84: false },
    DatumDescriptor { full_name: "RGF93 v2b", short_name: "RGF93 v2b", datum_name: "Reseau_Geodesique_Francais_1993_v2b", ellipsoid: EllipsoidId::Grs80, to_wgs84: h!(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0), epsg: 9782, datum_epsg: 6171, export_axis_info: true, export_to_wgs84: true },
];

/// WKT datum names that don't match `DatumDescriptor::full_name` verbatim but are known
/// aliases of a standard entry, grounded on `g_udGZ_DatumAlias[]`.
pub const DATUM_ALIASES: [(&str, DatumId); 11] = [
    ("NTF (Paris)", DatumId::Ntf),
    ("RGRDC 2005", DatumId::Etrs89),
    ("SIRGAS 2000", DatumId::Jgd2000),
    ("NAD83(PA11)", DatumId::Nad832011),
    ("DRUKREF 03", DatumId::Sweref99),
    ("SIRGAS 1995", DatumId::Nad831996),
    ("NAD83(CSRS98)", DatumId::Jgd2000),
    ("GCS_ETRF_1989", DatumId::Wgs84),
    ("Korean 1985", DatumId::Amersfoort),
    ("TUREF", DatumId::Jgd2000),
    ("Korea 2000", DatumId::Nad832011),
];

/// Datums harvested at runtime from parsed-but-unrecognised WKT, extending [`STD_DATUMS`].
/// Indices into this registry are offset by `STD_DATUMS.len()`, mirroring
/// `g_InternalDatumList`'s use alongside the static table.
pub static DYNAMIC_DATUMS: Lazy<Mutex<Vec<DatumDescriptor>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Looks a datum up by its [`DatumDescriptor::full_name`], first against the static table then
/// against known aliases, then against anything harvested into the dynamic registry. Returns the
/// resolved descriptor and a global index (`< STD_DATUMS.len()` for static entries).
#[must_use]
pub fn find_by_full_name(name: &str) -> Option<(usize, DatumDescriptor)> {
    if let Some(i) = STD_DATUMS.iter().position(|d| d.full_name == name) {
        return Some((i, STD_DATUMS[i].clone()));
    }
    if let Some((_, id)) = DATUM_ALIASES.iter().find(|(alias, _)| *alias == name) {
        let i = *id as usize;
        return Some((i, STD_DATUMS[i].clone()));
    }
    let dynamic = DYNAMIC_DATUMS.lock();
    dynamic
        .iter()
        .position(|d| d.full_name == name)
        .map(|i| (STD_DATUMS.len() + i, dynamic[i].clone()))
}

/// Resolves a global datum index (static or dynamic) to its descriptor.
#[must_use]
pub fn descriptor(index: usize) -> Option<DatumDescriptor> {
    if index < STD_DATUMS.len() {
        Some(STD_DATUMS[index].clone())
    } else {
        DYNAMIC_DATUMS
            .lock()
            .get(index - STD_DATUMS.len())
            .cloned()
    }
}

/// Appends an unrecognised datum harvested from WKT to the dynamic registry, returning its
/// global index. Grounded on `udGeoZone_SetFromWKT`'s `udGZGD_Count + list.length` offsetting.
pub fn push_dynamic(descriptor: DatumDescriptor) -> usize {
    let mut dynamic = DYNAMIC_DATUMS.lock();
    dynamic.push(descriptor);
    STD_DATUMS.len() + dynamic.len() - 1
}

/// Clears the dynamic registry, mirroring `udGeoZone_UnloadZones`.
pub fn clear_dynamic() {
    DYNAMIC_DATUMS.lock().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_58_rows() {
        assert_eq!(STD_DATUMS.len(), 58);
        assert_eq!(STD_DATUMS[DatumId::Wgs84 as usize].epsg, 4326);
        assert_eq!(STD_DATUMS[DatumId::Rgf93V2b as usize].epsg, 9782);
    }

    #[test]
    fn wgs84_is_the_identity_transform() {
        assert!(STD_DATUMS[DatumId::Wgs84 as usize].to_wgs84.is_identity());
    }

    #[test]
    fn alias_resolves_to_underlying_datum() {
        let (i, d) = find_by_full_name("TUREF").unwrap();
        assert_eq!(i, DatumId::Jgd2000 as usize);
        assert_eq!(d.epsg, STD_DATUMS[DatumId::Jgd2000 as usize].epsg);
    }

    #[test]
    fn dynamic_registry_round_trips() {
        clear_dynamic();
        let custom = DatumDescriptor {
            full_name: "Custom Test Datum",
            short_name: "CTD",
            datum_name: "Custom_Test_Datum",
            ellipsoid: EllipsoidId::Wgs84,
            to_wgs84: Helmert7::IDENTITY,
            epsg: 0,
            datum_epsg: 0,
            export_axis_info: false,
            export_to_wgs84: false,
        };
        let idx = push_dynamic(custom.clone());
        assert_eq!(idx, STD_DATUMS.len());
        assert_eq!(descriptor(idx).unwrap().full_name, custom.full_name);
        let (found_idx, _) = find_by_full_name("Custom Test Datum").unwrap();
        assert_eq!(found_idx, idx);
        clear_dynamic();
    }
}
