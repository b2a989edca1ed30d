//! Geo zone (component C11): SRID registry, ellipsoid/datum tables, ~14 map projections,
//! WKT1 parsing/emission, and Helmert-7 datum shifts, grounded on
//! `original_source/Include/udGeoZone.h` / `original_source/Source/udGeoZone.cpp`.
//!
//! A [`GeoZone`] is a flat, fully self-contained description of a coordinate reference system.
//! Build one with [`srid::set_from_srid`] or [`wkt::set_from_wkt`], then project points between
//! geodetic and zone-local cartesian space with [`projection::lat_long_to_cartesian`] /
//! [`projection::cartesian_to_lat_long`], or move a point or frame between two zones entirely
//! (projection and datum both) with [`transform::transform_point`] /
//! [`transform::transform_matrix`].

mod datum;
mod ellipsoid;
mod projection;
mod registry;
mod series;
mod srid;
pub mod transform;
mod wkt;
mod zone;

pub use datum::{
    clear_dynamic, descriptor as datum_descriptor, find_by_full_name as find_datum_by_full_name,
    push_dynamic as push_dynamic_datum, DatumDescriptor, DatumId, Helmert7, DATUM_ALIASES,
    STD_DATUMS,
};
pub use ellipsoid::{Ellipsoid, EllipsoidId, STD_ELLIPSOIDS};
pub use projection::{cartesian_to_lat_long, lat_long_to_cartesian, Projection};
pub use registry::{find_srid_zone, load_zones_from_json, unload_zones};
pub use srid::{find_srid, set_from_srid};
pub use wkt::{get_well_known_text, set_from_wkt};
pub use zone::GeoZone;
