//! Geospatial primitives
//!
//! WGS84 point value type, the binary/text point codec used for storage,
//! and great-circle distance math.

pub mod distance;
pub mod point;
pub mod wkb;

pub use distance::{haversine_km, haversine_m, route_distance_km};
pub use point::{GeoPoint, SRID_WGS84};
pub use wkb::PointDecodeError;
