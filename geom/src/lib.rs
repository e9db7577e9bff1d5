//! Coordinate primitives for turning GPS coordinates into a local metric frame.

#[macro_use]
extern crate anyhow;

mod bounds;
mod distance;
mod gps;
mod projection;
mod pt;

pub use crate::bounds::GPSBounds;
pub use crate::distance::Distance;
pub use crate::gps::LonLat;
pub use crate::projection::UtmProjector;
pub use crate::pt::Pt3D;

/// Reduce the precision of an f64. This keeps output documents byte-identical across runs and
/// platforms; a tenth of a millimeter is far below anything a simulator cares about.
pub fn trim_f64(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
