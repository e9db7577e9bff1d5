use anyhow::Result;

use crate::{Distance, GPSBounds, LonLat, Pt3D};

// WGS84 ellipsoid
const SEMI_MAJOR_M: f64 = 6_378_137.0;
const FLATTENING: f64 = 1.0 / 298.257_223_563;
// UTM central meridian scale factor
const K0: f64 = 0.9996;

/// Projects GPS coordinates into the local metric frame, using the transverse Mercator
/// projection of the UTM zone containing the anchor. The projected anchor is subtracted from
/// every result, so `project` maps the anchor itself to (0, 0).
///
/// All points in one conversion share a single zone. The standard UTM false easting/northing
/// constants are omitted; they'd cancel in the subtraction anyway, and leaving them out keeps
/// coordinates continuous across the equator.
#[derive(Clone, Debug)]
pub struct UtmProjector {
    zone: u8,
    anchor: LonLat,
    anchor_east_m: f64,
    anchor_north_m: f64,
}

impl UtmProjector {
    /// Anchors at the southwest corner of the bounding box. Fails if the box spans two UTM
    /// zones; naively subtracting coordinates projected against different central meridians
    /// produces garbage geometry, so such regions are unsupported.
    pub fn new(bounds: &GPSBounds) -> Result<UtmProjector> {
        let zone = zone_for(bounds.min_lon);
        let max_zone = zone_for(bounds.max_lon);
        if zone != max_zone {
            bail!(
                "bounding box spans UTM zones {} and {}; convert a smaller region",
                zone,
                max_zone
            );
        }

        let anchor = bounds.southwest();
        let (anchor_east_m, anchor_north_m) = forward(zone, anchor);
        Ok(UtmProjector {
            zone,
            anchor,
            anchor_east_m,
            anchor_north_m,
        })
    }

    /// The GPS point that maps to (0, 0).
    pub fn origin(&self) -> LonLat {
        self.anchor
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    /// Meters east/north of the anchor, with the caller's elevation as z.
    pub fn project(&self, gps: LonLat, elevation: Distance) -> Pt3D {
        let (east_m, north_m) = forward(self.zone, gps);
        Pt3D::new(
            east_m - self.anchor_east_m,
            north_m - self.anchor_north_m,
            elevation.inner_meters(),
        )
    }
}

/// UTM longitude zones are 6 degrees wide, numbered 1 to 60 starting at 180°W.
fn zone_for(lon: f64) -> u8 {
    (((lon + 180.0) / 6.0).floor() as i64).rem_euclid(60) as u8 + 1
}

/// Transverse Mercator forward projection (standard series expansion), without false
/// easting/northing.
fn forward(zone: u8, gps: LonLat) -> (f64, f64) {
    let e2 = FLATTENING * (2.0 - FLATTENING);
    let ep2 = e2 / (1.0 - e2);

    let phi = gps.latitude.to_radians();
    let central_meridian = f64::from(zone) * 6.0 - 183.0;
    let dlam = (gps.longitude - central_meridian).to_radians();

    let sin_phi = phi.sin();
    let cos_phi = phi.cos();
    let nu = SEMI_MAJOR_M / (1.0 - e2 * sin_phi * sin_phi).sqrt();
    let t = phi.tan().powi(2);
    let c = ep2 * cos_phi * cos_phi;
    let a = dlam * cos_phi;

    // Meridional arc length from the equator
    let m = SEMI_MAJOR_M
        * ((1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0) * phi
            - (3.0 * e2 / 8.0 + 3.0 * e2 * e2 / 32.0 + 45.0 * e2 * e2 * e2 / 1024.0)
                * (2.0 * phi).sin()
            + (15.0 * e2 * e2 / 256.0 + 45.0 * e2 * e2 * e2 / 1024.0) * (4.0 * phi).sin()
            - (35.0 * e2 * e2 * e2 / 3072.0) * (6.0 * phi).sin());

    let east_m = K0
        * nu
        * (a
            + (1.0 - t + c) * a.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0);
    let north_m = K0
        * (m + nu
            * phi.tan()
            * (a * a / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * ep2) * a.powi(6) / 720.0));

    (east_m, north_m)
}
