use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::LonLat;

/// A rectangular region in degrees, the area of the world being converted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GPSBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GPSBounds {
    pub fn new() -> GPSBounds {
        GPSBounds {
            min_lon: f64::MAX,
            min_lat: f64::MAX,
            max_lon: f64::MIN,
            max_lat: f64::MIN,
        }
    }

    /// The usual argument order: min_lon, min_lat, max_lon, max_lat. Each minimum must be
    /// strictly less than its maximum.
    pub fn from_degrees(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<GPSBounds> {
        if min_lon >= max_lon || min_lat >= max_lat {
            bail!(
                "bad bounding box ({}, {}, {}, {}); the minimum corner must be southwest of the \
                 maximum",
                min_lon,
                min_lat,
                max_lon,
                max_lat
            );
        }
        Ok(GPSBounds {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    pub fn update(&mut self, pt: LonLat) {
        self.min_lon = self.min_lon.min(pt.longitude);
        self.max_lon = self.max_lon.max(pt.longitude);
        self.min_lat = self.min_lat.min(pt.latitude);
        self.max_lat = self.max_lat.max(pt.latitude);
    }

    pub fn contains(&self, pt: LonLat) -> bool {
        pt.longitude >= self.min_lon
            && pt.longitude <= self.max_lon
            && pt.latitude >= self.min_lat
            && pt.latitude <= self.max_lat
    }

    pub fn southwest(&self) -> LonLat {
        LonLat::new(self.min_lon, self.min_lat)
    }

    pub fn northeast(&self) -> LonLat {
        LonLat::new(self.max_lon, self.max_lat)
    }
}

impl Default for GPSBounds {
    fn default() -> GPSBounds {
        GPSBounds::new()
    }
}
