use std::fmt;

use serde::{Deserialize, Serialize};

use crate::trim_f64;

/// A point in the local metric frame, in meters. x points east, y north, z up. (0, 0, 0) is
/// whatever anchor the projection was seeded with.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt3D {
    x: f64,
    y: f64,
    z: f64,
}

impl Pt3D {
    pub fn new(x: f64, y: f64, z: f64) -> Pt3D {
        if !x.is_finite() || !y.is_finite() || !z.is_finite() {
            panic!("Bad Pt3D ({}, {}, {})", x, y, z);
        }

        Pt3D {
            x: trim_f64(x),
            y: trim_f64(y),
            z: trim_f64(z),
        }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn z(self) -> f64 {
        self.z
    }

    /// The arithmetic mean of some points. Panics on an empty slice.
    pub fn center(pts: &[Pt3D]) -> Pt3D {
        let len = pts.len() as f64;
        let mut x = 0.0;
        let mut y = 0.0;
        let mut z = 0.0;
        for pt in pts {
            x += pt.x;
            y += pt.y;
            z += pt.z;
        }
        Pt3D::new(x / len, y / len, z / len)
    }

    pub fn offset(self, dx: f64, dy: f64, dz: f64) -> Pt3D {
        Pt3D::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl fmt::Display for Pt3D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt3D({0}, {1}, {2})", self.x, self.y, self.z)
    }
}
