//! Vocabulary for the bits of the OSM schema this tool consumes.

use std::collections::BTreeMap;
use std::fmt;

use geom::Distance;

// Common OSM keys. Keys used in just one place don't need to be defined here.
pub const BUILDING: &str = "building";
pub const ELEVATION: &str = "ele";
pub const HEIGHT: &str = "height";
pub const HIGHWAY: &str = "highway";
pub const WIDTH: &str = "width";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeID(pub i64);
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WayID(pub i64);

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/node/{}", self.0)
    }
}

impl fmt::Display for WayID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/way/{}", self.0)
    }
}

/// The tags of a single OSM object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Tags {
        Tags(BTreeMap::new())
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, k: K, v: V) {
        self.0.insert(k.into(), v.into());
    }

    pub fn get(&self, k: &str) -> Option<&String> {
        self.0.get(k)
    }

    pub fn contains_key(&self, k: &str) -> bool {
        self.0.contains_key(k)
    }

    pub fn is(&self, k: &str, v: &str) -> bool {
        self.0.get(k).map(|value| value == v).unwrap_or(false)
    }

    /// Parses a positive numeric tag in meters, like `width=7.5`, `height=12 m` or `ele=210`.
    /// Anything unparseable or non-positive counts as absent.
    pub fn get_meters(&self, k: &str) -> Option<Distance> {
        let raw = self.get(k)?.trim().trim_end_matches('m').trim();
        let value = raw.parse::<f64>().ok()?;
        if value.is_finite() && value > 0.0 {
            Some(Distance::meters(value))
        } else {
            None
        }
    }
}
