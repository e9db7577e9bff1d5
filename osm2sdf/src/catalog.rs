//! The catalog of point features that get stood in for with simulator meshes.
//!
//! Both tables below are part of the output contract: candidacy and mesh choice depend only on
//! this file, so the same extract always produces the same models. Growing or reordering the
//! tables is a version-bumping change.

use crate::osm::Tags;

pub const CATALOG_VERSION: u32 = 1;

/// Tag pairs that mark a node as a point feature worth placing in the world.
const POINT_FEATURES: &[(&str, &str)] = &[
    ("highway", "street_lamp"),
    ("highway", "bus_stop"),
    ("highway", "stop"),
    ("highway", "give_way"),
    ("amenity", "post_box"),
    ("amenity", "telephone"),
    ("amenity", "bench"),
    ("emergency", "fire_hydrant"),
    ("natural", "tree"),
];

/// The mesh for each point feature. Features recognized above but missing here fall back to
/// `GENERIC_MODEL`.
const MESHES: &[(&str, &str, &str)] = &[
    ("highway", "street_lamp", "lamp_post"),
    ("highway", "bus_stop", "bus_stop"),
    ("highway", "stop", "stop_sign"),
    ("amenity", "post_box", "post_box"),
    ("amenity", "telephone", "telephone_booth"),
    ("emergency", "fire_hydrant", "fire_hydrant"),
    ("natural", "tree", "oak_tree"),
];

/// Stands in for point features nobody has modelled yet.
pub const GENERIC_MODEL: &str = "construction_cone";

pub fn is_point_feature(tags: &Tags) -> bool {
    POINT_FEATURES.iter().any(|(k, v)| tags.is(k, v))
}

/// The mesh for a point feature's tags. Table order decides if a node somehow matches several
/// entries.
pub fn mesh_for(tags: &Tags) -> &'static str {
    for (k, v) in POINT_FEATURES {
        if tags.is(k, v) {
            return MESHES
                .iter()
                .find(|(mk, mv, _)| mk == k && mv == v)
                .map(|(_, _, mesh)| *mesh)
                .unwrap_or(GENERIC_MODEL);
        }
    }
    GENERIC_MODEL
}
