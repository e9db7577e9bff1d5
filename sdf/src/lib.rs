//! An in-memory model of a simulator world and a writer producing SDF XML from it.
//!
//! `WorldBuilder` accumulates elements keyed by their OSM id, so the finished document always
//! comes out in the same order no matter how the pipeline discovered things.

use std::collections::BTreeMap;

use geom::{Distance, LonLat, Pt3D};

mod writer;

pub use crate::writer::SDF_VERSION;

/// An RGB color, each channel in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Facade colors, roughly tan / brick / concrete / slate. Buildings pick one by id, so the
/// palette is part of the output contract; reordering it changes every document.
const BUILDING_PALETTE: [Color; 8] = [
    Color::rgb_f(0.84, 0.79, 0.71),
    Color::rgb_f(0.72, 0.55, 0.45),
    Color::rgb_f(0.63, 0.63, 0.63),
    Color::rgb_f(0.8, 0.72, 0.58),
    Color::rgb_f(0.55, 0.57, 0.62),
    Color::rgb_f(0.76, 0.6, 0.42),
    Color::rgb_f(0.68, 0.7, 0.66),
    Color::rgb_f(0.87, 0.82, 0.76),
];

impl Color {
    pub const fn rgb_f(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b }
    }

    /// Deterministically picks a palette entry from a feature id. The same id always gets the
    /// same color, across runs and machines.
    pub fn from_palette(id: i64) -> Color {
        BUILDING_PALETTE[(id.unsigned_abs() % BUILDING_PALETTE.len() as u64) as usize]
    }
}

/// A road centerline with a uniform width.
#[derive(Clone, Debug, PartialEq)]
pub struct Road {
    /// The OSM way id.
    pub id: i64,
    /// At least 2 points, in order.
    pub center_points: Vec<Pt3D>,
    pub width: Distance,
}

/// A building footprint, extruded to a flat-roofed block.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    /// The OSM way id.
    pub id: i64,
    /// A closed ring; the first and last point are equal.
    pub footprint: Vec<Pt3D>,
    /// The mean of the footprint's distinct vertices. The element is posed here, with the
    /// footprint expressed relative to it.
    pub center: Pt3D,
    pub height: Distance,
    pub color: Color,
}

/// A reference to a catalog mesh, placed with identity orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelPlacement {
    /// The OSM node id.
    pub id: i64,
    /// The mesh name, resolved from the model catalog.
    pub model: String,
    pub pose: Pt3D,
}

/// Accumulates world elements, then hands over an immutable document. Elements are keyed by
/// OSM id within their category; adding the same id twice is a bug in the caller.
pub struct WorldBuilder {
    name: String,
    origin: LonLat,
    ground_extent: Pt3D,
    models: BTreeMap<i64, ModelPlacement>,
    buildings: BTreeMap<i64, Building>,
    roads: BTreeMap<i64, Road>,
}

impl WorldBuilder {
    /// `origin` must be the same point the projector was anchored at, or the document's
    /// spherical coordinates won't line up with its geometry. `ground_extent` is the projected
    /// far corner of the region.
    pub fn new(name: &str, origin: LonLat, ground_extent: Pt3D) -> WorldBuilder {
        WorldBuilder {
            name: name.to_string(),
            origin,
            ground_extent,
            models: BTreeMap::new(),
            buildings: BTreeMap::new(),
            roads: BTreeMap::new(),
        }
    }

    pub fn add_model(&mut self, model: ModelPlacement) {
        let id = model.id;
        if self.models.insert(id, model).is_some() {
            panic!("model {} added twice", id);
        }
    }

    pub fn add_building(&mut self, building: Building) {
        let id = building.id;
        if self.buildings.insert(id, building).is_some() {
            panic!("building {} added twice", id);
        }
    }

    pub fn add_road(&mut self, road: Road) {
        let id = road.id;
        if self.roads.insert(id, road).is_some() {
            panic!("road {} added twice", id);
        }
    }

    pub fn build(self) -> WorldDocument {
        WorldDocument {
            name: self.name,
            origin: self.origin,
            ground_extent: self.ground_extent,
            models: self.models.into_values().collect(),
            buildings: self.buildings.into_values().collect(),
            roads: self.roads.into_values().collect(),
        }
    }
}

/// A finished world. Each category is sorted ascending by id; nothing mutates the document
/// after `WorldBuilder::build`.
pub struct WorldDocument {
    pub name: String,
    pub origin: LonLat,
    pub ground_extent: Pt3D,
    pub models: Vec<ModelPlacement>,
    pub buildings: Vec<Building>,
    pub roads: Vec<Road>,
}
