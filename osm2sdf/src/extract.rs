//! Turns classified candidates into concrete geometry: road polylines, building footprints and
//! model poses, all in the local metric frame.

use geom::{Distance, Pt3D, UtmProjector};
use sdf::{Building, Color, ModelPlacement, Road};

use crate::classify::Candidates;
use crate::osm::{self, Tags};
use crate::osm_reader::{Document, Way};
use crate::{catalog, Warning};

/// For roads without a parseable `width` tag. Two lanes and shoulders, roughly.
pub const DEFAULT_ROAD_WIDTH: Distance = Distance::const_meters(7.5);
/// For buildings without a parseable `height` tag. About three storeys.
pub const DEFAULT_BUILDING_HEIGHT: Distance = Distance::const_meters(10.0);

#[derive(Default)]
pub struct Extract {
    pub roads: Vec<Road>,
    pub buildings: Vec<Building>,
    pub models: Vec<ModelPlacement>,
}

/// Degenerate features are dropped with a warning; the run keeps going without them.
pub fn extract(
    doc: &Document,
    candidates: Candidates,
    projector: &UtmProjector,
    warnings: &mut Vec<Warning>,
) -> Extract {
    let mut out = Extract::default();

    for (id, way) in &candidates.roads {
        let center_points = project_way(doc, way, projector);
        if center_points.len() < 2 {
            warnings.push(Warning::Geometry(format!(
                "{} has fewer than 2 distinct points, so it can't be a road",
                id
            )));
            continue;
        }
        let width = way.tags.get_meters(osm::WIDTH).unwrap_or(DEFAULT_ROAD_WIDTH);
        out.roads.push(Road {
            id: id.0,
            center_points,
            width,
        });
    }

    for (id, way) in &candidates.buildings {
        // A footprint must close on the node it started from; almost-rings are dropped, never
        // glued shut.
        if way.nodes.len() < 4 || way.nodes.first() != way.nodes.last() {
            warnings.push(Warning::Geometry(format!(
                "{} isn't a closed ring, so it can't be a building",
                id
            )));
            continue;
        }
        let footprint = project_way(doc, way, projector);
        if footprint.len() < 4 {
            warnings.push(Warning::Geometry(format!(
                "{} collapses to fewer than 3 distinct corners",
                id
            )));
            continue;
        }
        // The closing vertex repeats the first, so it stays out of the centroid.
        let center = Pt3D::center(&footprint[..footprint.len() - 1]);
        out.buildings.push(Building {
            id: id.0,
            footprint,
            center,
            height: way
                .tags
                .get_meters(osm::HEIGHT)
                .unwrap_or(DEFAULT_BUILDING_HEIGHT),
            color: Color::from_palette(id.0),
        });
    }

    for (id, node) in &candidates.models {
        out.models.push(ModelPlacement {
            id: id.0,
            model: catalog::mesh_for(&node.tags).to_string(),
            pose: projector.project(node.pt, elevation(&node.tags)),
        });
    }

    info!(
        "Extracted {} roads, {} buildings, {} models",
        out.roads.len(),
        out.buildings.len(),
        out.models.len()
    );
    out
}

fn project_way(doc: &Document, way: &Way, projector: &UtmProjector) -> Vec<Pt3D> {
    let mut pts = Vec::new();
    for n in &way.nodes {
        let node = &doc.nodes[n];
        pts.push(projector.project(node.pt, elevation(&node.tags)));
    }
    pts.dedup();
    pts
}

/// Unlike widths and heights, elevations may legitimately be negative.
fn elevation(tags: &Tags) -> Distance {
    if let Some(raw) = tags.get(osm::ELEVATION) {
        if let Ok(value) = raw.trim().trim_end_matches('m').trim().parse::<f64>() {
            if value.is_finite() {
                return Distance::meters(value);
            }
        }
    }
    Distance::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Filter};
    use crate::osm_reader;

    fn convert_ways(xml: &str) -> (Extract, Vec<Warning>) {
        let doc = osm_reader::read(xml).unwrap();
        let bounds = doc.bounds.clone().or_else(|| doc.scrape_bounds()).unwrap();
        let projector = UtmProjector::new(&bounds).unwrap();
        let mut warnings = Vec::new();
        let candidates = classify(&doc, &Filter::default(), &mut warnings);
        let out = extract(&doc, candidates, &projector, &mut warnings);
        (out, warnings)
    }

    #[test]
    fn road_width_defaults() {
        let (out, warnings) = convert_ways(
            r#"<osm>
              <node id="1" lat="40.606" lon="-75.38"/>
              <node id="2" lat="40.607" lon="-75.379"/>
              <way id="10">
                <nd ref="1"/><nd ref="2"/>
                <tag k="highway" v="residential"/>
              </way>
              <way id="11">
                <nd ref="1"/><nd ref="2"/>
                <tag k="highway" v="primary"/>
                <tag k="width" v="11.5"/>
              </way>
            </osm>"#,
        );
        assert!(warnings.is_empty());
        assert_eq!(out.roads.len(), 2);
        assert_eq!(out.roads[0].width, DEFAULT_ROAD_WIDTH);
        assert_eq!(out.roads[1].width, Distance::meters(11.5));
    }

    #[test]
    fn degenerate_road_is_dropped() {
        let (out, warnings) = convert_ways(
            r#"<osm>
              <node id="1" lat="40.606" lon="-75.38"/>
              <node id="2" lat="40.607" lon="-75.379"/>
              <way id="10">
                <nd ref="1"/><nd ref="1"/>
                <tag k="highway" v="residential"/>
              </way>
            </osm>"#,
        );
        assert!(out.roads.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], Warning::Geometry(_)));
    }

    #[test]
    fn unclosed_building_is_dropped() {
        let (out, warnings) = convert_ways(
            r#"<osm>
              <node id="1" lat="40.606" lon="-75.38"/>
              <node id="2" lat="40.607" lon="-75.38"/>
              <node id="3" lat="40.607" lon="-75.379"/>
              <way id="20">
                <nd ref="1"/><nd ref="2"/><nd ref="3"/>
                <tag k="building" v="yes"/>
              </way>
            </osm>"#,
        );
        assert!(out.buildings.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], Warning::Geometry(_)));
    }

    #[test]
    fn square_building_centroid_is_its_center() {
        let (out, warnings) = convert_ways(
            r#"<osm>
              <node id="1" lat="40.606" lon="-75.38"/>
              <node id="2" lat="40.606" lon="-75.3795"/>
              <node id="3" lat="40.6065" lon="-75.3795"/>
              <node id="4" lat="40.6065" lon="-75.38"/>
              <way id="1">
                <nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="4"/><nd ref="1"/>
                <tag k="building" v="yes"/>
              </way>
            </osm>"#,
        );
        assert!(warnings.is_empty());
        assert_eq!(out.buildings.len(), 1);
        let building = &out.buildings[0];

        // Closed, with 4 distinct corners
        assert_eq!(building.footprint.len(), 5);
        assert_eq!(building.footprint.first(), building.footprint.last());

        // The centroid matches projecting the square's geographic center; over a box this
        // small the projection is linear to far below a millimeter.
        let bounds = geom::GPSBounds::from_degrees(-75.38, 40.606, -75.3795, 40.6065).unwrap();
        let projector = UtmProjector::new(&bounds).unwrap();
        let expected = projector.project(
            geom::LonLat::new(-75.37975, 40.60625),
            Distance::ZERO,
        );
        assert!((building.center.x() - expected.x()).abs() < 0.01);
        assert!((building.center.y() - expected.y()).abs() < 0.01);
    }

    #[test]
    fn model_pose_and_mesh() {
        let (out, warnings) = convert_ways(
            r#"<osm>
              <node id="1" lat="40.606" lon="-75.38"/>
              <node id="2" lat="40.607" lon="-75.379"/>
              <node id="5" lat="40.6065" lon="-75.3795">
                <tag k="highway" v="street_lamp"/>
                <tag k="ele" v="210"/>
              </node>
              <way id="10">
                <nd ref="1"/><nd ref="2"/>
                <tag k="highway" v="residential"/>
              </way>
            </osm>"#,
        );
        assert!(warnings.is_empty());
        assert_eq!(out.models.len(), 1);
        let model = &out.models[0];
        assert_eq!(model.model, "lamp_post");
        assert_eq!(model.pose.z(), 210.0);
    }
}
