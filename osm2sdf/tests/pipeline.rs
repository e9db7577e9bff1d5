//! End-to-end checks of the conversion pipeline on small inline extracts.

use geom::{GPSBounds, LonLat};
use osm2sdf::{convert, resolve_source, ConvertError, Filter, Options, Source, Warning};

// A residential street, a square building, a doubly-tagged way and a street lamp, all inside
// the declared bounds.
const LITTLE_TOWN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <bounds minlat="40.606" minlon="-75.38" maxlat="40.609" maxlon="-75.377"/>
  <node id="1" lat="40.6061" lon="-75.3799"/>
  <node id="2" lat="40.6061" lon="-75.3794"/>
  <node id="3" lat="40.6066" lon="-75.3794"/>
  <node id="4" lat="40.6066" lon="-75.3799"/>
  <node id="5" lat="40.6075" lon="-75.3785">
    <tag k="highway" v="street_lamp"/>
  </node>
  <node id="6" lat="40.607" lon="-75.3799"/>
  <node id="7" lat="40.6072" lon="-75.3779"/>
  <way id="100">
    <nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="4"/><nd ref="1"/>
    <tag k="building" v="yes"/>
    <tag k="height" v="8"/>
  </way>
  <way id="200">
    <nd ref="6"/><nd ref="7"/>
    <tag k="highway" v="residential"/>
  </way>
  <way id="300">
    <nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="4"/><nd ref="1"/>
    <tag k="building" v="retail"/>
    <tag k="highway" v="service"/>
  </way>
</osm>"#;

#[test]
fn little_town_converts() {
    let (world, warnings) = convert(LITTLE_TOWN, None, &Options::new(Filter::default())).unwrap();

    // Way 300 is tagged both building and highway; the only warning is about that, and it only
    // shows up as a building.
    assert_eq!(warnings.len(), 1);
    assert!(matches!(warnings[0], Warning::Classification(_)));
    assert_eq!(world.roads.len(), 1);
    assert_eq!(world.buildings.len(), 2);
    assert_eq!(world.models.len(), 1);

    // The origin is the declared bounds' southwest corner.
    assert_eq!(world.origin, LonLat::new(-75.38, 40.606));

    for road in &world.roads {
        assert!(road.center_points.len() >= 2);
        assert!(road.width.inner_meters() > 0.0);
    }
    for building in &world.buildings {
        assert!(building.footprint.len() >= 4);
        assert_eq!(building.footprint.first(), building.footprint.last());
    }

    // Everything already sits in the local frame; no coordinate resembles a degree value.
    let xml = world.to_xml().unwrap();
    assert!(!xml.contains("<point>-75"));
}

#[test]
fn output_is_deterministic() {
    let opts = Options::new(Filter::default());
    let (world1, _) = convert(LITTLE_TOWN, None, &opts).unwrap();
    let (world2, _) = convert(LITTLE_TOWN, None, &opts).unwrap();
    assert_eq!(world1.to_xml().unwrap(), world2.to_xml().unwrap());
}

#[test]
fn flags_limit_what_gets_rendered() {
    let roads_only = Filter {
        roads: true,
        ..Filter::default()
    };
    let (world, _) = convert(LITTLE_TOWN, None, &Options::new(roads_only)).unwrap();
    assert_eq!(world.roads.len(), 1);
    assert!(world.buildings.is_empty());
    assert!(world.models.is_empty());

    let all = Filter {
        roads: true,
        all: true,
        ..Filter::default()
    };
    let (world, _) = convert(LITTLE_TOWN, None, &Options::new(all)).unwrap();
    assert_eq!(world.roads.len(), 1);
    assert_eq!(world.buildings.len(), 2);
    assert_eq!(world.models.len(), 1);
}

#[test]
fn empty_region_still_produces_a_world() {
    let bounds = GPSBounds::from_degrees(-75.38, 40.606, -75.377, 40.609).unwrap();
    let (world, warnings) = convert(
        "<osm version=\"0.6\"></osm>",
        Some(bounds),
        &Options::new(Filter::default()),
    )
    .unwrap();
    assert!(warnings.is_empty());
    assert!(world.roads.is_empty());
    assert!(world.buildings.is_empty());
    assert!(world.models.is_empty());

    // Still a loadable world: origin metadata plus the ground plane.
    let xml = world.to_xml().unwrap();
    assert!(xml.contains("<spherical_coordinates>"));
    assert!(xml.contains("ground_plane"));
}

#[test]
fn no_bounds_and_no_input_is_a_configuration_error() {
    match resolve_source(None, None) {
        Err(ConvertError::Configuration(_)) => {}
        other => panic!("expected a configuration error, got {:?}", other),
    }

    // An empty extract with no bounds from anywhere fails the same way.
    assert!(matches!(
        convert("<osm></osm>", None, &Options::new(Filter::default())),
        Err(ConvertError::Configuration(_))
    ));
}

#[test]
fn source_resolution_prefers_the_input_file() {
    let bounds = GPSBounds::from_degrees(-75.38, 40.606, -75.377, 40.609).unwrap();
    assert_eq!(
        resolve_source(Some("map.osm".to_string()), Some(bounds.clone())).unwrap(),
        Source::File("map.osm".to_string())
    );
    assert_eq!(
        resolve_source(None, Some(bounds.clone())).unwrap(),
        Source::Fetch(bounds)
    );
}

#[test]
fn file_bounds_override_the_flag_bounds() {
    let far_away = GPSBounds::from_degrees(10.0, 50.0, 10.1, 50.1).unwrap();
    let (world, _) = convert(LITTLE_TOWN, Some(far_away), &Options::new(Filter::default())).unwrap();
    assert_eq!(world.origin, LonLat::new(-75.38, 40.606));
}

#[test]
fn zone_spanning_region_is_rejected() {
    let bounds = GPSBounds::from_degrees(-73.0, 40.0, -71.0, 41.0).unwrap();
    assert!(matches!(
        convert("<osm></osm>", Some(bounds), &Options::new(Filter::default())),
        Err(ConvertError::Projection(_))
    ));
}

#[test]
fn corrupt_extract_is_a_parse_error() {
    assert!(matches!(
        convert(
            "<osm><way id=\"1\"><nd ref=\"42\"/></way></osm>",
            None,
            &Options::new(Filter::default())
        ),
        Err(ConvertError::Parse(_))
    ));
}
