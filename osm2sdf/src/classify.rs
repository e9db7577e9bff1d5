//! Sorts raw OSM objects into the categories the simulator knows how to render.

use std::collections::BTreeMap;

use crate::osm::{self, NodeID, WayID};
use crate::osm_reader::{Document, Node, Way};
use crate::{catalog, Warning};

/// Which categories of features to render.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    pub roads: bool,
    pub models: bool,
    pub buildings: bool,
    pub all: bool,
}

impl Filter {
    pub fn everything() -> Filter {
        Filter {
            all: true,
            ..Filter::default()
        }
    }

    /// Asking for nothing in particular means everything, as does `all`.
    fn effective(&self) -> (bool, bool, bool) {
        if self.all || !(self.roads || self.models || self.buildings) {
            (true, true, true)
        } else {
            (self.roads, self.models, self.buildings)
        }
    }
}

/// The candidate sets are disjoint; every feature lands in at most one.
#[derive(Default)]
pub struct Candidates {
    pub roads: BTreeMap<WayID, Way>,
    pub buildings: BTreeMap<WayID, Way>,
    pub models: BTreeMap<NodeID, Node>,
}

/// Tag rules: a way with a `building` tag is a building outline, a way with a `highway` tag a
/// road centerline, a node with a catalog tag a model. A way matching several rules lands in
/// exactly one category, by fixed priority: building beats model beats road. Without that,
/// one OSM object would show up twice in the world.
pub fn classify(doc: &Document, filter: &Filter, warnings: &mut Vec<Warning>) -> Candidates {
    let (want_roads, want_models, want_buildings) = filter.effective();
    let mut candidates = Candidates::default();

    for (id, way) in &doc.ways {
        let is_building = way.tags.contains_key(osm::BUILDING);
        let is_road = way.tags.contains_key(osm::HIGHWAY);
        if is_building && is_road {
            warnings.push(Warning::Classification(format!(
                "{} is tagged as both a building and a highway; treating it as a building",
                id
            )));
        }

        if is_building {
            if want_buildings {
                candidates.buildings.insert(*id, way.clone());
            }
        } else if is_road {
            if want_roads {
                candidates.roads.insert(*id, way.clone());
            }
        }
    }

    if want_models {
        for (id, node) in &doc.nodes {
            if catalog::is_point_feature(&node.tags) {
                candidates.models.insert(*id, node.clone());
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm_reader;

    fn doc() -> Document {
        osm_reader::read(
            r#"<osm>
              <node id="1" lat="40.606" lon="-75.38"/>
              <node id="2" lat="40.607" lon="-75.379"/>
              <node id="3" lat="40.607" lon="-75.378"/>
              <node id="4" lat="40.606" lon="-75.379"/>
              <node id="5" lat="40.608" lon="-75.378">
                <tag k="highway" v="street_lamp"/>
              </node>
              <way id="10">
                <nd ref="1"/><nd ref="2"/>
                <tag k="highway" v="residential"/>
              </way>
              <way id="20">
                <nd ref="1"/><nd ref="2"/><nd ref="3"/><nd ref="4"/><nd ref="1"/>
                <tag k="building" v="yes"/>
              </way>
              <way id="30">
                <nd ref="1"/><nd ref="2"/>
                <tag k="building" v="yes"/>
                <tag k="highway" v="service"/>
              </way>
            </osm>"#,
        )
        .unwrap()
    }

    #[test]
    fn unset_flags_mean_everything() {
        let mut warnings = Vec::new();
        let candidates = classify(&doc(), &Filter::default(), &mut warnings);
        assert_eq!(
            candidates.roads.keys().copied().collect::<Vec<_>>(),
            vec![WayID(10)]
        );
        assert_eq!(
            candidates.buildings.keys().copied().collect::<Vec<_>>(),
            vec![WayID(20), WayID(30)]
        );
        assert_eq!(
            candidates.models.keys().copied().collect::<Vec<_>>(),
            vec![NodeID(5)]
        );
    }

    #[test]
    fn all_flag_matches_unset() {
        let mut warnings = Vec::new();
        let everything = classify(&doc(), &Filter::everything(), &mut warnings);
        assert_eq!(everything.roads.len(), 1);
        assert_eq!(everything.buildings.len(), 2);
        assert_eq!(everything.models.len(), 1);
    }

    #[test]
    fn individual_flags_limit_categories() {
        let mut warnings = Vec::new();
        let filter = Filter {
            roads: true,
            ..Filter::default()
        };
        let candidates = classify(&doc(), &filter, &mut warnings);
        assert_eq!(candidates.roads.len(), 1);
        assert!(candidates.buildings.is_empty());
        assert!(candidates.models.is_empty());
    }

    #[test]
    fn buildings_beat_roads() {
        let mut warnings = Vec::new();
        let candidates = classify(&doc(), &Filter::default(), &mut warnings);
        // Way 30 is tagged both ways; it must only show up as a building.
        assert!(candidates.buildings.contains_key(&WayID(30)));
        assert!(!candidates.roads.contains_key(&WayID(30)));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], Warning::Classification(_)));
    }
}
