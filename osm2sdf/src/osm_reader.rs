//! Parses raw OSM XML into an in-memory index of nodes and ways.
//!
//! Per <https://wiki.openstreetmap.org/wiki/OSM_XML>, elements come in order: bounds, nodes,
//! then ways. A way referencing a node this file never defined is corrupt input -- dropping
//! the reference silently would quietly mangle geometry downstream, so it's an error instead.

use std::collections::BTreeMap;
use std::str::FromStr;

use geom::{GPSBounds, LonLat};

use crate::osm::{NodeID, Tags, WayID};
use crate::ConvertError;

pub struct Document {
    /// From the file's own `<bounds>` element, if it has one.
    pub bounds: Option<GPSBounds>,
    pub nodes: BTreeMap<NodeID, Node>,
    pub ways: BTreeMap<WayID, Way>,
}

#[derive(Clone)]
pub struct Node {
    pub pt: LonLat,
    pub tags: Tags,
}

#[derive(Clone)]
pub struct Way {
    /// Ordered, possibly repeating (a closed ring repeats its first node at the end).
    pub nodes: Vec<NodeID>,
    pub tags: Tags,
}

impl Document {
    /// The bounding box of every node in the file. A fallback for files without `<bounds>`.
    pub fn scrape_bounds(&self) -> Option<GPSBounds> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut bounds = GPSBounds::new();
        for node in self.nodes.values() {
            bounds.update(node.pt);
        }
        Some(bounds)
    }
}

pub fn read(raw: &str) -> Result<Document, ConvertError> {
    let tree = roxmltree::Document::parse(raw)
        .map_err(|err| ConvertError::Parse(err.to_string()))?;

    let mut doc = Document {
        bounds: None,
        nodes: BTreeMap::new(),
        ways: BTreeMap::new(),
    };

    for obj in tree.descendants() {
        if !obj.is_element() {
            continue;
        }
        match obj.tag_name().name() {
            "bounds" => {
                // The first one wins, if somebody glued extracts together.
                if doc.bounds.is_none() {
                    let mut bounds = GPSBounds::new();
                    bounds.update(LonLat::new(
                        parse_attribute(obj, "minlon")?,
                        parse_attribute(obj, "minlat")?,
                    ));
                    bounds.update(LonLat::new(
                        parse_attribute(obj, "maxlon")?,
                        parse_attribute(obj, "maxlat")?,
                    ));
                    doc.bounds = Some(bounds);
                }
            }
            "node" => {
                let id = NodeID(parse_attribute(obj, "id")?);
                if doc.nodes.contains_key(&id) {
                    return Err(ConvertError::Parse(format!(
                        "duplicate {}, your .osm is corrupt",
                        id
                    )));
                }
                let pt = LonLat::new(
                    parse_attribute(obj, "lon")?,
                    parse_attribute(obj, "lat")?,
                );
                doc.nodes.insert(id, Node {
                    pt,
                    tags: read_tags(obj),
                });
            }
            "way" => {
                let id = WayID(parse_attribute(obj, "id")?);
                if doc.ways.contains_key(&id) {
                    return Err(ConvertError::Parse(format!(
                        "duplicate {}, your .osm is corrupt",
                        id
                    )));
                }
                let mut nodes = Vec::new();
                for child in obj.children() {
                    if child.tag_name().name() == "nd" {
                        let n = NodeID(parse_attribute(child, "ref")?);
                        if !doc.nodes.contains_key(&n) {
                            return Err(ConvertError::Parse(format!(
                                "{} references {}, which this file doesn't define",
                                id, n
                            )));
                        }
                        nodes.push(n);
                    }
                }
                doc.ways.insert(id, Way {
                    nodes,
                    tags: read_tags(obj),
                });
            }
            _ => {}
        }
    }

    Ok(doc)
}

fn parse_attribute<T: FromStr>(obj: roxmltree::Node, key: &str) -> Result<T, ConvertError> {
    let raw = obj.attribute(key).ok_or_else(|| {
        ConvertError::Parse(format!(
            "a <{}> is missing the {} attribute",
            obj.tag_name().name(),
            key
        ))
    })?;
    raw.parse::<T>().map_err(|_| {
        ConvertError::Parse(format!(
            "a <{}> has {}=\"{}\", which doesn't parse",
            obj.tag_name().name(),
            key,
            raw
        ))
    })
}

fn read_tags(obj: roxmltree::Node) -> Tags {
    let mut tags = Tags::new();
    for child in obj.children() {
        if child.tag_name().name() == "tag" {
            if let (Some(key), Some(value)) = (child.attribute("k"), child.attribute("v")) {
                // Toss out really useless metadata.
                if key.starts_with("tiger:") || key.starts_with("old_name:") {
                    continue;
                }
                tags.insert(key, value);
            }
        }
    }
    tags
}
